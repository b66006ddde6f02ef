// TUI rendering: tick frame and average-rate map side by side, status panel below.

use std::io::Stdout;

use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::App;
use crate::source::SpikeSource;

/// Draws the UI each frame:
/// - Top left: spikes of the current tick.
/// - Top right: average spike rate over all ticks of the sample.
/// - Bottom: sample, label, tick, channel, run state, controls.
pub fn draw<S: SpikeSource>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &App<S>,
) -> anyhow::Result<()> {
    terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Percentage(80), Constraint::Percentage(20)].as_ref())
            .split(f.size());

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
            .split(chunks[0]);

        let steps = app.source.steps();
        let frame_widget = Paragraph::new(Text::from(app.frame_rows().join("\n")))
            .block(
                Block::default()
                    .title(format!("Tick {}/{}", app.tick + 1, steps))
                    .borders(Borders::ALL),
            )
            .style(Style::default().fg(Color::White));
        f.render_widget(frame_widget, panes[0]);

        let avg_widget = Paragraph::new(Text::from(app.average_rows().join("\n")))
            .block(Block::default().title("Average Spikes").borders(Borders::ALL))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(avg_widget, panes[1]);

        let label = app
            .source
            .label(app.sample)
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = format!(
            "Sample: {}/{} | Label: {} | Tick: {}/{} | Channel: {}/{} | Spikes: {} | Running: {}\n\
             Controls: [←/→] Tick  [n/p] Sample  [c] Channel  [r] Run/Pause  [q] Quit",
            app.sample,
            app.source.samples(),
            label,
            app.tick + 1,
            steps,
            app.channel,
            app.source.channels(),
            app.frame_spike_count(),
            if app.running { "yes" } else { "no" }
        );
        let status_widget = Paragraph::new(status)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().title("Status").borders(Borders::ALL));
        f.render_widget(status_widget, chunks[1]);
    })?;
    Ok(())
}
