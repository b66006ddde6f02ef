//! TUI entrypoint: shows rate-encoded spike input one tick at a time, next to its average rate.
//! Controls: [←/→] Tick, [n/p] Sample, [c] Channel, [r] Run/Pause, [q] Quit

mod app;
mod source;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use nmx_export::SpikeDump;
use source::DumpSource;
use ui::draw;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute, terminal,
};
use ratatui::{backend::CrosstermBackend, Terminal};

#[derive(Parser)]
#[command(name = "nmx-view", version, about = "Terminal viewer for SNN spike dumps")]
struct Args {
    /// Spike dump (JSON with spiking_input and labels)
    #[arg(default_value = "exported_spiking_input.json")]
    input: PathBuf,
    /// Sample to show first
    #[arg(short, long, default_value_t = 0)]
    sample: usize,
    /// Auto-advance period in milliseconds
    #[arg(short, long, default_value_t = 300)]
    tick_ms: u64,
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    // Leave alternate screen and show cursor
    execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load before touching the terminal so errors print normally
    let dump = SpikeDump::from_path(&args.input)
        .with_context(|| format!("reading spike dump {}", args.input.display()))?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Ensure terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));

    let mut app = App::new(DumpSource::new(dump), args.sample);
    let tick_rate = Duration::from_millis(args.tick_ms);
    let mut last_tick = Instant::now();

    // Event loop
    loop {
        draw(&mut terminal, &app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Right => app.next_tick(),
                    KeyCode::Left => app.prev_tick(),
                    KeyCode::Char('n') => app.next_sample(),
                    KeyCode::Char('p') => app.prev_sample(),
                    KeyCode::Char('c') => app.next_channel(),
                    KeyCode::Char('r') => app.toggle_running(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_timer();
            last_tick = Instant::now();
        }
    }

    restore_terminal()?;
    Ok(())
}
