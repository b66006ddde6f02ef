// Viewer state: which sample/channel/tick is shown, plus the text grids the UI draws.

use crate::source::SpikeSource;

/// Spike / silence cells of the tick frame.
pub const SPIKE: char = '█';
pub const SILENT: char = '·';

/// Shades for the average-rate map, lowest rate first.
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

pub struct App<S: SpikeSource> {
    pub source: S,
    pub sample: usize,
    pub channel: usize,
    pub tick: usize,
    pub running: bool,
}

impl<S: SpikeSource> App<S> {
    pub fn new(source: S, sample: usize) -> Self {
        let sample = sample.min(source.samples().saturating_sub(1));
        Self {
            source,
            sample,
            channel: 0,
            tick: 0,
            running: false,
        }
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    /// Advance to the next tick, wrapping after the last one.
    pub fn next_tick(&mut self) {
        let steps = self.source.steps();
        if steps > 0 {
            self.tick = (self.tick + 1) % steps;
        }
    }

    pub fn prev_tick(&mut self) {
        let steps = self.source.steps();
        if steps > 0 {
            self.tick = (self.tick + steps - 1) % steps;
        }
    }

    pub fn next_sample(&mut self) {
        let samples = self.source.samples();
        if samples > 0 {
            self.sample = (self.sample + 1) % samples;
            self.tick = 0;
        }
    }

    pub fn prev_sample(&mut self) {
        let samples = self.source.samples();
        if samples > 0 {
            self.sample = (self.sample + samples - 1) % samples;
            self.tick = 0;
        }
    }

    pub fn next_channel(&mut self) {
        let channels = self.source.channels();
        if channels > 0 {
            self.channel = (self.channel + 1) % channels;
        }
    }

    /// Called on every timer tick of the event loop.
    pub fn on_timer(&mut self) {
        if self.running {
            self.next_tick();
        }
    }

    /// Current tick frame, one string per pixel row.
    pub fn frame_rows(&self) -> Vec<String> {
        let (_, w) = self.source.dims();
        let frame = self.source.frame(self.tick, self.sample, self.channel);
        rows(&frame, w, |&s| if s != 0 { SPIKE } else { SILENT })
    }

    /// Average spike rate over all ticks, shaded.
    pub fn average_rows(&self) -> Vec<String> {
        let (_, w) = self.source.dims();
        let avg = self.source.average(self.sample, self.channel);
        rows(&avg, w, |&rate| shade(rate))
    }

    /// Spikes in the current frame.
    pub fn frame_spike_count(&self) -> usize {
        self.source
            .frame(self.tick, self.sample, self.channel)
            .iter()
            .filter(|&&s| s != 0)
            .count()
    }
}

fn rows<T>(cells: &[T], width: usize, glyph: impl Fn(&T) -> char) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    cells
        .chunks(width)
        .map(|row| row.iter().map(&glyph).collect())
        .collect()
}

/// Map a rate in [0, 1] to a shade character.
pub fn shade(rate: f64) -> char {
    let top = SHADES.len() - 1;
    let idx = (rate.clamp(0.0, 1.0) * top as f64).round() as usize;
    SHADES[idx.min(top)]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 steps, 2 samples, 2 channels, 2x3 frames; pixel on when (step + sample + channel + x) is even.
    struct Fake;

    impl SpikeSource for Fake {
        fn steps(&self) -> usize {
            3
        }
        fn samples(&self) -> usize {
            2
        }
        fn channels(&self) -> usize {
            2
        }
        fn dims(&self) -> (usize, usize) {
            (2, 3)
        }
        fn frame(&self, step: usize, sample: usize, channel: usize) -> Vec<u8> {
            let mut out = Vec::new();
            for _y in 0..2 {
                for x in 0..3 {
                    out.push(((step + sample + channel + x) % 2 == 0) as u8);
                }
            }
            out
        }
        fn label(&self, sample: usize) -> Option<i64> {
            Some(sample as i64 + 5)
        }
    }

    #[test]
    fn tick_wraps_both_ways() {
        let mut app = App::new(Fake, 0);
        app.prev_tick();
        assert_eq!(app.tick, 2);
        app.next_tick();
        assert_eq!(app.tick, 0);
    }

    #[test]
    fn sample_change_resets_tick() {
        let mut app = App::new(Fake, 1);
        app.next_tick();
        app.next_sample();
        assert_eq!((app.sample, app.tick), (0, 0));
        app.prev_sample();
        assert_eq!(app.sample, 1);
        assert_eq!(app.source.label(app.sample), Some(6));
    }

    #[test]
    fn initial_sample_is_clamped() {
        let app = App::new(Fake, 99);
        assert_eq!(app.sample, 1);
    }

    #[test]
    fn timer_only_advances_when_running() {
        let mut app = App::new(Fake, 0);
        app.on_timer();
        assert_eq!(app.tick, 0);
        app.toggle_running();
        app.on_timer();
        assert_eq!(app.tick, 1);
    }

    #[test]
    fn frame_and_average_grids() {
        let mut app = App::new(Fake, 0);
        assert_eq!(app.frame_rows(), vec!["█·█", "█·█"]);
        assert_eq!(app.frame_spike_count(), 4);
        // over 3 steps each pixel is on 2/3 or 1/3 of the time
        assert_eq!(app.average_rows(), vec!["▓░▓", "▓░▓"]);

        app.next_channel();
        assert_eq!(app.frame_rows(), vec!["·█·", "·█·"]);
        app.next_channel();
        assert_eq!(app.channel, 0);
    }

    #[test]
    fn shade_levels() {
        assert_eq!(shade(0.0), ' ');
        assert_eq!(shade(1.0), '█');
        assert_eq!(shade(0.5), '▒');
        assert_eq!(shade(7.0), '█');
    }
}
