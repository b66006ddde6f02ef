// Source abstraction for the viewer so other spike producers can be plugged in.

use nmx_export::SpikeDump;

/// Anything that can hand out `[y][x]` spike frames indexed by (step, sample, channel).
pub trait SpikeSource {
    fn steps(&self) -> usize;
    fn samples(&self) -> usize;
    fn channels(&self) -> usize;
    /// (height, width) of one frame.
    fn dims(&self) -> (usize, usize);

    /// Spikes of one frame, row-major, 0 or 1. Empty when out of range.
    fn frame(&self, step: usize, sample: usize, channel: usize) -> Vec<u8>;

    /// Class label of a sample, if the source knows it.
    fn label(&self, _sample: usize) -> Option<i64> {
        None
    }

    /// Mean spike rate per pixel over all steps.
    fn average(&self, sample: usize, channel: usize) -> Vec<f64> {
        let (h, w) = self.dims();
        let mut acc = vec![0.0; h * w];
        for step in 0..self.steps() {
            for (a, s) in acc.iter_mut().zip(self.frame(step, sample, channel)) {
                *a += s as f64;
            }
        }
        let steps = self.steps().max(1) as f64;
        acc.iter_mut().for_each(|a| *a /= steps);
        acc
    }
}

/// Source backed by a JSON spike dump.
pub struct DumpSource {
    dump: SpikeDump,
}

impl DumpSource {
    pub fn new(dump: SpikeDump) -> Self {
        Self { dump }
    }
}

impl SpikeSource for DumpSource {
    fn steps(&self) -> usize {
        self.dump.steps()
    }

    fn samples(&self) -> usize {
        self.dump.samples()
    }

    fn channels(&self) -> usize {
        self.dump.channels()
    }

    fn dims(&self) -> (usize, usize) {
        (self.dump.height(), self.dump.width())
    }

    fn frame(&self, step: usize, sample: usize, channel: usize) -> Vec<u8> {
        self.dump
            .frame(step, sample, channel)
            .map(<[u8]>::to_vec)
            .unwrap_or_default()
    }

    fn label(&self, sample: usize) -> Option<i64> {
        self.dump.label(sample)
    }

    fn average(&self, sample: usize, channel: usize) -> Vec<f64> {
        self.dump.average(sample, channel).unwrap_or_default()
    }
}
