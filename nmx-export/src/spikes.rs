//! Spike dumps: `{"spiking_input": [steps][samples][channels][height][width], "labels": [..]}`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::model::Tensor;

#[derive(Deserialize)]
struct RawSpikeDump {
    spiking_input: Value,
    #[serde(default)]
    labels: Vec<i64>,
}

/// Rate-encoded spike input, validated to a rectangular 5-D tensor of 0/1.
#[derive(Debug, Clone)]
pub struct SpikeDump {
    dims: [usize; 5],
    spikes: Vec<u8>,
    labels: Vec<i64>,
}

impl SpikeDump {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading spike dump");
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawSpikeDump = serde_json::from_reader(reader)?;
        let tensor = Tensor::from_json("spiking_input", &raw.spiking_input)?;
        Self::from_tensor(&tensor, raw.labels)
    }

    pub fn from_tensor(tensor: &Tensor, labels: Vec<i64>) -> Result<Self> {
        let dims: [usize; 5] = tensor.shape().try_into().map_err(|_| {
            ExportError::shape(
                "spiking_input",
                format!(
                    "expected [steps, samples, channels, height, width], got {:?}",
                    tensor.shape()
                ),
            )
        })?;

        let mut spikes = Vec::with_capacity(tensor.numel());
        for (index, &value) in tensor.data().iter().enumerate() {
            // Exported as floats by the encoder (0.0 / 1.0)
            let bit = value.round();
            if bit != 0.0 && bit != 1.0 {
                return Err(ExportError::InvalidSpike { index, value });
            }
            spikes.push(bit as u8);
        }

        debug!(?dims, labels = labels.len(), "spike dump validated");
        Ok(Self { dims, spikes, labels })
    }

    pub fn steps(&self) -> usize {
        self.dims[0]
    }

    pub fn samples(&self) -> usize {
        self.dims[1]
    }

    pub fn channels(&self) -> usize {
        self.dims[2]
    }

    pub fn height(&self) -> usize {
        self.dims[3]
    }

    pub fn width(&self) -> usize {
        self.dims[4]
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn label(&self, sample: usize) -> Option<i64> {
        self.labels.get(sample).copied()
    }

    fn frame_len(&self) -> usize {
        self.height() * self.width()
    }

    fn check(&self, what: &'static str, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(ExportError::OutOfBounds { what, index, len });
        }
        Ok(())
    }

    /// All channels of one sample at one step, `[channel][y][x]` row-major.
    pub fn sample_at(&self, step: usize, sample: usize) -> Result<&[u8]> {
        self.check("step", step, self.steps())?;
        self.check("sample", sample, self.samples())?;
        let len = self.channels() * self.frame_len();
        let start = (step * self.samples() + sample) * len;
        Ok(&self.spikes[start..start + len])
    }

    /// One `[y][x]` frame.
    pub fn frame(&self, step: usize, sample: usize, channel: usize) -> Result<&[u8]> {
        self.check("channel", channel, self.channels())?;
        let all = self.sample_at(step, sample)?;
        let start = channel * self.frame_len();
        Ok(&all[start..start + self.frame_len()])
    }

    /// Mean spike rate per pixel over all steps.
    pub fn average(&self, sample: usize, channel: usize) -> Result<Vec<f64>> {
        self.check("sample", sample, self.samples())?;
        self.check("channel", channel, self.channels())?;
        let mut acc = vec![0u32; self.frame_len()];
        for step in 0..self.steps() {
            for (a, &s) in acc.iter_mut().zip(self.frame(step, sample, channel)?) {
                *a += s as u32;
            }
        }
        let steps = self.steps().max(1) as f64;
        Ok(acc.into_iter().map(|a| a as f64 / steps).collect())
    }

    fn check_fifo(&self, steps: &[usize], sample: usize) -> Result<()> {
        if steps.is_empty() {
            return Err(ExportError::NoSteps);
        }
        for &step in steps {
            self.check("step", step, self.steps())?;
        }
        self.check("sample", sample, self.samples())
    }

    fn write_fifo<W: Write>(&self, steps: &[usize], sample: usize, mut out: W) -> Result<usize> {
        let mut lines = 0;
        for &step in steps {
            for &spike in self.sample_at(step, sample)? {
                writeln!(out, "{}", spike)?;
                lines += 1;
            }
        }
        out.flush()?;
        Ok(lines)
    }

    /// Write the requested steps of one sample as FIFO stimulus: one `0`/`1`
    /// per line, steps in the given order, each step flattened `[channel][y][x]`.
    /// Every index is validated before anything is written. Returns the line count.
    pub fn export_fifo<W: Write>(&self, steps: &[usize], sample: usize, out: W) -> Result<usize> {
        self.check_fifo(steps, sample)?;
        self.write_fifo(steps, sample, out)
    }

    /// `export_fifo` into a file. Bad indices fail before the file is created.
    pub fn export_fifo_to_path(&self, steps: &[usize], sample: usize, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.check_fifo(steps, sample)?;
        let lines = self.write_fifo(steps, sample, BufWriter::new(File::create(path)?))?;
        info!(
            ?steps,
            sample,
            lines,
            path = %path.display(),
            "spike FIFO exported"
        );
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2 steps, 3 samples, 1 channel, 2x2 frames. Pixel value = (step + sample + y + x) % 2.
    fn dump() -> SpikeDump {
        let mut data = Vec::new();
        for step in 0..2 {
            for sample in 0..3 {
                for y in 0..2 {
                    for x in 0..2 {
                        data.push(((step + sample + y + x) % 2) as f64);
                    }
                }
            }
        }
        let tensor = Tensor::new(vec![2, 3, 1, 2, 2], data).unwrap();
        SpikeDump::from_tensor(&tensor, vec![7, 2, 1]).unwrap()
    }

    #[test]
    fn dimensions_and_labels() {
        let d = dump();
        assert_eq!((d.steps(), d.samples(), d.channels(), d.height(), d.width()), (2, 3, 1, 2, 2));
        assert_eq!(d.label(0), Some(7));
        assert_eq!(d.label(3), None);
    }

    #[test]
    fn frames_and_average() {
        let d = dump();
        assert_eq!(d.frame(0, 0, 0).unwrap(), &[0, 1, 1, 0]);
        assert_eq!(d.frame(1, 0, 0).unwrap(), &[1, 0, 0, 1]);
        assert_eq!(d.average(0, 0).unwrap(), vec![0.5; 4]);
        assert!(matches!(d.frame(2, 0, 0), Err(ExportError::OutOfBounds { what: "step", .. })));
        assert!(matches!(d.frame(0, 0, 1), Err(ExportError::OutOfBounds { what: "channel", .. })));
    }

    #[test]
    fn fifo_lines_in_step_order() {
        let d = dump();
        let mut buf = Vec::new();
        let lines = d.export_fifo(&[1, 0], 2, &mut buf).unwrap();
        assert_eq!(lines, 8);
        // sample 2: step 1 -> [1,0,0,1], step 0 -> [0,1,1,0]
        assert_eq!(String::from_utf8(buf).unwrap(), "1\n0\n0\n1\n0\n1\n1\n0\n");
    }

    #[test]
    fn fifo_validates_before_writing() {
        let d = dump();
        let mut buf = Vec::new();
        let err = d.export_fifo(&[0, 5], 0, &mut buf).unwrap_err();
        assert!(matches!(err, ExportError::OutOfBounds { what: "step", index: 5, len: 2 }));
        assert!(buf.is_empty());

        let err = d.export_fifo(&[0], 3, &mut buf).unwrap_err();
        assert!(matches!(err, ExportError::OutOfBounds { what: "sample", index: 3, len: 3 }));
        assert!(matches!(d.export_fifo(&[], 0, &mut buf), Err(ExportError::NoSteps)));
    }

    #[test]
    fn rejects_non_binary_and_wrong_rank() {
        let t = Tensor::new(vec![1, 1, 1, 1, 2], vec![0.0, 2.0]).unwrap();
        assert!(matches!(
            SpikeDump::from_tensor(&t, vec![]),
            Err(ExportError::InvalidSpike { index: 1, .. })
        ));
        let t = Tensor::new(vec![2, 2], vec![0.0; 4]).unwrap();
        assert!(matches!(SpikeDump::from_tensor(&t, vec![]), Err(ExportError::Shape { .. })));
    }

    #[test]
    fn parses_json_dump() {
        let text = r#"{"spiking_input": [[[[[1.0, 0.0]]]]], "labels": [4]}"#;
        let d = SpikeDump::from_reader(text.as_bytes()).unwrap();
        assert_eq!(d.frame(0, 0, 0).unwrap(), &[1, 0]);
        assert_eq!(d.labels(), &[4]);
    }

    #[test]
    fn fifo_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fifo_data_sample_0.txt");
        let d = dump();
        assert_eq!(d.export_fifo_to_path(&[0], 0, &path).unwrap(), 4);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n1\n1\n0\n");

        let missing = dir.path().join("never.txt");
        assert!(d.export_fifo_to_path(&[9], 0, &missing).is_err());
        assert!(!missing.exists());
    }
}
