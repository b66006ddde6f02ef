//! Model dump loading: the JSON written by the training side's `pth_to_json`.
//!
//! ```json
//! { "model_state_dict": { "fc1.weight": [[..], ..], "fc2.weight": [[..], ..] },
//!   "model_topology": { "input_size": 784, "hidden_size": 10, ... },
//!   "LIF_neurons": { "lif1": { "beta": 0.5, "threshold": 1.0 }, ... } }
//! ```
//!
//! All three sections are optional. Tensors are nested JSON arrays of numbers
//! and are flattened row-major on load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ExportError, Result};

/// A dense row-major tensor of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if numel != data.len() {
            return Err(ExportError::shape(
                "tensor",
                format!("shape {:?} needs {} elements, got {}", shape, numel, data.len()),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Build from nested JSON arrays. Every level must be rectangular; leaves
    /// must be numbers (booleans count as 0/1). `name` is only used in errors.
    pub fn from_json(name: &str, value: &Value) -> Result<Self> {
        let mut shape = Vec::new();
        let mut cursor = value;
        while let Value::Array(items) = cursor {
            shape.push(items.len());
            match items.first() {
                Some(first) => cursor = first,
                None => break,
            }
        }

        let mut data = Vec::with_capacity(shape.iter().product());
        flatten(name, value, &shape, 0, &mut data)?;
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// `(rows, cols)` of a 2-D tensor.
    pub fn matrix_dims(&self) -> Option<(usize, usize)> {
        match self.shape.as_slice() {
            &[rows, cols] => Some((rows, cols)),
            _ => None,
        }
    }
}

fn flatten(name: &str, value: &Value, shape: &[usize], depth: usize, out: &mut Vec<f64>) -> Result<()> {
    match value {
        Value::Array(items) => {
            let expected = shape.get(depth).copied();
            if expected != Some(items.len()) {
                return Err(ExportError::shape(
                    name,
                    format!("ragged tensor at depth {}: expected {:?}, found {} items", depth, expected, items.len()),
                ));
            }
            for item in items {
                flatten(name, item, shape, depth + 1, out)?;
            }
            Ok(())
        }
        leaf if depth == shape.len() => {
            let x = match leaf {
                Value::Number(n) => n.as_f64(),
                Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                _ => None,
            };
            match x {
                Some(x) => {
                    out.push(x);
                    Ok(())
                }
                None => Err(ExportError::shape(name, format!("non-numeric element {}", leaf))),
            }
        }
        _ => Err(ExportError::shape(
            name,
            format!("scalar found at depth {}, expected {} dimensions", depth, shape.len()),
        )),
    }
}

/// A trained model as dumped to JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDump {
    #[serde(default)]
    pub model_state_dict: Map<String, Value>,
    #[serde(default)]
    pub model_topology: Map<String, Value>,
    #[serde(default, rename = "LIF_neurons")]
    pub lif_neurons: Map<String, Value>,
}

impl ModelDump {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading model dump");
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dump: ModelDump = serde_json::from_reader(reader)?;
        debug!(layers = dump.model_state_dict.len(), "model dump parsed");
        Ok(dump)
    }

    /// Layer names in dump order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.model_state_dict.keys().map(String::as_str)
    }

    pub fn layer(&self, name: &str) -> Result<Tensor> {
        let value = self
            .model_state_dict
            .get(name)
            .ok_or_else(|| ExportError::LayerNotFound(name.to_string()))?;
        Tensor::from_json(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tensor_shapes() {
        let t = Tensor::from_json("w", &json!([[1, 2, 3], [4, 5, 6]])).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(t.matrix_dims(), Some((2, 3)));

        let s = Tensor::from_json("beta", &json!(0.5)).unwrap();
        assert!(s.shape().is_empty());
        assert_eq!(s.data(), &[0.5]);
        assert_eq!(s.matrix_dims(), None);

        let e = Tensor::from_json("empty", &json!([])).unwrap();
        assert_eq!(e.shape(), &[0]);
        assert_eq!(e.numel(), 0);

        let b = Tensor::from_json("mask", &json!([true, false])).unwrap();
        assert_eq!(b.data(), &[1.0, 0.0]);
    }

    #[test]
    fn ragged_and_non_numeric_rejected() {
        assert!(matches!(
            Tensor::from_json("w", &json!([[1, 2], [3]])),
            Err(ExportError::Shape { .. })
        ));
        assert!(matches!(
            Tensor::from_json("w", &json!([[1, 2], 3])),
            Err(ExportError::Shape { .. })
        ));
        assert!(matches!(
            Tensor::from_json("w", &json!([1, [2]])),
            Err(ExportError::Shape { .. })
        ));
        assert!(matches!(
            Tensor::from_json("w", &json!(["a", "b"])),
            Err(ExportError::Shape { .. })
        ));
    }

    #[test]
    fn tensor_new_checks_len() {
        assert!(Tensor::new(vec![2, 2], vec![0.0; 4]).is_ok());
        assert!(Tensor::new(vec![2, 2], vec![0.0; 3]).is_err());
    }

    #[test]
    fn model_dump_sections() {
        let text = r#"{
            "model_topology": {"input_size": 784, "hidden_size": 10},
            "LIF_neurons": {"lif1": {"beta": 0.5, "threshold": 1.0}},
            "model_state_dict": {"fc2.weight": [[0.1]], "fc1.weight": [[0.2, 0.3]]}
        }"#;
        let dump = ModelDump::from_reader(text.as_bytes()).unwrap();
        let names: Vec<&str> = dump.layer_names().collect();
        assert_eq!(names, vec!["fc2.weight", "fc1.weight"]);
        assert_eq!(dump.layer("fc1.weight").unwrap().matrix_dims(), Some((1, 2)));
        assert!(matches!(dump.layer("fc3.weight"), Err(ExportError::LayerNotFound(_))));
        assert_eq!(dump.model_topology["input_size"], json!(784));
    }

    #[test]
    fn missing_sections_default_empty() {
        let dump = ModelDump::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(dump.layer_names().count(), 0);
        assert!(dump.lif_neurons.is_empty());
    }
}
