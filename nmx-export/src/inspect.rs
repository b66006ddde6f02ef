//! Human-readable summaries of a model dump.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ExportError, Result};
use crate::model::ModelDump;

/// Default number of weights shown per layer.
pub const DEFAULT_SAMPLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectView {
    /// Topology, LIF parameters and weights.
    #[default]
    Full,
    Weights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightCount {
    Sample(usize),
    All,
}

impl Default for WeightCount {
    fn default() -> Self {
        WeightCount::Sample(DEFAULT_SAMPLE)
    }
}

impl FromStr for WeightCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(WeightCount::All),
            "sample" => Ok(WeightCount::default()),
            n => n
                .parse()
                .map(WeightCount::Sample)
                .map_err(|_| format!("expected 'all', 'sample' or a number, got '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub view: InspectView,
    /// Only this layer; every layer when `None`.
    pub layer: Option<String>,
    pub count: WeightCount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub shape: Vec<usize>,
    pub numel: usize,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lif_neurons: Option<Map<String, Value>>,
    pub layers: Vec<LayerSummary>,
}

pub fn summarize(model: &ModelDump, opts: &InspectOptions) -> Result<ModelSummary> {
    let names: Vec<&str> = match &opts.layer {
        Some(name) => {
            if !model.model_state_dict.contains_key(name) {
                return Err(ExportError::LayerNotFound(name.clone()));
            }
            vec![name.as_str()]
        }
        None => model.layer_names().collect(),
    };

    let mut layers = Vec::with_capacity(names.len());
    for name in names {
        let tensor = model.layer(name)?;
        let take = match opts.count {
            WeightCount::All => tensor.numel(),
            WeightCount::Sample(n) => n.min(tensor.numel()),
        };
        layers.push(LayerSummary {
            name: name.to_string(),
            shape: tensor.shape().to_vec(),
            numel: tensor.numel(),
            values: tensor.data()[..take].to_vec(),
        });
    }

    let full = opts.view == InspectView::Full;
    Ok(ModelSummary {
        topology: full.then(|| model.model_topology.clone()),
        lif_neurons: full.then(|| model.lif_neurons.clone()),
        layers,
    })
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(topology) = self.topology.as_ref().filter(|t| !t.is_empty()) {
            writeln!(f, "--- Model Topology ---")?;
            for (key, value) in topology {
                writeln!(f, "{}: {}", key, value)?;
            }
            writeln!(f)?;
        }

        if let Some(lif) = self.lif_neurons.as_ref().filter(|l| !l.is_empty()) {
            writeln!(f, "--- LIF Neurons Parameters ---")?;
            for (layer, params) in lif {
                writeln!(f, "\nNeuron Layer: {}", layer)?;
                match params {
                    Value::Object(map) => {
                        for (key, value) in map {
                            writeln!(f, "{}: {}", key, value)?;
                        }
                    }
                    other => writeln!(f, "{}", other)?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "--- Model Weights ---")?;
        for layer in &self.layers {
            writeln!(f, "\nLayer: {}", layer.name)?;
            writeln!(f, "Weights Shape: {:?}", layer.shape)?;
            if let [rows, cols] = layer.shape.as_slice() {
                writeln!(f, "Rows: {}, Columns: {}", rows, cols)?;
            }
            if layer.values.len() == layer.numel {
                writeln!(f, "All Weights: {:?}", layer.values)?;
            } else {
                writeln!(
                    f,
                    "Sample Weights (first {} weights): {:?}",
                    layer.values.len(),
                    layer.values
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump() -> ModelDump {
        let text = r#"{
            "model_state_dict": {
                "fc1.weight": [[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]],
                "fc2.weight": [[1.0, 2.0], [3.0, 4.0]]
            },
            "model_topology": {"input_size": 7, "num_steps": 5, "beta": 0.5},
            "LIF_neurons": {"lif1": {"beta": 0.5, "threshold": 1.0}}
        }"#;
        ModelDump::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn count_parsing() {
        assert_eq!("all".parse::<WeightCount>().unwrap(), WeightCount::All);
        assert_eq!("12".parse::<WeightCount>().unwrap(), WeightCount::Sample(12));
        assert_eq!("sample".parse::<WeightCount>().unwrap(), WeightCount::Sample(5));
        assert!("lots".parse::<WeightCount>().is_err());
    }

    #[test]
    fn full_summary_samples_weights() {
        let s = summarize(&dump(), &InspectOptions::default()).unwrap();
        assert_eq!(s.layers.len(), 2);
        assert_eq!(s.layers[0].values, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(s.layers[1].values, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(s.topology.is_some());

        let text = s.to_string();
        assert!(text.contains("--- Model Topology ---\ninput_size: 7"));
        assert!(text.contains("Neuron Layer: lif1\nbeta: 0.5\nthreshold: 1.0"));
        assert!(text.contains("Sample Weights (first 5 weights)"));
        assert!(text.contains("Rows: 2, Columns: 2"));
        assert!(text.contains("All Weights: [1.0, 2.0, 3.0, 4.0]"));
    }

    #[test]
    fn weights_only_single_layer() {
        let opts = InspectOptions {
            view: InspectView::Weights,
            layer: Some("fc1.weight".into()),
            count: WeightCount::All,
        };
        let s = summarize(&dump(), &opts).unwrap();
        assert!(s.topology.is_none() && s.lif_neurons.is_none());
        assert_eq!(s.layers.len(), 1);
        assert_eq!(s.layers[0].values.len(), 7);
        assert!(!s.to_string().contains("Topology"));
    }

    #[test]
    fn unknown_layer() {
        let opts = InspectOptions {
            layer: Some("fc9.weight".into()),
            ..Default::default()
        };
        assert!(matches!(summarize(&dump(), &opts), Err(ExportError::LayerNotFound(_))));
    }

    #[test]
    fn serializes_to_json() {
        let s = summarize(&dump(), &InspectOptions::default()).unwrap();
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["layers"][1]["shape"], serde_json::json!([2, 2]));
        assert_eq!(v["topology"]["num_steps"], serde_json::json!(5));
    }
}
