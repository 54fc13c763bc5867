//! Architecture description for a dense feed-forward net.
//!
//! The spec is fixed at construction and persisted alongside the weights;
//! loading checks the persisted spec against the live instance.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub inputs: usize,
    pub outputs: usize,
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSpec {
    pub layers: Vec<LayerSpec>,
}

impl NetSpec {
    /// A stack of dense layers over the given widths, relu throughout and a
    /// linear output: `dense(&[48, 42, 1])` is 48-in, one hidden 42, 1-out.
    pub fn dense(widths: &[usize]) -> Self {
        let mut layers = Vec::with_capacity(widths.len().saturating_sub(1));
        for i in 1..widths.len() {
            let activation = if i + 1 == widths.len() {
                Activation::Linear
            } else {
                Activation::Relu
            };
            layers.push(LayerSpec {
                inputs: widths[i - 1],
                outputs: widths[i],
                activation,
            });
        }
        Self { layers }
    }

    pub fn num_inputs(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    pub fn num_outputs(&self) -> usize {
        self.layers.last().map_or(0, |l| l.outputs)
    }

    /// Widths joined for display, e.g. `48x42x32x1`.
    pub fn shape_string(&self) -> String {
        let mut parts = vec![self.num_inputs().to_string()];
        parts.extend(self.layers.iter().map(|l| l.outputs.to_string()));
        parts.join("x")
    }
}
