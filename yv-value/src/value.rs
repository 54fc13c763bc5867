//! The common value-function contract shared by both model kinds.

use std::path::Path;

use thiserror::Error;
use yv_core::TrainingConfig;
use yv_features::FeatureError;
use yv_net::{Net, NetError, PersistError, TrainOptions};

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid input: {msg}")]
    InvalidInput { msg: &'static str },
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Net(#[from] NetError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// One encoded training example: feature vector plus the normalized final
/// score of the game it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub features: Vec<f32>,
    pub target: f32,
}

/// A trainable estimator of the expected final game score.
///
/// Implementations wrap a `yv_net::Net` and share the batch-fit path by
/// composition rather than inheritance.
pub trait ValueFunction {
    /// Fixed identifier the model persists under.
    fn model_id(&self) -> &'static str;

    fn num_inputs(&self) -> usize;

    /// One forward inference over an already-encoded input.
    fn predict(&self, features: &[f32]) -> Result<f32, ValueError>;

    /// One optimization pass over the batch; returns the mean absolute error.
    fn fit(&mut self, examples: &[TrainingExample]) -> Result<f32, ValueError>;

    /// Persist parameters and architecture under `dir`, keyed by `model_id`.
    fn save(&self, dir: &Path) -> Result<(), ValueError>;

    /// Restore a state persisted by `save` into this instance.
    fn load(&mut self, dir: &Path) -> Result<(), ValueError>;
}

pub(crate) fn train_options(cfg: &TrainingConfig) -> TrainOptions {
    TrainOptions {
        batch_size: cfg.batch_size as usize,
        learning_rate: cfg.learning_rate as f32,
        epochs: cfg.epochs,
    }
}

/// Shared batch-fit helper: unzip the examples and hand them to the net.
pub(crate) fn fit_examples(
    net: &mut Net,
    opts: &TrainOptions,
    examples: &[TrainingExample],
) -> Result<f32, ValueError> {
    let inputs: Vec<&[f32]> = examples.iter().map(|e| e.features.as_slice()).collect();
    let targets: Vec<f32> = examples.iter().map(|e| e.target).collect();
    Ok(net.fit(&inputs, &targets, opts)?)
}
