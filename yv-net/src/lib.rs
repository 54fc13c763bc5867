//! yv-net: Trainable dense value-net substrate (forward inference, Adam/MAE
//! training pass, safetensors persistence).

pub mod net;
pub mod persist;
pub mod spec;

pub use net::{Net, NetError, TrainOptions};
pub use persist::{NetMeta, PersistError, MODEL_FORMAT_VERSION};
pub use spec::{Activation, LayerSpec, NetSpec};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod persist_tests;
