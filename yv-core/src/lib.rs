//! yv-core: Domain types and configuration for the Yatzy value-network core.

pub mod config;
pub mod state;

pub use config::{Config, ConfigError, ModelConfig, TrainingConfig};
pub use state::{
    Die, DiceHand, Move, ScoreFields, FIELD_NAMES, NUM_DICE, NUM_FIELDS, NUM_THROWS,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
