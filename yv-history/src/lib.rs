//! yv-history: Append-only per-game round log and the training-data views
//! the value networks consume.
//!
//! The driver owns a `GameLog`, appends one `RoundRecord` per round as the
//! game is played, and seals it with the final score once the game is over.
//! Training reads the sealed `GameRecord` wholesale through the two adapter
//! traits; nothing here mutates shared state incrementally.

pub mod adapter;
pub mod log;

pub use adapter::{DiceThrowData, DiceThrowHistory, ScoreLogData, ScoreLogHistory};
pub use log::{GameLog, GameRecord, HistoryError, RoundRecord};

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

#[cfg(test)]
mod log_tests;
