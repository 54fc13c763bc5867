//! yv-value: The two learned value functions guiding play, and the
//! combinatorial decision procedures built on them.
//!
//! `DiceRethrowValue` scores a partially-masked hand (which dice are still
//! worth throwing) and `FieldChoiceValue` scores committing the final hand
//! to a board field. Both share the `ValueFunction` contract and delegate
//! the optimization pass to `yv-net`; decisions are exhaustive sweeps over
//! the respective candidate sets, driven by repeated inference.

pub mod field_choice;
pub mod rethrow;
pub mod value;

pub use field_choice::{
    field_choice_examples, FieldChoiceValue, FIELD_CHOICE_MODEL_ID,
};
pub use rethrow::{
    rethrow_examples, DiceRethrowValue, Rethrow, DICE_RETHROW_MODEL_ID, RETHROW_CANDIDATES,
};
pub use value::{TrainingExample, ValueError, ValueFunction};

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
mod rethrow_tests;
