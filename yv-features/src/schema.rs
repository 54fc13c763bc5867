//! Feature schema v1.
//!
//! This schema defines the stable feature vectors fed to the two value
//! networks, and owns the normalization constants they rely on.
//!
//! ### Rethrow input layout (v1), length `F_RETHROW` = 48
//! - **dice_onehot**: 30 floats, 5 positions x 6 faces in position order;
//!   a masked (not yet thrown) position contributes 6 zeros
//! - **throw_onehot**: 3 floats for throw number in {0,1,2}
//! - **score_fields_norm**: 15 floats, per-field score / `FIELD_MAX_SCORES`,
//!   0.0 for unfilled fields
//!
//! ### Field-choice input layout (v1), length `F_FIELD_CHOICE` = 60
//! - **field_onehot**: 15 floats for the candidate field index
//! - **dice_onehot**: 30 floats as above (fully known hand)
//! - **score_fields_norm**: 15 floats as above
//!
//! The prediction target in both cases is the final game score divided by
//! `MAX_GAME_SCORE`.

use yv_core::{NUM_DICE, NUM_FIELDS, NUM_THROWS};

/// Increment this whenever the feature layout changes.
pub const FEATURE_SCHEMA_ID: u32 = 1;

/// Die faces.
pub const NUM_FACES: usize = 6;

/// One-hot width of a full 5-die hand.
pub const DICE_FEATS: usize = NUM_DICE * NUM_FACES;

/// Rethrow-value input length: dice + throw number + score fields.
pub const F_RETHROW: usize = DICE_FEATS + NUM_THROWS + NUM_FIELDS;

/// Field-choice input length: candidate field + dice + score fields.
pub const F_FIELD_CHOICE: usize = NUM_FIELDS + DICE_FEATS + NUM_FIELDS;

/// Maximum attainable score per field, in field index order.
pub const FIELD_MAX_SCORES: [u16; NUM_FIELDS] =
    [5, 10, 15, 20, 25, 30, 12, 22, 18, 24, 15, 20, 28, 30, 50];

/// Maximum attainable final score, upper bonus included.
pub const MAX_GAME_SCORE: u16 = 374;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lengths_add_up() {
        assert_eq!(F_RETHROW, 48);
        assert_eq!(F_FIELD_CHOICE, 60);
    }
}
