//! yv-features: Feature schema + canonical encoding for the value networks.

pub mod encode;
pub mod schema;

pub use encode::{
    encode_dice, encode_die, encode_field_choice_input, encode_field_index, encode_outcome,
    encode_rethrow_input, encode_score_fields, encode_throw_number, FeatureError,
};
pub use schema::{
    DICE_FEATS, FEATURE_SCHEMA_ID, FIELD_MAX_SCORES, F_FIELD_CHOICE, F_RETHROW, MAX_GAME_SCORE,
    NUM_FACES,
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

    #[test]
    fn field_maxima_sum_matches_bonus_free_total() {
        // 324 across the fields; the +50 upper bonus brings the cap to 374.
        let sum: u16 = FIELD_MAX_SCORES.iter().sum();
        assert_eq!(sum + 50, MAX_GAME_SCORE);
    }
}
