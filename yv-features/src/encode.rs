//! Feature encoding implementation for schema v1.
//!
//! All encoders are pure and deterministic. Out-of-range inputs are caller
//! contract violations and fail before anything is encoded; nothing is
//! silently coerced.

use thiserror::Error;
use yv_core::{Die, DiceHand, ScoreFields, NUM_FIELDS, NUM_THROWS};

use crate::schema::{
    DICE_FEATS, FIELD_MAX_SCORES, F_FIELD_CHOICE, F_RETHROW, MAX_GAME_SCORE, NUM_FACES,
};

/// Invalid-input errors raised at the encoding boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("die face out of range 1..=6: {0}")]
    DieFace(u8),
    #[error("throw number out of range 0..=2: {0}")]
    ThrowNumber(u8),
    #[error("field index out of range 0..=14: {0}")]
    FieldIndex(u8),
    #[error("score {score} on field {field} exceeds field maximum {max}")]
    FieldScore { field: u8, score: u16, max: u16 },
    #[error("final score out of range 0..=374: {0}")]
    FinalScore(u16),
}

fn push_slice(out: &mut [f32], offset: &mut usize, src: &[f32]) {
    out[*offset..*offset + src.len()].copy_from_slice(src);
    *offset += src.len();
}

/// One-hot encode a single die face; a masked die encodes as all zeros.
pub fn encode_die(die: Die) -> Result<[f32; NUM_FACES], FeatureError> {
    let mut out = [0.0f32; NUM_FACES];
    match die {
        Die::Known(face) => {
            if !(1..=6).contains(&face) {
                return Err(FeatureError::DieFace(face));
            }
            out[(face - 1) as usize] = 1.0;
        }
        // Masked positions carry no face information at all.
        Die::Unknown => {}
    }
    Ok(out)
}

/// Encode a 5-die hand position by position.
pub fn encode_dice(hand: &DiceHand) -> Result<[f32; DICE_FEATS], FeatureError> {
    let mut out = [0.0f32; DICE_FEATS];
    let mut off = 0usize;
    for &die in &hand.0 {
        let one_hot = encode_die(die)?;
        push_slice(&mut out, &mut off, &one_hot);
    }
    debug_assert_eq!(off, DICE_FEATS);
    Ok(out)
}

/// One-hot encode the throw number within a round.
pub fn encode_throw_number(throw_number: u8) -> Result<[f32; NUM_THROWS], FeatureError> {
    if throw_number as usize >= NUM_THROWS {
        return Err(FeatureError::ThrowNumber(throw_number));
    }
    let mut out = [0.0f32; NUM_THROWS];
    out[throw_number as usize] = 1.0;
    Ok(out)
}

/// One-hot encode a candidate score-field index.
pub fn encode_field_index(field: u8) -> Result<[f32; NUM_FIELDS], FeatureError> {
    if field as usize >= NUM_FIELDS {
        return Err(FeatureError::FieldIndex(field));
    }
    let mut out = [0.0f32; NUM_FIELDS];
    out[field as usize] = 1.0;
    Ok(out)
}

/// Normalize the score board by the per-field maxima; unfilled fields
/// encode as 0.0.
pub fn encode_score_fields(fields: &ScoreFields) -> Result<[f32; NUM_FIELDS], FeatureError> {
    let mut out = [0.0f32; NUM_FIELDS];
    for (idx, cell) in fields.0.iter().enumerate() {
        if let Some(score) = *cell {
            let max = FIELD_MAX_SCORES[idx];
            if score > max {
                return Err(FeatureError::FieldScore {
                    field: idx as u8,
                    score,
                    max,
                });
            }
            out[idx] = f32::from(score) / f32::from(max);
        }
    }
    Ok(out)
}

/// Normalize a final game score to [0,1].
pub fn encode_outcome(score: u16) -> Result<f32, FeatureError> {
    if score > MAX_GAME_SCORE {
        return Err(FeatureError::FinalScore(score));
    }
    Ok(f32::from(score) / f32::from(MAX_GAME_SCORE))
}

/// Build the rethrow-value input: dice, then throw number, then score fields.
pub fn encode_rethrow_input(
    hand: &DiceHand,
    throw_number: u8,
    fields: &ScoreFields,
) -> Result<[f32; F_RETHROW], FeatureError> {
    let mut out = [0.0f32; F_RETHROW];
    let mut off = 0usize;
    push_slice(&mut out, &mut off, &encode_dice(hand)?);
    push_slice(&mut out, &mut off, &encode_throw_number(throw_number)?);
    push_slice(&mut out, &mut off, &encode_score_fields(fields)?);
    debug_assert_eq!(off, F_RETHROW);
    Ok(out)
}

/// Build the field-choice input: candidate field, then dice, then score fields.
pub fn encode_field_choice_input(
    field: u8,
    hand: &DiceHand,
    fields: &ScoreFields,
) -> Result<[f32; F_FIELD_CHOICE], FeatureError> {
    let mut out = [0.0f32; F_FIELD_CHOICE];
    let mut off = 0usize;
    push_slice(&mut out, &mut off, &encode_field_index(field)?);
    push_slice(&mut out, &mut off, &encode_dice(hand)?);
    push_slice(&mut out, &mut off, &encode_score_fields(fields)?);
    debug_assert_eq!(off, F_FIELD_CHOICE);
    Ok(out)
}
