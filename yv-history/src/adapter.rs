//! Training-data views over a completed game.
//!
//! The shapes are struct-of-arrays on purpose: every vector has one entry
//! per training example, and `outputs` repeats the game's final score so a
//! consumer can zip columns without touching round structure.

use yv_core::{ScoreFields, NUM_DICE};

use crate::log::GameRecord;

/// One entry per recorded throw (3 per round).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceThrowData {
    pub die: Vec<[u8; NUM_DICE]>,
    pub throw_number: Vec<u8>,
    pub score_fields: Vec<ScoreFields>,
    pub outputs: Vec<u16>,
}

/// One entry per round's committed scoring decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLogData {
    pub field_indexes: Vec<u8>,
    pub die: Vec<[u8; NUM_DICE]>,
    pub score_fields: Vec<ScoreFields>,
    pub outputs: Vec<u16>,
}

/// Source of rethrow-decision training data.
pub trait DiceThrowHistory {
    fn dice_throw_data(&self) -> DiceThrowData;
}

/// Source of field-choice training data.
pub trait ScoreLogHistory {
    fn score_log_data(&self) -> ScoreLogData;
}

impl DiceThrowHistory for GameRecord {
    fn dice_throw_data(&self) -> DiceThrowData {
        let n = self.rounds.len() * self.rounds.first().map_or(0, |r| r.throws.len());
        let mut data = DiceThrowData {
            die: Vec::with_capacity(n),
            throw_number: Vec::with_capacity(n),
            score_fields: Vec::with_capacity(n),
            outputs: Vec::with_capacity(n),
        };
        for round in &self.rounds {
            for (throw_number, dice) in round.throws.iter().enumerate() {
                data.die.push(*dice);
                data.throw_number.push(throw_number as u8);
                data.score_fields.push(round.fields);
                data.outputs.push(self.final_score);
            }
        }
        data
    }
}

impl ScoreLogHistory for GameRecord {
    fn score_log_data(&self) -> ScoreLogData {
        let n = self.rounds.len();
        let mut data = ScoreLogData {
            field_indexes: Vec::with_capacity(n),
            die: Vec::with_capacity(n),
            score_fields: Vec::with_capacity(n),
            outputs: Vec::with_capacity(n),
        };
        for round in &self.rounds {
            data.field_indexes.push(round.chosen_field);
            // The scoring decision sees the dice of the final throw.
            data.die.push(round.throws[round.throws.len() - 1]);
            data.score_fields.push(round.fields);
            data.outputs.push(self.final_score);
        }
        data
    }
}
