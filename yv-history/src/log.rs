//! The per-game round log.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yv_core::{ScoreFields, NUM_DICE, NUM_THROWS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("cannot seal a game with no recorded rounds")]
    EmptyGame,
}

/// Everything recorded for one round: the board snapshot the player saw,
/// the dice after each of the three throws, and the committed scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Score-field snapshot at the start of the round.
    pub fields: ScoreFields,
    /// Dice faces after throws 0, 1 and 2.
    pub throws: [[u8; NUM_DICE]; NUM_THROWS],
    /// Field the round's points were logged on.
    pub chosen_field: u8,
    /// Points logged there.
    pub score: u16,
}

/// Append-only log of an in-progress game.
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    rounds: Vec<RoundRecord>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one completed round.
    pub fn push_round(&mut self, round: RoundRecord) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Seal the log with the game's final score. Consumes the log so a
    /// sealed game can never grow further rounds.
    pub fn finish(self, final_score: u16) -> Result<GameRecord, HistoryError> {
        if self.rounds.is_empty() {
            return Err(HistoryError::EmptyGame);
        }
        Ok(GameRecord {
            rounds: self.rounds,
            final_score,
        })
    }
}

/// A completed game: the full round log plus the realized final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub rounds: Vec<RoundRecord>,
    pub final_score: u16,
}
