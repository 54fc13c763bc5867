//! The field-choice value function: where to log the final hand.

use std::path::Path;

use yv_core::{Config, DiceHand, Move, ScoreFields};
use yv_features::{encode_field_choice_input, encode_outcome, F_FIELD_CHOICE};
use yv_history::{ScoreLogData, ScoreLogHistory};
use yv_net::{Net, NetSpec, TrainOptions};

use crate::value::{fit_examples, train_options, TrainingExample, ValueError, ValueFunction};

/// Identifier the field-choice model persists under.
pub const FIELD_CHOICE_MODEL_ID: &str = "field_choice";

/// Hidden stack of the field-choice net, between the 60 inputs and the
/// scalar head.
const WIDTHS: [usize; 5] = [F_FIELD_CHOICE, 60, 48, 32, 1];

/// Estimates the expected final score of committing the current hand to a
/// candidate field, and sweeps the legal moves with it.
pub struct FieldChoiceValue {
    net: Net,
    opts: TrainOptions,
}

impl FieldChoiceValue {
    pub fn new(seed: u64) -> Result<Self, ValueError> {
        Ok(Self {
            net: Net::new(NetSpec::dense(&WIDTHS), seed)?,
            opts: TrainOptions::default(),
        })
    }

    pub fn with_config(cfg: &Config) -> Result<Self, ValueError> {
        Ok(Self {
            net: Net::new(NetSpec::dense(&WIDTHS), cfg.model.seed)?,
            opts: train_options(&cfg.training),
        })
    }

    /// Expected final score for logging `hand` on `field` given the board.
    pub fn predict_state(
        &self,
        field: u8,
        hand: &DiceHand,
        fields: &ScoreFields,
    ) -> Result<f32, ValueError> {
        let input = encode_field_choice_input(field, hand, fields)?;
        Ok(self.net.predict(&input)?)
    }

    /// One training pass over a completed game: one example per committed
    /// round, every target the game's normalized final score.
    pub fn train(&mut self, history: &impl ScoreLogHistory) -> Result<f32, ValueError> {
        let examples = field_choice_examples(&history.score_log_data())?;
        fit_examples(&mut self.net, &self.opts, &examples)
    }

    /// Pick the best of the legal moves supplied by the rules engine.
    ///
    /// Moves are evaluated in supplied order; the earliest strict maximum
    /// above a 0.0 baseline wins, falling back to the first move when no
    /// prediction beats the baseline. The returned move is always one of
    /// `possible_moves`, never synthesized.
    pub fn decide_score_logging(
        &self,
        hand: &DiceHand,
        fields: &ScoreFields,
        possible_moves: &[Move],
    ) -> Result<Move, ValueError> {
        if !hand.is_fully_known() {
            return Err(ValueError::InvalidInput {
                msg: "scoring decisions need a fully-known hand",
            });
        }
        best_move_by(possible_moves, |m| {
            self.predict_state(m.field, hand, fields)
        })
    }
}

impl ValueFunction for FieldChoiceValue {
    fn model_id(&self) -> &'static str {
        FIELD_CHOICE_MODEL_ID
    }

    fn num_inputs(&self) -> usize {
        self.net.num_inputs()
    }

    fn predict(&self, features: &[f32]) -> Result<f32, ValueError> {
        Ok(self.net.predict(features)?)
    }

    fn fit(&mut self, examples: &[TrainingExample]) -> Result<f32, ValueError> {
        fit_examples(&mut self.net, &self.opts, examples)
    }

    fn save(&self, dir: &Path) -> Result<(), ValueError> {
        Ok(self.net.save(dir, FIELD_CHOICE_MODEL_ID)?)
    }

    fn load(&mut self, dir: &Path) -> Result<(), ValueError> {
        Ok(self.net.load(dir, FIELD_CHOICE_MODEL_ID)?)
    }
}

/// Encode the per-round training view of a completed game.
pub fn field_choice_examples(data: &ScoreLogData) -> Result<Vec<TrainingExample>, ValueError> {
    let n = data.field_indexes.len();
    if data.die.len() != n || data.score_fields.len() != n || data.outputs.len() != n {
        return Err(ValueError::InvalidInput {
            msg: "score-log history columns must have equal length",
        });
    }
    let mut examples = Vec::with_capacity(n);
    for i in 0..n {
        let hand = DiceHand::known(data.die[i]);
        let features =
            encode_field_choice_input(data.field_indexes[i], &hand, &data.score_fields[i])?;
        examples.push(TrainingExample {
            features: features.to_vec(),
            target: encode_outcome(data.outputs[i])?,
        });
    }
    Ok(examples)
}

/// The legal-move sweep, generic over the evaluator so fixed predictors can
/// drive it in tests. Strict `>` against a 0.0 baseline keeps the earliest
/// maximum; the first move is the degenerate fallback.
pub(crate) fn best_move_by<E>(moves: &[Move], eval: E) -> Result<Move, ValueError>
where
    E: Fn(&Move) -> Result<f32, ValueError>,
{
    let first = *moves.first().ok_or(ValueError::InvalidInput {
        msg: "possible_moves must not be empty",
    })?;
    let mut best = first;
    let mut max_value = 0.0f32;
    for candidate in moves {
        let value = eval(candidate)?;
        if value > max_value {
            max_value = value;
            best = *candidate;
        }
    }
    Ok(best)
}
