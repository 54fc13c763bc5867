//! The rethrow value function: which dice are worth throwing again.

use std::path::Path;

use rayon::prelude::*;
use yv_core::{Config, Die, DiceHand, ScoreFields, NUM_DICE};
use yv_features::{encode_outcome, encode_rethrow_input, F_RETHROW};
use yv_history::{DiceThrowData, DiceThrowHistory};
use yv_net::{Net, NetSpec, TrainOptions};

use crate::value::{fit_examples, train_options, TrainingExample, ValueError, ValueFunction};

/// Identifier the rethrow model persists under.
pub const DICE_RETHROW_MODEL_ID: &str = "dice_rethrow";

/// Candidate masks enumerated per decision: every subset of 5 positions.
pub const RETHROW_CANDIDATES: usize = 1 << NUM_DICE;

/// Hidden stack of the rethrow net, between the 48 inputs and the scalar head.
const WIDTHS: [usize; 5] = [F_RETHROW, 48, 42, 32, 1];

/// A subset of dice positions to throw again, stored as the enumeration
/// pattern: bit `4 - p` selects position `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rethrow(u8);

impl Rethrow {
    /// Keep every die.
    pub const NONE: Rethrow = Rethrow(0);

    pub fn pattern(self) -> u8 {
        self.0
    }

    /// Position indices to throw again, ascending.
    pub fn positions(self) -> Vec<usize> {
        (0..NUM_DICE)
            .filter(|&p| self.0 & (1u8 << (NUM_DICE - 1 - p)) != 0)
            .collect()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Estimates the expected final score of a partially-masked hand, and
/// searches the 32 rethrow subsets with it.
pub struct DiceRethrowValue {
    net: Net,
    opts: TrainOptions,
}

impl DiceRethrowValue {
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

    /// Expected final score for a hand (possibly masked), throw number and
    /// board state.
    pub fn predict_state(
        &self,
        hand: &DiceHand,
        throw_number: u8,
        fields: &ScoreFields,
    ) -> Result<f32, ValueError> {
        let input = encode_rethrow_input(hand, throw_number, fields)?;
        Ok(self.net.predict(&input)?)
    }

    /// One training pass over a completed game: one example per recorded
    /// throw, every target the game's normalized final score. Returns the
    /// mean absolute error of the pass.
    pub fn train(&mut self, history: &impl DiceThrowHistory) -> Result<f32, ValueError> {
        let examples = rethrow_examples(&history.dice_throw_data())?;
        fit_examples(&mut self.net, &self.opts, &examples)
    }

    /// Pick the most promising subset of dice to throw again.
    ///
    /// All 32 subsets are evaluated; the earliest strict maximum above a 0.0
    /// baseline wins, so an all-nonpositive landscape keeps every die.
    pub fn decide_dice_throw(
        &self,
        fields: &ScoreFields,
        throw_number: u8,
        hand: &DiceHand,
    ) -> Result<Rethrow, ValueError> {
        best_rethrow_by(hand, |candidate| {
            self.predict_state(candidate, throw_number, fields)
        })
    }
}

impl ValueFunction for DiceRethrowValue {
    fn model_id(&self) -> &'static str {
        DICE_RETHROW_MODEL_ID
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
        Ok(self.net.save(dir, DICE_RETHROW_MODEL_ID)?)
    }

    fn load(&mut self, dir: &Path) -> Result<(), ValueError> {
        Ok(self.net.load(dir, DICE_RETHROW_MODEL_ID)?)
    }
}

/// Encode the per-throw training view of a completed game.
pub fn rethrow_examples(data: &DiceThrowData) -> Result<Vec<TrainingExample>, ValueError> {
    let n = data.die.len();
    if data.throw_number.len() != n || data.score_fields.len() != n || data.outputs.len() != n {
        return Err(ValueError::InvalidInput {
            msg: "dice-throw history columns must have equal length",
        });
    }
    let mut examples = Vec::with_capacity(n);
    for i in 0..n {
        let hand = DiceHand::known(data.die[i]);
        let features = encode_rethrow_input(&hand, data.throw_number[i], &data.score_fields[i])?;
        examples.push(TrainingExample {
            features: features.to_vec(),
            target: encode_outcome(data.outputs[i])?,
        });
    }
    Ok(examples)
}

fn masked_hand(hand: &DiceHand, pattern: u8) -> DiceHand {
    let mut out = *hand;
    for p in 0..NUM_DICE {
        if pattern & (1u8 << (NUM_DICE - 1 - p)) != 0 {
            out.0[p] = Die::Unknown;
        }
    }
    out
}

/// The 32-candidate subset search, generic over the evaluator so fixed
/// predictors can drive it in tests.
///
/// Candidates are evaluated in parallel but compared in enumeration order
/// (patterns 0..=31 ascending), preserving the earliest-maximum tie-break.
pub(crate) fn best_rethrow_by<E>(hand: &DiceHand, eval: E) -> Result<Rethrow, ValueError>
where
    E: Fn(&DiceHand) -> Result<f32, ValueError> + Sync,
{
    if !hand.is_fully_known() {
        return Err(ValueError::InvalidInput {
            msg: "rethrow decisions need a fully-known hand",
        });
    }
    let values: Vec<f32> = (0..RETHROW_CANDIDATES)
        .into_par_iter()
        .map(|pattern| eval(&masked_hand(hand, pattern as u8)))
        .collect::<Result<_, _>>()?;

    let mut best = Rethrow::NONE;
    let mut max_value = 0.0f32;
    for (pattern, &value) in values.iter().enumerate() {
        if value > max_value {
            max_value = value;
            best = Rethrow(pattern as u8);
        }
    }
    Ok(best)
}
