use std::sync::atomic::{AtomicUsize, Ordering};

use yv_core::{DiceHand, Die, ScoreFields, NUM_FIELDS};
use yv_history::{DiceThrowHistory, GameLog, RoundRecord};

use crate::rethrow::{
    best_rethrow_by, rethrow_examples, DiceRethrowValue, Rethrow, RETHROW_CANDIDATES,
};
use crate::value::{ValueError, ValueFunction};

fn hand() -> DiceHand {
    DiceHand::known([1, 2, 3, 4, 5])
}

fn masked_count(candidate: &DiceHand) -> f32 {
    candidate
        .0
        .iter()
        .filter(|d| matches!(d, Die::Unknown))
        .count() as f32
}

fn full_game(final_score: u16) -> yv_history::GameRecord {
    let mut log = GameLog::new();
    let mut fields = ScoreFields::empty();
    for r in 0..NUM_FIELDS {
        let face = (r % 6) as u8 + 1;
        log.push_round(RoundRecord {
            fields,
            throws: [[face; 5]; 3],
            chosen_field: r as u8,
            score: 5,
        });
        fields.0[r] = Some(5);
    }
    log.finish(final_score).unwrap()
}

#[test]
fn sweep_evaluates_exactly_32_candidates() {
    let calls = AtomicUsize::new(0);
    let decision = best_rethrow_by(&hand(), |_| {
        calls.fetch_add(1, Ordering::Relaxed);
        Ok(0.5)
    })
    .unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), RETHROW_CANDIDATES);
    // All candidates tie above the baseline; the earliest pattern wins.
    assert!(decision.is_empty());
}

#[test]
fn masked_count_predictor_prefers_throwing_everything() {
    let decision = best_rethrow_by(&hand(), |c| Ok(masked_count(c))).unwrap();
    assert_eq!(decision.positions(), vec![0, 1, 2, 3, 4]);
    assert_eq!(decision.pattern(), 0b11111);
}

#[test]
fn nonpositive_landscape_keeps_every_die() {
    let decision = best_rethrow_by(&hand(), |c| Ok(-1.0 - masked_count(c))).unwrap();
    assert_eq!(decision, Rethrow::NONE);
    assert!(decision.positions().is_empty());
}

#[test]
fn pattern_bit_order_maps_low_bit_to_last_position() {
    // Reward exactly one shape: only the last die masked.
    let decision = best_rethrow_by(&hand(), |c| {
        let only_last = c.0[4] == Die::Unknown && c.0[..4].iter().all(|d| d.face().is_some());
        Ok(if only_last { 1.0 } else { 0.0 })
    })
    .unwrap();
    assert_eq!(decision.pattern(), 0b00001);
    assert_eq!(decision.positions(), vec![4]);
}

#[test]
fn sweep_rejects_masked_starting_hands() {
    let mut start = hand();
    start.0[2] = Die::Unknown;
    let err = best_rethrow_by(&start, |_| Ok(0.0)).unwrap_err();
    assert!(matches!(err, ValueError::InvalidInput { .. }));
}

#[test]
fn model_decision_returns_a_subset_of_positions() {
    let model = DiceRethrowValue::new(5).unwrap();
    let decision = model
        .decide_dice_throw(&ScoreFields::empty(), 0, &hand())
        .unwrap();
    assert!(decision.positions().iter().all(|&p| p < 5));
}

#[test]
fn one_game_yields_45_examples_with_a_shared_target() {
    let game = full_game(187);
    let examples = rethrow_examples(&game.dice_throw_data()).unwrap();
    assert_eq!(examples.len(), 45);
    let expected = 187.0 / 374.0;
    for example in &examples {
        assert_eq!(example.features.len(), 48);
        assert!((example.target - expected).abs() < 1e-6);
    }
}

#[test]
fn training_on_a_game_returns_a_finite_error() {
    let mut model = DiceRethrowValue::new(0).unwrap();
    let err = model.train(&full_game(187)).unwrap();
    assert!(err.is_finite());
}

#[test]
fn save_load_roundtrip_preserves_decisions() {
    let dir = tempfile::tempdir().unwrap();
    let mut trained = DiceRethrowValue::new(8).unwrap();
    trained.train(&full_game(200)).unwrap();
    trained.save(dir.path()).unwrap();

    let mut restored = DiceRethrowValue::new(1234).unwrap();
    restored.load(dir.path()).unwrap();

    let fields = ScoreFields::empty();
    assert_eq!(
        trained.predict_state(&hand(), 1, &fields).unwrap(),
        restored.predict_state(&hand(), 1, &fields).unwrap()
    );
    assert_eq!(
        trained.decide_dice_throw(&fields, 1, &hand()).unwrap(),
        restored.decide_dice_throw(&fields, 1, &hand()).unwrap()
    );
}
