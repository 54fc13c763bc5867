use crate::net::{Net, TrainOptions};
use crate::persist::PersistError;
use crate::spec::NetSpec;

fn trained_net(seed: u64) -> Net {
    let mut net = Net::new(NetSpec::dense(&[4, 6, 1]), seed).unwrap();
    let inputs: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32 / 8.0; 4]).collect();
    let targets: Vec<f32> = (0..8).map(|i| i as f32 / 8.0).collect();
    net.fit(&inputs, &targets, &TrainOptions::default()).unwrap();
    net
}

#[test]
fn save_then_load_reproduces_predictions_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let saved = trained_net(11);
    saved.save(dir.path(), "probe").unwrap();

    // A fresh instance with a different seed, same architecture.
    let mut restored = Net::new(NetSpec::dense(&[4, 6, 1]), 99).unwrap();
    restored.load(dir.path(), "probe").unwrap();

    for i in 0..16 {
        let x = vec![i as f32 / 16.0, 0.3, 0.7, 1.0 - i as f32 / 16.0];
        assert_eq!(saved.predict(&x).unwrap(), restored.predict(&x).unwrap());
    }
}

#[test]
fn load_of_missing_model_fails_with_model_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = Net::new(NetSpec::dense(&[4, 6, 1]), 0).unwrap();
    let err = net.load(dir.path(), "absent").unwrap_err();
    assert!(matches!(err, PersistError::ModelNotFound { .. }));
}

#[test]
fn load_with_partial_artifacts_fails_with_model_not_found() {
    let dir = tempfile::tempdir().unwrap();
    trained_net(1).save(dir.path(), "m").unwrap();
    std::fs::remove_file(dir.path().join("m.safetensors")).unwrap();

    let mut net = Net::new(NetSpec::dense(&[4, 6, 1]), 0).unwrap();
    let err = net.load(dir.path(), "m").unwrap_err();
    assert!(matches!(err, PersistError::ModelNotFound { .. }));
}

#[test]
fn load_into_mismatched_architecture_fails() {
    let dir = tempfile::tempdir().unwrap();
    trained_net(1).save(dir.path(), "m").unwrap();

    let mut other = Net::new(NetSpec::dense(&[4, 5, 1]), 0).unwrap();
    let err = other.load(dir.path(), "m").unwrap_err();
    assert!(matches!(err, PersistError::ArchMismatch { .. }));
}

#[test]
fn save_leaves_no_tmp_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    trained_net(1).save(dir.path(), "m").unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    assert!(dir.path().join("m.safetensors").is_file());
    assert!(dir.path().join("m.meta.json").is_file());
}
