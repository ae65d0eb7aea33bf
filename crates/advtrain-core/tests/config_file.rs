mod common;

use advtrain_core::{shared, AdversarialTrainer, AttackRef, Params, TrainerConfig, TrainerError};
use common::*;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

const CONFIG: &str = r#"
attacks:
  - name: shift_small
    params: { eps: 0.05 }
  - name: shift_large
    params: { eps: 0.5, clip_max: 1.0 }
fit:
  epochs: 5
  batch_size: 16
"#;

fn registry(attack_log: &Log) -> HashMap<&'static str, Rc<ShiftAttack>> {
    let classifier = shared(ScriptedClassifier::new(vec![1; 8], 2, attack_log.clone()).fitted());
    HashMap::from([
        ("shift_small", Rc::new(ShiftAttack::new("shift_small", 0.05, classifier.clone()))),
        ("shift_large", Rc::new(ShiftAttack::new("shift_large", 0.5, classifier))),
    ])
}

#[test]
fn trainer_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let config = TrainerConfig::from_path(file.path()).unwrap();

    let target_log = log();
    let attack_log = log();
    let attacks = registry(&attack_log);
    let mut trainer = AdversarialTrainer::from_config(
        shared(ScriptedClassifier::new(vec![0; 8], 2, target_log.clone())),
        &config,
        |name| attacks.get(name).map(|a| a.clone() as AttackRef),
    )
    .unwrap();

    let names: Vec<_> = trainer.attacks().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["shift_small", "shift_large"]);

    // Call options override the file's defaults key by key.
    trainer
        .fit(
            inputs(4).view(),
            labels(&[0, 1, 0, 1], 2).view(),
            &Params::new().with("epochs", 1),
        )
        .unwrap();

    let calls = target_log.borrow();
    let options = &calls.fits[0].options;
    assert_eq!(options.get_i64("epochs"), Some(1));
    assert_eq!(options.get_i64("batch_size"), Some(16));

    let seen = attacks["shift_large"].seen_params.borrow();
    assert_eq!(seen[0].get_f64("eps"), Some(0.5));
    assert_eq!(seen[0].get_f64("clip_max"), Some(1.0));
}

#[test]
fn unresolvable_attack_fails_construction() {
    let config = TrainerConfig::from_yaml_str(CONFIG).unwrap();
    let target_log = log();
    let result = AdversarialTrainer::from_config(
        shared(ScriptedClassifier::new(vec![0; 4], 2, target_log)),
        &config,
        |_| None,
    );
    match result {
        Err(TrainerError::UnknownAttack { name }) => assert_eq!(name, "shift_small"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unknown attack"),
    }
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let err = TrainerConfig::from_yaml_str("attacks: { name: fgsm }").unwrap_err();
    assert!(matches!(err, TrainerError::Config { .. }), "{err}");
}
