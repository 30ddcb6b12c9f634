mod common;

use mindcheck::data::features::Scaling;
use mindcheck::domain::example::RawFeature;
use mindcheck::infra::metrics::read_metrics;
use mindcheck::{train, OovPolicy, PipelineKind, Predictor};

#[test]
fn test_low_and_high_heart_rates_are_separated() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let report = train(common::stress_config(&dataset, &out)).unwrap();
    assert_eq!(report.classes, vec!["high".to_string(), "low".to_string()]);
    assert_eq!(report.input_dim, 1);
    assert_eq!(report.examples, 82);
    assert_eq!(report.val_size, 17);

    let predictor = Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap();
    assert_eq!(predictor.predict(&RawFeature::Scalar(65.0)).unwrap().label, "low");
    assert_eq!(predictor.predict(&RawFeature::Scalar(130.0)).unwrap().label, "high");
}

#[test]
fn test_artifacts_and_metrics_are_written() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::stress_config(&dataset, &out);
    cfg.epochs = 3;
    train(cfg).unwrap();

    for file in [
        "stress_label_encoder.json",
        "stress_scaler.json",
        "stress_predictor.mpk",
        "stress_predictor.json",
    ] {
        assert!(out.join(file).exists(), "missing {file}");
    }
    let metrics = read_metrics(&out.join("stress_predictor_metrics.csv")).unwrap();
    assert_eq!(metrics.iter().map(|m| m.epoch).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_predictions_are_deterministic_across_loads() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::stress_config(&dataset, &out);
    cfg.epochs = 5;
    train(cfg).unwrap();

    let a = Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap();
    let b = Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap();
    for bpm in [55.0, 90.0, 101.5, 150.0] {
        let raw = RawFeature::Scalar(bpm);
        assert_eq!(a.predict(&raw).unwrap(), b.predict(&raw).unwrap());
    }
}

#[test]
fn test_identity_scaling_writes_no_scaler() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::stress_config(&dataset, &out);
    cfg.epochs  = 1;
    cfg.scaling = Scaling::None;
    train(cfg).unwrap();

    assert!(!out.join("stress_scaler.json").exists());
    let predictor = Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap();
    assert!(predictor.predict(&RawFeature::Scalar(72.0)).is_ok());
}

#[test]
fn test_loading_the_wrong_pipeline_fails() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::stress_config(&dataset, &out);
    cfg.epochs = 1;
    train(cfg).unwrap();

    // Emotion artifact names are absent from a stress directory
    assert!(Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore).is_err());
}

#[test]
fn test_raw_heart_rates_separate_with_a_larger_learning_rate() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    // Unscaled inputs around 100 need a bigger step than the default
    let mut cfg = common::stress_config(&dataset, &out);
    cfg.scaling = Scaling::None;
    cfg.lr      = 0.01;
    train(cfg).unwrap();

    let predictor = Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap();
    assert_eq!(predictor.predict(&RawFeature::Scalar(65.0)).unwrap().label, "low");
    assert_eq!(predictor.predict(&RawFeature::Scalar(130.0)).unwrap().label, "high");
}

#[test]
fn test_failed_retrain_leaves_previous_artifacts_in_place() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_stress_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::stress_config(&dataset, &out);
    cfg.epochs = 2;
    train(cfg).unwrap();

    let metrics = out.join("stress_predictor_metrics.csv");
    std::fs::remove_file(&metrics).unwrap();
    std::fs::create_dir(&metrics).unwrap();
    std::fs::write(metrics.join("blocker"), "x").unwrap();

    let relabelled = dir.path().join("relabelled.csv");
    std::fs::write(&relabelled, "heart_rate,anxiety_level\n70,calm\n75,calm\n130,panic\n135,panic\n")
        .unwrap();
    let mut retrain = common::stress_config(&relabelled, &out);
    retrain.epochs  = 1;
    retrain.scaling = Scaling::None;
    assert!(train(retrain).is_err());

    assert!(out.join("stress_scaler.json").exists());
    let predictor = Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap();
    assert_eq!(predictor.classes(), ["high", "low"]);
}
