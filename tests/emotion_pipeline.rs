mod common;

use mindcheck::domain::error::PredictError;
use mindcheck::domain::example::RawFeature;
use mindcheck::{train, OovPolicy, PipelineKind, Predictor};

fn text(s: &str) -> RawFeature {
    RawFeature::Text(s.to_string())
}

#[test]
fn test_trained_detector_answers_with_a_known_emotion() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_emotion_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let report = train(common::emotion_config(&dataset, &out)).unwrap();
    assert_eq!(report.classes, vec!["anger", "fear", "joy"]);
    assert_eq!(report.train_size + report.val_size, common::EMOTION_ROWS.len());

    for file in ["label_encoder.json", "vectorizer.json", "emotion_detector.mpk", "emotion_detector.json"] {
        assert!(out.join(file).exists(), "missing {file}");
    }

    let predictor = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore).unwrap();
    let label = predictor.predict(&text("I feel amazing")).unwrap().label;
    assert!(["joy", "anger", "fear"].contains(&label.as_str()), "{label}");
}

#[test]
fn test_same_text_same_answer() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_emotion_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::emotion_config(&dataset, &out);
    cfg.epochs = 3;
    train(cfg).unwrap();

    let predictor = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore).unwrap();
    let first  = predictor.predict(&text("I am so happy")).unwrap();
    let second = predictor.predict(&text("I am so happy")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_terms_follow_the_policy() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_emotion_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::emotion_config(&dataset, &out);
    cfg.epochs = 2;
    train(cfg).unwrap();

    let lenient = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore).unwrap();
    assert!(lenient.predict(&text("zebra happy")).is_ok());
    // Nothing known at all still yields a label from the zero vector
    assert!(lenient.predict(&text("zebra quantum")).is_ok());

    let strict = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Reject).unwrap();
    assert_eq!(
        strict.predict(&text("zebra happy")),
        Err(PredictError::UnknownTerms(vec!["zebra".to_string()]))
    );
    assert!(strict.predict(&text("happy morning")).is_ok());
}

#[test]
fn test_number_sent_to_text_pipeline_is_rejected() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_emotion_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::emotion_config(&dataset, &out);
    cfg.epochs = 1;
    train(cfg).unwrap();

    let predictor = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore).unwrap();
    assert!(matches!(
        predictor.predict(&RawFeature::Scalar(72.0)),
        Err(PredictError::WrongType { .. })
    ));
}

#[test]
fn test_startup_fails_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Predictor::from_dir(dir.path(), PipelineKind::Emotion, OovPolicy::Ignore).is_err());
}

#[test]
fn test_startup_fails_on_mismatched_vectorizer() {
    let dir     = tempfile::tempdir().unwrap();
    let dataset = common::write_emotion_csv(dir.path());
    let out     = dir.path().join("artifacts");

    let mut cfg = common::emotion_config(&dataset, &out);
    cfg.epochs = 1;
    train(cfg).unwrap();

    // A vectorizer fitted on a different corpus has a different width
    let other_csv = dir.path().join("other.csv");
    std::fs::write(&other_csv, "message,emotion\nhello there,joy\ngo away,anger\n").unwrap();
    let other_out = dir.path().join("other");
    let mut other = common::emotion_config(&other_csv, &other_out);
    other.epochs = 1;
    train(other).unwrap();

    std::fs::copy(other_out.join("vectorizer.json"), out.join("vectorizer.json")).unwrap();
    let err = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore)
        .err()
        .unwrap()
        .to_string();
    assert!(err.contains("features"), "{err}");
}

#[test]
fn test_missing_target_column_aborts_training() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("no_target.csv");
    std::fs::write(&csv, "message,mood\nhello,joy\n").unwrap();
    let out = dir.path().join("artifacts");

    assert!(train(common::emotion_config(&csv, &out)).is_err());
    assert!(!out.exists());
}

#[test]
fn test_single_class_trains_a_degenerate_model() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("one_class.csv");
    std::fs::write(&csv, "message,emotion\nhappy day,joy\nlovely day,joy\ngreat fun,joy\n").unwrap();
    let out = dir.path().join("artifacts");

    let mut cfg = common::emotion_config(&csv, &out);
    cfg.epochs = 2;
    let report = train(cfg).unwrap();
    assert_eq!(report.classes, vec!["joy"]);

    let predictor = Predictor::from_dir(&out, PipelineKind::Emotion, OovPolicy::Ignore).unwrap();
    assert_eq!(predictor.predict(&text("happy")).unwrap().label, "joy");
}
