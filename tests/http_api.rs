mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

use mindcheck::server::router;
use mindcheck::{train, OovPolicy, PipelineKind, Predictor};

fn emotion_app(dir: &Path, oov: OovPolicy) -> Router {
    let dataset = common::write_emotion_csv(dir);
    let out     = dir.join("emotion");
    let mut cfg = common::emotion_config(&dataset, &out);
    cfg.epochs = 2;
    train(cfg).unwrap();
    router(Predictor::from_dir(&out, PipelineKind::Emotion, oov).unwrap())
}

fn stress_app(dir: &Path) -> Router {
    let dataset = common::write_stress_csv(dir);
    let out     = dir.join("stress");
    train(common::stress_config(&dataset, &out)).unwrap();
    router(Predictor::from_dir(&out, PipelineKind::Stress, OovPolicy::Ignore).unwrap())
}

async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status   = response.status();
    let bytes    = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value    = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_detect_emotion_returns_a_label() {
    let dir = tempfile::tempdir().unwrap();
    let app = emotion_app(dir.path(), OovPolicy::Ignore);

    let (status, body) =
        send(app, "POST", "/detect_emotion", r#"{"message": "I feel amazing"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let emotion = body["emotion"].as_str().unwrap();
    assert!(["joy", "anger", "fear"].contains(&emotion), "{body}");
}

#[tokio::test]
async fn test_missing_field_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = emotion_app(dir.path(), OovPolicy::Ignore);

    let (status, body) = send(app, "POST", "/detect_emotion", r#"{"text": "hi"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("message"), "{body}");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = emotion_app(dir.path(), OovPolicy::Ignore);

    let (status, body) = send(app, "POST", "/detect_emotion", r#"{"message": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_terms_are_unprocessable_when_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = emotion_app(dir.path(), OovPolicy::Reject);

    let (status, body) =
        send(app, "POST", "/detect_emotion", r#"{"message": "zebra happy"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("zebra"), "{body}");
}

#[tokio::test]
async fn test_health_lists_classes() {
    let dir = tempfile::tempdir().unwrap();
    let app = emotion_app(dir.path(), OovPolicy::Ignore);

    let (status, body) = send(app, "GET", "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["pipeline"], "emotion");
    assert_eq!(body["classes"], json!(["anger", "fear", "joy"]));
}

#[tokio::test]
async fn test_emotion_router_has_no_trend_route() {
    let dir = tempfile::tempdir().unwrap();
    let app = emotion_app(dir.path(), OovPolicy::Ignore);

    let (status, _) = send(app, "POST", "/heart_rate_trend", r#"{"readings": [70]}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_predict_stress_accepts_numbers_and_numeric_strings() {
    let dir = tempfile::tempdir().unwrap();
    let app = stress_app(dir.path());

    let (status, body) =
        send(app.clone(), "POST", "/predict_stress", r#"{"heart_rate": 130}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anxiety_level"], "high");

    let (status, body) =
        send(app.clone(), "POST", "/predict_stress", r#"{"heart_rate": "65"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anxiety_level"], "low");

    let (status, _) =
        send(app, "POST", "/predict_stress", r#"{"heart_rate": "fast"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_heart_rate_trend() {
    let dir = tempfile::tempdir().unwrap();
    let app = stress_app(dir.path());

    let (status, body) = send(
        app.clone(),
        "POST",
        "/heart_rate_trend",
        r#"{"readings": [70, 72, 74, 76, 78]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_heart_rate"], 74.0);
    assert_eq!(body["anxiety_level"], "Normal");
    assert_eq!(body["window"].as_array().unwrap().len(), 5);

    let (status, body) = send(app, "POST", "/heart_rate_trend", r#"{"readings": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
