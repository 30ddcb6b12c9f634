// ============================================================
// Layer 1 - HTTP Serving
// ============================================================
// Wraps one loaded Predictor in an axum Router. The predictor
// is built before the router and handed over at construction,
// so there is no global state and no lock.
//
// Routes depend on the pipeline:
//   emotion:  POST /detect_emotion,  GET /health
//   stress:   POST /predict_stress,  GET /health,
//             POST /heart_rate_trend

pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};

use crate::application::predict_use_case::{OovPolicy, Predictor};
use crate::domain::pipeline::PipelineKind;

/// Settings for `mindcheck serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    pub pipeline:     PipelineKind,
    pub artifact_dir: String,
    pub host:         String,
    pub port:         u16,
    pub oov:          OovPolicy,
}

impl ServeConfig {
    pub fn for_pipeline(kind: PipelineKind) -> Self {
        Self {
            pipeline:     kind,
            artifact_dir: "artifacts".to_string(),
            host:         "0.0.0.0".to_string(),
            port:         kind.spec().default_port,
            oov:          OovPolicy::default(),
        }
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address '{}:{}'", self.host, self.port))
    }
}

/// Shared, read-only state behind every handler.
pub struct AppState {
    pub predictor: Predictor,
}

pub fn router(predictor: Predictor) -> Router {
    let spec  = predictor.spec().clone();
    let state = Arc::new(AppState { predictor });

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route(spec.route, post(handlers::predict));

    if spec.kind == PipelineKind::Stress {
        app = app.route("/heart_rate_trend", post(handlers::heart_rate_trend));
    }
    app.with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(predictor: Predictor, addr: SocketAddr) -> Result<()> {
    let route = predictor.spec().route;
    let app   = router(predictor);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!("Listening on http://{} (POST {})", addr, route);

    axum::serve(listener, app).await.context("Server error")
}

/// Load artifacts, then run the server on a fresh tokio runtime.
pub fn run(config: &ServeConfig) -> Result<()> {
    // Load before binding: bad artifacts must fail startup
    let predictor = Predictor::from_dir(&config.artifact_dir, config.pipeline, config.oov)?;
    let addr      = config.addr()?;

    let runtime = tokio::runtime::Runtime::new().context("Cannot start tokio runtime")?;
    runtime.block_on(serve(predictor, addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        assert_eq!(ServeConfig::for_pipeline(PipelineKind::Emotion).port, 5000);
        assert_eq!(ServeConfig::for_pipeline(PipelineKind::Stress).port, 5001);
    }

    #[test]
    fn test_addr_parsing() {
        let mut cfg = ServeConfig::for_pipeline(PipelineKind::Stress);
        cfg.host = "127.0.0.1".into();
        assert_eq!(cfg.addr().unwrap().port(), 5001);
        cfg.host = "not a host".into();
        assert!(cfg.addr().is_err());
    }
}
