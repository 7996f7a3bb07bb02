//! Route table and request handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use synohalt_core::{Appliance, OperationSnapshot, ShutdownMethod};

use crate::error::ApiError;
use crate::state::{AppState, ConfigState};

/// Minimal control page: one button, a status line, and a poll loop.
const INDEX_HTML: &str = include_str!("index.html");

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/shutdown", post(shutdown))
        .route("/status", get(status))
        .route("/config", get(config_view))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Kick off a shutdown on a background task.
///
/// The tracker's begin-or-reject guard serializes requests: a second
/// POST while one shutdown is in flight gets a 409, never a second
/// concurrent operation against the appliance.
async fn shutdown(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let config = match &state.config {
        ConfigState::Ready(config) => Arc::clone(config),
        ConfigState::Missing(detail) => return Err(ApiError::NotConfigured(detail.clone())),
    };

    if !state.tracker.begin() {
        return Err(ApiError::ShutdownInProgress);
    }

    tracing::info!("shutdown requested over HTTP");
    let tracker = Arc::clone(&state.tracker);
    tokio::spawn(async move {
        match Appliance::new((*config).clone()) {
            Ok(appliance) => {
                let report = appliance
                    .shutdown(config.method, &CancellationToken::new())
                    .await;
                tracker.finish(report.success, report.detail);
            }
            Err(e) => {
                tracing::warn!("could not build appliance client: {e}");
                tracker.finish(false, format!("client setup failed: {e}"));
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "started": true })),
    ))
}

async fn status(State(state): State<AppState>) -> Json<OperationSnapshot> {
    Json(state.tracker.snapshot())
}

/// The resolved configuration with the credential redacted.
async fn config_view(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let config = match &state.config {
        ConfigState::Ready(config) => config,
        ConfigState::Missing(detail) => return Err(ApiError::NotConfigured(detail.clone())),
    };

    let method = match config.method {
        ShutdownMethod::ApiOnly => "api-only",
        ShutdownMethod::ApiThenSsh => "api-then-ssh",
        ShutdownMethod::SshOnly => "ssh-only",
    };

    Ok(Json(serde_json::json!({
        "host": config.host,
        "port": config.port,
        "use_https": config.use_https,
        "username": config.username,
        "password": "<redacted>",
        "ssh_port": config.ssh_port,
        "method": method,
        "bundles": config.bundles,
        "timeout_secs": config.timeout.as_secs(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use synohalt_core::ApplianceConfig;

    fn ready_state() -> AppState {
        let config = ApplianceConfig {
            host: "nas.local".into(),
            username: "admin".into(),
            password: "super-secret".to_string().into(),
            ..ApplianceConfig::default()
        };
        AppState::new(ConfigState::Ready(Arc::new(config)))
    }

    fn missing_state() -> AppState {
        AppState::new(ConfigState::Missing(
            "missing required configuration: host".into(),
        ))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = router(ready_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn index_serves_the_control_page() {
        let response = router(ready_state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("synohalt"));
    }

    #[tokio::test]
    async fn shutdown_without_config_is_a_bad_request() {
        let response = router(missing_state())
            .oneshot(Request::post("/shutdown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "not_configured");
    }

    #[tokio::test]
    async fn second_shutdown_while_busy_is_a_conflict() {
        let state = ready_state();
        assert!(state.tracker.begin());

        let response = router(state)
            .oneshot(Request::post("/shutdown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "shutdown_in_progress"
        );
    }

    #[tokio::test]
    async fn status_reflects_the_last_outcome() {
        let state = ready_state();
        state.tracker.finish(false, "all shutdown candidates exhausted");

        let response = router(state)
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["in_progress"], false);
        assert_eq!(json["success"], false);
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("exhausted")
        );
    }

    #[tokio::test]
    async fn config_view_redacts_the_password() {
        let response = router(ready_state())
            .oneshot(Request::get("/config").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("nas.local"));
        assert!(text.contains("<redacted>"));
        assert!(!text.contains("super-secret"));
    }
}
