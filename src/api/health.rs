use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::warn;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the bill store answers a read.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.orchestrator.list_bills().await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({"status": "ready"}))),
        Err(e) => {
            warn!(error = %e, "Bill store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"status": "unavailable"})),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::MemoryBillStore;
    use crate::orchestration::Orchestrator;
    use crate::qr::ErrorCorrectionLevel;
    use crate::upi::UpiLinkGenerator;
    use std::sync::Arc;

    fn memory_state() -> AppState {
        let config = Config {
            port: 0,
            database_path: ":memory:".to_string(),
            qr_error_correction: ErrorCorrectionLevel::M,
            upi_currency: "INR".to_string(),
            upi_apps: vec![],
        };
        let orchestrator = Orchestrator::new(
            Arc::new(MemoryBillStore::new()),
            UpiLinkGenerator::default(),
            ErrorCorrectionLevel::M,
        );
        AppState::new(config, Arc::new(orchestrator))
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_returns_ready() {
        let (status, Json(body)) = ready(State(memory_state())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }
}
