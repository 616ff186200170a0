pub mod bills;
pub mod health;
pub mod payments;
pub mod upi;

use crate::config::Config;
use crate::orchestration::Orchestrator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/bills", get(bills::list_bills).post(bills::create_bill))
        .route(
            "/v1/bills/:bill_id",
            get(bills::get_bill).delete(bills::delete_bill),
        )
        .route("/v1/bills/:bill_id/summary", get(bills::get_summary))
        .route(
            "/v1/bills/:bill_id/payments",
            post(payments::update_payments),
        )
        .route(
            "/v1/bills/:bill_id/participants/:participant_id/upi-link",
            post(payments::create_share_link),
        )
        .route("/v1/upi/link", post(upi::create_link))
        .route("/v1/vpa/validate", post(upi::validate))
        .layer(cors)
        .with_state(state)
}
