use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Bill, BillId, ParticipantId};
use crate::engine::{compute_settlement_summary, SettlementSummary};
use crate::error::AppError;
use crate::orchestration::{ShareLink, ShareLinkRequest, StatusChangeRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentsRequest {
    pub updates: Vec<StatusChangeRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentsResponse {
    pub bill: Bill,
    pub summary: SettlementSummary,
}

pub async fn update_payments(
    Path(bill_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePaymentsRequest>,
) -> Result<Json<UpdatePaymentsResponse>, AppError> {
    let bill = state
        .orchestrator
        .apply_status_changes(&BillId::new(bill_id), &request.updates)
        .await?;
    let summary = compute_settlement_summary(&bill)?;

    Ok(Json(UpdatePaymentsResponse { bill, summary }))
}

pub async fn create_share_link(
    Path((bill_id, participant_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(request): Json<ShareLinkRequest>,
) -> Result<Json<ShareLink>, AppError> {
    let link = state
        .orchestrator
        .share_link(
            &BillId::new(bill_id),
            &ParticipantId::new(participant_id),
            &request,
        )
        .await?;
    Ok(Json(link))
}
