use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{format_rupees, Bill, BillId, NewParticipant};
use crate::engine::{RemainderCalculation, SettlementSummary};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub title: String,
    pub participants: Vec<NewParticipant>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillsResponse {
    pub bill_count: usize,
    pub bills: Vec<Bill>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub bill_id: BillId,
    pub summary: SettlementSummary,
    pub remainder: RemainderCalculation,
    /// Display strings, e.g. `₹1,250.50`.
    pub paid_display: String,
    pub remaining_display: String,
}

pub async fn list_bills(State(state): State<AppState>) -> Result<Json<BillsResponse>, AppError> {
    let bills = state.orchestrator.list_bills().await?;
    Ok(Json(BillsResponse {
        bill_count: bills.len(),
        bills,
    }))
}

pub async fn create_bill(
    State(state): State<AppState>,
    Json(request): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    let bill = state
        .orchestrator
        .create_bill(&request.title, request.participants)
        .await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

pub async fn get_bill(
    Path(bill_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.orchestrator.get_bill(&BillId::new(bill_id)).await?;
    Ok(Json(bill))
}

pub async fn delete_bill(
    Path(bill_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.orchestrator.delete_bill(&BillId::new(bill_id)).await?;
    Ok(Json(bill))
}

pub async fn get_summary(
    Path(bill_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let bill_id = BillId::new(bill_id);
    let (summary, remainder) = state.orchestrator.summary(&bill_id).await?;

    Ok(Json(SummaryResponse {
        bill_id,
        paid_display: format_rupees(summary.paid_amount_paise),
        remaining_display: format_rupees(remainder.remaining_amount_paise),
        summary,
        remainder,
    }))
}
