use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::AppState;
use crate::domain::ValidationResult;
use crate::error::AppError;
use crate::qr::{is_qr_code_data_valid, select_error_correction_level, ErrorCorrectionLevel};
use crate::upi::{validate_vpa, UpiLinkResult, UpiPaymentParams};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[serde(flatten)]
    pub link: UpiLinkResult,
    pub qr_level: ErrorCorrectionLevel,
    pub qr_fits: bool,
    /// Most damage-tolerant level the QR data fits in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_qr_level: Option<ErrorCorrectionLevel>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateVpaRequest {
    #[serde(default)]
    pub vpa: Option<String>,
}

pub async fn create_link(
    State(state): State<AppState>,
    Json(params): Json<UpiPaymentParams>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .orchestrator
        .link_generator()
        .generate(&params)
        .map_err(|e| {
            warn!(error = %e, "Rejected UPI link request");
            AppError::from(e)
        })?;

    let qr_level = state.config.qr_error_correction;
    let qr_fits = is_qr_code_data_valid(&link.qr_code_data, qr_level);
    let recommended_qr_level = select_error_correction_level(&link.qr_code_data);

    Ok(Json(LinkResponse {
        link,
        qr_level,
        qr_fits,
        recommended_qr_level,
    }))
}

pub async fn validate(Json(request): Json<ValidateVpaRequest>) -> Json<ValidationResult> {
    Json(validate_vpa(request.vpa.as_deref()))
}
