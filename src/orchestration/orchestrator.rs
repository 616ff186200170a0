use crate::db::{BillStore, StoreError};
use crate::domain::{
    Bill, BillId, BillStatus, NewParticipant, ParticipantId, PaymentStatus, PaymentStatusUpdate,
};
use crate::engine::{
    calculate_remainder, compute_settlement_summary, update_bill_payment_statuses,
    validate_status_transition, RemainderCalculation, SettlementError, SettlementSummary,
};
use crate::qr::{prepare_qr_payload, ErrorCorrectionLevel, QrPayload};
use crate::upi::{UpiError, UpiLinkGenerator, UpiLinkResult, UpiPaymentParams};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// A status change as submitted by the client, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub participant_id: ParticipantId,
    pub status: String,
}

/// Payment request for one participant's share.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkRequest {
    pub payee_vpa: String,
    pub payee_name: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub participant_id: ParticipantId,
    pub amount_paise: i64,
    pub link: UpiLinkResult,
    pub qr_level: ErrorCorrectionLevel,
    /// `None` when the QR data does not fit at `qr_level`.
    pub qr: Option<QrPayload>,
}

/// Wires the pure settlement engine to a [`BillStore`].
///
/// Writes go through the store one call at a time: participant rows first,
/// then the resolved bill status.
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn BillStore>,
    links: UpiLinkGenerator,
    qr_level: ErrorCorrectionLevel,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn BillStore>,
        links: UpiLinkGenerator,
        qr_level: ErrorCorrectionLevel,
    ) -> Self {
        Self {
            store,
            links,
            qr_level,
        }
    }

    pub fn link_generator(&self) -> &UpiLinkGenerator {
        &self.links
    }

    pub fn qr_level(&self) -> ErrorCorrectionLevel {
        self.qr_level
    }

    /// Validate the split calculator's output and persist a new bill.
    pub async fn create_bill(
        &self,
        title: &str,
        participants: Vec<NewParticipant>,
    ) -> Result<Bill, OrchestrationError> {
        let errors = validate_new_bill(title, &participants);
        if !errors.is_empty() {
            return Err(OrchestrationError::Validation(errors));
        }

        let bill = Bill::new(title, participants);
        self.store.insert_bill(&bill).await?;
        info!(
            bill_id = %bill.id,
            participants = bill.participants.len(),
            total_amount_paise = bill.total_amount_paise,
            "Bill created"
        );
        Ok(bill)
    }

    pub async fn get_bill(&self, id: &BillId) -> Result<Bill, OrchestrationError> {
        self.store
            .get_bill_by_id(id)
            .await?
            .ok_or_else(|| SettlementError::BillNotFound(id.clone()).into())
    }

    /// Bills that have not been deleted, newest first.
    pub async fn list_bills(&self) -> Result<Vec<Bill>, OrchestrationError> {
        let bills = self.store.get_all_bills().await?;
        Ok(bills.into_iter().filter(|b| !b.is_deleted()).collect())
    }

    /// Soft-delete a bill. Deleting twice is harmless.
    pub async fn delete_bill(&self, id: &BillId) -> Result<Bill, OrchestrationError> {
        let bill = self.get_bill(id).await?;
        if bill.is_deleted() {
            return Ok(bill);
        }
        self.store.update_bill_status(id, BillStatus::Deleted).await?;
        info!(bill_id = %id, "Bill deleted");
        self.get_bill(id).await
    }

    pub async fn summary(
        &self,
        id: &BillId,
    ) -> Result<(SettlementSummary, RemainderCalculation), OrchestrationError> {
        let bill = self.get_bill(id).await?;
        let summary = compute_settlement_summary(&bill)?;
        let remainder = calculate_remainder(&bill)?;
        Ok((summary, remainder))
    }

    /// Validate and apply a batch of status changes, then persist the result.
    ///
    /// Every request is checked with the transition validator before anything
    /// is written; one bad request rejects the whole batch. Requests naming a
    /// participant not on the bill are ignored.
    pub async fn apply_status_changes(
        &self,
        id: &BillId,
        requests: &[StatusChangeRequest],
    ) -> Result<Bill, OrchestrationError> {
        let bill = self.get_bill(id).await?;

        let mut errors = Vec::new();
        let mut updates = Vec::with_capacity(requests.len());
        for request in requests {
            let Some(participant) = bill.participant(&request.participant_id) else {
                continue;
            };
            let validation =
                validate_status_transition(participant.status.as_str(), &request.status);
            if !validation.is_valid {
                errors.extend(validation.errors);
                continue;
            }
            if let Ok(status) = PaymentStatus::from_str(&request.status) {
                updates.push(PaymentStatusUpdate::new(participant.id.clone(), status));
            }
        }
        if !errors.is_empty() {
            warn!(bill_id = %id, errors = ?errors, "Rejected status changes");
            return Err(OrchestrationError::Validation(errors));
        }

        let updated = match update_bill_payment_statuses(&bill, &updates) {
            Cow::Borrowed(_) => None,
            Cow::Owned(updated) => Some(updated),
        };
        let Some(updated) = updated else {
            return Ok(bill);
        };

        let mut changed = false;
        for (before, after) in bill.participants.iter().zip(&updated.participants) {
            if before.status != after.status {
                self.store
                    .update_participant_status(&after.id, after.status)
                    .await?;
                changed = true;
            }
        }
        if updated.status != bill.status {
            self.store.update_bill_status(id, updated.status).await?;
            info!(bill_id = %id, status = %updated.status, "Bill status updated");
            changed = true;
        }
        if !changed {
            return Ok(bill);
        }
        self.store.touch_bill(id, updated.updated_at).await?;

        // Re-read so the caller sees what later reads will see.
        self.get_bill(id).await
    }

    /// Payment link for what one participant owes on a bill.
    ///
    /// The note defaults to the bill title; the transaction reference is
    /// derived from the bill id.
    pub async fn share_link(
        &self,
        bill_id: &BillId,
        participant_id: &ParticipantId,
        request: &ShareLinkRequest,
    ) -> Result<ShareLink, OrchestrationError> {
        let bill = self.get_bill(bill_id).await?;
        let participant = bill
            .participant(participant_id)
            .ok_or_else(|| OrchestrationError::ParticipantNotFound(participant_id.clone()))?;

        let note = request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&bill.title);
        let params = UpiPaymentParams::for_share(
            request.payee_vpa.as_str(),
            request.payee_name.as_str(),
            participant.amount_paise,
        )
        .with_note(note)
        .with_bill_id(bill.id.as_str());

        let link = self.links.generate(&params)?;
        let qr = match prepare_qr_payload(&link, self.qr_level) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(bill_id = %bill_id, error = %e, "QR payload does not fit");
                None
            }
        };

        Ok(ShareLink {
            participant_id: participant.id.clone(),
            amount_paise: participant.amount_paise,
            link,
            qr_level: self.qr_level,
            qr,
        })
    }
}

fn validate_new_bill(title: &str, participants: &[NewParticipant]) -> Vec<String> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("Bill title is required".to_string());
    }
    if participants.is_empty() {
        errors.push(SettlementError::NoParticipants.to_string());
    }
    for (i, p) in participants.iter().enumerate() {
        if p.name.trim().is_empty() {
            errors.push(format!("Participant {} name is required", i + 1));
        }
        if p.amount_paise <= 0 {
            errors.push(format!(
                "Participant {} amount must be greater than 0",
                i + 1
            ));
        }
    }
    // Shares must sum without overflowing the stored total.
    let total = participants
        .iter()
        .filter(|p| p.amount_paise > 0)
        .try_fold(0i64, |sum, p| sum.checked_add(p.amount_paise));
    if total.is_none() {
        errors.push("Bill total is too large".to_string());
    }
    errors
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error(transparent)]
    Upi(#[from] UpiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}
