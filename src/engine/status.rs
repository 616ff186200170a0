//! Two-state payment state machine.
//!
//! `PENDING <-> PAID`, in both directions, identity included. Validation is
//! advisory: the apply functions do not call it, callers validate first.

use super::SettlementError;
use crate::domain::{Participant, PaymentStatus, ValidationResult};
use std::str::FromStr;

/// Whether the state machine permits `from -> to`.
pub fn is_valid_transition(from: PaymentStatus, to: PaymentStatus) -> bool {
    match (from, to) {
        (PaymentStatus::Pending, PaymentStatus::Paid)
        | (PaymentStatus::Paid, PaymentStatus::Pending) => true,
        // Identity transitions are no-ops.
        (PaymentStatus::Pending, PaymentStatus::Pending)
        | (PaymentStatus::Paid, PaymentStatus::Paid) => true,
    }
}

/// Validate a proposed transition given raw status strings from the client.
///
/// Both sides are checked and every failure is reported.
pub fn validate_status_transition(current: &str, new: &str) -> ValidationResult {
    let mut errors = Vec::new();

    let from = PaymentStatus::from_str(current).ok();
    if from.is_none() {
        errors.push(format!("Invalid current status: {}", current));
    }
    let to = PaymentStatus::from_str(new).ok();
    if to.is_none() {
        errors.push(format!("Invalid new status: {}", new));
    }

    if let (Some(from), Some(to)) = (from, to) {
        if !is_valid_transition(from, to) {
            errors.push(format!("Cannot transition from {} to {}", from, to));
        }
    }

    ValidationResult::from_errors(errors)
}

/// Return a copy of `participant` with only its status replaced.
///
/// # Errors
/// Returns [`SettlementError::ParticipantIdRequired`] if the participant has a blank id.
pub fn update_payment_status(
    participant: &Participant,
    new_status: PaymentStatus,
) -> Result<Participant, SettlementError> {
    if participant.id.is_empty() {
        return Err(SettlementError::ParticipantIdRequired);
    }

    Ok(Participant {
        status: new_status,
        ..participant.clone()
    })
}

/// [`update_payment_status`] for a raw status string.
///
/// # Errors
/// Returns [`SettlementError::InvalidStatus`] if `new_status` is not a payment status.
pub fn update_payment_status_str(
    participant: &Participant,
    new_status: &str,
) -> Result<Participant, SettlementError> {
    if participant.id.is_empty() {
        return Err(SettlementError::ParticipantIdRequired);
    }
    let status = PaymentStatus::from_str(new_status)?;
    update_payment_status(participant, status)
}
