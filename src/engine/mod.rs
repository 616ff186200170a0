//! Pure settlement computations over bill snapshots.
//!
//! Nothing in here touches storage or the clock (apart from stamping
//! `updated_at` on rebuilt bills); every function is safe to call from sync or
//! async code.

use crate::domain::{BillId, StatusParseError};
use thiserror::Error;

pub mod bill_status;
pub mod settlement;
pub mod status;

pub use bill_status::{determine_bill_status, mark_all_paid, update_bill_payment_statuses};
pub use settlement::{
    calculate_remainder, compute_settlement_summary, find_participant_by_name,
    participants_by_status, RemainderCalculation, SettlementSummary,
};
pub use status::{
    is_valid_transition, update_payment_status, update_payment_status_str,
    validate_status_transition,
};

/// Contract violations raised by the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Bill not found: {0}")]
    BillNotFound(BillId),
    #[error("Bill must have at least one participant")]
    NoParticipants,
    #[error("Participant ID is required")]
    ParticipantIdRequired,
    #[error(transparent)]
    InvalidStatus(#[from] StatusParseError),
}
