//! Domain types for bill settlement.
//!
//! This module provides:
//! - Lossless money handling (integer paise, decimal rupees)
//! - Identifiers and timestamps
//! - Bill, participant and status value types
//! - Validation result objects

pub mod bill;
pub mod money;
pub mod primitives;
pub mod validation;

pub use bill::{
    Bill, BillStatus, NewParticipant, Participant, PaymentStatus, PaymentStatusUpdate,
    StatusParseError,
};
pub use money::{format_rupees, paise_to_rupees, rupees_to_paise, Rupees, PAISE_PER_RUPEE};
pub use primitives::{BillId, ParticipantId, TimeMs};
pub use validation::ValidationResult;
