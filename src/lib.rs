pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod qr;
pub mod upi;

pub use config::Config;
pub use db::{init_db, BillStore, MemoryBillStore, Repository, StoreError};
pub use domain::{
    Bill, BillId, BillStatus, NewParticipant, Participant, ParticipantId, PaymentStatus,
    PaymentStatusUpdate, Rupees, TimeMs, ValidationResult,
};
pub use engine::{
    calculate_remainder, compute_settlement_summary, determine_bill_status,
    update_bill_payment_statuses, RemainderCalculation, SettlementError, SettlementSummary,
};
pub use error::AppError;
pub use orchestration::Orchestrator;
pub use qr::ErrorCorrectionLevel;
pub use upi::{generate_upi_link, validate_vpa, UpiLinkGenerator, UpiLinkResult, UpiPaymentParams};
