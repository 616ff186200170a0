//! UPI payment requests: VPA validation, deep links and QR payloads.
//!
//! This module provides:
//! - NPCI-format VPA validation
//! - The canonical `upi://pay` parameter set and its two renderings
//! - Wallet-app specific deep links
//! - Transaction reference synthesis

use thiserror::Error;

pub mod apps;
pub mod encoding;
pub mod link;
pub mod reference;
pub mod vpa;

pub use apps::{UnknownUpiApp, UpiApp};
pub use encoding::{ParamEncoder, QrEncoder, UpiParamSet, UriComponentEncoder};
pub use link::{
    generate_upi_link, link_amount_paise, UpiLinkGenerator, UpiLinkResult, UpiPaymentParams,
    DEFAULT_CURRENCY, MAX_UPI_AMOUNT_RUPEES,
};
pub use reference::generate_transaction_ref;
pub use vpa::{is_valid_vpa, validate_vpa};

/// Precondition failures when building a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpiError {
    #[error("Invalid VPA: {0}")]
    InvalidVpa(String),
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
    #[error("Amount cannot exceed ₹1,00,000")]
    AmountTooLarge,
    #[error("Payee name is required")]
    PayeeNameRequired,
}
