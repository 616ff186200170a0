//! QR capacity pre-flight for payment strings.
//!
//! Capacities are alphanumeric-mode character counts for a version 10 symbol.
//! This only catches gross length overflow; it does not model every encoding
//! mode the renderer might pick.

use crate::upi::UpiLinkResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrectionLevel {
    /// Most to least damage tolerant.
    pub const BY_REDUNDANCY: [ErrorCorrectionLevel; 4] = [
        ErrorCorrectionLevel::H,
        ErrorCorrectionLevel::Q,
        ErrorCorrectionLevel::M,
        ErrorCorrectionLevel::L,
    ];

    /// Maximum characters at this level.
    pub fn capacity(&self) -> usize {
        match self {
            ErrorCorrectionLevel::L => 468,
            ErrorCorrectionLevel::M => 360,
            ErrorCorrectionLevel::Q => 288,
            ErrorCorrectionLevel::H => 224,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrectionLevel::L),
            "M" => Ok(ErrorCorrectionLevel::M),
            "Q" => Ok(ErrorCorrectionLevel::Q),
            "H" => Ok(ErrorCorrectionLevel::H),
            _ => Err(QrError::UnknownLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("QR data too long: {length} characters exceeds {capacity} at level {level}")]
    CapacityExceeded {
        length: usize,
        capacity: usize,
        level: ErrorCorrectionLevel,
    },
    #[error("Unknown error correction level: {0}")]
    UnknownLevel(String),
}

/// Whether `data` fits at `level`. The limit itself is inclusive.
pub fn is_qr_code_data_valid(data: &str, level: ErrorCorrectionLevel) -> bool {
    data.chars().count() <= level.capacity()
}

/// The most damage-tolerant level `data` still fits in, if any.
pub fn select_error_correction_level(data: &str) -> Option<ErrorCorrectionLevel> {
    ErrorCorrectionLevel::BY_REDUNDANCY
        .into_iter()
        .find(|level| is_qr_code_data_valid(data, *level))
}

/// A payment string cleared for QR rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub data: String,
    pub level: ErrorCorrectionLevel,
    pub length: usize,
    pub capacity: usize,
}

/// Check a link's QR data against `level` and package it for the renderer.
///
/// # Errors
/// Returns [`QrError::CapacityExceeded`] if the data does not fit.
pub fn prepare_qr_payload(
    link: &UpiLinkResult,
    level: ErrorCorrectionLevel,
) -> Result<QrPayload, QrError> {
    let length = link.qr_code_data.chars().count();
    let capacity = level.capacity();
    if length > capacity {
        return Err(QrError::CapacityExceeded {
            length,
            capacity,
            level,
        });
    }

    Ok(QrPayload {
        data: link.qr_code_data.clone(),
        level,
        length,
        capacity,
    })
}
