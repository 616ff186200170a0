//! Bill and participant value types.

use crate::domain::{BillId, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a raw status string is not a member of its enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: {value}")]
pub struct StatusParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Per-participant payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            other => Err(StatusParseError {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

/// Bill lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillStatus {
    Active,
    Settled,
    /// Soft-deleted. Never reverted by payment activity.
    Deleted,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Active => "ACTIVE",
            BillStatus::Settled => "SETTLED",
            BillStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(BillStatus::Active),
            "SETTLED" => Ok(BillStatus::Settled),
            "DELETED" => Ok(BillStatus::Deleted),
            other => Err(StatusParseError {
                kind: "bill status",
                value: other.to_string(),
            }),
        }
    }
}

/// A person sharing a bill. Belongs to exactly one bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Share owed, as allocated by the split calculator.
    pub amount_paise: i64,
    pub status: PaymentStatus,
}

impl Participant {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Case-insensitive name comparison; names recur across bills without
    /// sharing identity.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Participant input for bill creation: the split calculator's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipant {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub amount_paise: i64,
}

/// A shared bill and its ordered participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub title: String,
    pub total_amount_paise: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: BillStatus,
    pub participants: Vec<Participant>,
}

impl Bill {
    /// Create an active bill whose total is the sum of the allocated shares.
    /// Every participant starts out pending. The total saturates at `i64::MAX`.
    pub fn new(title: impl Into<String>, participants: Vec<NewParticipant>) -> Self {
        let now = Utc::now();
        let participants: Vec<Participant> = participants
            .into_iter()
            .map(|p| Participant {
                id: ParticipantId::generate(),
                name: p.name.trim().to_string(),
                phone: p.phone.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
                amount_paise: p.amount_paise,
                status: PaymentStatus::Pending,
            })
            .collect();
        let total_amount_paise = participants
            .iter()
            .fold(0i64, |sum, p| sum.saturating_add(p.amount_paise));

        Bill {
            id: BillId::generate(),
            title: title.into().trim().to_string(),
            total_amount_paise,
            created_at: now,
            updated_at: now,
            status: BillStatus::Active,
            participants,
        }
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn is_deleted(&self) -> bool {
        self.status == BillStatus::Deleted
    }
}

/// Command to move one participant to a new payment status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub participant_id: ParticipantId,
    pub status: PaymentStatus,
}

impl PaymentStatusUpdate {
    pub fn new(participant_id: ParticipantId, status: PaymentStatus) -> Self {
        Self {
            participant_id,
            status,
        }
    }
}
