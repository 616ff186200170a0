//! Bill persistence.
//!
//! This module provides:
//! - The `BillStore` collaborator interface the settlement service consumes
//! - A SQLite implementation with migrations and pragma configuration
//! - An in-memory implementation for tests and local tooling

pub mod memory;
pub mod migrations;
pub mod repo;

pub use memory::MemoryBillStore;
pub use migrations::init_db;
pub use repo::Repository;

use crate::domain::{Bill, BillId, BillStatus, ParticipantId, PaymentStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage for bills and participants.
///
/// Each call is atomic on its own and safe to retry; callers never rely on
/// two calls being applied together.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Fetch a bill with its participants in their original order.
    async fn get_bill_by_id(&self, id: &BillId) -> Result<Option<Bill>, StoreError>;

    /// Every bill, deleted ones included, newest first.
    async fn get_all_bills(&self) -> Result<Vec<Bill>, StoreError>;

    /// Set one participant's payment status.
    async fn update_participant_status(
        &self,
        participant_id: &ParticipantId,
        status: PaymentStatus,
    ) -> Result<(), StoreError>;

    /// Set a bill's lifecycle status.
    async fn update_bill_status(&self, bill_id: &BillId, status: BillStatus)
        -> Result<(), StoreError>;

    /// Record when a bill last changed.
    async fn touch_bill(&self, bill_id: &BillId, updated_at: DateTime<Utc>)
        -> Result<(), StoreError>;

    /// Persist a newly created bill and its participants.
    async fn insert_bill(&self, bill: &Bill) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}
