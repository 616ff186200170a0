//! In-memory bill store for tests and local tooling.

use super::{BillStore, StoreError};
use crate::domain::{Bill, BillId, BillStatus, ParticipantId, PaymentStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// Bills kept in insertion order behind a lock.
#[derive(Debug, Default)]
pub struct MemoryBillStore {
    bills: RwLock<Vec<Bill>>,
}

impl MemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing bills.
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: RwLock::new(bills),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Bill>>, StoreError> {
        self.bills
            .read()
            .map_err(|_| StoreError::Corrupt("bill store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Bill>>, StoreError> {
        self.bills
            .write()
            .map_err(|_| StoreError::Corrupt("bill store lock poisoned".to_string()))
    }
}

#[async_trait]
impl BillStore for MemoryBillStore {
    async fn get_bill_by_id(&self, id: &BillId) -> Result<Option<Bill>, StoreError> {
        Ok(self.read()?.iter().find(|b| &b.id == id).cloned())
    }

    async fn get_all_bills(&self) -> Result<Vec<Bill>, StoreError> {
        let mut bills = self.read()?.clone();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(bills)
    }

    async fn update_participant_status(
        &self,
        participant_id: &ParticipantId,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        let mut bills = self.write()?;
        if let Some(participant) = bills
            .iter_mut()
            .flat_map(|b| b.participants.iter_mut())
            .find(|p| &p.id == participant_id)
        {
            participant.status = status;
        }
        Ok(())
    }

    async fn update_bill_status(
        &self,
        bill_id: &BillId,
        status: BillStatus,
    ) -> Result<(), StoreError> {
        let mut bills = self.write()?;
        if let Some(bill) = bills.iter_mut().find(|b| &b.id == bill_id) {
            bill.status = status;
            bill.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn touch_bill(
        &self,
        bill_id: &BillId,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut bills = self.write()?;
        if let Some(bill) = bills.iter_mut().find(|b| &b.id == bill_id) {
            bill.updated_at = updated_at;
        }
        Ok(())
    }

    async fn insert_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        let mut bills = self.write()?;
        if bills.iter().any(|b| b.id == bill.id) {
            return Err(StoreError::Corrupt(format!("duplicate bill id {}", bill.id)));
        }
        bills.push(bill.clone());
        Ok(())
    }
}
