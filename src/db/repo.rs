//! SQLite-backed bill repository.

use super::{BillStore, StoreError};
use crate::domain::{Bill, BillId, BillStatus, Participant, ParticipantId, PaymentStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Repository for bill and participant rows.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Participants for the given bills, grouped by bill and kept in position order.
    async fn fetch_participants(
        &self,
        bill_ids: &[String],
    ) -> Result<HashMap<String, Vec<Participant>>, StoreError> {
        let mut by_bill: HashMap<String, Vec<Participant>> = HashMap::new();
        if bill_ids.is_empty() {
            return Ok(by_bill);
        }

        let placeholders = vec!["?"; bill_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT id, bill_id, name, phone, amount_paise, status
            FROM participants
            WHERE bill_id IN ({})
            ORDER BY bill_id ASC, position ASC
            "#,
            placeholders
        );
        let mut query = sqlx::query(&sql);
        for id in bill_ids {
            query = query.bind(id.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;

        for row in &rows {
            let bill_id: String = row.get("bill_id");
            by_bill
                .entry(bill_id)
                .or_default()
                .push(participant_from_row(row)?);
        }
        Ok(by_bill)
    }
}

fn participant_from_row(row: &SqliteRow) -> Result<Participant, StoreError> {
    let id: String = row.get("id");
    let status_str: String = row.get("status");
    let status = PaymentStatus::from_str(&status_str).map_err(|e| {
        warn!(participant_id = %id, status = %status_str, "Unreadable participant status");
        StoreError::Corrupt(e.to_string())
    })?;

    Ok(Participant {
        id: ParticipantId::new(id),
        name: row.get("name"),
        phone: row.get("phone"),
        amount_paise: row.get("amount_paise"),
        status,
    })
}

fn timestamp(ms: i64, bill_id: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
        StoreError::Corrupt(format!(
            "bill {} has timestamp out of range: {}",
            bill_id, ms
        ))
    })
}

fn bill_from_row(row: &SqliteRow, participants: Vec<Participant>) -> Result<Bill, StoreError> {
    let id: String = row.get("id");
    let status_str: String = row.get("status");
    let status = BillStatus::from_str(&status_str).map_err(|e| {
        warn!(bill_id = %id, status = %status_str, "Unreadable bill status");
        StoreError::Corrupt(e.to_string())
    })?;
    let created_at = timestamp(row.get("created_at"), &id)?;
    let updated_at = timestamp(row.get("updated_at"), &id)?;

    Ok(Bill {
        id: BillId::new(id),
        title: row.get("title"),
        total_amount_paise: row.get("total_amount_paise"),
        created_at,
        updated_at,
        status,
        participants,
    })
}

#[async_trait]
impl BillStore for Repository {
    async fn get_bill_by_id(&self, id: &BillId) -> Result<Option<Bill>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, total_amount_paise, status, created_at, updated_at
            FROM bills
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut participants = self.fetch_participants(&[id.as_str().to_string()]).await?;
        let participants = participants.remove(id.as_str()).unwrap_or_default();
        bill_from_row(&row, participants).map(Some)
    }

    async fn get_all_bills(&self) -> Result<Vec<Bill>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, total_amount_paise, status, created_at, updated_at
            FROM bills
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<String> = rows.iter().map(|r| r.get::<String, _>("id")).collect();
        let mut participants = self.fetch_participants(&ids).await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let bill_participants = participants.remove(&id).unwrap_or_default();
                bill_from_row(row, bill_participants)
            })
            .collect()
    }

    async fn update_participant_status(
        &self,
        participant_id: &ParticipantId,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE participants SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(participant_id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(participant_id = %participant_id, "Status update matched no participant");
        }
        Ok(())
    }

    async fn update_bill_status(
        &self,
        bill_id: &BillId,
        status: BillStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE bills SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().timestamp_millis())
            .bind(bill_id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(bill_id = %bill_id, "Status update matched no bill");
        }
        Ok(())
    }

    async fn touch_bill(
        &self,
        bill_id: &BillId,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE bills SET updated_at = ? WHERE id = ?")
            .bind(updated_at.timestamp_millis())
            .bind(bill_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO bills (id, title, total_amount_paise, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(bill.id.as_str())
        .bind(bill.title.as_str())
        .bind(bill.total_amount_paise)
        .bind(bill.status.as_str())
        .bind(bill.created_at.timestamp_millis())
        .bind(bill.updated_at.timestamp_millis())
        .execute(&mut *tx)
        .await?;

        for (position, participant) in bill.participants.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO participants (id, bill_id, position, name, phone, amount_paise, status)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(participant.id.as_str())
            .bind(bill.id.as_str())
            .bind(position as i64)
            .bind(participant.name.as_str())
            .bind(participant.phone.as_deref())
            .bind(participant.amount_paise)
            .bind(participant.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::domain::NewParticipant;
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("bills.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn share(name: &str, amount_paise: i64) -> NewParticipant {
        NewParticipant {
            name: name.to_string(),
            phone: None,
            amount_paise,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_roundtrip() {
        let (repo, _temp) = setup().await;
        let mut bill = Bill::new(
            "Goa trip",
            vec![share("Asha", 1500), share("Ravi", 2500), share("Meera", 1000)],
        );
        bill.participants[1].phone = Some("9876543210".to_string());
        repo.insert_bill(&bill).await.unwrap();

        let loaded = repo.get_bill_by_id(&bill.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, bill.id);
        assert_eq!(loaded.title, "Goa trip");
        assert_eq!(loaded.total_amount_paise, 5000);
        assert_eq!(loaded.status, BillStatus::Active);
        assert_eq!(loaded.participants, bill.participants);
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            bill.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_missing_bill_is_none() {
        let (repo, _temp) = setup().await;
        let loaded = repo.get_bill_by_id(&BillId::new("nope")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_status_updates() {
        let (repo, _temp) = setup().await;
        let bill = Bill::new("Lunch", vec![share("Asha", 500), share("Ravi", 500)]);
        repo.insert_bill(&bill).await.unwrap();

        let asha = bill.participants[0].id.clone();
        repo.update_participant_status(&asha, PaymentStatus::Paid)
            .await
            .unwrap();
        repo.update_bill_status(&bill.id, BillStatus::Settled)
            .await
            .unwrap();

        let loaded = repo.get_bill_by_id(&bill.id).await.unwrap().unwrap();
        assert_eq!(loaded.participants[0].status, PaymentStatus::Paid);
        assert_eq!(loaded.participants[1].status, PaymentStatus::Pending);
        assert_eq!(loaded.status, BillStatus::Settled);
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[tokio::test]
    async fn test_touch_bill_persists_updated_at() {
        let (repo, _temp) = setup().await;
        let bill = Bill::new("Lunch", vec![share("Asha", 500)]);
        repo.insert_bill(&bill).await.unwrap();

        let later = bill.updated_at + chrono::Duration::seconds(90);
        repo.touch_bill(&bill.id, later).await.unwrap();

        let loaded = repo.get_bill_by_id(&bill.id).await.unwrap().unwrap();
        assert_eq!(
            loaded.updated_at.timestamp_millis(),
            later.timestamp_millis()
        );
        assert_eq!(loaded.status, BillStatus::Active);
    }

    #[tokio::test]
    async fn test_updates_for_unknown_ids_are_no_ops() {
        let (repo, _temp) = setup().await;
        repo.update_participant_status(&ParticipantId::new("ghost"), PaymentStatus::Paid)
            .await
            .unwrap();
        repo.update_bill_status(&BillId::new("ghost"), BillStatus::Deleted)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_all_bills_groups_participants() {
        let (repo, _temp) = setup().await;
        let first = Bill::new("First", vec![share("Asha", 100)]);
        let second = Bill::new("Second", vec![share("Ravi", 200), share("Meera", 300)]);
        repo.insert_bill(&first).await.unwrap();
        repo.insert_bill(&second).await.unwrap();

        let bills = repo.get_all_bills().await.unwrap();
        assert_eq!(bills.len(), 2);
        let second_loaded = bills.iter().find(|b| b.id == second.id).unwrap();
        assert_eq!(second_loaded.participants.len(), 2);
        assert_eq!(second_loaded.participants[0].name, "Ravi");
        let first_loaded = bills.iter().find(|b| b.id == first.id).unwrap();
        assert_eq!(first_loaded.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails_atomically() {
        let (repo, _temp) = setup().await;
        let bill = Bill::new("Once", vec![share("Asha", 100)]);
        repo.insert_bill(&bill).await.unwrap();
        assert!(matches!(
            repo.insert_bill(&bill).await,
            Err(StoreError::Database(_))
        ));

        let bills = repo.get_all_bills().await.unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].participants.len(), 1);
    }
}
