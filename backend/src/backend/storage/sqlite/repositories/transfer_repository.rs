use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::transfer::{
    OwnershipTransferRequest, TransferPolicyError, TransferStatus,
};
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::TransferStorage;

/// Repository for ownership transfer requests
#[derive(Clone)]
pub struct TransferRepository {
    db: DbConnection,
}

impl TransferRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<OwnershipTransferRequest> {
        let status: String = row.get("status");
        Ok(OwnershipTransferRequest {
            id: row.get("id"),
            animal_id: row.get("animal_id"),
            current_owner_id: row.get("current_owner_id"),
            new_owner_id: row.get("new_owner_id"),
            status: status
                .parse()
                .map_err(|e: String| anyhow!("Corrupt transfer row: {}", e))?,
            requested_at: row.get("requested_at"),
            responded_at: row.get("responded_at"),
            notes: row.get("notes"),
        })
    }
}

const TRANSFER_COLUMNS: &str =
    "id, animal_id, current_owner_id, new_owner_id, status, requested_at, responded_at, notes";

#[async_trait]
impl TransferStorage for TransferRepository {
    async fn insert_transfer(&self, transfer: &OwnershipTransferRequest) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO ownership_transfer_requests (id, animal_id, current_owner_id, new_owner_id, status, requested_at, responded_at, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transfer.id)
        .bind(&transfer.animal_id)
        .bind(&transfer.current_owner_id)
        .bind(&transfer.new_owner_id)
        .bind(transfer.status.as_str())
        .bind(&transfer.requested_at)
        .bind(&transfer.responded_at)
        .bind(&transfer.notes)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            // The partial unique index caught a concurrent pending request
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(TransferPolicyError::TransferAlreadyPending.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_transfer(&self, transfer_id: &str) -> Result<Option<OwnershipTransferRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM ownership_transfer_requests WHERE id = ?",
            TRANSFER_COLUMNS
        ))
        .bind(transfer_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_pending_transfer_for_animal(
        &self,
        animal_id: &str,
    ) -> Result<Option<OwnershipTransferRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM ownership_transfer_requests WHERE animal_id = ? AND status = 'pending'",
            TRANSFER_COLUMNS
        ))
        .bind(animal_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_pending_transfers_for_new_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<OwnershipTransferRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM ownership_transfer_requests WHERE new_owner_id = ? AND status = 'pending' ORDER BY requested_at DESC",
            TRANSFER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_transfers_by_current_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<OwnershipTransferRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM ownership_transfer_requests WHERE current_owner_id = ? ORDER BY requested_at DESC",
            TRANSFER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn count_pending_for_new_owner(&self, user_id: &str) -> Result<u32> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS pending_count FROM ownership_transfer_requests WHERE new_owner_id = ? AND status = 'pending'",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        let count: i64 = row.get("pending_count");
        Ok(count as u32)
    }

    async fn resolve_transfer(
        &self,
        transfer_id: &str,
        expected: TransferStatus,
        next: TransferStatus,
        responded_at: &str,
        new_owner: Option<&str>,
    ) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        // Compare-and-set: the status check and the flip are one statement,
        // so two devices racing on the same request cannot both win.
        let result = sqlx::query(
            r#"
            UPDATE ownership_transfer_requests
            SET status = ?, responded_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(next.as_str())
        .bind(responded_at)
        .bind(transfer_id)
        .bind(expected.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(owner_id) = new_owner {
            sqlx::query(
                r#"
                UPDATE animals
                SET owner_id = ?, updated_at = ?
                WHERE id = (SELECT animal_id FROM ownership_transfer_requests WHERE id = ?)
                "#,
            )
            .bind(owner_id)
            .bind(responded_at)
            .bind(transfer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::animal::{Animal, Gender};
    use crate::backend::storage::sqlite::repositories::animal_repository::AnimalRepository;
    use crate::backend::storage::traits::AnimalStorage;

    async fn setup_test() -> (AnimalRepository, TransferRepository) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        (
            AnimalRepository::new(db.clone()),
            TransferRepository::new(db),
        )
    }

    fn test_animal(id: &str, owner_id: &str) -> Animal {
        Animal {
            id: id.to_string(),
            nfc_id: format!("nfc-{}", id),
            name: "Rex".to_string(),
            birthdate: "2020-05-01".to_string(),
            race: "Border Collie".to_string(),
            gender: Gender::Male,
            owner_id: owner_id.to_string(),
            is_lost: false,
            lost_since: None,
            lost_notes: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn test_transfer(id: &str, animal_id: &str, requested_at: &str) -> OwnershipTransferRequest {
        OwnershipTransferRequest {
            id: id.to_string(),
            animal_id: animal_id.to_string(),
            current_owner_id: "user-1".to_string(),
            new_owner_id: "user-2".to_string(),
            status: TransferStatus::Pending,
            requested_at: requested_at.to_string(),
            responded_at: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_transfer() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();

        let transfer = test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z");
        transfers.insert_transfer(&transfer).await.expect("Failed to insert transfer");

        let retrieved = transfers
            .get_transfer("transfer::1")
            .await
            .expect("Failed to get transfer")
            .expect("Transfer should exist");
        assert_eq!(retrieved, transfer);
    }

    #[tokio::test]
    async fn test_second_pending_insert_reports_conflict() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();

        transfers
            .insert_transfer(&test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z"))
            .await
            .expect("First insert should succeed");

        let err = transfers
            .insert_transfer(&test_transfer("transfer::2", "animal::1", "2025-01-02T00:00:01Z"))
            .await
            .expect_err("Second pending insert should conflict");
        assert!(matches!(
            err.downcast_ref::<TransferPolicyError>(),
            Some(TransferPolicyError::TransferAlreadyPending)
        ));
    }

    #[tokio::test]
    async fn test_pending_query_excludes_terminal_rows() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();

        transfers
            .insert_transfer(&test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z"))
            .await
            .unwrap();
        assert!(transfers
            .resolve_transfer(
                "transfer::1",
                TransferStatus::Pending,
                TransferStatus::Rejected,
                "2025-01-02T01:00:00Z",
                None,
            )
            .await
            .unwrap());

        // The rejected row is retained but no longer pending
        let pending = transfers
            .get_pending_transfer_for_animal("animal::1")
            .await
            .unwrap();
        assert!(pending.is_none());
        let historical = transfers.get_transfer("transfer::1").await.unwrap().unwrap();
        assert_eq!(historical.status, TransferStatus::Rejected);
        assert_eq!(historical.responded_at.as_deref(), Some("2025-01-02T01:00:00Z"));
    }

    #[tokio::test]
    async fn test_resolve_transfer_compare_and_set() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();
        transfers
            .insert_transfer(&test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z"))
            .await
            .unwrap();

        // Both "devices" observed the pending row; only the first flip wins
        let accepted = transfers
            .resolve_transfer(
                "transfer::1",
                TransferStatus::Pending,
                TransferStatus::Accepted,
                "2025-01-02T01:00:00Z",
                Some("user-2"),
            )
            .await
            .unwrap();
        assert!(accepted);

        let rejected = transfers
            .resolve_transfer(
                "transfer::1",
                TransferStatus::Pending,
                TransferStatus::Rejected,
                "2025-01-02T01:00:01Z",
                None,
            )
            .await
            .unwrap();
        assert!(!rejected);

        // The losing attempt must not have overwritten anything
        let row = transfers.get_transfer("transfer::1").await.unwrap().unwrap();
        assert_eq!(row.status, TransferStatus::Accepted);
        assert_eq!(row.responded_at.as_deref(), Some("2025-01-02T01:00:00Z"));
        let animal = animals.get_animal("animal::1").await.unwrap().unwrap();
        assert_eq!(animal.owner_id, "user-2");
    }

    #[tokio::test]
    async fn test_resolve_transfer_owner_write_is_part_of_transition() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();
        transfers
            .insert_transfer(&test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z"))
            .await
            .unwrap();

        // A failed compare-and-set must leave the owner untouched even when
        // an owner write was requested
        transfers
            .resolve_transfer(
                "transfer::1",
                TransferStatus::Pending,
                TransferStatus::Cancelled,
                "2025-01-02T01:00:00Z",
                None,
            )
            .await
            .unwrap();
        let lost_race = transfers
            .resolve_transfer(
                "transfer::1",
                TransferStatus::Pending,
                TransferStatus::Accepted,
                "2025-01-02T01:00:01Z",
                Some("user-2"),
            )
            .await
            .unwrap();
        assert!(!lost_race);

        let animal = animals.get_animal("animal::1").await.unwrap().unwrap();
        assert_eq!(animal.owner_id, "user-1");
    }

    #[tokio::test]
    async fn test_list_pending_for_new_owner_newest_first() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();
        animals.store_animal(&test_animal("animal::2", "user-1")).await.unwrap();

        transfers
            .insert_transfer(&test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z"))
            .await
            .unwrap();
        transfers
            .insert_transfer(&test_transfer("transfer::2", "animal::2", "2025-01-03T00:00:00Z"))
            .await
            .unwrap();

        let pending = transfers
            .list_pending_transfers_for_new_owner("user-2")
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, "transfer::2");
        assert_eq!(pending[1].id, "transfer::1");

        assert_eq!(transfers.count_pending_for_new_owner("user-2").await.unwrap(), 2);
        assert_eq!(transfers.count_pending_for_new_owner("user-3").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_by_current_owner_includes_history() {
        let (animals, transfers) = setup_test().await;
        animals.store_animal(&test_animal("animal::1", "user-1")).await.unwrap();
        animals.store_animal(&test_animal("animal::2", "user-1")).await.unwrap();

        transfers
            .insert_transfer(&test_transfer("transfer::1", "animal::1", "2025-01-02T00:00:00Z"))
            .await
            .unwrap();
        transfers
            .resolve_transfer(
                "transfer::1",
                TransferStatus::Pending,
                TransferStatus::Cancelled,
                "2025-01-02T01:00:00Z",
                None,
            )
            .await
            .unwrap();
        transfers
            .insert_transfer(&test_transfer("transfer::2", "animal::2", "2025-01-03T00:00:00Z"))
            .await
            .unwrap();

        let sent = transfers
            .list_transfers_by_current_owner("user-1")
            .await
            .unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].id, "transfer::2");
        assert_eq!(sent[1].status, TransferStatus::Cancelled);
    }
}
