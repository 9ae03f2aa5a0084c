use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::animal::{Animal, AnimalValidationError};
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::AnimalStorage;

/// Repository for animal records
#[derive(Clone)]
pub struct AnimalRepository {
    db: DbConnection,
}

impl AnimalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Animal> {
        let gender: String = row.get("gender");
        Ok(Animal {
            id: row.get("id"),
            nfc_id: row.get("nfc_id"),
            name: row.get("name"),
            birthdate: row.get("birthdate"),
            race: row.get("race"),
            gender: gender
                .parse()
                .map_err(|e: String| anyhow!("Corrupt animal row: {}", e))?,
            owner_id: row.get("owner_id"),
            is_lost: row.get("is_lost"),
            lost_since: row.get("lost_since"),
            lost_notes: row.get("lost_notes"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

const ANIMAL_COLUMNS: &str = "id, nfc_id, name, birthdate, race, gender, owner_id, is_lost, lost_since, lost_notes, created_at, updated_at";

#[async_trait]
impl AnimalStorage for AnimalRepository {
    async fn store_animal(&self, animal: &Animal) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO animals (id, nfc_id, name, birthdate, race, gender, owner_id, is_lost, lost_since, lost_notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&animal.id)
        .bind(&animal.nfc_id)
        .bind(&animal.name)
        .bind(&animal.birthdate)
        .bind(&animal.race)
        .bind(animal.gender.as_str())
        .bind(&animal.owner_id)
        .bind(animal.is_lost)
        .bind(&animal.lost_since)
        .bind(&animal.lost_notes)
        .bind(&animal.created_at)
        .bind(&animal.updated_at)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique index on nfc_id caught a concurrent registration
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AnimalValidationError::DuplicateNfcId.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM animals WHERE id = ?",
            ANIMAL_COLUMNS
        ))
        .bind(animal_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_animal_by_nfc(&self, nfc_id: &str) -> Result<Option<Animal>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM animals WHERE nfc_id = ?",
            ANIMAL_COLUMNS
        ))
        .bind(nfc_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::map_row(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_animals_by_owner(&self, owner_id: &str) -> Result<Vec<Animal>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM animals WHERE owner_id = ? ORDER BY name ASC",
            ANIMAL_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_lost_animals(&self) -> Result<Vec<Animal>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM animals WHERE is_lost = TRUE ORDER BY lost_since DESC",
            ANIMAL_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_lost_status(
        &self,
        animal_id: &str,
        is_lost: bool,
        lost_since: Option<&str>,
        lost_notes: Option<&str>,
        updated_at: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE animals
            SET is_lost = ?, lost_since = ?, lost_notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(is_lost)
        .bind(lost_since)
        .bind(lost_notes)
        .bind(updated_at)
        .bind(animal_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Animal not found: {}", animal_id));
        }
        Ok(())
    }
}
