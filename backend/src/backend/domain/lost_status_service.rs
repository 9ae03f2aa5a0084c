//! Lost/found status management.
//!
//! The lost flag is deliberately orthogonal to ownership transfers: a lost
//! animal can be transferred, and an accepted transfer does not clear the
//! flag. Marking found is the only path that clears it.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::backend::domain::models::animal::Animal;
use crate::backend::storage::traits::AnimalStorage;

#[derive(Clone)]
pub struct LostStatusService {
    animals: Arc<dyn AnimalStorage>,
}

impl LostStatusService {
    pub fn new(animals: Arc<dyn AnimalStorage>) -> Self {
        Self { animals }
    }

    /// Flag an animal as lost.
    ///
    /// Calling this on an already-lost animal is a no-op success returning
    /// the current record; the original report keeps its timestamp and notes.
    pub async fn mark_as_lost(&self, animal_id: &str, notes: Option<String>) -> Result<Animal> {
        let mut animal = self.get_required(animal_id).await?;

        if animal.is_lost {
            info!("Animal {} is already flagged lost", animal_id);
            return Ok(animal);
        }

        let now = Utc::now().to_rfc3339();
        self.animals
            .update_lost_status(animal_id, true, Some(&now), notes.as_deref(), &now)
            .await?;

        info!("Animal {} reported lost", animal_id);

        animal.is_lost = true;
        animal.lost_since = Some(now.clone());
        animal.lost_notes = notes;
        animal.updated_at = now;
        Ok(animal)
    }

    /// Clear an animal's lost flag.
    ///
    /// `lost_since` and `lost_notes` become absent again, so a found animal
    /// is indistinguishable from one that was never lost.
    pub async fn mark_as_found(&self, animal_id: &str) -> Result<Animal> {
        let mut animal = self.get_required(animal_id).await?;

        if !animal.is_lost {
            return Ok(animal);
        }

        let now = Utc::now().to_rfc3339();
        self.animals
            .update_lost_status(animal_id, false, None, None, &now)
            .await?;

        info!("Animal {} reported found", animal_id);

        animal.is_lost = false;
        animal.lost_since = None;
        animal.lost_notes = None;
        animal.updated_at = now;
        Ok(animal)
    }

    /// All animals currently flagged lost, most recently lost first
    pub async fn list_lost_animals(&self) -> Result<Vec<Animal>> {
        self.animals.list_lost_animals().await
    }

    async fn get_required(&self, animal_id: &str) -> Result<Animal> {
        self.animals
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| anyhow!("Animal not found: {}", animal_id))
    }
}
