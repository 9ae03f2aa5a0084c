use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::animals::RegisterAnimalCommand;
use crate::backend::domain::models::animal::{Animal, AnimalValidationError};
use crate::backend::storage::traits::AnimalStorage;

/// Service for registering and looking up animals
#[derive(Clone)]
pub struct AnimalService {
    animals: Arc<dyn AnimalStorage>,
}

impl AnimalService {
    /// Create a new AnimalService
    pub fn new(animals: Arc<dyn AnimalStorage>) -> Self {
        Self { animals }
    }

    /// Register a new animal; the registering user becomes the first owner
    pub async fn register_animal(&self, command: RegisterAnimalCommand) -> Result<Animal> {
        info!(
            "Registering animal: name={}, nfc_id={}, owner={}",
            command.name, command.nfc_id, command.owner_id
        );

        self.validate_register_command(&command)?;

        // Advisory duplicate check for a readable error; the unique index on
        // nfc_id remains the authority under concurrent registrations
        if self
            .animals
            .get_animal_by_nfc(&command.nfc_id)
            .await?
            .is_some()
        {
            return Err(AnimalValidationError::DuplicateNfcId.into());
        }

        let now = Utc::now();
        let animal = Animal {
            id: Animal::generate_id(now.timestamp_millis() as u64),
            nfc_id: command.nfc_id.trim().to_string(),
            name: command.name.trim().to_string(),
            birthdate: command.birthdate,
            race: command.race.trim().to_string(),
            gender: command.gender,
            owner_id: command.owner_id,
            is_lost: false,
            lost_since: None,
            lost_notes: None,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };

        self.animals.store_animal(&animal).await?;

        info!("Registered animal: {} with ID: {}", animal.name, animal.id);
        Ok(animal)
    }

    /// Get an animal by ID
    pub async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>> {
        let animal = self.animals.get_animal(animal_id).await?;

        if animal.is_none() {
            warn!("Animal not found: {}", animal_id);
        }

        Ok(animal)
    }

    /// Look up an animal by its NFC tag id
    pub async fn find_by_nfc(&self, nfc_id: &str) -> Result<Option<Animal>> {
        info!("Looking up animal by NFC tag: {}", nfc_id);
        self.animals.get_animal_by_nfc(nfc_id).await
    }

    /// List all animals owned by a user
    pub async fn list_animals_by_owner(&self, owner_id: &str) -> Result<Vec<Animal>> {
        let animals = self.animals.list_animals_by_owner(owner_id).await?;
        info!("Found {} animals for owner {}", animals.len(), owner_id);
        Ok(animals)
    }

    /// Validate a registration command
    fn validate_register_command(&self, command: &RegisterAnimalCommand) -> Result<()> {
        if command.name.trim().is_empty() {
            return Err(AnimalValidationError::EmptyName.into());
        }
        if command.name.len() > 100 {
            return Err(AnimalValidationError::NameTooLong.into());
        }
        if command.nfc_id.trim().is_empty() {
            return Err(AnimalValidationError::EmptyNfcId.into());
        }
        if command.race.trim().is_empty() {
            return Err(AnimalValidationError::EmptyRace.into());
        }
        self.validate_birthdate(&command.birthdate)?;
        Ok(())
    }

    /// Validate birthdate format (YYYY-MM-DD)
    fn validate_birthdate(&self, birthdate: &str) -> Result<()> {
        if birthdate.len() != 10 {
            return Err(anyhow!("Birthdate must be in YYYY-MM-DD format"));
        }

        let parts: Vec<&str> = birthdate.split('-').collect();
        if parts.len() != 3 {
            return Err(anyhow!("Birthdate must be in YYYY-MM-DD format"));
        }

        let year: u32 = parts[0]
            .parse()
            .map_err(|_| anyhow!("Invalid year in birthdate"))?;
        if !(1900..=2100).contains(&year) {
            return Err(anyhow!("Year must be between 1900 and 2100"));
        }

        let month: u32 = parts[1]
            .parse()
            .map_err(|_| anyhow!("Invalid month in birthdate"))?;
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Month must be between 1 and 12"));
        }

        let day: u32 = parts[2]
            .parse()
            .map_err(|_| anyhow!("Invalid day in birthdate"))?;
        if !(1..=31).contains(&day) {
            return Err(anyhow!("Day must be between 1 and 31"));
        }

        match month {
            2 => {
                let is_leap = (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0);
                let max_day = if is_leap { 29 } else { 28 };
                if day > max_day {
                    return Err(anyhow!("Invalid day for February"));
                }
            }
            4 | 6 | 9 | 11 => {
                if day > 30 {
                    return Err(anyhow!("Invalid day for month {}", month));
                }
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::animal::Gender;
    use crate::backend::storage::sqlite::connection::DbConnection;
    use crate::backend::storage::sqlite::repositories::AnimalRepository;

    async fn setup_test() -> AnimalService {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        AnimalService::new(Arc::new(AnimalRepository::new(db)))
    }

    fn register_command(nfc_id: &str, name: &str, owner_id: &str) -> RegisterAnimalCommand {
        RegisterAnimalCommand {
            nfc_id: nfc_id.to_string(),
            name: name.to_string(),
            birthdate: "2020-05-01".to_string(),
            race: "Border Collie".to_string(),
            gender: Gender::Male,
            owner_id: owner_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_animal() {
        let service = setup_test().await;

        let animal = service
            .register_animal(register_command("nfc-1", "Rex", "user-1"))
            .await
            .expect("Failed to register animal");

        assert_eq!(animal.name, "Rex");
        assert_eq!(animal.owner_id, "user-1");
        assert!(!animal.is_lost);
        assert!(animal.lost_since.is_none());
        assert!(animal.lost_notes.is_none());
        assert!(animal.id.starts_with("animal::"));

        let retrieved = service
            .get_animal(&animal.id)
            .await
            .expect("Failed to get animal");
        assert_eq!(retrieved, Some(animal));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = setup_test().await;

        let mut command = register_command("nfc-1", "", "user-1");
        assert!(service.register_animal(command).await.is_err());

        command = register_command("nfc-1", &"x".repeat(101), "user-1");
        assert!(service.register_animal(command).await.is_err());

        command = register_command("", "Rex", "user-1");
        assert!(service.register_animal(command).await.is_err());

        command = register_command("nfc-1", "Rex", "user-1");
        command.race = "  ".to_string();
        assert!(service.register_animal(command).await.is_err());

        command = register_command("nfc-1", "Rex", "user-1");
        command.birthdate = "2020-13-01".to_string();
        assert!(service.register_animal(command).await.is_err());

        command = register_command("nfc-1", "Rex", "user-1");
        command.birthdate = "01/05/2020".to_string();
        assert!(service.register_animal(command).await.is_err());
    }

    #[tokio::test]
    async fn test_register_duplicate_nfc() {
        let service = setup_test().await;

        service
            .register_animal(register_command("nfc-1", "Rex", "user-1"))
            .await
            .expect("Failed to register animal");

        // Different timestamp so the generated IDs cannot collide
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;

        let err = service
            .register_animal(register_command("nfc-1", "Luna", "user-2"))
            .await
            .expect_err("Duplicate NFC tag should be rejected");
        assert!(matches!(
            err.downcast_ref::<AnimalValidationError>(),
            Some(AnimalValidationError::DuplicateNfcId)
        ));
    }

    #[tokio::test]
    async fn test_find_by_nfc() {
        let service = setup_test().await;

        let registered = service
            .register_animal(register_command("nfc-42", "Rex", "user-1"))
            .await
            .unwrap();

        let found = service.find_by_nfc("nfc-42").await.expect("Failed to query");
        assert_eq!(found.map(|a| a.id), Some(registered.id));

        let missing = service.find_by_nfc("nfc-none").await.expect("Failed to query");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_animals_by_owner() {
        let service = setup_test().await;

        service
            .register_animal(register_command("nfc-1", "Rex", "user-1"))
            .await
            .unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
        service
            .register_animal(register_command("nfc-2", "Luna", "user-1"))
            .await
            .unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
        service
            .register_animal(register_command("nfc-3", "Misha", "user-2"))
            .await
            .unwrap();

        let animals = service
            .list_animals_by_owner("user-1")
            .await
            .expect("Failed to list animals");
        assert_eq!(animals.len(), 2);
        // Ordered by name: Luna, Rex
        assert_eq!(animals[0].name, "Luna");
        assert_eq!(animals[1].name, "Rex");
    }
}
