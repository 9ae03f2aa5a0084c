use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A registered companion animal.
///
/// `owner_id` is authoritative for legal ownership and is only ever written
/// by the transfer service's atomic transition. The three lost-status fields
/// move together: `lost_since` is present iff `is_lost`, and both it and
/// `lost_notes` are cleared (absent, not empty) when the animal is found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    pub nfc_id: String,
    pub name: String,
    /// Birthdate in YYYY-MM-DD format
    pub birthdate: String,
    pub race: String,
    pub gender: Gender,
    pub owner_id: String,
    pub is_lost: bool,
    pub lost_since: Option<String>,
    pub lost_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Animal {
    pub fn generate_id(now_millis: u64) -> String {
        format!("animal::{}", now_millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// String tag used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender tag: {}", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnimalValidationError {
    #[error("Animal name cannot be empty")]
    EmptyName,
    #[error("Animal name cannot exceed 100 characters")]
    NameTooLong,
    #[error("NFC tag id cannot be empty")]
    EmptyNfcId,
    #[error("Race cannot be empty")]
    EmptyRace,
    #[error("An animal with this NFC tag id is already registered")]
    DuplicateNfcId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_roundtrip() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(Gender::Male.as_str(), "male");
        assert_eq!(Gender::Female.as_str(), "female");
        assert!("MALE".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_generate_id() {
        assert_eq!(Animal::generate_id(1702516122000), "animal::1702516122000");
    }
}
