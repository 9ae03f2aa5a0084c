//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work with different
//! backends without modification. The SQLite repositories implement these;
//! tests and future backends can substitute their own.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::animal::Animal;
use crate::backend::domain::models::transfer::{OwnershipTransferRequest, TransferStatus};

/// Trait defining the interface for animal storage operations
#[async_trait]
pub trait AnimalStorage: Send + Sync {
    /// Store a newly registered animal
    async fn store_animal(&self, animal: &Animal) -> Result<()>;

    /// Retrieve a specific animal by ID
    async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>>;

    /// Retrieve an animal by its NFC tag id (unique)
    async fn get_animal_by_nfc(&self, nfc_id: &str) -> Result<Option<Animal>>;

    /// List all animals owned by a user, ordered by name
    async fn list_animals_by_owner(&self, owner_id: &str) -> Result<Vec<Animal>>;

    /// List all animals currently flagged lost, most recently lost first
    async fn list_lost_animals(&self) -> Result<Vec<Animal>>;

    /// Write the lost-status fields of an animal as one unit.
    /// `lost_since` and `lost_notes` must both be present or both absent
    /// according to `is_lost`; clearing writes NULL, not empty strings.
    async fn update_lost_status(
        &self,
        animal_id: &str,
        is_lost: bool,
        lost_since: Option<&str>,
        lost_notes: Option<&str>,
        updated_at: &str,
    ) -> Result<()>;
}

/// Trait defining the interface for ownership transfer request storage.
///
/// Transfer rows are append-only: `insert_transfer` is the only insertion
/// path and `resolve_transfer` the only mutation path. Nothing deletes rows.
#[async_trait]
pub trait TransferStorage: Send + Sync {
    /// Insert a new pending transfer request.
    ///
    /// The backing store must enforce at most one pending request per
    /// animal and surface a violation as
    /// `TransferPolicyError::TransferAlreadyPending`, so two racing
    /// requesters cannot both succeed.
    async fn insert_transfer(&self, transfer: &OwnershipTransferRequest) -> Result<()>;

    /// Retrieve a specific transfer request by ID
    async fn get_transfer(&self, transfer_id: &str) -> Result<Option<OwnershipTransferRequest>>;

    /// The pending request for an animal, if any (terminal rows excluded)
    async fn get_pending_transfer_for_animal(
        &self,
        animal_id: &str,
    ) -> Result<Option<OwnershipTransferRequest>>;

    /// Pending requests naming the user as new owner, newest first
    async fn list_pending_transfers_for_new_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<OwnershipTransferRequest>>;

    /// All requests created by the user as current owner, any status, newest first
    async fn list_transfers_by_current_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<OwnershipTransferRequest>>;

    /// Number of pending requests naming the user as new owner
    async fn count_pending_for_new_owner(&self, user_id: &str) -> Result<u32>;

    /// Atomic compare-and-transition on a transfer request.
    ///
    /// In a single transaction: flip `status` from `expected` to `next` and
    /// set `responded_at`, and, when `new_owner` is given, write it as the
    /// animal's owner. Returns `false` without changing anything if the
    /// current status no longer matches `expected` (another device resolved
    /// the request first). This is the only code path that writes
    /// `animals.owner_id`.
    async fn resolve_transfer(
        &self,
        transfer_id: &str,
        expected: TransferStatus,
        next: TransferStatus,
        responded_at: &str,
        new_owner: Option<&str>,
    ) -> Result<bool>;
}
