//! # Storage Module
//!
//! Handles all data persistence for the animal registry.
//!
//! The domain layer talks to the traits in [`traits`]; the SQLite
//! implementation lives in [`sqlite`]. Swapping the backend (another SQL
//! engine, a remote store) means implementing the two traits, nothing more.
//!
//! Two guarantees the backend must provide, because the domain layer's
//! correctness depends on them:
//!
//! - at most one pending transfer request per animal, enforced at insert
//!   time even under concurrent requesters;
//! - an atomic compare-and-transition for resolving a transfer, which is
//!   also the only code path allowed to write `animals.owner_id`.

pub mod sqlite;
pub mod traits;

// Re-export the main types that other modules need
pub use sqlite::connection::DbConnection;
pub use sqlite::repositories::{AnimalRepository, TransferRepository};
pub use traits::{AnimalStorage, TransferStorage};
