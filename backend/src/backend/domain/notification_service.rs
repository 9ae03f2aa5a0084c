//! Badge summary for incoming transfers.
//!
//! Thin, read-only derivation over transfer storage. Both queries hit the
//! store on every call so a badge can never show a stale count; the calling
//! UI owns any polling cadence.

use anyhow::Result;
use std::sync::Arc;

use crate::backend::storage::traits::TransferStorage;

#[derive(Clone)]
pub struct NotificationService {
    transfers: Arc<dyn TransferStorage>,
}

impl NotificationService {
    pub fn new(transfers: Arc<dyn TransferStorage>) -> Self {
        Self { transfers }
    }

    /// Whether the user has any incoming pending transfers
    pub async fn has_pending_transfers(&self, user_id: &str) -> Result<bool> {
        Ok(self.pending_count(user_id).await? > 0)
    }

    /// Number of incoming pending transfers for the user
    pub async fn pending_count(&self, user_id: &str) -> Result<u32> {
        self.transfers.count_pending_for_new_owner(user_id).await
    }
}
