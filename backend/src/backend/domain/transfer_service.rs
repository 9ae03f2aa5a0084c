//! Ownership transfer engine.
//!
//! Orchestrates the lifecycle of transfer requests: request, accept, reject,
//! cancel, plus the read projections the UI builds its banners and lists
//! from. Policy checks run before any store mutation; the mutations
//! themselves go through the storage layer's atomic primitives, which are
//! the authority under concurrent access from two devices. This service is
//! the only caller of the owner-mutating transition; no other code path
//! writes `owner_id`.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::transfers::RequestTransferCommand;
use crate::backend::domain::models::transfer::{
    OwnershipTransferRequest, TransferDetails, TransferPolicyError, TransferStatus,
};
use crate::backend::domain::transfer_policy;
use crate::backend::storage::traits::{AnimalStorage, TransferStorage};

#[derive(Clone)]
pub struct TransferService {
    animals: Arc<dyn AnimalStorage>,
    transfers: Arc<dyn TransferStorage>,
}

impl TransferService {
    pub fn new(animals: Arc<dyn AnimalStorage>, transfers: Arc<dyn TransferStorage>) -> Self {
        Self { animals, transfers }
    }

    /// Open a transfer request for an animal.
    ///
    /// Fails with a policy error before anything is written when the
    /// requester is not the owner, the target is the owner themselves, or a
    /// pending request already exists. Two devices racing past the pending
    /// check are serialized by the store's uniqueness constraint; the loser
    /// gets [`TransferPolicyError::TransferAlreadyPending`].
    pub async fn request_transfer(
        &self,
        command: RequestTransferCommand,
    ) -> Result<OwnershipTransferRequest> {
        info!(
            "Transfer requested: animal={} from={} to={}",
            command.animal_id, command.current_owner_id, command.new_owner_id
        );

        let animal = self
            .animals
            .get_animal(&command.animal_id)
            .await?
            .ok_or_else(|| anyhow!("Animal not found: {}", command.animal_id))?;
        let existing = self
            .transfers
            .get_pending_transfer_for_animal(&command.animal_id)
            .await?;
        transfer_policy::can_request(
            &animal,
            &command.current_owner_id,
            &command.new_owner_id,
            existing.as_ref(),
        )?;

        let now = Utc::now();
        let transfer = OwnershipTransferRequest {
            id: OwnershipTransferRequest::generate_id(
                &command.animal_id,
                now.timestamp_millis() as u64,
            ),
            animal_id: command.animal_id,
            current_owner_id: command.current_owner_id,
            new_owner_id: command.new_owner_id,
            status: TransferStatus::Pending,
            requested_at: now.to_rfc3339(),
            responded_at: None,
            notes: command.notes,
        };

        self.transfers.insert_transfer(&transfer).await?;

        info!("Created transfer request {}", transfer.id);
        Ok(transfer)
    }

    /// Accept a pending transfer as the prospective new owner.
    ///
    /// On success the status flip and the ownership change commit together.
    /// Returns `Ok(false)` when another device resolved the request first;
    /// callers should refresh their view rather than retry.
    pub async fn accept_transfer(&self, transfer_id: &str, actor_id: &str) -> Result<bool> {
        let transfer = self.get_required(transfer_id).await?;

        match transfer_policy::can_accept(&transfer, actor_id) {
            Ok(()) => {}
            // Already resolved is the expected race outcome, not a failure
            Err(TransferPolicyError::NotPending) => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let responded_at = Utc::now().to_rfc3339();
        let applied = self
            .transfers
            .resolve_transfer(
                transfer_id,
                TransferStatus::Pending,
                TransferStatus::Accepted,
                &responded_at,
                Some(&transfer.new_owner_id),
            )
            .await?;

        if applied {
            info!(
                "Transfer {} accepted: {} now owns {}",
                transfer_id, transfer.new_owner_id, transfer.animal_id
            );
        } else {
            warn!("Transfer {} was resolved by another device", transfer_id);
        }
        Ok(applied)
    }

    /// Reject a pending transfer as the prospective new owner.
    /// Ownership does not change. Same race semantics as accept.
    pub async fn reject_transfer(&self, transfer_id: &str, actor_id: &str) -> Result<bool> {
        let transfer = self.get_required(transfer_id).await?;

        match transfer_policy::can_reject(&transfer, actor_id) {
            Ok(()) => {}
            Err(TransferPolicyError::NotPending) => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let responded_at = Utc::now().to_rfc3339();
        let applied = self
            .transfers
            .resolve_transfer(
                transfer_id,
                TransferStatus::Pending,
                TransferStatus::Rejected,
                &responded_at,
                None,
            )
            .await?;

        if applied {
            info!("Transfer {} rejected by {}", transfer_id, actor_id);
        }
        Ok(applied)
    }

    /// Withdraw a pending transfer as the requesting current owner.
    pub async fn cancel_transfer(&self, transfer_id: &str, actor_id: &str) -> Result<bool> {
        let transfer = self.get_required(transfer_id).await?;

        match transfer_policy::can_cancel(&transfer, actor_id) {
            Ok(()) => {}
            Err(TransferPolicyError::NotPending) => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let responded_at = Utc::now().to_rfc3339();
        let applied = self
            .transfers
            .resolve_transfer(
                transfer_id,
                TransferStatus::Pending,
                TransferStatus::Cancelled,
                &responded_at,
                None,
            )
            .await?;

        if applied {
            info!("Transfer {} cancelled by {}", transfer_id, actor_id);
        }
        Ok(applied)
    }

    /// The pending transfer for an animal, if any, for the detail banner
    pub async fn get_pending_transfer_for_animal(
        &self,
        animal_id: &str,
    ) -> Result<Option<TransferDetails>> {
        match self
            .transfers
            .get_pending_transfer_for_animal(animal_id)
            .await?
        {
            Some(transfer) => Ok(Some(self.with_details(transfer).await?)),
            None => Ok(None),
        }
    }

    /// Incoming pending transfers for a user, newest first
    pub async fn get_pending_transfers_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TransferDetails>> {
        let transfers = self
            .transfers
            .list_pending_transfers_for_new_owner(user_id)
            .await?;
        self.collect_details(transfers).await
    }

    /// All transfers a user has requested as current owner, any status,
    /// newest first
    pub async fn get_transfer_requests_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TransferDetails>> {
        let transfers = self
            .transfers
            .list_transfers_by_current_owner(user_id)
            .await?;
        self.collect_details(transfers).await
    }

    async fn get_required(&self, transfer_id: &str) -> Result<OwnershipTransferRequest> {
        self.transfers
            .get_transfer(transfer_id)
            .await?
            .ok_or_else(|| anyhow!("Transfer request not found: {}", transfer_id))
    }

    async fn with_details(&self, transfer: OwnershipTransferRequest) -> Result<TransferDetails> {
        let animal = self
            .animals
            .get_animal(&transfer.animal_id)
            .await?
            .ok_or_else(|| anyhow!("Animal not found: {}", transfer.animal_id))?;
        Ok(TransferDetails { transfer, animal })
    }

    async fn collect_details(
        &self,
        transfers: Vec<OwnershipTransferRequest>,
    ) -> Result<Vec<TransferDetails>> {
        let mut details = Vec::with_capacity(transfers.len());
        for transfer in transfers {
            details.push(self.with_details(transfer).await?);
        }
        Ok(details)
    }
}
