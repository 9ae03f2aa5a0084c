use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::animal::Animal;

/// Lifecycle status of an ownership transfer request.
///
/// Stored as a string tag but always matched exhaustively, so a new status
/// cannot be added without every decision point being revisited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl TransferStatus {
    /// String tag used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Accepted => "accepted",
            TransferStatus::Rejected => "rejected",
            TransferStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states permit no further transition.
    pub fn is_terminal(&self) -> bool {
        match self {
            TransferStatus::Pending => false,
            TransferStatus::Accepted | TransferStatus::Rejected | TransferStatus::Cancelled => true,
        }
    }
}

impl FromStr for TransferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransferStatus::Pending),
            "accepted" => Ok(TransferStatus::Accepted),
            "rejected" => Ok(TransferStatus::Rejected),
            "cancelled" => Ok(TransferStatus::Cancelled),
            other => Err(format!("Unknown transfer status tag: {}", other)),
        }
    }
}

/// A request to move legal ownership of one animal to another user.
///
/// Rows are an append-only log of ownership-change intents: a request is
/// mutated exactly once (pending to a terminal status) and never deleted.
/// At most one pending request may exist per animal; the database enforces
/// this with a partial unique index, so the check survives races between
/// devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipTransferRequest {
    pub id: String,
    pub animal_id: String,
    pub current_owner_id: String,
    pub new_owner_id: String,
    pub status: TransferStatus,
    pub requested_at: String,
    /// Set at the first terminal transition, immutable afterward
    pub responded_at: Option<String>,
    pub notes: Option<String>,
}

impl OwnershipTransferRequest {
    pub fn generate_id(animal_id: &str, now_millis: u64) -> String {
        format!("transfer::{}_{}", animal_id, now_millis)
    }
}

/// A transfer request joined with its animal, for list screens and banners.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDetails {
    pub transfer: OwnershipTransferRequest,
    pub animal: Animal,
}

#[derive(Debug, thiserror::Error)]
pub enum TransferPolicyError {
    #[error("Only the current owner can request an ownership transfer")]
    NotOwner,
    #[error("An animal cannot be transferred to its current owner")]
    SelfTransfer,
    #[error("A transfer request for this animal is already pending")]
    TransferAlreadyPending,
    #[error("Not authorized to act on this transfer request")]
    NotAuthorized,
    #[error("This transfer request has already been resolved")]
    NotPending,
}
