use serde::{Deserialize, Serialize};

/// Animal ID in format: "animal::<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    /// Identifier read from the animal's NFC tag (unique per animal)
    pub nfc_id: String,
    pub name: String,
    /// Birthdate in YYYY-MM-DD format
    pub birthdate: String,
    /// Breed/race label as entered at registration
    pub race: String,
    pub gender: Gender,
    /// ID of the user currently holding legal ownership
    pub owner_id: String,
    /// Whether the animal is currently reported lost
    pub is_lost: bool,
    /// When the animal was reported lost (RFC 3339); present iff `is_lost`
    pub lost_since: Option<String>,
    /// Free-text note supplied when the animal was reported lost
    pub lost_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Lifecycle status of an ownership transfer request.
///
/// `Pending` is the only state that permits a transition; the other three
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

/// Transfer request ID in format: "transfer::<animal_id>_<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipTransferRequest {
    pub id: String,
    pub animal_id: String,
    /// The owner at the time the request was made
    pub current_owner_id: String,
    /// The prospective new owner who must accept or reject
    pub new_owner_id: String,
    pub status: TransferStatus,
    /// When the request was created (RFC 3339)
    pub requested_at: String,
    /// When the request reached a terminal status (RFC 3339); absent while pending
    pub responded_at: Option<String>,
    /// Optional note from the requesting owner
    pub notes: Option<String>,
}

/// A transfer request joined with the animal it concerns, for list screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub transfer: OwnershipTransferRequest,
    pub animal: Animal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAnimalRequest {
    pub nfc_id: String,
    pub name: String,
    /// Birthdate in YYYY-MM-DD format
    pub birthdate: String,
    pub race: String,
    pub gender: Gender,
    /// ID of the registering user, who becomes the first owner
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalResponse {
    pub animal: Animal,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalListResponse {
    pub animals: Vec<Animal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTransferRequest {
    pub animal_id: String,
    /// Must match the animal's current owner
    pub current_owner_id: String,
    pub new_owner_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub transfer: OwnershipTransferRequest,
    pub success_message: String,
}

/// Body for accept/reject/cancel actions on a transfer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferActionRequest {
    /// The user performing the action
    pub actor_id: String,
}

/// Outcome of an accept/reject/cancel action.
///
/// `success: false` means another device resolved the transfer first; the
/// caller should refresh its view rather than retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferActionResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferListResponse {
    pub transfers: Vec<TransferDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTransferResponse {
    pub transfer: Option<TransferDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAsLostRequest {
    pub notes: Option<String>,
}

/// Badge summary for the transfers tab, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferNotificationsResponse {
    pub has_pending_transfers: bool,
    pub pending_count: u32,
}
