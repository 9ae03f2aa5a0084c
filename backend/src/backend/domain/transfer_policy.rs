//! Pure decision logic for ownership transfers.
//!
//! Who may request, accept, reject, or cancel a transfer, and what must hold
//! before a transition is allowed. No I/O here; the transfer service runs
//! these checks before touching storage. The pending-uniqueness check is
//! advisory at this layer: under a race between devices the database's
//! partial unique index has the final word.

use crate::backend::domain::models::animal::Animal;
use crate::backend::domain::models::transfer::{
    OwnershipTransferRequest, TransferPolicyError, TransferStatus,
};

/// May `requester_id` open a transfer of `animal` to `new_owner_id`?
pub fn can_request(
    animal: &Animal,
    requester_id: &str,
    new_owner_id: &str,
    existing_pending: Option<&OwnershipTransferRequest>,
) -> Result<(), TransferPolicyError> {
    if requester_id != animal.owner_id {
        return Err(TransferPolicyError::NotOwner);
    }
    if new_owner_id == animal.owner_id {
        return Err(TransferPolicyError::SelfTransfer);
    }
    if existing_pending.is_some() {
        return Err(TransferPolicyError::TransferAlreadyPending);
    }
    Ok(())
}

/// May `actor_id` accept this transfer? Only the prospective new owner may,
/// and only while the request is still pending.
pub fn can_accept(
    transfer: &OwnershipTransferRequest,
    actor_id: &str,
) -> Result<(), TransferPolicyError> {
    if actor_id != transfer.new_owner_id {
        return Err(TransferPolicyError::NotAuthorized);
    }
    match transfer.status {
        TransferStatus::Pending => Ok(()),
        TransferStatus::Accepted | TransferStatus::Rejected | TransferStatus::Cancelled => {
            Err(TransferPolicyError::NotPending)
        }
    }
}

/// Same authorization as accept: only the prospective new owner may reject.
pub fn can_reject(
    transfer: &OwnershipTransferRequest,
    actor_id: &str,
) -> Result<(), TransferPolicyError> {
    can_accept(transfer, actor_id)
}

/// May `actor_id` withdraw this transfer? Only the requesting current owner
/// may, and only while the request is still pending.
pub fn can_cancel(
    transfer: &OwnershipTransferRequest,
    actor_id: &str,
) -> Result<(), TransferPolicyError> {
    if actor_id != transfer.current_owner_id {
        return Err(TransferPolicyError::NotAuthorized);
    }
    match transfer.status {
        TransferStatus::Pending => Ok(()),
        TransferStatus::Accepted | TransferStatus::Rejected | TransferStatus::Cancelled => {
            Err(TransferPolicyError::NotPending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::animal::Gender;

    fn test_animal(owner_id: &str) -> Animal {
        Animal {
            id: "animal::1702516122000".to_string(),
            nfc_id: "nfc-0001".to_string(),
            name: "Rex".to_string(),
            birthdate: "2020-05-01".to_string(),
            race: "Border Collie".to_string(),
            gender: Gender::Male,
            owner_id: owner_id.to_string(),
            is_lost: false,
            lost_since: None,
            lost_notes: None,
            created_at: "2023-12-14T01:02:02Z".to_string(),
            updated_at: "2023-12-14T01:02:02Z".to_string(),
        }
    }

    fn test_transfer(status: TransferStatus) -> OwnershipTransferRequest {
        OwnershipTransferRequest {
            id: "transfer::animal::1702516122000_1702516125000".to_string(),
            animal_id: "animal::1702516122000".to_string(),
            current_owner_id: "user-1".to_string(),
            new_owner_id: "user-2".to_string(),
            status,
            requested_at: "2023-12-14T01:02:05Z".to_string(),
            responded_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_can_request_happy_path() {
        let animal = test_animal("user-1");
        assert!(can_request(&animal, "user-1", "user-2", None).is_ok());
    }

    #[test]
    fn test_can_request_denies_non_owner() {
        let animal = test_animal("user-1");
        let result = can_request(&animal, "user-2", "user-3", None);
        assert!(matches!(result, Err(TransferPolicyError::NotOwner)));
    }

    #[test]
    fn test_can_request_denies_self_transfer() {
        let animal = test_animal("user-1");
        let result = can_request(&animal, "user-1", "user-1", None);
        assert!(matches!(result, Err(TransferPolicyError::SelfTransfer)));
    }

    #[test]
    fn test_can_request_denies_when_pending_exists() {
        let animal = test_animal("user-1");
        let pending = test_transfer(TransferStatus::Pending);
        let result = can_request(&animal, "user-1", "user-3", Some(&pending));
        assert!(matches!(
            result,
            Err(TransferPolicyError::TransferAlreadyPending)
        ));
    }

    #[test]
    fn test_can_accept_only_new_owner() {
        let transfer = test_transfer(TransferStatus::Pending);
        assert!(can_accept(&transfer, "user-2").is_ok());
        assert!(matches!(
            can_accept(&transfer, "user-1"),
            Err(TransferPolicyError::NotAuthorized)
        ));
        assert!(matches!(
            can_accept(&transfer, "user-3"),
            Err(TransferPolicyError::NotAuthorized)
        ));
    }

    #[test]
    fn test_can_accept_denies_resolved() {
        for status in [
            TransferStatus::Accepted,
            TransferStatus::Rejected,
            TransferStatus::Cancelled,
        ] {
            let transfer = test_transfer(status);
            assert!(matches!(
                can_accept(&transfer, "user-2"),
                Err(TransferPolicyError::NotPending)
            ));
        }
    }

    #[test]
    fn test_can_reject_mirrors_accept() {
        let transfer = test_transfer(TransferStatus::Pending);
        assert!(can_reject(&transfer, "user-2").is_ok());
        assert!(matches!(
            can_reject(&transfer, "user-1"),
            Err(TransferPolicyError::NotAuthorized)
        ));
    }

    #[test]
    fn test_can_cancel_only_current_owner() {
        let transfer = test_transfer(TransferStatus::Pending);
        assert!(can_cancel(&transfer, "user-1").is_ok());
        assert!(matches!(
            can_cancel(&transfer, "user-2"),
            Err(TransferPolicyError::NotAuthorized)
        ));
    }

    #[test]
    fn test_can_cancel_denies_resolved() {
        let transfer = test_transfer(TransferStatus::Cancelled);
        assert!(matches!(
            can_cancel(&transfer, "user-1"),
            Err(TransferPolicyError::NotPending)
        ));
    }
}
