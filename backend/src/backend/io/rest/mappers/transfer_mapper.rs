use crate::backend::domain::commands::transfers::RequestTransferCommand;
use crate::backend::domain::models::transfer::{
    OwnershipTransferRequest as DomainTransfer, TransferDetails as DomainTransferDetails,
    TransferStatus as DomainTransferStatus,
};
use crate::backend::io::rest::mappers::animal_mapper::AnimalMapper;
use shared::{
    OwnershipTransferRequest as SharedTransfer, RequestTransferRequest,
    TransferDetails as SharedTransferDetails, TransferStatus as SharedTransferStatus,
};

/// Mapper to convert between shared transfer DTOs and domain transfer models.
pub struct TransferMapper;

impl TransferMapper {
    /// Converts a domain transfer request to a shared DTO.
    pub fn to_dto(domain: DomainTransfer) -> SharedTransfer {
        SharedTransfer {
            id: domain.id,
            animal_id: domain.animal_id,
            current_owner_id: domain.current_owner_id,
            new_owner_id: domain.new_owner_id,
            status: Self::status_to_dto(domain.status),
            requested_at: domain.requested_at,
            responded_at: domain.responded_at,
            notes: domain.notes,
        }
    }

    pub fn details_to_dto(domain: DomainTransferDetails) -> SharedTransferDetails {
        SharedTransferDetails {
            transfer: Self::to_dto(domain.transfer),
            animal: AnimalMapper::to_dto(domain.animal),
        }
    }

    pub fn details_to_dto_list(details: Vec<DomainTransferDetails>) -> Vec<SharedTransferDetails> {
        details.into_iter().map(Self::details_to_dto).collect()
    }

    /// Converts a transfer-request DTO to the internal command.
    pub fn to_request_command(dto: RequestTransferRequest) -> RequestTransferCommand {
        RequestTransferCommand {
            animal_id: dto.animal_id,
            current_owner_id: dto.current_owner_id,
            new_owner_id: dto.new_owner_id,
            notes: dto.notes,
        }
    }

    pub fn status_to_dto(status: DomainTransferStatus) -> SharedTransferStatus {
        match status {
            DomainTransferStatus::Pending => SharedTransferStatus::Pending,
            DomainTransferStatus::Accepted => SharedTransferStatus::Accepted,
            DomainTransferStatus::Rejected => SharedTransferStatus::Rejected,
            DomainTransferStatus::Cancelled => SharedTransferStatus::Cancelled,
        }
    }
}
