use crate::backend::domain::commands::animals::RegisterAnimalCommand;
use crate::backend::domain::models::animal::{Animal as DomainAnimal, Gender as DomainGender};
use shared::{Animal as SharedAnimal, Gender as SharedGender, RegisterAnimalRequest};

/// Mapper to convert between shared Animal DTOs and domain Animal models.
pub struct AnimalMapper;

impl AnimalMapper {
    /// Converts a domain Animal model to a shared Animal DTO.
    pub fn to_dto(domain: DomainAnimal) -> SharedAnimal {
        SharedAnimal {
            id: domain.id,
            nfc_id: domain.nfc_id,
            name: domain.name,
            birthdate: domain.birthdate,
            race: domain.race,
            gender: Self::gender_to_dto(domain.gender),
            owner_id: domain.owner_id,
            is_lost: domain.is_lost,
            lost_since: domain.lost_since,
            lost_notes: domain.lost_notes,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(animals: Vec<DomainAnimal>) -> Vec<SharedAnimal> {
        animals.into_iter().map(Self::to_dto).collect()
    }

    /// Converts a registration DTO to the internal command.
    pub fn to_register_command(dto: RegisterAnimalRequest) -> RegisterAnimalCommand {
        RegisterAnimalCommand {
            nfc_id: dto.nfc_id,
            name: dto.name,
            birthdate: dto.birthdate,
            race: dto.race,
            gender: Self::gender_to_domain(dto.gender),
            owner_id: dto.owner_id,
        }
    }

    pub fn gender_to_dto(gender: DomainGender) -> SharedGender {
        match gender {
            DomainGender::Male => SharedGender::Male,
            DomainGender::Female => SharedGender::Female,
        }
    }

    pub fn gender_to_domain(gender: SharedGender) -> DomainGender {
        match gender {
            SharedGender::Male => DomainGender::Male,
            SharedGender::Female => DomainGender::Female,
        }
    }
}
