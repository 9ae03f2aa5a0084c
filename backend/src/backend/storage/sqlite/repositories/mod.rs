pub mod animal_repository;
pub mod transfer_repository;

pub use animal_repository::AnimalRepository;
pub use transfer_repository::TransferRepository;
