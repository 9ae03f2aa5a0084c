pub mod animal;
pub mod transfer;
