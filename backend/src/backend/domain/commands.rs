//! Domain-level command types
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod animals {
    use crate::backend::domain::models::animal::Gender;

    /// Input for registering a new animal.
    #[derive(Debug, Clone)]
    pub struct RegisterAnimalCommand {
        pub nfc_id: String,
        pub name: String,
        pub birthdate: String,
        pub race: String,
        pub gender: Gender,
        pub owner_id: String,
    }
}

pub mod transfers {
    /// Input for opening an ownership transfer request.
    #[derive(Debug, Clone)]
    pub struct RequestTransferCommand {
        pub animal_id: String,
        pub current_owner_id: String,
        pub new_owner_id: String,
        pub notes: Option<String>,
    }
}
