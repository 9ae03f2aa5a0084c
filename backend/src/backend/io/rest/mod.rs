//! # REST API Interface Layer
//!
//! HTTP endpoints for the animal registry. This layer only translates:
//! JSON in, domain commands through the services, typed errors out as HTTP
//! statuses. No business logic lives here.

pub mod animal_apis;
pub mod mappers;
pub mod notification_apis;
pub mod transfer_apis;

use axum::http::StatusCode;

use crate::backend::domain::models::animal::AnimalValidationError;
use crate::backend::domain::models::transfer::TransferPolicyError;

/// Translate a domain error into the HTTP status the UI keys its
/// retry/refresh/terminal-message decision on. Every error kind maps to a
/// specific status; only genuine infrastructure failures fall through to 500.
pub(crate) fn domain_error_status(e: &anyhow::Error) -> StatusCode {
    if let Some(policy) = e.downcast_ref::<TransferPolicyError>() {
        return match policy {
            TransferPolicyError::NotOwner | TransferPolicyError::NotAuthorized => {
                StatusCode::FORBIDDEN
            }
            TransferPolicyError::SelfTransfer => StatusCode::BAD_REQUEST,
            TransferPolicyError::TransferAlreadyPending | TransferPolicyError::NotPending => {
                StatusCode::CONFLICT
            }
        };
    }
    if let Some(validation) = e.downcast_ref::<AnimalValidationError>() {
        return match validation {
            AnimalValidationError::DuplicateNfcId => StatusCode::CONFLICT,
            AnimalValidationError::EmptyName
            | AnimalValidationError::NameTooLong
            | AnimalValidationError::EmptyNfcId
            | AnimalValidationError::EmptyRace => StatusCode::BAD_REQUEST,
        };
    }
    if e.to_string().contains("not found") {
        return StatusCode::NOT_FOUND;
    }
    StatusCode::INTERNAL_SERVER_ERROR
}
