//! # REST API for Animal Records
//!
//! Endpoints for registering and looking up animals and for flagging an
//! animal as lost or found.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::backend::io::rest::domain_error_status;
use crate::backend::io::rest::mappers::animal_mapper::AnimalMapper;
use crate::backend::AppState;
use shared::{AnimalListResponse, AnimalResponse, MarkAsLostRequest, RegisterAnimalRequest};

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: String,
}

/// Register a new animal
pub async fn register_animal(
    State(state): State<AppState>,
    Json(request): Json<RegisterAnimalRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals - request: {:?}", request);

    let command = AnimalMapper::to_register_command(request);
    match state.animal_service.register_animal(command).await {
        Ok(animal) => (
            StatusCode::CREATED,
            Json(AnimalResponse {
                animal: AnimalMapper::to_dto(animal),
                success_message: "Animal registered successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to register animal: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Get an animal by ID
pub async fn get_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}", animal_id);

    match state.animal_service.get_animal(&animal_id).await {
        Ok(Some(animal)) => (StatusCode::OK, Json(AnimalMapper::to_dto(animal))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Animal not found").into_response(),
        Err(e) => {
            error!("Failed to get animal: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving animal").into_response()
        }
    }
}

/// List animals owned by a user
pub async fn list_animals(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> impl IntoResponse {
    info!("GET /api/animals?owner_id={}", query.owner_id);

    match state
        .animal_service
        .list_animals_by_owner(&query.owner_id)
        .await
    {
        Ok(animals) => (
            StatusCode::OK,
            Json(AnimalListResponse {
                animals: AnimalMapper::to_dto_list(animals),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list animals: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing animals").into_response()
        }
    }
}

/// Look up an animal by NFC tag id
pub async fn find_by_nfc(
    State(state): State<AppState>,
    Path(nfc_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/nfc/{}", nfc_id);

    match state.animal_service.find_by_nfc(&nfc_id).await {
        Ok(Some(animal)) => (StatusCode::OK, Json(AnimalMapper::to_dto(animal))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No animal registered for this NFC tag").into_response(),
        Err(e) => {
            error!("Failed NFC lookup: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving animal").into_response()
        }
    }
}

/// List all animals currently flagged lost
pub async fn list_lost_animals(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/animals/lost");

    match state.lost_status_service.list_lost_animals().await {
        Ok(animals) => (
            StatusCode::OK,
            Json(AnimalListResponse {
                animals: AnimalMapper::to_dto_list(animals),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list lost animals: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing lost animals").into_response()
        }
    }
}

/// Flag an animal as lost
pub async fn mark_as_lost(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
    Json(request): Json<MarkAsLostRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals/{}/lost", animal_id);

    match state
        .lost_status_service
        .mark_as_lost(&animal_id, request.notes)
        .await
    {
        Ok(animal) => (
            StatusCode::OK,
            Json(AnimalResponse {
                animal: AnimalMapper::to_dto(animal),
                success_message: "Animal reported lost".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to mark animal lost: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Clear an animal's lost flag
pub async fn mark_as_found(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/animals/{}/found", animal_id);

    match state.lost_status_service.mark_as_found(&animal_id).await {
        Ok(animal) => (
            StatusCode::OK,
            Json(AnimalResponse {
                animal: AnimalMapper::to_dto(animal),
                success_message: "Animal reported found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to mark animal found: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}
