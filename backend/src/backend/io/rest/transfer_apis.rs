//! # REST API for Ownership Transfers
//!
//! Endpoints for opening a transfer request, resolving it (accept, reject,
//! cancel), and the read projections backing banners and list screens.
//!
//! Accept/reject/cancel return `{"success": false}` with 200 when another
//! device resolved the request first; that outcome is an expected race, not
//! an error.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::backend::io::rest::domain_error_status;
use crate::backend::io::rest::mappers::transfer_mapper::TransferMapper;
use crate::backend::AppState;
use shared::{
    PendingTransferResponse, RequestTransferRequest, TransferActionRequest,
    TransferActionResponse, TransferListResponse, TransferResponse,
};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// Open a new transfer request
pub async fn request_transfer(
    State(state): State<AppState>,
    Json(request): Json<RequestTransferRequest>,
) -> impl IntoResponse {
    info!("POST /api/transfers - request: {:?}", request);

    let command = TransferMapper::to_request_command(request);
    match state.transfer_service.request_transfer(command).await {
        Ok(transfer) => (
            StatusCode::CREATED,
            Json(TransferResponse {
                transfer: TransferMapper::to_dto(transfer),
                success_message: "Transfer request created".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create transfer request: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Accept a pending transfer as the prospective new owner
pub async fn accept_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<String>,
    Json(request): Json<TransferActionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transfers/{}/accept by {}", transfer_id, request.actor_id);

    match state
        .transfer_service
        .accept_transfer(&transfer_id, &request.actor_id)
        .await
    {
        Ok(success) => (StatusCode::OK, Json(TransferActionResponse { success })).into_response(),
        Err(e) => {
            error!("Failed to accept transfer: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Reject a pending transfer as the prospective new owner
pub async fn reject_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<String>,
    Json(request): Json<TransferActionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transfers/{}/reject by {}", transfer_id, request.actor_id);

    match state
        .transfer_service
        .reject_transfer(&transfer_id, &request.actor_id)
        .await
    {
        Ok(success) => (StatusCode::OK, Json(TransferActionResponse { success })).into_response(),
        Err(e) => {
            error!("Failed to reject transfer: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Withdraw a pending transfer as the requesting current owner
pub async fn cancel_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<String>,
    Json(request): Json<TransferActionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transfers/{}/cancel by {}", transfer_id, request.actor_id);

    match state
        .transfer_service
        .cancel_transfer(&transfer_id, &request.actor_id)
        .await
    {
        Ok(success) => (StatusCode::OK, Json(TransferActionResponse { success })).into_response(),
        Err(e) => {
            error!("Failed to cancel transfer: {}", e);
            (domain_error_status(&e), e.to_string()).into_response()
        }
    }
}

/// The pending transfer for an animal, if any (detail-screen banner)
pub async fn get_pending_transfer_for_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}/transfer", animal_id);

    match state
        .transfer_service
        .get_pending_transfer_for_animal(&animal_id)
        .await
    {
        Ok(details) => (
            StatusCode::OK,
            Json(PendingTransferResponse {
                transfer: details.map(TransferMapper::details_to_dto),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to get pending transfer: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving transfer").into_response()
        }
    }
}

/// Incoming pending transfers for a user
pub async fn get_pending_transfers(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    info!("GET /api/transfers/pending?user_id={}", query.user_id);

    match state
        .transfer_service
        .get_pending_transfers_for_user(&query.user_id)
        .await
    {
        Ok(details) => (
            StatusCode::OK,
            Json(TransferListResponse {
                transfers: TransferMapper::details_to_dto_list(details),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list pending transfers: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing transfers").into_response()
        }
    }
}

/// Outgoing transfer history for a user, any status
pub async fn get_sent_transfers(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    info!("GET /api/transfers/sent?user_id={}", query.user_id);

    match state
        .transfer_service
        .get_transfer_requests_by_user(&query.user_id)
        .await
    {
        Ok(details) => (
            StatusCode::OK,
            Json(TransferListResponse {
                transfers: TransferMapper::details_to_dto_list(details),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list sent transfers: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing transfers").into_response()
        }
    }
}
