//! # REST API for Transfer Notifications
//!
//! The badge summary endpoint. Counts are recomputed on every request so
//! the UI can poll without ever seeing a stale badge.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::error;

use crate::backend::io::rest::transfer_apis::UserQuery;
use crate::backend::AppState;
use shared::TransferNotificationsResponse;

/// Pending-transfer badge summary for a user
pub async fn get_transfer_notifications(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    match state.notification_service.pending_count(&query.user_id).await {
        Ok(pending_count) => (
            StatusCode::OK,
            Json(TransferNotificationsResponse {
                has_pending_transfers: pending_count > 0,
                pending_count,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to compute transfer notifications: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing notifications").into_response()
        }
    }
}
