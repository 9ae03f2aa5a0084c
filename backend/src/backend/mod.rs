//! # Backend Module
//!
//! Contains all non-UI logic for the animal registry.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: Business rules for animals, ownership transfers and lost status
//! - **Storage**: Data persistence (SQLite through the storage traits)
//! - **IO**: REST interface that exposes functionality to clients
//!
//! The backend is UI-agnostic: the mobile app talks to it over HTTP, but
//! nothing here depends on any particular client.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::domain::{
    AnimalService, LostStatusService, NotificationService, TransferService,
};
use crate::backend::io::rest::{animal_apis, notification_apis, transfer_apis};
use crate::backend::storage::{AnimalRepository, DbConnection, TransferRepository};

pub use domain::*;
pub use storage::*;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub animal_service: AnimalService,
    pub transfer_service: TransferService,
    pub lost_status_service: LostStatusService,
    pub notification_service: NotificationService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::init().await?;

    info!("Setting up domain model");
    let animals = Arc::new(AnimalRepository::new(db_conn.clone()));
    let transfers = Arc::new(TransferRepository::new(db_conn));

    let animal_service = AnimalService::new(animals.clone());
    let transfer_service = TransferService::new(animals.clone(), transfers.clone());
    let lost_status_service = LostStatusService::new(animals);
    let notification_service = NotificationService::new(transfers);

    info!("Setting up application state");
    Ok(AppState {
        animal_service,
        transfer_service,
        lost_status_service,
        notification_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup; clients are mobile apps and the dev frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route(
            "/animals",
            post(animal_apis::register_animal).get(animal_apis::list_animals),
        )
        .route("/animals/lost", get(animal_apis::list_lost_animals))
        .route("/animals/nfc/:nfc_id", get(animal_apis::find_by_nfc))
        .route("/animals/:animal_id", get(animal_apis::get_animal))
        .route("/animals/:animal_id/lost", post(animal_apis::mark_as_lost))
        .route("/animals/:animal_id/found", post(animal_apis::mark_as_found))
        .route(
            "/animals/:animal_id/transfer",
            get(transfer_apis::get_pending_transfer_for_animal),
        )
        .route("/transfers", post(transfer_apis::request_transfer))
        .route("/transfers/pending", get(transfer_apis::get_pending_transfers))
        .route("/transfers/sent", get(transfer_apis::get_sent_transfers))
        .route(
            "/transfers/:transfer_id/accept",
            post(transfer_apis::accept_transfer),
        )
        .route(
            "/transfers/:transfer_id/reject",
            post(transfer_apis::reject_transfer),
        )
        .route(
            "/transfers/:transfer_id/cancel",
            post(transfer_apis::cancel_transfer),
        )
        .route(
            "/notifications/transfers",
            get(notification_apis::get_transfer_notifications),
        );

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
