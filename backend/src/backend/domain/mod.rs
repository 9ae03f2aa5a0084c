//! # Domain Module
//!
//! Business logic for the animal registry.
//!
//! ## Module Organization
//!
//! - **animal_service**: registration and lookup of animal records
//! - **transfer_policy**: pure allow/deny rules for ownership transfers
//! - **transfer_service**: the transfer engine; the only writer of ownership
//! - **lost_status_service**: the mutually-exclusive lost/found flag
//! - **notification_service**: derived badge counts for incoming transfers
//! - **commands**: internal command types mapped from the public DTOs
//! - **models**: domain entities and their typed validation errors
//!
//! ## Core Rules
//!
//! - An animal has exactly one owner at all times; `owner_id` changes only
//!   through the transfer service's atomic transition.
//! - At most one pending transfer request exists per animal.
//! - A resolved transfer request is immutable history; it is never edited
//!   or deleted.
//! - Lost/found status and transfers are independent of each other.

pub mod animal_service;
pub mod commands;
pub mod lost_status_service;
pub mod models;
pub mod notification_service;
pub mod transfer_policy;
pub mod transfer_service;

pub use animal_service::*;
pub use lost_status_service::*;
pub use notification_service::*;
pub use transfer_service::*;
