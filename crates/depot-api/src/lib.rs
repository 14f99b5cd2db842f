//! # depot-api
//!
//! HTTP surface for FileDepot: an Axum router over the service layer,
//! with Bearer-token authentication, request DTOs, and the
//! `AppError` → HTTP status mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
