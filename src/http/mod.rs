//! HTTP server module for the SmartWaste backend.
//!
//! This module provides an axum-based HTTP server that exposes the service
//! layer as a REST API. Bodies are JSON with camelCase field names. Routes
//! are grouped per role under `/api/auth`, `/api/citizen`, `/api/operator`,
//! and `/api/government`.
//!
//! The legacy `X-Use-EF` header, which used to pick one of two data-access
//! implementations per request, is still accepted but no longer selects
//! anything: both values reach the same repository.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

/// Header once used by clients to pick the data-access path per request.
pub const LEGACY_BACKEND_HEADER: &str = "x-use-ef";
