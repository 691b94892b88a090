//! Data Transfer Objects for the HTTP API.
//!
//! Request and response bodies serialize as camelCase JSON. Most payloads
//! reuse the domain types from [`crate::api`] directly; the types here cover
//! the request shapes and envelopes that have no domain counterpart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Domain types used directly as request/response bodies.
pub use crate::api::{
    Area, Category, CitizenProfile, CitizenRegistration, Collection, CollectionOutcome,
    CollectionPoint, CollectionRequest, Complaint, ComplaintDetail, ComplaintStatus,
    CreatedListing, CreatedOperator, HighYieldAreaReport, LoginResult, NewCategory, NewListing,
    NewOperator, Operator, OperatorPerformance, OperatorPerformanceReport, PriceEstimate, Route,
    TransactionRecord, Warehouse, WarehouseDeposit, WarehouseInventory, WasteListing,
};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub cnic: String,
    pub password: String,
}

/// Result of the CNIC format check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnicValidationResponse {
    pub cnic: String,
    pub valid: bool,
}

/// Generic success/message envelope for mutations without richer payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Response body for citizen registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredCitizen {
    pub citizen_id: String,
}

/// Response body for category creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCategory {
    pub category_id: i32,
}

/// Body for cancelling a listing (the path carries the listing id).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelListingRequest {
    pub citizen_id: String,
}

/// Query parameters for the price estimate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimateQuery {
    pub category_id: i32,
    pub weight: f64,
}

/// Body for complaint status updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub complaint_id: i64,
    pub status: ComplaintStatus,
}

/// Body for category price updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPriceRequest {
    pub new_price: f64,
}

/// Body for operator route/warehouse assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignOperatorRequest {
    pub route_id: i32,
    pub warehouse_id: i32,
}

/// Query parameters for the warehouse inventory endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    #[serde(default)]
    pub warehouse_id: Option<i32>,
}

/// Query parameters for the high-yield area report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighYieldQuery {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Query parameters for the complaints listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
