//! Public API surface for the SmartWaste backend.
//!
//! This file consolidates the domain types and DTOs shared by the service
//! layer, the repository implementations, and the HTTP API. All types derive
//! Serialize/Deserialize and serialize as camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Waste listing identifier (first half of the composite partition key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub i64);

/// Collection identifier (first half of the composite partition key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionId(pub i64);

/// Payment transaction identifier (first half of the composite partition key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub i64);

impl ListingId {
    pub fn new(value: i64) -> Self {
        ListingId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl CollectionId {
    pub fn new(value: i64) -> Self {
        CollectionId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TransactionId {
    pub fn new(value: i64) -> Self {
        TransactionId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User role. Role ids are fixed by the seeded `user_roles` table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Government,
    Citizen,
    Operator,
}

impl Role {
    pub fn id(&self) -> i32 {
        match self {
            Role::Government => 1,
            Role::Citizen => 2,
            Role::Operator => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Government => "Government",
            Role::Citizen => "Citizen",
            Role::Operator => "Operator",
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Role::Government),
            2 => Some(Role::Citizen),
            3 => Some(Role::Operator),
            _ => None,
        }
    }
}

/// Status of a waste listing.
///
/// The only transitions the application accepts are
/// Pending → Collected (operator) and Pending → Cancelled (citizen).
/// Completed is a valid stored value but no code path sets it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Pending,
    Collected,
    Completed,
    Cancelled,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "Pending",
            ListingStatus::Collected => "Collected",
            ListingStatus::Completed => "Completed",
            ListingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ListingStatus::Pending),
            "Collected" => Ok(ListingStatus::Collected),
            "Completed" => Ok(ListingStatus::Completed),
            "Cancelled" => Ok(ListingStatus::Cancelled),
            other => Err(format!("Unknown listing status: {}", other)),
        }
    }
}

/// Status of a payment transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Completed" => Ok(PaymentStatus::Completed),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

/// Status of a complaint. The stored text for `InProgress` is "In Progress".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(ComplaintStatus::Open),
            "In Progress" => Ok(ComplaintStatus::InProgress),
            "Resolved" => Ok(ComplaintStatus::Resolved),
            "Closed" => Ok(ComplaintStatus::Closed),
            other => Err(format!("Unknown complaint status: {}", other)),
        }
    }
}

/// Availability status of an operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorStatus {
    Available,
    Busy,
    Offline,
}

impl OperatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorStatus::Available => "Available",
            OperatorStatus::Busy => "Busy",
            OperatorStatus::Offline => "Offline",
        }
    }
}

impl fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(OperatorStatus::Available),
            "Busy" => Ok(OperatorStatus::Busy),
            "Offline" => Ok(OperatorStatus::Offline),
            other => Err(format!("Unknown operator status: {}", other)),
        }
    }
}

// ==================== Entities ====================

/// Collection area (a city district).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub area_id: i32,
    pub area_name: String,
    pub city: String,
}

/// Recyclable waste category with its current rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
    /// Rate used for price estimates, in currency units per kilogram.
    pub base_price_per_kg: f64,
    pub description: Option<String>,
}

/// Citizen profile row. The id is the user's CNIC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    pub citizen_id: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub area_id: i32,
    pub address: Option<String>,
}

/// Collection route inside an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: i32,
    pub route_name: String,
    pub area_id: i32,
}

/// Warehouse where collected waste is deposited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub warehouse_id: i32,
    pub warehouse_name: String,
    pub area_id: i32,
    pub address: String,
    pub capacity: f64,
    pub current_inventory: f64,
}

/// Operator profile row, optionally joined with the assigned route and
/// warehouse for detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub operator_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub route_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub status: OperatorStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<Warehouse>,
}

/// Running per-category stock at a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStock {
    pub warehouse_id: i32,
    pub category_id: i32,
    pub current_weight: f64,
    pub last_updated: DateTime<Utc>,
}

/// A citizen's waste offer.
///
/// `created_at` is assigned explicitly by the application because it is the
/// second half of the partition key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteListing {
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
    pub citizen_id: String,
    pub category_id: i32,
    pub category_name: String,
    pub weight: f64,
    pub status: ListingStatus,
    pub estimated_price: Option<f64>,
    pub transaction_id: Option<TransactionId>,
}

/// An operator's recorded pickup of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub collection_id: CollectionId,
    pub collected_date: DateTime<Utc>,
    pub operator_id: String,
    pub listing_id: ListingId,
    pub warehouse_id: i32,
    pub collected_weight: f64,
    pub photo_proof: Option<String>,
    pub is_verified: bool,
}

/// Payment owed to a citizen for collected waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub transaction_date: DateTime<Utc>,
    pub citizen_id: String,
    pub operator_id: Option<String>,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub verification_code: Option<String>,
}

/// Citizen complaint against the service or a specific operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub complaint_id: i64,
    pub citizen_id: String,
    pub operator_id: Option<String>,
    pub complaint_type: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

// ==================== View shapes ====================

/// Citizen profile joined with area detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenProfile {
    pub citizen_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub area_id: i32,
    pub area_name: String,
    pub city: String,
    pub member_since: DateTime<Utc>,
}

/// A pending listing on an operator's route, with citizen contact detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPoint {
    pub operator_id: String,
    pub operator_name: String,
    pub route_id: Option<i32>,
    pub route_name: Option<String>,
    pub listing_id: ListingId,
    pub citizen_id: String,
    pub citizen_name: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub area_name: String,
    pub category_name: String,
    pub weight: f64,
    pub estimated_price: Option<f64>,
    pub status: ListingStatus,
}

/// Capacity usage summary for a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseInventory {
    pub warehouse_id: i32,
    pub warehouse_name: String,
    pub area_name: String,
    pub city: String,
    pub capacity: f64,
    pub current_inventory: f64,
    pub capacity_used_percent: f64,
    pub available_capacity: f64,
    pub category_count: i64,
}

/// Lifetime pickup totals for an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorPerformance {
    pub operator_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub route_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub total_pickups: i64,
    pub total_collected_weight: f64,
    pub total_collected_amount: f64,
}

/// Complaint joined with citizen/operator/route/area context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetail {
    pub complaint_id: i64,
    pub complaint_type: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub citizen_id: String,
    pub citizen_name: String,
    pub phone_number: String,
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    pub route_name: Option<String>,
    pub area_name: String,
    pub days_open: i64,
}

// ==================== Report shapes ====================

/// Per-area aggregation of listings, weight, and revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighYieldAreaReport {
    pub area_id: i32,
    pub area_name: String,
    pub city: String,
    pub total_listings: i64,
    pub total_weight: f64,
    pub total_revenue: f64,
    pub revenue_rank: i64,
}

/// Per-operator collection totals with a derived rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorPerformanceReport {
    pub operator_id: String,
    pub full_name: String,
    pub total_collections: i64,
    pub total_weight_kg: f64,
    pub complaints: i64,
    pub rating: String,
}

// ==================== Requests and outcomes ====================

/// Citizen self-registration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenRegistration {
    pub cnic: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub area_id: i32,
    pub address: Option<String>,
    pub password: String,
}

/// Request to create a waste listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub citizen_id: String,
    pub category_id: i32,
    pub weight: f64,
}

/// Result of creating a waste listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedListing {
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
    pub estimated_price: f64,
}

/// Price estimate for a (category, weight) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub category_id: i32,
    pub category_name: String,
    pub weight: f64,
    pub base_price_per_kg: f64,
    pub estimated_price: f64,
}

/// Operator request to collect a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub operator_id: String,
    pub listing_id: ListingId,
    pub collected_weight: f64,
    pub warehouse_id: i32,
}

/// Result of a collection: always a collection id; payment fields are set
/// when category pricing was available at collection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOutcome {
    pub collection_id: CollectionId,
    pub transaction_id: Option<TransactionId>,
    pub payment_amount: Option<f64>,
    pub verification_code: Option<String>,
    pub message: String,
}

/// Standalone warehouse deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseDeposit {
    pub warehouse_id: i32,
    pub category_id: i32,
    pub quantity: f64,
}

/// Request to create a waste category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub category_name: String,
    pub base_price_per_kg: f64,
    pub description: Option<String>,
}

/// Request to create an operator account. When `password` is absent a
/// temporary one is generated and returned in the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperator {
    pub cnic: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub route_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub password: Option<String>,
}

/// Result of creating an operator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOperator {
    pub operator_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

/// Outcome of a login attempt. Failures carry only a generic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub success: bool,
    pub message: String,
    pub user_id: Option<String>,
    pub role_id: Option<i32>,
    pub role_name: Option<String>,
    pub citizen_id: Option<String>,
    pub operator_id: Option<String>,
}

impl LoginResult {
    /// The generic failure result. Does not say which of the CNIC or
    /// password was wrong.
    pub fn invalid_credentials() -> Self {
        Self {
            success: false,
            message: "Invalid CNIC or password".to_string(),
            user_id: None,
            role_id: None,
            role_name: None,
            citizen_id: None,
            operator_id: None,
        }
    }
}

/// A user row matched by credentials, with its linked profile id.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: Role,
    pub citizen_id: Option<String>,
    pub operator_id: Option<String>,
}

// ==================== Shared helpers ====================

/// Round a currency amount to two decimals, half away from zero.
///
/// Every price computation goes through this so both repository backends
/// agree to the cent.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Derive the rating string for the operator performance report.
///
/// Used by both backends so the report is backend-independent.
pub fn performance_rating(total_collections: i64, complaints: i64) -> &'static str {
    if total_collections >= 50 && complaints < 3 {
        "Excellent"
    } else if total_collections >= 20 && complaints < 5 {
        "Good"
    } else if total_collections >= 5 {
        "Fair"
    } else {
        "New"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(12.345), 12.35);
        assert_eq!(round_money(12.344), 12.34);
        assert_eq!(round_money(2.5 * 4.2), 10.5);
        assert_eq!(round_money(0.0), 0.0);
    }

    #[test]
    fn test_listing_status_round_trip() {
        for status in [
            ListingStatus::Pending,
            ListingStatus::Collected,
            ListingStatus::Completed,
            ListingStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ListingStatus>().unwrap(), status);
        }
        assert!("Unknown".parse::<ListingStatus>().is_err());
    }

    #[test]
    fn test_complaint_status_text() {
        assert_eq!(ComplaintStatus::InProgress.as_str(), "In Progress");
        assert_eq!(
            "In Progress".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::InProgress
        );
    }

    #[test]
    fn test_role_ids() {
        assert_eq!(Role::Government.id(), 1);
        assert_eq!(Role::Citizen.id(), 2);
        assert_eq!(Role::Operator.id(), 3);
        assert_eq!(Role::from_id(2), Some(Role::Citizen));
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn test_performance_rating_thresholds() {
        assert_eq!(performance_rating(60, 0), "Excellent");
        assert_eq!(performance_rating(60, 3), "Good");
        assert_eq!(performance_rating(25, 1), "Good");
        assert_eq!(performance_rating(10, 8), "Fair");
        assert_eq!(performance_rating(2, 0), "New");
    }
}
