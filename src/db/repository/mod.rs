//! Repository traits for abstracting database operations.
//!
//! These traits define the interface each role of the system works through
//! (authentication, citizen, operator, government), allowing different
//! storage backends (PostgreSQL, in-memory) to be swapped via the factory
//! without touching business logic.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust and allow
//! sharing across request handlers.
//!
//! # Error Handling
//! All methods return `RepositoryResult<T>` which wraps either the expected
//! return type or a `RepositoryError` describing what went wrong.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{
    Area, AuthenticatedUser, Category, CitizenProfile, CitizenRegistration, Collection,
    CollectionOutcome, CollectionPoint, CollectionRequest, Complaint, ComplaintDetail,
    ComplaintStatus, CreatedListing, HighYieldAreaReport, ListingId, NewCategory, NewListing,
    NewOperator, Operator, OperatorPerformance, OperatorPerformanceReport, Route,
    TransactionRecord, Warehouse, WarehouseInventory, WasteListing,
};

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Authentication operations.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Look up a user by CNIC and password hash.
    ///
    /// Returns `Ok(None)` on any credential mismatch; callers must not be
    /// able to distinguish a wrong password from an unknown CNIC.
    async fn authenticate(
        &self,
        cnic: &str,
        password_hash: &str,
    ) -> RepositoryResult<Option<AuthenticatedUser>>;
}

/// Citizen-facing operations.
#[async_trait]
pub trait CitizenRepository: Send + Sync {
    /// Insert a user row (citizen role) and a citizen profile in one
    /// transaction. A duplicate CNIC fails with a validation error and
    /// writes nothing.
    ///
    /// # Returns
    /// The new citizen's id (the CNIC).
    async fn register_citizen(
        &self,
        registration: &CitizenRegistration,
        password_hash: &str,
    ) -> RepositoryResult<String>;

    /// Create a waste listing with a server-assigned `created_at` (part of
    /// the partition key) and a price estimated from the category rate.
    async fn create_listing(&self, listing: &NewListing) -> RepositoryResult<CreatedListing>;

    /// All listings for a citizen, newest first, with category names.
    async fn listings_for_citizen(&self, citizen_id: &str)
        -> RepositoryResult<Vec<WasteListing>>;

    /// Cancel a listing. Succeeds only while the listing is Pending and
    /// belongs to `citizen_id`; returns `Ok(false)` otherwise.
    async fn cancel_listing(
        &self,
        listing_id: ListingId,
        citizen_id: &str,
    ) -> RepositoryResult<bool>;

    /// Price for a (category, weight) pair: `round_money(weight × rate)`.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` if the category does not exist.
    async fn calculate_price(&self, category_id: i32, weight: f64) -> RepositoryResult<f64>;

    /// Payment records for a citizen, newest first.
    async fn transactions_for_citizen(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Vec<TransactionRecord>>;

    /// Citizen profile joined with area detail.
    async fn citizen_profile(&self, citizen_id: &str)
        -> RepositoryResult<Option<CitizenProfile>>;

    /// All areas, ordered by city then name.
    async fn list_areas(&self) -> RepositoryResult<Vec<Area>>;

    /// All waste categories, ordered by name.
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    /// A single category by id.
    async fn get_category(&self, category_id: i32) -> RepositoryResult<Option<Category>>;
}

/// Operator-facing operations.
#[async_trait]
pub trait OperatorRepository: Send + Sync {
    /// Operator row with its assigned route and warehouse resolved.
    async fn operator_details(&self, operator_id: &str) -> RepositoryResult<Option<Operator>>;

    /// Pending listings in the area of the operator's assigned route.
    async fn collection_points(&self, operator_id: &str)
        -> RepositoryResult<Vec<CollectionPoint>>;

    /// Perform a collection: in one transaction insert the collection row,
    /// flip the listing to Collected, upsert warehouse stock, and (when
    /// category pricing is available) insert a payment transaction and
    /// link it back to the listing. All writes commit or roll back together.
    ///
    /// # Errors
    /// * `NotFound` if the listing does not exist
    /// * `ValidationError` if the listing is not Pending
    async fn collect_waste(&self, request: &CollectionRequest)
        -> RepositoryResult<CollectionOutcome>;

    /// Increment-or-insert warehouse stock for a category.
    async fn deposit_waste(
        &self,
        warehouse_id: i32,
        category_id: i32,
        quantity: f64,
    ) -> RepositoryResult<()>;

    /// Recent collections for an operator, newest first, capped at 100.
    async fn collection_history(&self, operator_id: &str) -> RepositoryResult<Vec<Collection>>;

    /// Lifetime pickup totals for an operator.
    async fn operator_performance(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Option<OperatorPerformance>>;

    /// Active complaints assigned to an operator, newest first.
    async fn complaints_for_operator(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Vec<ComplaintDetail>>;

    /// Update a complaint's status. Returns `Ok(false)` if the complaint
    /// does not exist. Shared with the government service.
    async fn update_complaint_status(
        &self,
        complaint_id: i64,
        status: ComplaintStatus,
    ) -> RepositoryResult<bool>;
}

/// Government/regulator operations.
#[async_trait]
pub trait GovernmentRepository: Send + Sync {
    /// Capacity usage per warehouse, optionally restricted to one.
    async fn warehouse_inventory(
        &self,
        warehouse_id: Option<i32>,
    ) -> RepositoryResult<Vec<WarehouseInventory>>;

    /// All warehouses.
    async fn list_warehouses(&self) -> RepositoryResult<Vec<Warehouse>>;

    /// Per-area listing/weight/revenue aggregation with revenue rank,
    /// optionally restricted to a created-at window.
    async fn high_yield_areas(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<HighYieldAreaReport>>;

    /// Per-operator collection totals, complaint counts, and rating.
    async fn operator_performance_report(
        &self,
    ) -> RepositoryResult<Vec<OperatorPerformanceReport>>;

    /// Create a waste category, returning its id.
    async fn create_category(&self, category: &NewCategory) -> RepositoryResult<i32>;

    /// Update a category's rate and, in the same transaction, recompute the
    /// estimated price of its Pending listings. Returns `Ok(false)` if the
    /// category does not exist.
    async fn update_category_price(
        &self,
        category_id: i32,
        new_price: f64,
    ) -> RepositoryResult<bool>;

    /// Delete a category. Returns `Ok(false)` if it does not exist.
    async fn delete_category(&self, category_id: i32) -> RepositoryResult<bool>;

    /// Insert a user row (operator role) and an operator profile in one
    /// transaction. A duplicate CNIC fails with a validation error and
    /// writes nothing.
    async fn create_operator(
        &self,
        operator: &NewOperator,
        password_hash: &str,
    ) -> RepositoryResult<String>;

    /// Assign an operator to a route and warehouse. Returns `Ok(false)` if
    /// the operator does not exist.
    async fn assign_operator(
        &self,
        operator_id: &str,
        route_id: i32,
        warehouse_id: i32,
    ) -> RepositoryResult<bool>;

    /// Take an operator offline and clear its assignments. Returns
    /// `Ok(false)` if the operator does not exist.
    async fn deactivate_operator(&self, operator_id: &str) -> RepositoryResult<bool>;

    /// All operators with their assignments resolved.
    async fn list_operators(&self) -> RepositoryResult<Vec<Operator>>;

    /// All complaints, optionally filtered by status, newest first.
    async fn list_complaints(
        &self,
        status: Option<ComplaintStatus>,
    ) -> RepositoryResult<Vec<Complaint>>;

    /// All routes.
    async fn list_routes(&self) -> RepositoryResult<Vec<Route>>;
}

/// The complete repository surface: everything the HTTP API needs behind
/// one object-safe bound.
pub trait FullRepository:
    AuthRepository + CitizenRepository + OperatorRepository + GovernmentRepository
{
}

impl<T> FullRepository for T where
    T: AuthRepository + CitizenRepository + OperatorRepository + GovernmentRepository
{
}
