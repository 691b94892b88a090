//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a PostgreSQL
//! database. The original system split these operations across an ORM path
//! and a stored-procedure path; here there is a single implementation and
//! the former view/procedure reads are plain SQL aggregate queries.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{Double, Integer, Nullable, Text, Timestamptz};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::api::{
    performance_rating, round_money, Area, AuthenticatedUser, Category, CitizenProfile,
    CitizenRegistration, Collection, CollectionId, CollectionOutcome, CollectionPoint,
    CollectionRequest, Complaint, ComplaintDetail, ComplaintStatus, CreatedListing,
    HighYieldAreaReport, ListingId, ListingStatus, NewCategory, NewListing, NewOperator, Operator,
    OperatorPerformance, OperatorPerformanceReport, OperatorStatus, PaymentStatus, Role, Route,
    TransactionId, TransactionRecord, Warehouse, WarehouseInventory, WasteListing,
};
use crate::db::repositories::new_verification_code;
use crate::db::repository::{
    AuthRepository, CitizenRepository, ErrorContext, GovernmentRepository, OperatorRepository,
    RepositoryError, RepositoryResult,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    /// - `PG_MAX_RETRIES`: Maximum retry attempts (default: 3)
    /// - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// This repository implementation provides:
/// - Connection pooling with configurable limits
/// - Automatic retry for transient failures
/// - Health monitoring and statistics
/// - Automatic schema migrations
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Arguments
    /// * `config` - Database configuration
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// This method will retry the operation up to `max_retries` times if a
    /// retryable error occurs (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                // Get connection
                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                // Execute the operation
                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    ///
    /// Returns current pool state and query statistics for monitoring.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

fn parse_listing_status(raw: &str) -> RepositoryResult<ListingStatus> {
    raw.parse().map_err(RepositoryError::internal)
}

fn parse_payment_status(raw: &str) -> RepositoryResult<PaymentStatus> {
    raw.parse().map_err(RepositoryError::internal)
}

fn parse_complaint_status(raw: &str) -> RepositoryResult<ComplaintStatus> {
    raw.parse().map_err(RepositoryError::internal)
}

fn parse_operator_status(raw: &str) -> RepositoryResult<OperatorStatus> {
    raw.parse().map_err(RepositoryError::internal)
}

fn listing_to_api(row: WasteListingRow, category_name: String) -> RepositoryResult<WasteListing> {
    Ok(WasteListing {
        listing_id: ListingId(row.listing_id),
        created_at: row.created_at,
        citizen_id: row.citizen_id,
        category_id: row.category_id,
        category_name,
        weight: row.weight,
        status: parse_listing_status(&row.status)?,
        estimated_price: row.estimated_price,
        transaction_id: row.transaction_id.map(TransactionId),
    })
}

fn collection_to_api(row: CollectionRow) -> Collection {
    Collection {
        collection_id: CollectionId(row.collection_id),
        collected_date: row.collected_date,
        operator_id: row.operator_id,
        listing_id: ListingId(row.listing_id),
        warehouse_id: row.warehouse_id,
        collected_weight: row.collected_weight,
        photo_proof: row.photo_proof,
        is_verified: row.is_verified,
    }
}

fn transaction_to_api(row: TransactionRecordRow) -> RepositoryResult<TransactionRecord> {
    Ok(TransactionRecord {
        transaction_id: TransactionId(row.transaction_id),
        transaction_date: row.transaction_date,
        citizen_id: row.citizen_id,
        operator_id: row.operator_id,
        total_amount: row.total_amount,
        payment_status: parse_payment_status(&row.payment_status)?,
        payment_method: row.payment_method,
        verification_code: row.verification_code,
    })
}

fn complaint_to_api(row: ComplaintRow) -> RepositoryResult<Complaint> {
    Ok(Complaint {
        complaint_id: row.complaint_id,
        citizen_id: row.citizen_id,
        operator_id: row.operator_id,
        complaint_type: row.complaint_type,
        description: row.description,
        status: parse_complaint_status(&row.status)?,
        created_at: row.created_at,
    })
}

fn area_to_api(row: AreaRow) -> Area {
    Area {
        area_id: row.area_id,
        area_name: row.area_name,
        city: row.city,
    }
}

fn category_to_api(row: CategoryRow) -> Category {
    Category {
        category_id: row.category_id,
        category_name: row.category_name,
        base_price_per_kg: row.base_price_per_kg,
        description: row.description,
    }
}

fn route_to_api(row: RouteRow) -> Route {
    Route {
        route_id: row.route_id,
        route_name: row.route_name,
        area_id: row.area_id,
    }
}

fn warehouse_to_api(row: WarehouseRow) -> Warehouse {
    Warehouse {
        warehouse_id: row.warehouse_id,
        warehouse_name: row.warehouse_name,
        area_id: row.area_id,
        address: row.address,
        capacity: row.capacity,
        current_inventory: row.current_inventory,
    }
}

fn operator_to_api(
    row: OperatorRow,
    route: Option<Route>,
    warehouse: Option<Warehouse>,
) -> RepositoryResult<Operator> {
    Ok(Operator {
        operator_id: row.operator_id,
        full_name: row.full_name,
        phone_number: row.phone_number,
        route_id: row.route_id,
        warehouse_id: row.warehouse_id,
        status: parse_operator_status(&row.status)?,
        route,
        warehouse,
    })
}

/// Increment-or-insert warehouse stock and keep the warehouse running total
/// in step. Must be called inside a transaction.
fn upsert_stock(
    conn: &mut PgConnection,
    warehouse_id: i32,
    category_id: i32,
    quantity: f64,
) -> RepositoryResult<()> {
    let now = Utc::now();

    diesel::insert_into(warehouse_stock::table)
        .values((
            warehouse_stock::warehouse_id.eq(warehouse_id),
            warehouse_stock::category_id.eq(category_id),
            warehouse_stock::current_weight.eq(quantity),
            warehouse_stock::last_updated.eq(now),
        ))
        .on_conflict((warehouse_stock::warehouse_id, warehouse_stock::category_id))
        .do_update()
        .set((
            warehouse_stock::current_weight.eq(warehouse_stock::current_weight + quantity),
            warehouse_stock::last_updated.eq(now),
        ))
        .execute(conn)?;

    diesel::update(warehouses::table.find(warehouse_id))
        .set(warehouses::current_inventory.eq(warehouses::current_inventory + quantity))
        .execute(conn)?;

    Ok(())
}

#[async_trait]
impl AuthRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn authenticate(
        &self,
        cnic: &str,
        password_hash: &str,
    ) -> RepositoryResult<Option<AuthenticatedUser>> {
        let cnic = cnic.to_string();
        let password_hash = password_hash.to_string();

        self.with_conn(move |conn| {
            let user: Option<UserRow> = users::table
                .filter(users::user_id.eq(&cnic))
                .filter(users::password_hash.eq(&password_hash))
                .select(UserRow::as_select())
                .first(conn)
                .optional()?;

            let Some(user) = user else {
                return Ok(None);
            };
            let Some(role) = Role::from_id(user.role_id) else {
                return Err(RepositoryError::internal(format!(
                    "Unknown role id {} for user",
                    user.role_id
                )));
            };

            let citizen_id = if role == Role::Citizen {
                citizens::table
                    .find(&cnic)
                    .select(citizens::citizen_id)
                    .first::<String>(conn)
                    .optional()?
            } else {
                None
            };
            let operator_id = if role == Role::Operator {
                operators::table
                    .find(&cnic)
                    .select(operators::operator_id)
                    .first::<String>(conn)
                    .optional()?
            } else {
                None
            };

            Ok(Some(AuthenticatedUser {
                user_id: user.user_id,
                role,
                citizen_id,
                operator_id,
            }))
        })
        .await
    }
}

#[async_trait]
impl CitizenRepository for PostgresRepository {
    async fn register_citizen(
        &self,
        registration: &CitizenRegistration,
        password_hash: &str,
    ) -> RepositoryResult<String> {
        let registration = registration.clone();
        let password_hash = password_hash.to_string();

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let exists: i64 = users::table
                    .filter(users::user_id.eq(&registration.cnic))
                    .count()
                    .get_result(tx)?;
                if exists > 0 {
                    return Err(RepositoryError::validation(
                        "User with this CNIC already exists",
                    ));
                }

                let area_exists: i64 = areas::table
                    .filter(areas::area_id.eq(registration.area_id))
                    .count()
                    .get_result(tx)?;
                if area_exists == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Area {} not found",
                        registration.area_id
                    )));
                }

                diesel::insert_into(users::table)
                    .values(NewUserRow {
                        user_id: registration.cnic.clone(),
                        password_hash: password_hash.clone(),
                        role_id: Role::Citizen.id(),
                    })
                    .execute(tx)?;

                diesel::insert_into(citizens::table)
                    .values(CitizenRow {
                        citizen_id: registration.cnic.clone(),
                        full_name: registration.full_name.clone(),
                        phone_number: registration.phone_number.clone(),
                        area_id: registration.area_id,
                        address: registration.address.clone(),
                    })
                    .execute(tx)?;

                Ok(registration.cnic.clone())
            })
        })
        .await
    }

    async fn create_listing(&self, listing: &NewListing) -> RepositoryResult<CreatedListing> {
        let listing = listing.clone();

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let citizen_exists: i64 = citizens::table
                    .filter(citizens::citizen_id.eq(&listing.citizen_id))
                    .count()
                    .get_result(tx)?;
                if citizen_exists == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Citizen {} not found",
                        listing.citizen_id
                    )));
                }

                let rate: f64 = categories::table
                    .find(listing.category_id)
                    .select(categories::base_price_per_kg)
                    .first(tx)
                    .optional()?
                    .ok_or_else(|| {
                        RepositoryError::not_found(format!(
                            "Category {} not found",
                            listing.category_id
                        ))
                    })?;

                let estimated_price = round_money(listing.weight * rate);
                // Part of the partition key, so assigned here rather than by
                // a column default.
                let created_at = Utc::now();

                let listing_id: i64 = diesel::insert_into(waste_listings::table)
                    .values(NewWasteListingRow {
                        created_at,
                        citizen_id: listing.citizen_id.clone(),
                        category_id: listing.category_id,
                        weight: listing.weight,
                        status: ListingStatus::Pending.as_str().to_string(),
                        estimated_price: Some(estimated_price),
                    })
                    .returning(waste_listings::listing_id)
                    .get_result(tx)?;

                Ok(CreatedListing {
                    listing_id: ListingId(listing_id),
                    created_at,
                    estimated_price,
                })
            })
        })
        .await
    }

    async fn listings_for_citizen(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Vec<WasteListing>> {
        let citizen_id = citizen_id.to_string();

        self.with_conn(move |conn| {
            let rows: Vec<(WasteListingRow, String)> = waste_listings::table
                .inner_join(categories::table)
                .filter(waste_listings::citizen_id.eq(&citizen_id))
                .order(waste_listings::created_at.desc())
                .select((WasteListingRow::as_select(), categories::category_name))
                .load(conn)?;

            rows.into_iter()
                .map(|(row, category_name)| listing_to_api(row, category_name))
                .collect()
        })
        .await
    }

    async fn cancel_listing(
        &self,
        listing_id: ListingId,
        citizen_id: &str,
    ) -> RepositoryResult<bool> {
        let citizen_id = citizen_id.to_string();
        let listing_id = listing_id.value();

        self.with_conn(move |conn| {
            let rows = diesel::update(
                waste_listings::table
                    .filter(waste_listings::listing_id.eq(listing_id))
                    .filter(waste_listings::citizen_id.eq(&citizen_id))
                    .filter(waste_listings::status.eq(ListingStatus::Pending.as_str())),
            )
            .set(waste_listings::status.eq(ListingStatus::Cancelled.as_str()))
            .execute(conn)?;

            Ok(rows > 0)
        })
        .await
    }

    async fn calculate_price(&self, category_id: i32, weight: f64) -> RepositoryResult<f64> {
        self.with_conn(move |conn| {
            let rate: f64 = categories::table
                .find(category_id)
                .select(categories::base_price_per_kg)
                .first(conn)
                .optional()?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Category {} not found", category_id))
                })?;

            Ok(round_money(weight * rate))
        })
        .await
    }

    async fn transactions_for_citizen(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        let citizen_id = citizen_id.to_string();

        self.with_conn(move |conn| {
            let rows: Vec<TransactionRecordRow> = transaction_records::table
                .filter(transaction_records::citizen_id.eq(&citizen_id))
                .order(transaction_records::transaction_date.desc())
                .select(TransactionRecordRow::as_select())
                .load(conn)?;

            rows.into_iter().map(transaction_to_api).collect()
        })
        .await
    }

    async fn citizen_profile(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Option<CitizenProfile>> {
        let citizen_id = citizen_id.to_string();

        self.with_conn(move |conn| {
            let row: Option<CitizenProfileSqlRow> = sql_query(
                "SELECT c.citizen_id, c.full_name, c.phone_number, c.address, c.area_id, \
                        a.area_name, a.city, u.created_at AS member_since \
                 FROM citizens c \
                 JOIN areas a ON a.area_id = c.area_id \
                 JOIN users u ON u.user_id = c.citizen_id \
                 WHERE c.citizen_id = $1",
            )
            .bind::<Text, _>(&citizen_id)
            .get_result(conn)
            .optional()?;

            Ok(row.map(|r| CitizenProfile {
                citizen_id: r.citizen_id,
                full_name: r.full_name,
                phone_number: r.phone_number.unwrap_or_default(),
                address: r.address,
                area_id: r.area_id,
                area_name: r.area_name,
                city: r.city,
                member_since: r.member_since,
            }))
        })
        .await
    }

    async fn list_areas(&self) -> RepositoryResult<Vec<Area>> {
        self.with_conn(|conn| {
            let rows: Vec<AreaRow> = areas::table
                .order((areas::city.asc(), areas::area_name.asc()))
                .select(AreaRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(area_to_api).collect())
        })
        .await
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.with_conn(|conn| {
            let rows: Vec<CategoryRow> = categories::table
                .order(categories::category_name.asc())
                .select(CategoryRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(category_to_api).collect())
        })
        .await
    }

    async fn get_category(&self, category_id: i32) -> RepositoryResult<Option<Category>> {
        self.with_conn(move |conn| {
            let row: Option<CategoryRow> = categories::table
                .find(category_id)
                .select(CategoryRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(category_to_api))
        })
        .await
    }
}

#[async_trait]
impl OperatorRepository for PostgresRepository {
    async fn operator_details(&self, operator_id: &str) -> RepositoryResult<Option<Operator>> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let row: Option<OperatorRow> = operators::table
                .find(&operator_id)
                .select(OperatorRow::as_select())
                .first(conn)
                .optional()?;

            let Some(row) = row else {
                return Ok(None);
            };

            let route = match row.route_id {
                Some(id) => routes::table
                    .find(id)
                    .select(RouteRow::as_select())
                    .first(conn)
                    .optional()?
                    .map(route_to_api),
                None => None,
            };
            let warehouse = match row.warehouse_id {
                Some(id) => warehouses::table
                    .find(id)
                    .select(WarehouseRow::as_select())
                    .first(conn)
                    .optional()?
                    .map(warehouse_to_api),
                None => None,
            };

            operator_to_api(row, route, warehouse).map(Some)
        })
        .await
    }

    async fn collection_points(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Vec<CollectionPoint>> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let rows: Vec<CollectionPointSqlRow> = sql_query(
                "SELECT o.operator_id, o.full_name AS operator_name, o.route_id, r.route_name, \
                        w.listing_id, c.citizen_id, c.full_name AS citizen_name, c.phone_number, \
                        c.address, a.area_name, cat.category_name, w.weight, w.estimated_price, \
                        w.status \
                 FROM operators o \
                 JOIN routes r ON r.route_id = o.route_id \
                 JOIN areas a ON a.area_id = r.area_id \
                 JOIN citizens c ON c.area_id = a.area_id \
                 JOIN waste_listings w ON w.citizen_id = c.citizen_id AND w.status = 'Pending' \
                 JOIN categories cat ON cat.category_id = w.category_id \
                 WHERE o.operator_id = $1 \
                 ORDER BY w.listing_id",
            )
            .bind::<Text, _>(&operator_id)
            .load(conn)?;

            rows.into_iter()
                .map(|r| {
                    Ok(CollectionPoint {
                        operator_id: r.operator_id,
                        operator_name: r.operator_name,
                        route_id: r.route_id,
                        route_name: r.route_name,
                        listing_id: ListingId(r.listing_id),
                        citizen_id: r.citizen_id,
                        citizen_name: r.citizen_name,
                        phone_number: r.phone_number.unwrap_or_default(),
                        address: r.address,
                        area_name: r.area_name,
                        category_name: r.category_name,
                        weight: r.weight,
                        estimated_price: r.estimated_price,
                        status: parse_listing_status(&r.status)?,
                    })
                })
                .collect()
        })
        .await
    }

    async fn collect_waste(
        &self,
        request: &CollectionRequest,
    ) -> RepositoryResult<CollectionOutcome> {
        let request = request.clone();

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let operator_exists: i64 = operators::table
                    .filter(operators::operator_id.eq(&request.operator_id))
                    .count()
                    .get_result(tx)?;
                if operator_exists == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Operator {} not found",
                        request.operator_id
                    )));
                }

                let warehouse_exists: i64 = warehouses::table
                    .filter(warehouses::warehouse_id.eq(request.warehouse_id))
                    .count()
                    .get_result(tx)?;
                if warehouse_exists == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Warehouse {} not found",
                        request.warehouse_id
                    )));
                }

                // Row lock serializes concurrent collection attempts on the
                // same listing; the loser then fails the Pending check.
                let listing: Option<WasteListingRow> = waste_listings::table
                    .filter(waste_listings::listing_id.eq(request.listing_id.value()))
                    .select(WasteListingRow::as_select())
                    .for_update()
                    .first(tx)
                    .optional()?;

                let listing = listing.ok_or_else(|| {
                    RepositoryError::not_found(format!(
                        "Listing {} not found",
                        request.listing_id
                    ))
                })?;
                if listing.status != ListingStatus::Pending.as_str() {
                    return Err(RepositoryError::validation(format!(
                        "Listing {} is not pending (status: {})",
                        request.listing_id, listing.status
                    )));
                }

                let collected_date = Utc::now();
                let collection_id: i64 = diesel::insert_into(collections::table)
                    .values(NewCollectionRow {
                        collected_date,
                        operator_id: request.operator_id.clone(),
                        listing_id: request.listing_id.value(),
                        warehouse_id: request.warehouse_id,
                        collected_weight: request.collected_weight,
                        is_verified: true,
                    })
                    .returning(collections::collection_id)
                    .get_result(tx)?;

                diesel::update(
                    waste_listings::table
                        .filter(waste_listings::listing_id.eq(request.listing_id.value())),
                )
                .set(waste_listings::status.eq(ListingStatus::Collected.as_str()))
                .execute(tx)?;

                upsert_stock(
                    tx,
                    request.warehouse_id,
                    listing.category_id,
                    request.collected_weight,
                )?;

                // Payment runs only when the category still has pricing data.
                let rate: Option<f64> = categories::table
                    .find(listing.category_id)
                    .select(categories::base_price_per_kg)
                    .first(tx)
                    .optional()?;

                let mut transaction_id = None;
                let mut payment_amount = None;
                let mut verification_code = None;
                if let Some(rate) = rate {
                    let amount = round_money(request.collected_weight * rate);
                    let code = new_verification_code();

                    let txn_id: i64 = diesel::insert_into(transaction_records::table)
                        .values(NewTransactionRecordRow {
                            transaction_date: collected_date,
                            citizen_id: listing.citizen_id.clone(),
                            operator_id: Some(request.operator_id.clone()),
                            total_amount: amount,
                            payment_status: PaymentStatus::Pending.as_str().to_string(),
                            payment_method: Some("Cash".to_string()),
                            verification_code: Some(code.clone()),
                        })
                        .returning(transaction_records::transaction_id)
                        .get_result(tx)?;

                    diesel::update(
                        waste_listings::table
                            .filter(waste_listings::listing_id.eq(request.listing_id.value())),
                    )
                    .set(waste_listings::transaction_id.eq(txn_id))
                    .execute(tx)?;

                    transaction_id = Some(TransactionId(txn_id));
                    payment_amount = Some(amount);
                    verification_code = Some(code);
                } else {
                    log::warn!(
                        "Category {} missing during collection of listing {}; skipping payment",
                        listing.category_id,
                        request.listing_id
                    );
                }

                let message = match (payment_amount, &verification_code) {
                    (Some(amount), Some(code)) => format!(
                        "Collection recorded. Payment of Rs.{:.2} pending. Code: {}",
                        amount, code
                    ),
                    _ => "Collection recorded successfully".to_string(),
                };

                Ok(CollectionOutcome {
                    collection_id: CollectionId(collection_id),
                    transaction_id,
                    payment_amount,
                    verification_code,
                    message,
                })
            })
        })
        .await
    }

    async fn deposit_waste(
        &self,
        warehouse_id: i32,
        category_id: i32,
        quantity: f64,
    ) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let warehouse_exists: i64 = warehouses::table
                    .filter(warehouses::warehouse_id.eq(warehouse_id))
                    .count()
                    .get_result(tx)?;
                if warehouse_exists == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Warehouse {} not found",
                        warehouse_id
                    )));
                }
                upsert_stock(tx, warehouse_id, category_id, quantity)
            })
        })
        .await
    }

    async fn collection_history(&self, operator_id: &str) -> RepositoryResult<Vec<Collection>> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let rows: Vec<CollectionRow> = collections::table
                .filter(collections::operator_id.eq(&operator_id))
                .order(collections::collected_date.desc())
                .limit(100)
                .select(CollectionRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(collection_to_api).collect())
        })
        .await
    }

    async fn operator_performance(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Option<OperatorPerformance>> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let row: Option<OperatorPerformanceSqlRow> = sql_query(
                "SELECT o.operator_id, o.full_name, o.phone_number, o.route_id, o.warehouse_id, \
                        COUNT(col.collection_id) AS total_pickups, \
                        COALESCE(SUM(col.collected_weight), 0) AS total_collected_weight, \
                        COALESCE((SELECT SUM(t.total_amount) FROM transaction_records t \
                                  WHERE t.operator_id = o.operator_id), 0) AS total_collected_amount \
                 FROM operators o \
                 LEFT JOIN collections col ON col.operator_id = o.operator_id \
                 WHERE o.operator_id = $1 \
                 GROUP BY o.operator_id, o.full_name, o.phone_number, o.route_id, o.warehouse_id",
            )
            .bind::<Text, _>(&operator_id)
            .get_result(conn)
            .optional()?;

            Ok(row.map(|r| OperatorPerformance {
                operator_id: r.operator_id,
                full_name: r.full_name,
                phone_number: r.phone_number,
                route_id: r.route_id,
                warehouse_id: r.warehouse_id,
                total_pickups: r.total_pickups,
                total_collected_weight: r.total_collected_weight,
                total_collected_amount: r.total_collected_amount,
            }))
        })
        .await
    }

    async fn complaints_for_operator(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Vec<ComplaintDetail>> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let rows: Vec<ComplaintDetailSqlRow> = sql_query(
                "SELECT cm.complaint_id, cm.complaint_type, cm.description, cm.status, \
                        cm.created_at, cm.citizen_id, c.full_name AS citizen_name, \
                        c.phone_number, cm.operator_id, o.full_name AS operator_name, \
                        r.route_name, a.area_name, \
                        EXTRACT(DAY FROM now() - cm.created_at)::BIGINT AS days_open \
                 FROM complaints cm \
                 JOIN citizens c ON c.citizen_id = cm.citizen_id \
                 JOIN areas a ON a.area_id = c.area_id \
                 LEFT JOIN operators o ON o.operator_id = cm.operator_id \
                 LEFT JOIN routes r ON r.route_id = o.route_id \
                 WHERE cm.operator_id = $1 AND cm.status IN ('Open', 'In Progress') \
                 ORDER BY cm.created_at DESC",
            )
            .bind::<Text, _>(&operator_id)
            .load(conn)?;

            rows.into_iter()
                .map(|r| {
                    Ok(ComplaintDetail {
                        complaint_id: r.complaint_id,
                        complaint_type: r.complaint_type,
                        description: r.description,
                        status: parse_complaint_status(&r.status)?,
                        created_at: r.created_at,
                        citizen_id: r.citizen_id,
                        citizen_name: r.citizen_name,
                        phone_number: r.phone_number.unwrap_or_default(),
                        operator_id: r.operator_id,
                        operator_name: r.operator_name,
                        route_name: r.route_name,
                        area_name: r.area_name,
                        days_open: r.days_open,
                    })
                })
                .collect()
        })
        .await
    }

    async fn update_complaint_status(
        &self,
        complaint_id: i64,
        status: ComplaintStatus,
    ) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let rows = diesel::update(complaints::table.find(complaint_id))
                .set(complaints::status.eq(status.as_str()))
                .execute(conn)?;
            Ok(rows > 0)
        })
        .await
    }
}

#[async_trait]
impl GovernmentRepository for PostgresRepository {
    async fn warehouse_inventory(
        &self,
        warehouse_id: Option<i32>,
    ) -> RepositoryResult<Vec<WarehouseInventory>> {
        self.with_conn(move |conn| {
            let rows: Vec<WarehouseInventorySqlRow> = sql_query(
                "SELECT w.warehouse_id, w.warehouse_name, a.area_name, a.city, w.capacity, \
                        w.current_inventory, \
                        (SELECT COUNT(*) FROM warehouse_stock s \
                         WHERE s.warehouse_id = w.warehouse_id) AS category_count \
                 FROM warehouses w \
                 JOIN areas a ON a.area_id = w.area_id \
                 WHERE $1::int IS NULL OR w.warehouse_id = $1 \
                 ORDER BY w.warehouse_id",
            )
            .bind::<Nullable<Integer>, _>(warehouse_id)
            .load(conn)?;

            Ok(rows
                .into_iter()
                .map(|r| {
                    // Derived fields computed here so both backends share the
                    // same arithmetic.
                    let capacity_used_percent = if r.capacity > 0.0 {
                        round_money(r.current_inventory / r.capacity * 100.0)
                    } else {
                        0.0
                    };
                    WarehouseInventory {
                        warehouse_id: r.warehouse_id,
                        warehouse_name: r.warehouse_name,
                        area_name: r.area_name,
                        city: r.city,
                        capacity: r.capacity,
                        current_inventory: r.current_inventory,
                        capacity_used_percent,
                        available_capacity: r.capacity - r.current_inventory,
                        category_count: r.category_count,
                    }
                })
                .collect())
        })
        .await
    }

    async fn list_warehouses(&self) -> RepositoryResult<Vec<Warehouse>> {
        self.with_conn(|conn| {
            let rows: Vec<WarehouseRow> = warehouses::table
                .order(warehouses::warehouse_id.asc())
                .select(WarehouseRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(warehouse_to_api).collect())
        })
        .await
    }

    async fn high_yield_areas(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<HighYieldAreaReport>> {
        self.with_conn(move |conn| {
            let rows: Vec<HighYieldAreaSqlRow> = sql_query(
                "SELECT a.area_id, a.area_name, a.city, \
                        COUNT(w.listing_id) AS total_listings, \
                        COALESCE(SUM(w.weight), 0) AS total_weight, \
                        COALESCE(SUM(w.estimated_price), 0) AS total_revenue, \
                        ROW_NUMBER() OVER (ORDER BY COALESCE(SUM(w.estimated_price), 0) DESC) \
                            AS revenue_rank \
                 FROM areas a \
                 JOIN citizens c ON c.area_id = a.area_id \
                 JOIN waste_listings w ON w.citizen_id = c.citizen_id \
                 WHERE ($1::timestamptz IS NULL OR w.created_at >= $1) \
                   AND ($2::timestamptz IS NULL OR w.created_at <= $2) \
                 GROUP BY a.area_id, a.area_name, a.city \
                 ORDER BY revenue_rank",
            )
            .bind::<Nullable<Timestamptz>, _>(start)
            .bind::<Nullable<Timestamptz>, _>(end)
            .load(conn)?;

            Ok(rows
                .into_iter()
                .map(|r| HighYieldAreaReport {
                    area_id: r.area_id,
                    area_name: r.area_name,
                    city: r.city,
                    total_listings: r.total_listings,
                    total_weight: r.total_weight,
                    total_revenue: round_money(r.total_revenue),
                    revenue_rank: r.revenue_rank,
                })
                .collect())
        })
        .await
    }

    async fn operator_performance_report(
        &self,
    ) -> RepositoryResult<Vec<OperatorPerformanceReport>> {
        self.with_conn(|conn| {
            let rows: Vec<OperatorReportSqlRow> = sql_query(
                "SELECT o.operator_id, o.full_name, \
                        (SELECT COUNT(*) FROM collections col \
                         WHERE col.operator_id = o.operator_id) AS total_collections, \
                        COALESCE((SELECT SUM(col.collected_weight) FROM collections col \
                                  WHERE col.operator_id = o.operator_id), 0) AS total_weight_kg, \
                        (SELECT COUNT(*) FROM complaints cm \
                         WHERE cm.operator_id = o.operator_id) AS complaints \
                 FROM operators o \
                 ORDER BY total_collections DESC",
            )
            .load(conn)?;

            Ok(rows
                .into_iter()
                .map(|r| OperatorPerformanceReport {
                    operator_id: r.operator_id,
                    full_name: r.full_name,
                    total_collections: r.total_collections,
                    total_weight_kg: r.total_weight_kg,
                    complaints: r.complaints,
                    rating: performance_rating(r.total_collections, r.complaints).to_string(),
                })
                .collect())
        })
        .await
    }

    async fn create_category(&self, category: &NewCategory) -> RepositoryResult<i32> {
        let category = category.clone();

        self.with_conn(move |conn| {
            let category_id: i32 = diesel::insert_into(categories::table)
                .values(NewCategoryRow {
                    category_name: category.category_name.clone(),
                    base_price_per_kg: category.base_price_per_kg,
                    description: category.description.clone(),
                })
                .returning(categories::category_id)
                .get_result(conn)
                .map_err(|e| match RepositoryError::from(e) {
                    RepositoryError::ValidationError { .. } => RepositoryError::validation(
                        format!("Category '{}' already exists", category.category_name),
                    ),
                    other => other,
                })?;
            Ok(category_id)
        })
        .await
    }

    async fn update_category_price(
        &self,
        category_id: i32,
        new_price: f64,
    ) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let rows = diesel::update(categories::table.find(category_id))
                    .set(categories::base_price_per_kg.eq(new_price))
                    .execute(tx)?;
                if rows == 0 {
                    return Ok(false);
                }

                // Cascade the new rate into open listings only. ROUND on
                // numeric matches round_money (half away from zero).
                sql_query(
                    "UPDATE waste_listings \
                     SET estimated_price = ROUND((weight * $1)::numeric, 2)::float8 \
                     WHERE category_id = $2 AND status = 'Pending'",
                )
                .bind::<Double, _>(new_price)
                .bind::<Integer, _>(category_id)
                .execute(tx)?;

                Ok(true)
            })
        })
        .await
    }

    async fn delete_category(&self, category_id: i32) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let rows = diesel::delete(categories::table.find(category_id)).execute(conn)?;
            Ok(rows > 0)
        })
        .await
    }

    async fn create_operator(
        &self,
        operator: &NewOperator,
        password_hash: &str,
    ) -> RepositoryResult<String> {
        let operator = operator.clone();
        let password_hash = password_hash.to_string();

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let exists: i64 = users::table
                    .filter(users::user_id.eq(&operator.cnic))
                    .count()
                    .get_result(tx)?;
                if exists > 0 {
                    return Err(RepositoryError::validation(
                        "User with this CNIC already exists",
                    ));
                }

                diesel::insert_into(users::table)
                    .values(NewUserRow {
                        user_id: operator.cnic.clone(),
                        password_hash: password_hash.clone(),
                        role_id: Role::Operator.id(),
                    })
                    .execute(tx)?;

                diesel::insert_into(operators::table)
                    .values(NewOperatorRow {
                        operator_id: operator.cnic.clone(),
                        full_name: operator.full_name.clone(),
                        phone_number: operator.phone_number.clone().unwrap_or_default(),
                        route_id: operator.route_id,
                        warehouse_id: operator.warehouse_id,
                        status: OperatorStatus::Available.as_str().to_string(),
                    })
                    .execute(tx)?;

                Ok(operator.cnic.clone())
            })
        })
        .await
    }

    async fn assign_operator(
        &self,
        operator_id: &str,
        route_id: i32,
        warehouse_id: i32,
    ) -> RepositoryResult<bool> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let route_exists: i64 = routes::table
                .filter(routes::route_id.eq(route_id))
                .count()
                .get_result(conn)?;
            if route_exists == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Route {} not found",
                    route_id
                )));
            }
            let warehouse_exists: i64 = warehouses::table
                .filter(warehouses::warehouse_id.eq(warehouse_id))
                .count()
                .get_result(conn)?;
            if warehouse_exists == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Warehouse {} not found",
                    warehouse_id
                )));
            }

            let rows = diesel::update(operators::table.find(&operator_id))
                .set((
                    operators::route_id.eq(Some(route_id)),
                    operators::warehouse_id.eq(Some(warehouse_id)),
                ))
                .execute(conn)?;
            Ok(rows > 0)
        })
        .await
    }

    async fn deactivate_operator(&self, operator_id: &str) -> RepositoryResult<bool> {
        let operator_id = operator_id.to_string();

        self.with_conn(move |conn| {
            let rows = diesel::update(operators::table.find(&operator_id))
                .set((
                    operators::status.eq(OperatorStatus::Offline.as_str()),
                    operators::route_id.eq(None::<i32>),
                    operators::warehouse_id.eq(None::<i32>),
                ))
                .execute(conn)?;
            Ok(rows > 0)
        })
        .await
    }

    async fn list_operators(&self) -> RepositoryResult<Vec<Operator>> {
        self.with_conn(|conn| {
            let operator_rows: Vec<OperatorRow> = operators::table
                .order(operators::operator_id.asc())
                .select(OperatorRow::as_select())
                .load(conn)?;
            let route_rows: Vec<RouteRow> =
                routes::table.select(RouteRow::as_select()).load(conn)?;
            let warehouse_rows: Vec<WarehouseRow> = warehouses::table
                .select(WarehouseRow::as_select())
                .load(conn)?;

            let routes_by_id: std::collections::HashMap<i32, Route> = route_rows
                .into_iter()
                .map(|r| (r.route_id, route_to_api(r)))
                .collect();
            let warehouses_by_id: std::collections::HashMap<i32, Warehouse> = warehouse_rows
                .into_iter()
                .map(|w| (w.warehouse_id, warehouse_to_api(w)))
                .collect();

            operator_rows
                .into_iter()
                .map(|row| {
                    let route = row.route_id.and_then(|id| routes_by_id.get(&id).cloned());
                    let warehouse = row
                        .warehouse_id
                        .and_then(|id| warehouses_by_id.get(&id).cloned());
                    operator_to_api(row, route, warehouse)
                })
                .collect()
        })
        .await
    }

    async fn list_complaints(
        &self,
        status: Option<ComplaintStatus>,
    ) -> RepositoryResult<Vec<Complaint>> {
        self.with_conn(move |conn| {
            let mut query = complaints::table
                .select(ComplaintRow::as_select())
                .into_boxed();
            if let Some(status) = status {
                query = query.filter(complaints::status.eq(status.as_str()));
            }
            let rows: Vec<ComplaintRow> = query.order(complaints::created_at.desc()).load(conn)?;

            rows.into_iter().map(complaint_to_api).collect()
        })
        .await
    }

    async fn list_routes(&self) -> RepositoryResult<Vec<Route>> {
        self.with_conn(|conn| {
            let rows: Vec<RouteRow> = routes::table
                .order(routes::route_id.asc())
                .select(RouteRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(route_to_api).collect())
        })
        .await
    }
}
