//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap and Vec structures, providing fast, deterministic,
//! and isolated execution.
//!
//! Every mutating operation validates its inputs before touching the store,
//! so a failed operation leaves no partial writes, mirroring the
//! whole-transaction rollback of the Postgres backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{
    performance_rating, round_money, Area, AuthenticatedUser, Category, Citizen, CitizenProfile,
    CitizenRegistration, Collection, CollectionId, CollectionOutcome, CollectionPoint,
    CollectionRequest, Complaint, ComplaintDetail, ComplaintStatus, CreatedListing,
    HighYieldAreaReport, ListingId, ListingStatus, NewCategory, NewListing, NewOperator, Operator,
    OperatorPerformance, OperatorPerformanceReport, OperatorStatus, PaymentStatus, Role, Route,
    TransactionId, TransactionRecord, Warehouse, WarehouseInventory, WarehouseStock, WasteListing,
};
use crate::db::repositories::new_verification_code;
use crate::db::repository::{
    AuthRepository, CitizenRepository, GovernmentRepository, OperatorRepository, RepositoryError,
    RepositoryResult,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use smartwaste::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// let area_id = repo.seed_area("Gulberg", "Lahore");
/// assert!(area_id > 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Debug, Clone)]
struct UserRow {
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct OperatorRow {
    full_name: String,
    phone_number: String,
    route_id: Option<i32>,
    warehouse_id: Option<i32>,
    status: OperatorStatus,
}

#[derive(Debug, Clone)]
struct ListingRow {
    listing_id: i64,
    created_at: DateTime<Utc>,
    citizen_id: String,
    category_id: i32,
    weight: f64,
    status: ListingStatus,
    estimated_price: Option<f64>,
    transaction_id: Option<i64>,
}

struct LocalData {
    users: HashMap<String, UserRow>,
    citizens: HashMap<String, Citizen>,
    operators: HashMap<String, OperatorRow>,
    areas: HashMap<i32, Area>,
    categories: HashMap<i32, Category>,
    routes: HashMap<i32, Route>,
    warehouses: HashMap<i32, Warehouse>,
    stock: HashMap<(i32, i32), WarehouseStock>,
    listings: HashMap<i64, ListingRow>,
    collections: Vec<Collection>,
    transactions: Vec<TransactionRecord>,
    complaints: HashMap<i64, Complaint>,

    // ID counters
    next_area_id: i32,
    next_category_id: i32,
    next_route_id: i32,
    next_warehouse_id: i32,
    next_listing_id: i64,
    next_collection_id: i64,
    next_transaction_id: i64,
    next_complaint_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            citizens: HashMap::new(),
            operators: HashMap::new(),
            areas: HashMap::new(),
            categories: HashMap::new(),
            routes: HashMap::new(),
            warehouses: HashMap::new(),
            stock: HashMap::new(),
            listings: HashMap::new(),
            collections: Vec::new(),
            transactions: Vec::new(),
            complaints: HashMap::new(),
            next_area_id: 1,
            next_category_id: 1,
            next_route_id: 1,
            next_warehouse_id: 1,
            next_listing_id: 1,
            next_collection_id: 1,
            next_transaction_id: 1,
            next_complaint_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    // ==================== Seed helpers for tests and local dev ====================

    /// Add an area, returning its id.
    pub fn seed_area(&self, area_name: &str, city: &str) -> i32 {
        let mut data = self.data.write();
        let area_id = data.next_area_id;
        data.next_area_id += 1;
        data.areas.insert(
            area_id,
            Area {
                area_id,
                area_name: area_name.to_string(),
                city: city.to_string(),
            },
        );
        area_id
    }

    /// Add a route in an area, returning its id.
    pub fn seed_route(&self, route_name: &str, area_id: i32) -> i32 {
        let mut data = self.data.write();
        let route_id = data.next_route_id;
        data.next_route_id += 1;
        data.routes.insert(
            route_id,
            Route {
                route_id,
                route_name: route_name.to_string(),
                area_id,
            },
        );
        route_id
    }

    /// Add a warehouse, returning its id.
    pub fn seed_warehouse(&self, warehouse_name: &str, area_id: i32, capacity: f64) -> i32 {
        let mut data = self.data.write();
        let warehouse_id = data.next_warehouse_id;
        data.next_warehouse_id += 1;
        data.warehouses.insert(
            warehouse_id,
            Warehouse {
                warehouse_id,
                warehouse_name: warehouse_name.to_string(),
                area_id,
                address: format!("{} depot", warehouse_name),
                capacity,
                current_inventory: 0.0,
            },
        );
        warehouse_id
    }

    /// File a complaint, returning its id.
    pub fn seed_complaint(
        &self,
        citizen_id: &str,
        operator_id: Option<&str>,
        complaint_type: &str,
        description: &str,
    ) -> i64 {
        let mut data = self.data.write();
        let complaint_id = data.next_complaint_id;
        data.next_complaint_id += 1;
        data.complaints.insert(
            complaint_id,
            Complaint {
                complaint_id,
                citizen_id: citizen_id.to_string(),
                operator_id: operator_id.map(|s| s.to_string()),
                complaint_type: complaint_type.to_string(),
                description: description.to_string(),
                status: ComplaintStatus::Open,
                created_at: Utc::now(),
            },
        );
        complaint_id
    }

    /// Number of stored listings (test inspection).
    pub fn listing_count(&self) -> usize {
        self.data.read().listings.len()
    }

    /// Number of stored collections (test inspection).
    pub fn collection_count(&self) -> usize {
        self.data.read().collections.len()
    }

    /// Current stock weight for a (warehouse, category) pair (test inspection).
    pub fn stock_weight(&self, warehouse_id: i32, category_id: i32) -> f64 {
        self.data
            .read()
            .stock
            .get(&(warehouse_id, category_id))
            .map(|s| s.current_weight)
            .unwrap_or(0.0)
    }

    /// Check whether a user row exists (test inspection).
    pub fn has_user(&self, cnic: &str) -> bool {
        self.data.read().users.contains_key(cnic)
    }

    // ==================== Internal helpers ====================

    fn check_health(data: &LocalData) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn listing_to_api(data: &LocalData, row: &ListingRow) -> WasteListing {
        WasteListing {
            listing_id: ListingId(row.listing_id),
            created_at: row.created_at,
            citizen_id: row.citizen_id.clone(),
            category_id: row.category_id,
            category_name: data
                .categories
                .get(&row.category_id)
                .map(|c| c.category_name.clone())
                .unwrap_or_default(),
            weight: row.weight,
            status: row.status,
            estimated_price: row.estimated_price,
            transaction_id: row.transaction_id.map(TransactionId),
        }
    }

    fn operator_to_api(data: &LocalData, operator_id: &str, row: &OperatorRow) -> Operator {
        Operator {
            operator_id: operator_id.to_string(),
            full_name: row.full_name.clone(),
            phone_number: row.phone_number.clone(),
            route_id: row.route_id,
            warehouse_id: row.warehouse_id,
            status: row.status,
            route: row.route_id.and_then(|id| data.routes.get(&id).cloned()),
            warehouse: row
                .warehouse_id
                .and_then(|id| data.warehouses.get(&id).cloned()),
        }
    }

    /// Apply a stock increment and keep the warehouse running total in step.
    fn bump_stock(data: &mut LocalData, warehouse_id: i32, category_id: i32, quantity: f64) {
        let now = Utc::now();
        let entry = data
            .stock
            .entry((warehouse_id, category_id))
            .or_insert(WarehouseStock {
                warehouse_id,
                category_id,
                current_weight: 0.0,
                last_updated: now,
            });
        entry.current_weight += quantity;
        entry.last_updated = now;

        if let Some(warehouse) = data.warehouses.get_mut(&warehouse_id) {
            warehouse.current_inventory += quantity;
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn authenticate(
        &self,
        cnic: &str,
        password_hash: &str,
    ) -> RepositoryResult<Option<AuthenticatedUser>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let user = match data.users.get(cnic) {
            Some(u) if u.password_hash == password_hash => u,
            _ => return Ok(None),
        };

        let citizen_id = match user.role {
            Role::Citizen if data.citizens.contains_key(cnic) => Some(cnic.to_string()),
            _ => None,
        };
        let operator_id = match user.role {
            Role::Operator if data.operators.contains_key(cnic) => Some(cnic.to_string()),
            _ => None,
        };

        Ok(Some(AuthenticatedUser {
            user_id: cnic.to_string(),
            role: user.role,
            citizen_id,
            operator_id,
        }))
    }
}

#[async_trait]
impl CitizenRepository for LocalRepository {
    async fn register_citizen(
        &self,
        registration: &CitizenRegistration,
        password_hash: &str,
    ) -> RepositoryResult<String> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        if data.users.contains_key(&registration.cnic) {
            return Err(RepositoryError::validation(
                "User with this CNIC already exists",
            ));
        }
        if !data.areas.contains_key(&registration.area_id) {
            return Err(RepositoryError::not_found(format!(
                "Area {} not found",
                registration.area_id
            )));
        }

        data.users.insert(
            registration.cnic.clone(),
            UserRow {
                password_hash: password_hash.to_string(),
                role: Role::Citizen,
                created_at: Utc::now(),
            },
        );
        data.citizens.insert(
            registration.cnic.clone(),
            Citizen {
                citizen_id: registration.cnic.clone(),
                full_name: registration.full_name.clone(),
                phone_number: registration.phone_number.clone(),
                area_id: registration.area_id,
                address: registration.address.clone(),
            },
        );

        Ok(registration.cnic.clone())
    }

    async fn create_listing(&self, listing: &NewListing) -> RepositoryResult<CreatedListing> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        if !data.citizens.contains_key(&listing.citizen_id) {
            return Err(RepositoryError::not_found(format!(
                "Citizen {} not found",
                listing.citizen_id
            )));
        }
        let rate = data
            .categories
            .get(&listing.category_id)
            .map(|c| c.base_price_per_kg)
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Category {} not found", listing.category_id))
            })?;

        let estimated_price = round_money(listing.weight * rate);
        let created_at = Utc::now();
        let listing_id = data.next_listing_id;
        data.next_listing_id += 1;

        data.listings.insert(
            listing_id,
            ListingRow {
                listing_id,
                created_at,
                citizen_id: listing.citizen_id.clone(),
                category_id: listing.category_id,
                weight: listing.weight,
                status: ListingStatus::Pending,
                estimated_price: Some(estimated_price),
                transaction_id: None,
            },
        );

        Ok(CreatedListing {
            listing_id: ListingId(listing_id),
            created_at,
            estimated_price,
        })
    }

    async fn listings_for_citizen(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Vec<WasteListing>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut listings: Vec<WasteListing> = data
            .listings
            .values()
            .filter(|l| l.citizen_id == citizen_id)
            .map(|l| Self::listing_to_api(&data, l))
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn cancel_listing(
        &self,
        listing_id: ListingId,
        citizen_id: &str,
    ) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        match data.listings.get_mut(&listing_id.value()) {
            Some(row)
                if row.citizen_id == citizen_id && row.status == ListingStatus::Pending =>
            {
                row.status = ListingStatus::Cancelled;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn calculate_price(&self, category_id: i32, weight: f64) -> RepositoryResult<f64> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let rate = data
            .categories
            .get(&category_id)
            .map(|c| c.base_price_per_kg)
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Category {} not found", category_id))
            })?;
        Ok(round_money(weight * rate))
    }

    async fn transactions_for_citizen(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut records: Vec<TransactionRecord> = data
            .transactions
            .iter()
            .filter(|t| t.citizen_id == citizen_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(records)
    }

    async fn citizen_profile(
        &self,
        citizen_id: &str,
    ) -> RepositoryResult<Option<CitizenProfile>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let citizen = match data.citizens.get(citizen_id) {
            Some(c) => c,
            None => return Ok(None),
        };
        let area = data.areas.get(&citizen.area_id);
        let member_since = data
            .users
            .get(citizen_id)
            .map(|u| u.created_at)
            .unwrap_or_else(Utc::now);

        Ok(Some(CitizenProfile {
            citizen_id: citizen.citizen_id.clone(),
            full_name: citizen.full_name.clone(),
            phone_number: citizen.phone_number.clone().unwrap_or_default(),
            address: citizen.address.clone(),
            area_id: citizen.area_id,
            area_name: area.map(|a| a.area_name.clone()).unwrap_or_default(),
            city: area.map(|a| a.city.clone()).unwrap_or_default(),
            member_since,
        }))
    }

    async fn list_areas(&self) -> RepositoryResult<Vec<Area>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut areas: Vec<Area> = data.areas.values().cloned().collect();
        areas.sort_by(|a, b| (&a.city, &a.area_name).cmp(&(&b.city, &b.area_name)));
        Ok(areas)
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut categories: Vec<Category> = data.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.category_name.cmp(&b.category_name));
        Ok(categories)
    }

    async fn get_category(&self, category_id: i32) -> RepositoryResult<Option<Category>> {
        let data = self.data.read();
        Self::check_health(&data)?;
        Ok(data.categories.get(&category_id).cloned())
    }
}

#[async_trait]
impl OperatorRepository for LocalRepository {
    async fn operator_details(&self, operator_id: &str) -> RepositoryResult<Option<Operator>> {
        let data = self.data.read();
        Self::check_health(&data)?;
        Ok(data
            .operators
            .get(operator_id)
            .map(|row| Self::operator_to_api(&data, operator_id, row)))
    }

    async fn collection_points(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Vec<CollectionPoint>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let operator = match data.operators.get(operator_id) {
            Some(o) => o,
            None => return Ok(Vec::new()),
        };
        let route = operator.route_id.and_then(|id| data.routes.get(&id));
        let area_id = match route.map(|r| r.area_id) {
            Some(id) => id,
            // No route assignment means no collection points.
            None => return Ok(Vec::new()),
        };
        let area_name = data
            .areas
            .get(&area_id)
            .map(|a| a.area_name.clone())
            .unwrap_or_default();

        let mut points: Vec<CollectionPoint> = data
            .listings
            .values()
            .filter(|l| l.status == ListingStatus::Pending)
            .filter_map(|l| {
                let citizen = data.citizens.get(&l.citizen_id)?;
                if citizen.area_id != area_id {
                    return None;
                }
                Some(CollectionPoint {
                    operator_id: operator_id.to_string(),
                    operator_name: operator.full_name.clone(),
                    route_id: operator.route_id,
                    route_name: route.map(|r| r.route_name.clone()),
                    listing_id: ListingId(l.listing_id),
                    citizen_id: citizen.citizen_id.clone(),
                    citizen_name: citizen.full_name.clone(),
                    phone_number: citizen.phone_number.clone().unwrap_or_default(),
                    address: citizen.address.clone(),
                    area_name: area_name.clone(),
                    category_name: data
                        .categories
                        .get(&l.category_id)
                        .map(|c| c.category_name.clone())
                        .unwrap_or_default(),
                    weight: l.weight,
                    estimated_price: l.estimated_price,
                    status: l.status,
                })
            })
            .collect();
        points.sort_by_key(|p| p.listing_id);
        Ok(points)
    }

    async fn collect_waste(
        &self,
        request: &CollectionRequest,
    ) -> RepositoryResult<CollectionOutcome> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        // Validate everything up front; nothing below this block fails, so a
        // rejected request leaves the store untouched.
        if !data.operators.contains_key(&request.operator_id) {
            return Err(RepositoryError::not_found(format!(
                "Operator {} not found",
                request.operator_id
            )));
        }
        if !data.warehouses.contains_key(&request.warehouse_id) {
            return Err(RepositoryError::not_found(format!(
                "Warehouse {} not found",
                request.warehouse_id
            )));
        }
        let (listing_id, citizen_id, category_id) =
            match data.listings.get(&request.listing_id.value()) {
                None => {
                    return Err(RepositoryError::not_found(format!(
                        "Listing {} not found",
                        request.listing_id
                    )))
                }
                Some(row) if row.status != ListingStatus::Pending => {
                    return Err(RepositoryError::validation(format!(
                        "Listing {} is not pending (status: {})",
                        request.listing_id, row.status
                    )))
                }
                Some(row) => (row.listing_id, row.citizen_id.clone(), row.category_id),
            };

        let collected_date = Utc::now();
        let collection_id = data.next_collection_id;
        data.next_collection_id += 1;

        data.collections.push(Collection {
            collection_id: CollectionId(collection_id),
            collected_date,
            operator_id: request.operator_id.clone(),
            listing_id: ListingId(listing_id),
            warehouse_id: request.warehouse_id,
            collected_weight: request.collected_weight,
            photo_proof: None,
            is_verified: true,
        });

        if let Some(row) = data.listings.get_mut(&listing_id) {
            row.status = ListingStatus::Collected;
        }

        Self::bump_stock(
            &mut data,
            request.warehouse_id,
            category_id,
            request.collected_weight,
        );

        // Payment runs only when the category still has pricing data.
        let mut transaction_id = None;
        let mut payment_amount = None;
        let mut verification_code = None;
        if let Some(rate) = data.categories.get(&category_id).map(|c| c.base_price_per_kg) {
            let amount = round_money(request.collected_weight * rate);
            let code = new_verification_code();
            let txn_id = data.next_transaction_id;
            data.next_transaction_id += 1;

            data.transactions.push(TransactionRecord {
                transaction_id: TransactionId(txn_id),
                transaction_date: collected_date,
                citizen_id,
                operator_id: Some(request.operator_id.clone()),
                total_amount: amount,
                payment_status: PaymentStatus::Pending,
                payment_method: Some("Cash".to_string()),
                verification_code: Some(code.clone()),
            });
            if let Some(row) = data.listings.get_mut(&listing_id) {
                row.transaction_id = Some(txn_id);
            }

            transaction_id = Some(TransactionId(txn_id));
            payment_amount = Some(amount);
            verification_code = Some(code);
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
    }

    async fn deposit_waste(
        &self,
        warehouse_id: i32,
        category_id: i32,
        quantity: f64,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        if !data.warehouses.contains_key(&warehouse_id) {
            return Err(RepositoryError::not_found(format!(
                "Warehouse {} not found",
                warehouse_id
            )));
        }
        Self::bump_stock(&mut data, warehouse_id, category_id, quantity);
        Ok(())
    }

    async fn collection_history(&self, operator_id: &str) -> RepositoryResult<Vec<Collection>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut history: Vec<Collection> = data
            .collections
            .iter()
            .filter(|c| c.operator_id == operator_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.collected_date.cmp(&a.collected_date));
        history.truncate(100);
        Ok(history)
    }

    async fn operator_performance(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Option<OperatorPerformance>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let operator = match data.operators.get(operator_id) {
            Some(o) => o,
            None => return Ok(None),
        };

        let pickups: Vec<&Collection> = data
            .collections
            .iter()
            .filter(|c| c.operator_id == operator_id)
            .collect();
        let total_collected_amount = data
            .transactions
            .iter()
            .filter(|t| t.operator_id.as_deref() == Some(operator_id))
            .map(|t| t.total_amount)
            .sum();

        Ok(Some(OperatorPerformance {
            operator_id: operator_id.to_string(),
            full_name: operator.full_name.clone(),
            phone_number: operator.phone_number.clone(),
            route_id: operator.route_id,
            warehouse_id: operator.warehouse_id,
            total_pickups: pickups.len() as i64,
            total_collected_weight: pickups.iter().map(|c| c.collected_weight).sum(),
            total_collected_amount,
        }))
    }

    async fn complaints_for_operator(
        &self,
        operator_id: &str,
    ) -> RepositoryResult<Vec<ComplaintDetail>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let now = Utc::now();
        let mut complaints: Vec<ComplaintDetail> = data
            .complaints
            .values()
            .filter(|c| c.operator_id.as_deref() == Some(operator_id))
            .filter(|c| {
                matches!(c.status, ComplaintStatus::Open | ComplaintStatus::InProgress)
            })
            .map(|c| complaint_detail(&data, c, now))
            .collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(complaints)
    }

    async fn update_complaint_status(
        &self,
        complaint_id: i64,
        status: ComplaintStatus,
    ) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        match data.complaints.get_mut(&complaint_id) {
            Some(complaint) => {
                complaint.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl GovernmentRepository for LocalRepository {
    async fn warehouse_inventory(
        &self,
        warehouse_id: Option<i32>,
    ) -> RepositoryResult<Vec<WarehouseInventory>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut rows: Vec<WarehouseInventory> = data
            .warehouses
            .values()
            .filter(|w| warehouse_id.is_none_or(|id| w.warehouse_id == id))
            .map(|w| {
                let area = data.areas.get(&w.area_id);
                let category_count = data
                    .stock
                    .keys()
                    .filter(|(wid, _)| *wid == w.warehouse_id)
                    .count() as i64;
                let capacity_used_percent = if w.capacity > 0.0 {
                    round_money(w.current_inventory / w.capacity * 100.0)
                } else {
                    0.0
                };
                WarehouseInventory {
                    warehouse_id: w.warehouse_id,
                    warehouse_name: w.warehouse_name.clone(),
                    area_name: area.map(|a| a.area_name.clone()).unwrap_or_default(),
                    city: area.map(|a| a.city.clone()).unwrap_or_default(),
                    capacity: w.capacity,
                    current_inventory: w.current_inventory,
                    capacity_used_percent,
                    available_capacity: w.capacity - w.current_inventory,
                    category_count,
                }
            })
            .collect();
        rows.sort_by_key(|r| r.warehouse_id);
        Ok(rows)
    }

    async fn list_warehouses(&self) -> RepositoryResult<Vec<Warehouse>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut warehouses: Vec<Warehouse> = data.warehouses.values().cloned().collect();
        warehouses.sort_by_key(|w| w.warehouse_id);
        Ok(warehouses)
    }

    async fn high_yield_areas(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<HighYieldAreaReport>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut per_area: HashMap<i32, (i64, f64, f64)> = HashMap::new();
        for listing in data.listings.values() {
            if start.is_some_and(|s| listing.created_at < s)
                || end.is_some_and(|e| listing.created_at > e)
            {
                continue;
            }
            let Some(citizen) = data.citizens.get(&listing.citizen_id) else {
                continue;
            };
            let entry = per_area.entry(citizen.area_id).or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += listing.weight;
            entry.2 += listing.estimated_price.unwrap_or(0.0);
        }

        let mut reports: Vec<HighYieldAreaReport> = per_area
            .into_iter()
            .filter_map(|(area_id, (total_listings, total_weight, total_revenue))| {
                let area = data.areas.get(&area_id)?;
                Some(HighYieldAreaReport {
                    area_id,
                    area_name: area.area_name.clone(),
                    city: area.city.clone(),
                    total_listings,
                    total_weight,
                    total_revenue: round_money(total_revenue),
                    revenue_rank: 0,
                })
            })
            .collect();

        reports.sort_by(|a, b| {
            b.total_revenue
                .partial_cmp(&a.total_revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (index, report) in reports.iter_mut().enumerate() {
            report.revenue_rank = index as i64 + 1;
        }
        Ok(reports)
    }

    async fn operator_performance_report(
        &self,
    ) -> RepositoryResult<Vec<OperatorPerformanceReport>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut reports: Vec<OperatorPerformanceReport> = data
            .operators
            .iter()
            .map(|(operator_id, row)| {
                let pickups: Vec<&Collection> = data
                    .collections
                    .iter()
                    .filter(|c| &c.operator_id == operator_id)
                    .collect();
                let complaints = data
                    .complaints
                    .values()
                    .filter(|c| c.operator_id.as_deref() == Some(operator_id.as_str()))
                    .count() as i64;
                let total_collections = pickups.len() as i64;
                OperatorPerformanceReport {
                    operator_id: operator_id.clone(),
                    full_name: row.full_name.clone(),
                    total_collections,
                    total_weight_kg: pickups.iter().map(|c| c.collected_weight).sum(),
                    complaints,
                    rating: performance_rating(total_collections, complaints).to_string(),
                }
            })
            .collect();
        reports.sort_by(|a, b| b.total_collections.cmp(&a.total_collections));
        Ok(reports)
    }

    async fn create_category(&self, category: &NewCategory) -> RepositoryResult<i32> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        let duplicate = data
            .categories
            .values()
            .any(|c| c.category_name == category.category_name);
        if duplicate {
            return Err(RepositoryError::validation(format!(
                "Category '{}' already exists",
                category.category_name
            )));
        }

        let category_id = data.next_category_id;
        data.next_category_id += 1;
        data.categories.insert(
            category_id,
            Category {
                category_id,
                category_name: category.category_name.clone(),
                base_price_per_kg: category.base_price_per_kg,
                description: category.description.clone(),
            },
        );
        Ok(category_id)
    }

    async fn update_category_price(
        &self,
        category_id: i32,
        new_price: f64,
    ) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        match data.categories.get_mut(&category_id) {
            Some(category) => category.base_price_per_kg = new_price,
            None => return Ok(false),
        }

        // Cascade the new rate into open listings only.
        for listing in data.listings.values_mut() {
            if listing.category_id == category_id && listing.status == ListingStatus::Pending {
                listing.estimated_price = Some(round_money(listing.weight * new_price));
            }
        }
        Ok(true)
    }

    async fn delete_category(&self, category_id: i32) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;
        Ok(data.categories.remove(&category_id).is_some())
    }

    async fn create_operator(
        &self,
        operator: &NewOperator,
        password_hash: &str,
    ) -> RepositoryResult<String> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        if data.users.contains_key(&operator.cnic) {
            return Err(RepositoryError::validation(
                "User with this CNIC already exists",
            ));
        }

        data.users.insert(
            operator.cnic.clone(),
            UserRow {
                password_hash: password_hash.to_string(),
                role: Role::Operator,
                created_at: Utc::now(),
            },
        );
        data.operators.insert(
            operator.cnic.clone(),
            OperatorRow {
                full_name: operator.full_name.clone(),
                phone_number: operator.phone_number.clone().unwrap_or_default(),
                route_id: operator.route_id,
                warehouse_id: operator.warehouse_id,
                status: OperatorStatus::Available,
            },
        );
        Ok(operator.cnic.clone())
    }

    async fn assign_operator(
        &self,
        operator_id: &str,
        route_id: i32,
        warehouse_id: i32,
    ) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        if !data.routes.contains_key(&route_id) {
            return Err(RepositoryError::not_found(format!(
                "Route {} not found",
                route_id
            )));
        }
        if !data.warehouses.contains_key(&warehouse_id) {
            return Err(RepositoryError::not_found(format!(
                "Warehouse {} not found",
                warehouse_id
            )));
        }
        match data.operators.get_mut(operator_id) {
            Some(operator) => {
                operator.route_id = Some(route_id);
                operator.warehouse_id = Some(warehouse_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate_operator(&self, operator_id: &str) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;

        match data.operators.get_mut(operator_id) {
            Some(operator) => {
                operator.status = OperatorStatus::Offline;
                operator.route_id = None;
                operator.warehouse_id = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_operators(&self) -> RepositoryResult<Vec<Operator>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut operators: Vec<Operator> = data
            .operators
            .iter()
            .map(|(id, row)| Self::operator_to_api(&data, id, row))
            .collect();
        operators.sort_by(|a, b| a.operator_id.cmp(&b.operator_id));
        Ok(operators)
    }

    async fn list_complaints(
        &self,
        status: Option<ComplaintStatus>,
    ) -> RepositoryResult<Vec<Complaint>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut complaints: Vec<Complaint> = data
            .complaints
            .values()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(complaints)
    }

    async fn list_routes(&self) -> RepositoryResult<Vec<Route>> {
        let data = self.data.read();
        Self::check_health(&data)?;

        let mut routes: Vec<Route> = data.routes.values().cloned().collect();
        routes.sort_by_key(|r| r.route_id);
        Ok(routes)
    }
}

fn complaint_detail(data: &LocalData, complaint: &Complaint, now: DateTime<Utc>) -> ComplaintDetail {
    let citizen = data.citizens.get(&complaint.citizen_id);
    let operator = complaint
        .operator_id
        .as_deref()
        .and_then(|id| data.operators.get(id));
    let route = operator
        .and_then(|o| o.route_id)
        .and_then(|id| data.routes.get(&id));
    let area = citizen.and_then(|c| data.areas.get(&c.area_id));

    ComplaintDetail {
        complaint_id: complaint.complaint_id,
        complaint_type: complaint.complaint_type.clone(),
        description: complaint.description.clone(),
        status: complaint.status,
        created_at: complaint.created_at,
        citizen_id: complaint.citizen_id.clone(),
        citizen_name: citizen.map(|c| c.full_name.clone()).unwrap_or_default(),
        phone_number: citizen
            .and_then(|c| c.phone_number.clone())
            .unwrap_or_default(),
        operator_id: complaint.operator_id.clone(),
        operator_name: operator.map(|o| o.full_name.clone()),
        route_name: route.map(|r| r.route_name.clone()),
        area_name: area.map(|a| a.area_name.clone()).unwrap_or_default(),
        days_open: (now - complaint.created_at).num_days(),
    }
}
