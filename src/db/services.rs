//! High-level business logic functions.
//!
//! These functions sit between the HTTP handlers and the repository traits:
//! input validation and password hashing happen here, storage semantics stay
//! in the repository implementations. Every function works with any
//! `FullRepository` backend.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::api::{
    round_money, Area, Category, CitizenProfile, CitizenRegistration, Collection,
    CollectionOutcome, CollectionPoint, CollectionRequest, Complaint, ComplaintDetail,
    ComplaintStatus, CreatedListing, CreatedOperator, HighYieldAreaReport, ListingId, LoginResult,
    NewCategory, NewListing, NewOperator, Operator, OperatorPerformance,
    OperatorPerformanceReport, PriceEstimate, Route, TransactionRecord, Warehouse,
    WarehouseDeposit, WarehouseInventory, WasteListing,
};
use crate::auth::hash_password;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::validation;

/// Check whether the backing store is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Authentication ====================

/// Authenticate a user by CNIC and password.
///
/// Any mismatch produces the same generic failure result; errors are
/// returned only for infrastructure problems.
pub async fn login(
    repo: &dyn FullRepository,
    cnic: &str,
    password: &str,
) -> RepositoryResult<LoginResult> {
    let password_hash = hash_password(password);
    debug!("Login attempt for {}", cnic);

    match repo.authenticate(cnic, &password_hash).await? {
        Some(user) => Ok(LoginResult {
            success: true,
            message: "Login successful".to_string(),
            user_id: Some(user.user_id),
            role_id: Some(user.role.id()),
            role_name: Some(user.role.name().to_string()),
            citizen_id: user.citizen_id,
            operator_id: user.operator_id,
        }),
        None => Ok(LoginResult::invalid_credentials()),
    }
}

// ==================== Citizen operations ====================

/// Register a new citizen account.
///
/// Validates the CNIC, name, and phone formats, then creates the user row
/// and citizen profile in one repository transaction.
pub async fn register_citizen(
    repo: &dyn FullRepository,
    registration: &CitizenRegistration,
) -> RepositoryResult<String> {
    if !validation::validate_cnic(&registration.cnic) {
        return Err(RepositoryError::validation(
            "CNIC must be in format: 12345-1234567-1",
        ));
    }
    if !validation::validate_required(&registration.full_name) {
        return Err(RepositoryError::validation("Full name is required"));
    }
    if let Some(phone) = registration.phone_number.as_deref() {
        if !phone.trim().is_empty() && !validation::validate_phone(phone) {
            return Err(RepositoryError::validation(
                "Phone must be in format: 03XXXXXXXXX",
            ));
        }
    }
    if registration.password.is_empty() {
        return Err(RepositoryError::validation("Password is required"));
    }

    let registration = CitizenRegistration {
        full_name: validation::sanitize(&registration.full_name),
        ..registration.clone()
    };
    let password_hash = hash_password(&registration.password);

    let citizen_id = repo.register_citizen(&registration, &password_hash).await?;
    info!("Registered citizen {}", citizen_id);
    Ok(citizen_id)
}

/// Create a waste listing after validating the weight range.
pub async fn create_listing(
    repo: &dyn FullRepository,
    listing: &NewListing,
) -> RepositoryResult<CreatedListing> {
    if !validation::validate_required(&listing.citizen_id) {
        return Err(RepositoryError::validation("Citizen ID is required"));
    }
    if !validation::validate_weight(listing.weight) {
        return Err(RepositoryError::validation(format!(
            "Weight must be between {} and {} kg",
            validation::MIN_WEIGHT_KG,
            validation::MAX_WEIGHT_KG
        )));
    }

    repo.create_listing(listing).await
}

/// All listings for a citizen, newest first.
pub async fn my_listings(
    repo: &dyn FullRepository,
    citizen_id: &str,
) -> RepositoryResult<Vec<WasteListing>> {
    repo.listings_for_citizen(citizen_id).await
}

/// Cancel a pending listing owned by the citizen.
pub async fn cancel_listing(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    citizen_id: &str,
) -> RepositoryResult<bool> {
    repo.cancel_listing(listing_id, citizen_id).await
}

/// Price for a (category, weight) pair.
pub async fn calculate_price(
    repo: &dyn FullRepository,
    category_id: i32,
    weight: f64,
) -> RepositoryResult<f64> {
    if !validation::validate_weight(weight) {
        return Err(RepositoryError::validation(format!(
            "Weight must be between {} and {} kg",
            validation::MIN_WEIGHT_KG,
            validation::MAX_WEIGHT_KG
        )));
    }
    repo.calculate_price(category_id, weight).await
}

/// Detailed price estimate with category information.
pub async fn price_estimate(
    repo: &dyn FullRepository,
    category_id: i32,
    weight: f64,
) -> RepositoryResult<PriceEstimate> {
    let category = repo.get_category(category_id).await?.ok_or_else(|| {
        RepositoryError::not_found(format!("Category {} not found", category_id))
    })?;
    let estimated_price = calculate_price(repo, category_id, weight).await?;

    Ok(PriceEstimate {
        category_id,
        category_name: category.category_name,
        weight,
        base_price_per_kg: category.base_price_per_kg,
        estimated_price,
    })
}

/// Payment history for a citizen, newest first.
pub async fn my_transactions(
    repo: &dyn FullRepository,
    citizen_id: &str,
) -> RepositoryResult<Vec<TransactionRecord>> {
    repo.transactions_for_citizen(citizen_id).await
}

/// Citizen profile with area detail.
pub async fn my_profile(
    repo: &dyn FullRepository,
    citizen_id: &str,
) -> RepositoryResult<Option<CitizenProfile>> {
    repo.citizen_profile(citizen_id).await
}

/// Reference data: all areas.
pub async fn areas(repo: &dyn FullRepository) -> RepositoryResult<Vec<Area>> {
    repo.list_areas().await
}

/// Reference data: all waste categories.
pub async fn categories(repo: &dyn FullRepository) -> RepositoryResult<Vec<Category>> {
    repo.list_categories().await
}

// ==================== Operator operations ====================

/// Operator details with assigned route and warehouse.
pub async fn operator_details(
    repo: &dyn FullRepository,
    operator_id: &str,
) -> RepositoryResult<Option<Operator>> {
    repo.operator_details(operator_id).await
}

/// Pending collection points on the operator's route.
pub async fn collection_points(
    repo: &dyn FullRepository,
    operator_id: &str,
) -> RepositoryResult<Vec<CollectionPoint>> {
    repo.collection_points(operator_id).await
}

/// Collect waste from a listing and process the payment.
pub async fn collect_waste(
    repo: &dyn FullRepository,
    request: &CollectionRequest,
) -> RepositoryResult<CollectionOutcome> {
    if !validation::validate_required(&request.operator_id) {
        return Err(RepositoryError::validation("Operator ID is required"));
    }
    if !validation::validate_weight(request.collected_weight) {
        return Err(RepositoryError::validation(format!(
            "Collected weight must be between {} and {} kg",
            validation::MIN_WEIGHT_KG,
            validation::MAX_WEIGHT_KG
        )));
    }

    let outcome = repo.collect_waste(request).await?;
    info!(
        "Operator {} collected listing {} (collection {})",
        request.operator_id, request.listing_id, outcome.collection_id
    );
    Ok(outcome)
}

/// Deposit collected waste at a warehouse.
pub async fn deposit_waste(
    repo: &dyn FullRepository,
    deposit: &WarehouseDeposit,
) -> RepositoryResult<()> {
    if deposit.quantity <= 0.0 {
        return Err(RepositoryError::validation("Quantity must be positive"));
    }
    repo.deposit_waste(deposit.warehouse_id, deposit.category_id, deposit.quantity)
        .await
}

/// Recent collection history for an operator.
pub async fn collection_history(
    repo: &dyn FullRepository,
    operator_id: &str,
) -> RepositoryResult<Vec<Collection>> {
    repo.collection_history(operator_id).await
}

/// Lifetime performance statistics for an operator.
pub async fn my_performance(
    repo: &dyn FullRepository,
    operator_id: &str,
) -> RepositoryResult<Option<OperatorPerformance>> {
    repo.operator_performance(operator_id).await
}

/// Active complaints assigned to an operator.
pub async fn my_complaints(
    repo: &dyn FullRepository,
    operator_id: &str,
) -> RepositoryResult<Vec<ComplaintDetail>> {
    repo.complaints_for_operator(operator_id).await
}

/// Update a complaint's status (operator or government side).
pub async fn update_complaint_status(
    repo: &dyn FullRepository,
    complaint_id: i64,
    status: ComplaintStatus,
) -> RepositoryResult<bool> {
    repo.update_complaint_status(complaint_id, status).await
}

// ==================== Government operations ====================

/// Warehouse inventory view, optionally for a single warehouse.
pub async fn warehouse_inventory(
    repo: &dyn FullRepository,
    warehouse_id: Option<i32>,
) -> RepositoryResult<Vec<WarehouseInventory>> {
    repo.warehouse_inventory(warehouse_id).await
}

/// All warehouses.
pub async fn warehouses(repo: &dyn FullRepository) -> RepositoryResult<Vec<Warehouse>> {
    repo.list_warehouses().await
}

/// High-yield area analysis, optionally bounded to a created-at window.
pub async fn high_yield_areas(
    repo: &dyn FullRepository,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> RepositoryResult<Vec<HighYieldAreaReport>> {
    repo.high_yield_areas(start, end).await
}

/// Operator performance report across all operators.
pub async fn operator_performance_report(
    repo: &dyn FullRepository,
) -> RepositoryResult<Vec<OperatorPerformanceReport>> {
    repo.operator_performance_report().await
}

/// Create a waste category.
pub async fn create_category(
    repo: &dyn FullRepository,
    category: &NewCategory,
) -> RepositoryResult<i32> {
    if !validation::validate_required(&category.category_name) {
        return Err(RepositoryError::validation("Category name is required"));
    }
    if category.base_price_per_kg < 0.0 {
        return Err(RepositoryError::validation("Price cannot be negative"));
    }

    let category = NewCategory {
        category_name: validation::sanitize(&category.category_name),
        base_price_per_kg: round_money(category.base_price_per_kg),
        description: category.description.clone(),
    };
    repo.create_category(&category).await
}

/// Update a category's rate; pending listings are re-priced in the same
/// repository transaction.
pub async fn update_category_price(
    repo: &dyn FullRepository,
    category_id: i32,
    new_price: f64,
) -> RepositoryResult<bool> {
    if new_price < 0.0 {
        return Err(RepositoryError::validation("Price cannot be negative"));
    }
    repo.update_category_price(category_id, round_money(new_price))
        .await
}

/// Delete a category.
pub async fn delete_category(
    repo: &dyn FullRepository,
    category_id: i32,
) -> RepositoryResult<bool> {
    repo.delete_category(category_id).await
}

/// Create an operator account.
///
/// When no password is supplied a temporary one is generated and returned
/// so the regulator can hand it to the operator.
pub async fn create_operator(
    repo: &dyn FullRepository,
    operator: &NewOperator,
) -> RepositoryResult<CreatedOperator> {
    if !validation::validate_cnic(&operator.cnic) {
        return Err(RepositoryError::validation(
            "CNIC must be in format: 12345-1234567-1",
        ));
    }
    if !validation::validate_required(&operator.full_name) {
        return Err(RepositoryError::validation("Full name is required"));
    }
    if let Some(phone) = operator.phone_number.as_deref() {
        if !phone.trim().is_empty() && !validation::validate_phone(phone) {
            return Err(RepositoryError::validation(
                "Phone must be in format: 03XXXXXXXXX",
            ));
        }
    }

    let (password, temporary_password) = match operator.password.clone() {
        Some(p) if !p.is_empty() => (p, None),
        _ => {
            let generated = generate_temporary_password();
            (generated.clone(), Some(generated))
        }
    };
    let password_hash = hash_password(&password);

    let operator = NewOperator {
        full_name: validation::sanitize(&operator.full_name),
        ..operator.clone()
    };
    let operator_id = repo.create_operator(&operator, &password_hash).await?;
    info!("Created operator {}", operator_id);

    Ok(CreatedOperator {
        operator_id,
        temporary_password,
    })
}

/// Assign an operator to a route and warehouse.
pub async fn assign_operator(
    repo: &dyn FullRepository,
    operator_id: &str,
    route_id: i32,
    warehouse_id: i32,
) -> RepositoryResult<bool> {
    repo.assign_operator(operator_id, route_id, warehouse_id)
        .await
}

/// Take an operator offline and clear its assignments.
pub async fn deactivate_operator(
    repo: &dyn FullRepository,
    operator_id: &str,
) -> RepositoryResult<bool> {
    repo.deactivate_operator(operator_id).await
}

/// All operators.
pub async fn list_operators(repo: &dyn FullRepository) -> RepositoryResult<Vec<Operator>> {
    repo.list_operators().await
}

/// All complaints, optionally filtered by status.
pub async fn complaints(
    repo: &dyn FullRepository,
    status: Option<ComplaintStatus>,
) -> RepositoryResult<Vec<Complaint>> {
    repo.list_complaints(status).await
}

/// All routes.
pub async fn routes(repo: &dyn FullRepository) -> RepositoryResult<Vec<Route>> {
    repo.list_routes().await
}

/// Twelve-character temporary password for operator onboarding.
fn generate_temporary_password() -> String {
    uuid::Uuid::new_v4().simple().to_string().chars().take(12).collect()
}
