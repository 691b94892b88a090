//! Citizen endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::api::ListingId;
use crate::db::services;
use crate::http::dto::{
    Area, CancelListingRequest, Category, CitizenProfile, CitizenRegistration, CreatedListing,
    MessageResponse, NewListing, PriceEstimate, PriceEstimateQuery, RegisteredCitizen,
    TransactionRecord, WasteListing,
};
use crate::http::error::AppError;
use crate::http::state::AppState;

/// POST /api/citizen/register
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<CitizenRegistration>,
) -> Result<(StatusCode, Json<RegisteredCitizen>), AppError> {
    let citizen_id =
        services::register_citizen(state.repository.as_ref(), &registration).await?;
    Ok((StatusCode::CREATED, Json(RegisteredCitizen { citizen_id })))
}

/// POST /api/citizen/listings
pub async fn create_listing(
    State(state): State<AppState>,
    Json(listing): Json<NewListing>,
) -> Result<(StatusCode, Json<CreatedListing>), AppError> {
    let created = services::create_listing(state.repository.as_ref(), &listing).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/citizen/listings/{citizen_id}
pub async fn my_listings(
    State(state): State<AppState>,
    Path(citizen_id): Path<String>,
) -> HandlerResult<Vec<WasteListing>> {
    let listings = services::my_listings(state.repository.as_ref(), &citizen_id).await?;
    Ok(Json(listings))
}

/// PUT /api/citizen/listings/{listing_id}/cancel
///
/// Conditional update: only the owning citizen can cancel, and only while
/// the listing is still pending.
pub async fn cancel_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    Json(request): Json<CancelListingRequest>,
) -> HandlerResult<MessageResponse> {
    let cancelled = services::cancel_listing(
        state.repository.as_ref(),
        ListingId(listing_id),
        &request.citizen_id,
    )
    .await?;

    if cancelled {
        Ok(Json(MessageResponse::ok("Listing cancelled")))
    } else {
        Err(AppError::BadRequest(
            "Listing cannot be cancelled: not found, not yours, or no longer pending".to_string(),
        ))
    }
}

/// GET /api/citizen/price-estimate?categoryId=..&weight=..
pub async fn price_estimate(
    State(state): State<AppState>,
    Query(query): Query<PriceEstimateQuery>,
) -> HandlerResult<PriceEstimate> {
    let estimate =
        services::price_estimate(state.repository.as_ref(), query.category_id, query.weight)
            .await?;
    Ok(Json(estimate))
}

/// GET /api/citizen/transactions/{citizen_id}
pub async fn my_transactions(
    State(state): State<AppState>,
    Path(citizen_id): Path<String>,
) -> HandlerResult<Vec<TransactionRecord>> {
    let transactions =
        services::my_transactions(state.repository.as_ref(), &citizen_id).await?;
    Ok(Json(transactions))
}

/// GET /api/citizen/profile/{citizen_id}
pub async fn my_profile(
    State(state): State<AppState>,
    Path(citizen_id): Path<String>,
) -> HandlerResult<CitizenProfile> {
    let profile = services::my_profile(state.repository.as_ref(), &citizen_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Citizen {} not found", citizen_id)))?;
    Ok(Json(profile))
}

/// GET /api/citizen/areas
pub async fn areas(State(state): State<AppState>) -> HandlerResult<Vec<Area>> {
    Ok(Json(services::areas(state.repository.as_ref()).await?))
}

/// GET /api/citizen/categories
pub async fn categories(State(state): State<AppState>) -> HandlerResult<Vec<Category>> {
    Ok(Json(services::categories(state.repository.as_ref()).await?))
}
