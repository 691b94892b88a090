//! Operator endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::HandlerResult;
use crate::db::services;
use crate::http::dto::{
    Collection, CollectionOutcome, CollectionPoint, CollectionRequest, ComplaintDetail,
    MessageResponse, Operator, OperatorPerformance, UpdateComplaintRequest, WarehouseDeposit,
};
use crate::http::error::AppError;
use crate::http::state::AppState;

/// GET /api/operator/details/{operator_id}
pub async fn details(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> HandlerResult<Operator> {
    let operator = services::operator_details(state.repository.as_ref(), &operator_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Operator not found".to_string()))?;
    Ok(Json(operator))
}

/// GET /api/operator/collections/{operator_id}
///
/// Pending collection points on the operator's assigned route.
pub async fn collection_points(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> HandlerResult<Vec<CollectionPoint>> {
    let points = services::collection_points(state.repository.as_ref(), &operator_id).await?;
    Ok(Json(points))
}

/// POST /api/operator/collect
///
/// The one multi-write workflow: collection row, listing status flip, stock
/// upsert, and payment all commit or roll back together.
pub async fn collect(
    State(state): State<AppState>,
    Json(request): Json<CollectionRequest>,
) -> HandlerResult<CollectionOutcome> {
    let outcome = services::collect_waste(state.repository.as_ref(), &request).await?;
    Ok(Json(outcome))
}

/// POST /api/operator/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<WarehouseDeposit>,
) -> HandlerResult<MessageResponse> {
    services::deposit_waste(state.repository.as_ref(), &request).await?;
    Ok(Json(MessageResponse::ok("Waste deposited at warehouse")))
}

/// GET /api/operator/history/{operator_id}
pub async fn history(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> HandlerResult<Vec<Collection>> {
    let history = services::collection_history(state.repository.as_ref(), &operator_id).await?;
    Ok(Json(history))
}

/// GET /api/operator/performance/{operator_id}
pub async fn performance(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> HandlerResult<OperatorPerformance> {
    let performance = services::my_performance(state.repository.as_ref(), &operator_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Operator not found".to_string()))?;
    Ok(Json(performance))
}

/// GET /api/operator/complaints/{operator_id}
pub async fn complaints(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> HandlerResult<Vec<ComplaintDetail>> {
    let complaints = services::my_complaints(state.repository.as_ref(), &operator_id).await?;
    Ok(Json(complaints))
}

/// PUT /api/operator/complaint/status
pub async fn update_complaint_status(
    State(state): State<AppState>,
    Json(request): Json<UpdateComplaintRequest>,
) -> HandlerResult<MessageResponse> {
    let updated = services::update_complaint_status(
        state.repository.as_ref(),
        request.complaint_id,
        request.status,
    )
    .await?;

    if updated {
        Ok(Json(MessageResponse::ok("Complaint status updated")))
    } else {
        Err(AppError::NotFound("Complaint not found".to_string()))
    }
}
