//! Government/regulator endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::api::ComplaintStatus;
use crate::db::services;
use crate::http::dto::{
    Area, AssignOperatorRequest, Category, Complaint, ComplaintsQuery, CreatedCategory,
    CreatedOperator, HighYieldAreaReport, HighYieldQuery, InventoryQuery, MessageResponse,
    NewCategory, NewOperator, Operator, OperatorPerformanceReport, Route,
    UpdateCategoryPriceRequest, UpdateComplaintRequest, Warehouse, WarehouseInventory,
};
use crate::http::error::AppError;
use crate::http::state::AppState;

/// GET /api/government/inventory?warehouseId=..
pub async fn inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> HandlerResult<Vec<WarehouseInventory>> {
    let rows =
        services::warehouse_inventory(state.repository.as_ref(), query.warehouse_id).await?;
    Ok(Json(rows))
}

/// GET /api/government/warehouses
pub async fn warehouses(State(state): State<AppState>) -> HandlerResult<Vec<Warehouse>> {
    Ok(Json(services::warehouses(state.repository.as_ref()).await?))
}

/// GET /api/government/reports/high-yield-areas?startDate=..&endDate=..
pub async fn high_yield_areas(
    State(state): State<AppState>,
    Query(query): Query<HighYieldQuery>,
) -> HandlerResult<Vec<HighYieldAreaReport>> {
    let reports = services::high_yield_areas(
        state.repository.as_ref(),
        query.start_date,
        query.end_date,
    )
    .await?;
    Ok(Json(reports))
}

/// GET /api/government/reports/operator-performance
pub async fn operator_performance_report(
    State(state): State<AppState>,
) -> HandlerResult<Vec<OperatorPerformanceReport>> {
    let reports = services::operator_performance_report(state.repository.as_ref()).await?;
    Ok(Json(reports))
}

/// GET /api/government/categories
pub async fn categories(State(state): State<AppState>) -> HandlerResult<Vec<Category>> {
    Ok(Json(services::categories(state.repository.as_ref()).await?))
}

/// POST /api/government/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(category): Json<NewCategory>,
) -> Result<(StatusCode, Json<CreatedCategory>), AppError> {
    let category_id = services::create_category(state.repository.as_ref(), &category).await?;
    Ok((StatusCode::CREATED, Json(CreatedCategory { category_id })))
}

/// PUT /api/government/categories/{category_id}/price
///
/// Also re-prices the category's pending listings, in the same repository
/// transaction.
pub async fn update_category_price(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Json(request): Json<UpdateCategoryPriceRequest>,
) -> HandlerResult<MessageResponse> {
    let updated = services::update_category_price(
        state.repository.as_ref(),
        category_id,
        request.new_price,
    )
    .await?;

    if updated {
        Ok(Json(MessageResponse::ok("Category price updated")))
    } else {
        Err(AppError::NotFound("Category not found".to_string()))
    }
}

/// DELETE /api/government/categories/{category_id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> HandlerResult<MessageResponse> {
    let deleted = services::delete_category(state.repository.as_ref(), category_id).await?;

    if deleted {
        Ok(Json(MessageResponse::ok("Category deleted")))
    } else {
        Err(AppError::NotFound("Category not found".to_string()))
    }
}

/// GET /api/government/operators
pub async fn operators(State(state): State<AppState>) -> HandlerResult<Vec<Operator>> {
    Ok(Json(
        services::list_operators(state.repository.as_ref()).await?,
    ))
}

/// POST /api/government/operators
pub async fn create_operator(
    State(state): State<AppState>,
    Json(operator): Json<NewOperator>,
) -> Result<(StatusCode, Json<CreatedOperator>), AppError> {
    let created = services::create_operator(state.repository.as_ref(), &operator).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/government/operators/{operator_id}/assignment
pub async fn assign_operator(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
    Json(request): Json<AssignOperatorRequest>,
) -> HandlerResult<MessageResponse> {
    let assigned = services::assign_operator(
        state.repository.as_ref(),
        &operator_id,
        request.route_id,
        request.warehouse_id,
    )
    .await?;

    if assigned {
        Ok(Json(MessageResponse::ok("Operator assigned")))
    } else {
        Err(AppError::NotFound("Operator not found".to_string()))
    }
}

/// PUT /api/government/operators/{operator_id}/deactivate
pub async fn deactivate_operator(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> HandlerResult<MessageResponse> {
    let deactivated =
        services::deactivate_operator(state.repository.as_ref(), &operator_id).await?;

    if deactivated {
        Ok(Json(MessageResponse::ok("Operator deactivated")))
    } else {
        Err(AppError::NotFound("Operator not found".to_string()))
    }
}

/// GET /api/government/complaints?status=..
pub async fn complaints(
    State(state): State<AppState>,
    Query(query): Query<ComplaintsQuery>,
) -> HandlerResult<Vec<Complaint>> {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.parse::<ComplaintStatus>()
                .map_err(AppError::BadRequest)?,
        ),
    };

    let complaints = services::complaints(state.repository.as_ref(), status).await?;
    Ok(Json(complaints))
}

/// PUT /api/government/complaint/status
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

/// GET /api/government/routes
pub async fn routes(State(state): State<AppState>) -> HandlerResult<Vec<Route>> {
    Ok(Json(services::routes(state.repository.as_ref()).await?))
}

/// GET /api/government/areas
pub async fn areas(State(state): State<AppState>) -> HandlerResult<Vec<Area>> {
    Ok(Json(services::areas(state.repository.as_ref()).await?))
}
