//! Authentication endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::HandlerResult;
use crate::db::services;
use crate::http::dto::{CnicValidationResponse, LoginRequest, LoginResult};
use crate::http::state::AppState;
use crate::validation;

/// POST /api/auth/login
///
/// Authenticate with CNIC and password. Credential mismatches return a 200
/// with `success: false` rather than an error status, so clients can show
/// the generic message directly.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<LoginResult> {
    let result = services::login(state.repository.as_ref(), &request.cnic, &request.password)
        .await?;
    Ok(Json(result))
}

/// GET /api/auth/validate-cnic/{cnic}
///
/// Check whether a CNIC matches the `#####-#######-#` format.
pub async fn validate_cnic(Path(cnic): Path<String>) -> HandlerResult<CnicValidationResponse> {
    let valid = validation::validate_cnic(&cnic);
    Ok(Json(CnicValidationResponse { cnic, valid }))
}
