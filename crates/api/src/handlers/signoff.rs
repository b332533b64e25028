//! Handlers for inspection signoffs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use cleanops_core::error::CoreError;
use cleanops_core::status::{InspectionStatus, SignerType};
use cleanops_core::types::DbId;
use cleanops_db::models::signoff::CreateSignoff;
use cleanops_db::repositories::SignoffRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::inspection::{load_inspection, parse_status};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/inspections/{id}/signoffs
pub async fn list_signoffs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_inspection(&state.pool, id).await?;
    let data = SignoffRepo::list_for_inspection(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/inspections/{id}/signoffs
///
/// Record an attestation on a completed inspection. Signoffs are
/// append-only; corrections are recorded as additional signoffs.
pub async fn create_signoff(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSignoff>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;
    if parse_status(&inspection)? != InspectionStatus::Completed {
        return Err(AppError::Core(CoreError::Validation(
            "Only completed inspections can be signed off".to_string(),
        )));
    }
    input
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    if SignerType::parse(&input.signer_type).is_none() {
        return Err(AppError::BadRequest(format!(
            "Invalid signer_type '{}'; expected supervisor or client",
            input.signer_type
        )));
    }

    let signoff = SignoffRepo::create(&state.pool, id, &input, input.signer_user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: signoff })))
}
