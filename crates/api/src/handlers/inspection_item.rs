//! Handlers for checklist items on an inspection.
//!
//! Items can be added, patched, and removed while the inspection is still
//! live; completed and canceled inspections are frozen.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use cleanops_core::error::CoreError;
use cleanops_core::status::ItemScore;
use cleanops_core::types::DbId;
use cleanops_db::models::inspection_item::{CreateInspectionItem, InspectionItem, UpdateInspectionItem};
use cleanops_db::repositories::InspectionItemRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::inspection::{load_inspection, parse_status};
use crate::response::DataResponse;
use crate::state::AppState;

/// Items only change while the inspection is live.
async fn ensure_mutable(pool: &PgPool, inspection_id: DbId) -> AppResult<()> {
    let inspection = load_inspection(pool, inspection_id).await?;
    let status = parse_status(&inspection)?;
    if status.is_terminal() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot modify items of a {} inspection",
            status.as_str()
        ))));
    }
    Ok(())
}

/// The inspection reached a terminal status between the handler's check
/// and the write; the repository refused the statement.
fn frozen_items(inspection_id: DbId) -> AppError {
    AppError::Core(CoreError::Validation(format!(
        "Cannot modify items of inspection {inspection_id}: it is no longer live"
    )))
}

fn validate_score(score: Option<&str>) -> AppResult<()> {
    if let Some(s) = score {
        if ItemScore::parse(s).is_none() {
            return Err(AppError::BadRequest(format!(
                "Invalid item score '{s}'; expected pass, fail, or na"
            )));
        }
    }
    Ok(())
}

async fn load_item(
    pool: &PgPool,
    inspection_id: DbId,
    item_id: DbId,
) -> AppResult<InspectionItem> {
    let item = InspectionItemRepo::find_by_id(pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InspectionItem",
            id: item_id,
        }))?;
    if item.inspection_id != inspection_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "InspectionItem",
            id: item_id,
        }));
    }
    Ok(item)
}

/// POST /api/v1/inspections/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateInspectionItem>,
) -> AppResult<impl IntoResponse> {
    ensure_mutable(&state.pool, id).await?;
    input
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    validate_score(input.score.as_deref())?;

    let item = InspectionItemRepo::create(&state.pool, id, &input, input.actor_id)
        .await?
        .ok_or_else(|| frozen_items(id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PATCH /api/v1/inspections/{id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateInspectionItem>,
) -> AppResult<impl IntoResponse> {
    ensure_mutable(&state.pool, id).await?;
    input
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    validate_score(input.score.as_deref())?;

    let item = load_item(&state.pool, id, item_id).await?;
    let updated = InspectionItemRepo::update(&state.pool, &item, &input, input.actor_id)
        .await?
        .ok_or_else(|| frozen_items(id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/inspections/{id}/items/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_mutable(&state.pool, id).await?;
    let item = load_item(&state.pool, id, item_id).await?;
    if !InspectionItemRepo::delete(&state.pool, &item, None).await? {
        return Err(frozen_items(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
