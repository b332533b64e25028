//! Handlers for corrective actions.
//!
//! Beyond the batch derived at completion, actions can be created
//! explicitly, patched through their lifecycle, and verified. The
//! resolution and verification stamps are computed here from the status
//! transition and written as final values by the repository.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use cleanops_core::actions::derive_severity;
use cleanops_core::error::CoreError;
use cleanops_core::status::{ActionSeverity, ActionStatus, InspectionStatus};
use cleanops_core::types::DbId;
use cleanops_db::models::corrective_action::{
    CorrectiveAction, CorrectiveActionUpdateFields, CreateCorrectiveAction,
    InsertCorrectiveAction, UpdateCorrectiveAction, VerifyCorrectiveAction,
};
use cleanops_db::repositories::{CorrectiveActionRepo, InspectionItemRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::inspection::{load_inspection, parse_status};
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_action(pool: &PgPool, id: DbId) -> AppResult<CorrectiveAction> {
    CorrectiveActionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CorrectiveAction",
            id,
        }))
}

fn parse_action_status(action: &CorrectiveAction) -> AppResult<ActionStatus> {
    ActionStatus::parse(&action.status).ok_or_else(|| {
        AppError::InternalError(format!(
            "Corrective action {} has unknown status '{}'",
            action.id, action.status
        ))
    })
}

/// GET /api/v1/inspections/{id}/corrective-actions
pub async fn list_actions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_inspection(&state.pool, id).await?;
    let data = CorrectiveActionRepo::list_for_inspection(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/inspections/{id}/corrective-actions
///
/// Explicitly add a corrective action. Canceled inspections take no new
/// work. When an item is referenced it must belong to the inspection, and
/// an omitted severity is derived from that item's rating.
pub async fn create_action(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCorrectiveAction>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;
    if parse_status(&inspection)? == InspectionStatus::Canceled {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot add corrective actions to a canceled inspection".to_string(),
        )));
    }
    input
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let item = match input.item_id {
        Some(item_id) => {
            let item = InspectionItemRepo::find_by_id(&state.pool, item_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "InspectionItem",
                    id: item_id,
                }))?;
            if item.inspection_id != id {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Item {item_id} does not belong to inspection {id}"
                ))));
            }
            Some(item)
        }
        None => None,
    };

    let severity = match input.severity.as_deref() {
        Some(s) => ActionSeverity::parse(s)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid severity '{s}'; expected critical, major, or minor"
                ))
            })?
            .as_str()
            .to_string(),
        None => derive_severity(item.as_ref().and_then(|i| i.rating))
            .as_str()
            .to_string(),
    };

    let insert = InsertCorrectiveAction {
        inspection_id: id,
        item_id: input.item_id,
        title: input.title.clone(),
        description: input.description.clone().unwrap_or_default(),
        severity,
        due_date: input.due_date,
        assignee_id: input.assignee_id,
    };
    let action = CorrectiveActionRepo::create(&state.pool, &insert, input.actor_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: action })))
}

/// PATCH /api/v1/corrective-actions/{id}
///
/// Patch a corrective action. Moving into `resolved` stamps the resolver;
/// moving out of it clears the stamps. Any move to a status other than
/// `verified` clears the verification stamps, so re-opened work must be
/// verified again.
pub async fn update_action(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCorrectiveAction>,
) -> AppResult<impl IntoResponse> {
    let action = load_action(&state.pool, id).await?;
    let current = parse_action_status(&action)?;

    let next = match input.status.as_deref() {
        Some(s) => ActionStatus::parse(s).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid corrective action status '{s}'"))
        })?,
        None => current,
    };

    if let Some(s) = input.severity.as_deref() {
        if ActionSeverity::parse(s).is_none() {
            return Err(AppError::BadRequest(format!(
                "Invalid severity '{s}'; expected critical, major, or minor"
            )));
        }
    }

    let mut resolved_by = action.resolved_by;
    let mut resolved_at = action.resolved_at;
    let mut verified_by = action.verified_by;
    let mut verified_at = action.verified_at;

    if next == ActionStatus::Resolved && current != ActionStatus::Resolved {
        resolved_by = Some(input.actor_id);
        resolved_at = Some(Utc::now());
    } else if next != ActionStatus::Resolved && current == ActionStatus::Resolved {
        resolved_by = None;
        resolved_at = None;
    }
    if next != ActionStatus::Verified {
        verified_by = None;
        verified_at = None;
    }

    let fields = CorrectiveActionUpdateFields {
        title: input.title.clone().unwrap_or_else(|| action.title.clone()),
        description: input
            .description
            .clone()
            .unwrap_or_else(|| action.description.clone()),
        severity: input
            .severity
            .clone()
            .unwrap_or_else(|| action.severity.clone()),
        status: next.as_str().to_string(),
        due_date: input.due_date.or(action.due_date),
        assignee_id: input.assignee_id.or(action.assignee_id),
        resolved_by,
        resolved_at,
        resolution_notes: input
            .resolution_notes
            .clone()
            .or_else(|| action.resolution_notes.clone()),
        verified_by,
        verified_at,
    };
    let updated = CorrectiveActionRepo::update(
        &state.pool,
        id,
        action.inspection_id,
        &fields,
        Some(input.actor_id),
    )
    .await?;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/corrective-actions/{id}/verify
///
/// Mark a corrective action verified, stamping the verifier. Verification
/// is the terminal state of the action lifecycle; canceled actions cannot
/// be verified.
pub async fn verify_action(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<VerifyCorrectiveAction>,
) -> AppResult<impl IntoResponse> {
    let action = load_action(&state.pool, id).await?;
    let current = parse_action_status(&action)?;
    if current == ActionStatus::Canceled {
        return Err(AppError::Core(CoreError::Validation(
            "Canceled corrective actions cannot be verified".to_string(),
        )));
    }

    let now = Utc::now();
    let fields = CorrectiveActionUpdateFields {
        title: action.title.clone(),
        description: action.description.clone(),
        severity: action.severity.clone(),
        status: ActionStatus::Verified.as_str().to_string(),
        due_date: action.due_date,
        assignee_id: action.assignee_id,
        // Verifying work that was never formally resolved stamps both.
        resolved_by: action.resolved_by.or(Some(input.actor_id)),
        resolved_at: action.resolved_at.or(Some(now)),
        resolution_notes: input
            .resolution_notes
            .clone()
            .or_else(|| action.resolution_notes.clone()),
        verified_by: Some(input.actor_id),
        verified_at: Some(now),
    };
    let updated = CorrectiveActionRepo::update(
        &state.pool,
        id,
        action.inspection_id,
        &fields,
        Some(input.actor_id),
    )
    .await?;

    Ok(Json(DataResponse { data: updated }))
}
