//! Handlers for the inspection workflow.
//!
//! Create, list, detail, metadata update, and the state-machine operations
//! (start, complete, cancel) plus reinspection planning and the activity
//! trail. All transitions are checked against the core transition table
//! before anything is written.

use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use cleanops_core::actions::{derive_action, midnight_after_days, DEFAULT_DUE_DAYS};
use cleanops_core::activity::actions;
use cleanops_core::completion::{validate_completion, CompletionItem};
use cleanops_core::error::CoreError;
use cleanops_core::scoring::{compute_score, ScoredItem, DEFAULT_WEIGHT};
use cleanops_core::status::{
    transition, transition_sources, InspectionStatus, ItemScore, WorkflowOp,
};
use cleanops_core::types::DbId;
use cleanops_db::models::corrective_action::InsertCorrectiveAction;
use cleanops_db::models::inspection::{
    CancelInspection, CompleteInspection, CreateInspection, CreateReinspection, Inspection,
    InspectionDetail, InspectionFilter, StartInspection, UpdateInspection,
};
use cleanops_db::models::inspection_item::InspectionItem;
use cleanops_db::repositories::{
    ActivityRepo, CorrectiveActionRepo, InspectionItemRepo, InspectionRepo, SignoffRepo,
    TemplateRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PagedResponse};
use crate::side_effects;
use crate::state::AppState;

/// Load an inspection or fail with `NotFound`.
pub(crate) async fn load_inspection(pool: &PgPool, id: DbId) -> AppResult<Inspection> {
    InspectionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Inspection",
            id,
        }))
}

/// Parse the stored status string into the closed enum.
///
/// A non-parsing status means the row was corrupted outside the workflow;
/// that surfaces as an internal error, not a validation failure.
pub(crate) fn parse_status(inspection: &Inspection) -> AppResult<InspectionStatus> {
    InspectionStatus::parse(&inspection.status).ok_or_else(|| {
        AppError::InternalError(format!(
            "Inspection {} has unknown status '{}'",
            inspection.id, inspection.status
        ))
    })
}

/// Legal source statuses for `op`, as the string set the repository
/// matches against in its UPDATE predicate.
fn source_statuses(op: WorkflowOp) -> Vec<&'static str> {
    transition_sources(op).iter().map(|s| s.as_str()).collect()
}

/// The row left the source set between the handler's transition check and
/// the write.
fn stale_transition(op: WorkflowOp, id: DbId) -> AppError {
    AppError::Core(CoreError::Validation(format!(
        "Cannot {} inspection {id}: its status changed concurrently",
        op.as_str()
    )))
}

/// GET /api/v1/inspections
///
/// List inspection summaries with filters and pagination. Each summary
/// carries the inspection's open and overdue corrective-action counts.
pub async fn list_inspections(
    State(state): State<AppState>,
    Query(filter): Query<InspectionFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = page.clamp_limit();
    let offset = page.clamp_offset();

    let data = InspectionRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = InspectionRepo::count(&state.pool, &filter).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/inspections/{id}
///
/// Full detail: the inspection with its items, corrective actions,
/// signoffs, and activity trail.
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;

    let items = InspectionItemRepo::list_for_inspection(&state.pool, id).await?;
    let corrective_actions = CorrectiveActionRepo::list_for_inspection(&state.pool, id).await?;
    let signoffs = SignoffRepo::list_for_inspection(&state.pool, id).await?;
    let activities = ActivityRepo::list_for_inspection(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: InspectionDetail {
            inspection,
            items,
            corrective_actions,
            signoffs,
            activities,
        },
    }))
}

/// POST /api/v1/inspections
///
/// Create an inspection with a freshly reserved number, pre-populating
/// items from the template when one is given. Appointment creation and
/// inspector notification are best-effort and never fail the create.
pub async fn create_inspection(
    State(state): State<AppState>,
    Json(input): Json<CreateInspection>,
) -> AppResult<impl IntoResponse> {
    let template_items = match input.template_id {
        Some(template_id) => {
            TemplateRepo::find_by_id(&state.pool, template_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "InspectionTemplate",
                    id: template_id,
                }))?;
            TemplateRepo::list_items(&state.pool, template_id).await?
        }
        None => Vec::new(),
    };

    let inspection = InspectionRepo::create(&state.pool, &input, &template_items).await?;

    tracing::info!(
        inspection_id = inspection.id,
        number = %inspection.number,
        inspector_id = inspection.inspector_id,
        "Inspection created"
    );

    side_effects::inspection_created(&state.pool, &inspection);

    Ok((StatusCode::CREATED, Json(DataResponse { data: inspection })))
}

/// PATCH /api/v1/inspections/{id}
///
/// Update inspection metadata. Rejected once the inspection is completed;
/// completed inspections only change through corrective actions and
/// reinspection.
pub async fn update_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInspection>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;
    if parse_status(&inspection)? == InspectionStatus::Completed {
        return Err(AppError::Core(CoreError::Validation(
            "Completed inspections cannot be updated".to_string(),
        )));
    }

    let updated = InspectionRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/inspections/{id}/start
pub async fn start_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StartInspection>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;
    let status = parse_status(&inspection)?;
    let next = transition(status, WorkflowOp::Start)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = InspectionRepo::set_status(
        &state.pool,
        id,
        &source_statuses(WorkflowOp::Start),
        next.as_str(),
        actions::STARTED,
        input.actor_id,
        json!({}),
    )
    .await?
    .ok_or_else(|| stale_transition(WorkflowOp::Start, id))?;

    tracing::info!(inspection_id = id, actor_id = input.actor_id, "Inspection started");

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/inspections/{id}/cancel
pub async fn cancel_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CancelInspection>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;
    let status = parse_status(&inspection)?;
    let next = transition(status, WorkflowOp::Cancel)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = InspectionRepo::set_status(
        &state.pool,
        id,
        &source_statuses(WorkflowOp::Cancel),
        next.as_str(),
        actions::CANCELED,
        input.actor_id,
        json!({ "reason": input.reason }),
    )
    .await?
    .ok_or_else(|| stale_transition(WorkflowOp::Cancel, id))?;

    tracing::info!(inspection_id = id, actor_id = input.actor_id, "Inspection canceled");

    Ok(Json(DataResponse { data: updated }))
}

/// An item with the submitted scores overlaid on the stored row.
struct MergedItem<'a> {
    item: &'a InspectionItem,
    score: Option<ItemScore>,
    rating: Option<i16>,
    notes: Option<String>,
}

/// POST /api/v1/inspections/{id}/complete
///
/// Complete an inspection: persist submitted item scores, compute the
/// weighted overall score and rating band, derive one corrective action
/// per failed item (unless disabled), and append the completion activity.
/// Nothing is persisted when validation fails.
pub async fn complete_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteInspection>,
) -> AppResult<impl IntoResponse> {
    let inspection = load_inspection(&state.pool, id).await?;
    let status = parse_status(&inspection)?;
    transition(status, WorkflowOp::Complete)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let stored_items = InspectionItemRepo::list_for_inspection(&state.pool, id).await?;
    let stored_ids: HashSet<DbId> = stored_items.iter().map(|i| i.id).collect();

    let mut entries = HashMap::new();
    for entry in &input.items {
        entry
            .validate()
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        if ItemScore::parse(&entry.score).is_none() {
            return Err(AppError::BadRequest(format!(
                "Invalid item score '{}'; expected pass, fail, or na",
                entry.score
            )));
        }
        if !stored_ids.contains(&entry.item_id) {
            return Err(AppError::BadRequest(format!(
                "Item {} does not belong to inspection {id}",
                entry.item_id
            )));
        }
        entries.insert(entry.item_id, entry);
    }

    let merged: Vec<MergedItem<'_>> = stored_items
        .iter()
        .map(|item| match entries.get(&item.id) {
            Some(entry) => MergedItem {
                item,
                score: ItemScore::parse(&entry.score),
                rating: entry.rating,
                notes: entry.notes.clone().or_else(|| item.notes.clone()),
            },
            None => MergedItem {
                item,
                score: item.score.as_deref().and_then(ItemScore::parse),
                rating: item.rating,
                notes: item.notes.clone(),
            },
        })
        .collect();

    let completion_view: Vec<CompletionItem<'_>> = merged
        .iter()
        .map(|m| CompletionItem {
            category: &m.item.category,
            notes: m.notes.as_deref(),
        })
        .collect();
    validate_completion(&input.summary, &completion_view)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Template weights by template item id; everything else scores at the
    // default weight.
    let weights: HashMap<DbId, f64> = match inspection.template_id {
        Some(template_id) => TemplateRepo::list_items(&state.pool, template_id)
            .await?
            .into_iter()
            .map(|t| (t.id, t.weight))
            .collect(),
        None => HashMap::new(),
    };

    let scored: Vec<ScoredItem> = merged
        .iter()
        .filter_map(|m| {
            m.score.map(|score| ScoredItem {
                score,
                rating: m.rating,
                weight: m
                    .item
                    .template_item_id
                    .and_then(|tid| weights.get(&tid).copied())
                    .unwrap_or(DEFAULT_WEIGHT),
            })
        })
        .collect();
    let (overall_score, rating) = compute_score(&scored);

    let completed_at = Utc::now();
    let failed: Vec<&MergedItem<'_>> = merged
        .iter()
        .filter(|m| m.score == Some(ItemScore::Fail))
        .collect();

    let auto_create = input.auto_create_corrective_actions.unwrap_or(true);
    let derived_actions: Vec<InsertCorrectiveAction> = if auto_create {
        failed
            .iter()
            .map(|m| {
                let draft = derive_action(
                    &m.item.item_text,
                    &m.item.category,
                    m.notes.as_deref(),
                    m.rating,
                    completed_at,
                    input.default_action_due_date,
                );
                InsertCorrectiveAction {
                    inspection_id: id,
                    item_id: Some(m.item.id),
                    title: draft.title,
                    description: draft.description,
                    severity: draft.severity.as_str().to_string(),
                    due_date: Some(draft.due_date),
                    assignee_id: Some(inspection.inspector_id),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let data = cleanops_db::repositories::inspection_repo::CompleteInspectionData {
        inspection_id: id,
        summary: &input.summary,
        item_scores: &input.items,
        overall_score,
        rating: rating.as_str(),
        completed_at,
        derived_actions,
        failed_item_count: failed.len(),
        actor_id: input.actor_id,
    };
    let (completed, created_actions) =
        InspectionRepo::complete(&state.pool, &data, &source_statuses(WorkflowOp::Complete))
            .await?
            .ok_or_else(|| stale_transition(WorkflowOp::Complete, id))?;

    tracing::info!(
        inspection_id = id,
        score = overall_score,
        rating = rating.as_str(),
        failed_items = failed.len(),
        corrective_actions = created_actions.len(),
        "Inspection completed"
    );

    Ok(Json(DataResponse { data: completed }))
}

/// POST /api/v1/inspections/{id}/reinspection
///
/// Plan a follow-up inspection scoped to the source's failed items, or to
/// the items behind an explicit set of still-open corrective actions.
/// Open corrective actions whose item is in the selected set are relinked
/// to the new inspection without changing their status.
pub async fn create_reinspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateReinspection>,
) -> AppResult<impl IntoResponse> {
    let source = load_inspection(&state.pool, id).await?;
    if parse_status(&source)? != InspectionStatus::Completed {
        return Err(AppError::Core(CoreError::Validation(
            "Only completed inspections can be reinspected".to_string(),
        )));
    }

    let items = InspectionItemRepo::list_for_inspection(&state.pool, id).await?;

    let selected_ids: HashSet<DbId> = match &input.action_ids {
        Some(action_ids) if !action_ids.is_empty() => {
            CorrectiveActionRepo::list_open_with_items(&state.pool, id, action_ids)
                .await?
                .into_iter()
                .filter_map(|a| a.item_id)
                .collect()
        }
        _ => items
            .iter()
            .filter(|i| i.score.as_deref() == Some("fail"))
            .map(|i| i.id)
            .collect(),
    };

    if selected_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No eligible items for reinspection".to_string(),
        )));
    }

    let selected: Vec<InspectionItem> = items
        .into_iter()
        .filter(|i| selected_ids.contains(&i.id))
        .collect();

    let relink_action_ids: Vec<DbId> =
        CorrectiveActionRepo::list_open_for_inspection(&state.pool, id)
            .await?
            .into_iter()
            .filter(|a| a.item_id.is_some_and(|item_id| selected_ids.contains(&item_id)))
            .map(|a| a.id)
            .collect();

    let data = cleanops_db::repositories::inspection_repo::ReinspectionData {
        source: &source,
        items: &selected,
        relink_action_ids,
        inspector_id: input.inspector_id.unwrap_or(source.inspector_id),
        scheduled_date: input
            .scheduled_date
            .unwrap_or_else(|| midnight_after_days(Utc::now(), DEFAULT_DUE_DAYS)),
        notes: input.notes.as_deref(),
        actor_id: input.actor_id,
    };
    let reinspection = InspectionRepo::create_reinspection(&state.pool, &data).await?;

    tracing::info!(
        source_id = id,
        reinspection_id = reinspection.id,
        number = %reinspection.number,
        item_count = selected.len(),
        "Reinspection created"
    );

    side_effects::reinspection_created(&state.pool, &reinspection, input.actor_id);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: reinspection }),
    ))
}

/// GET /api/v1/inspections/{id}/activities
pub async fn list_activities(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_inspection(&state.pool, id).await?;
    let activities = ActivityRepo::list_for_inspection(&state.pool, id).await?;
    Ok(Json(DataResponse { data: activities }))
}
