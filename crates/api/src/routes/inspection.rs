//! Route definitions for the `/inspections` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{corrective_action, inspection, inspection_item, signoff};
use crate::state::AppState;

/// Routes mounted at `/inspections`.
///
/// ```text
/// GET    /                                 -> list_inspections
/// POST   /                                 -> create_inspection
/// GET    /{id}                             -> get_inspection
/// PATCH  /{id}                             -> update_inspection
/// POST   /{id}/start                       -> start_inspection
/// POST   /{id}/complete                    -> complete_inspection
/// POST   /{id}/cancel                      -> cancel_inspection
///
/// POST   /{id}/items                       -> add_item
/// PATCH  /{id}/items/{item_id}             -> update_item
/// DELETE /{id}/items/{item_id}             -> delete_item
///
/// GET    /{id}/corrective-actions          -> list_actions
/// POST   /{id}/corrective-actions          -> create_action
///
/// GET    /{id}/signoffs                    -> list_signoffs
/// POST   /{id}/signoffs                    -> create_signoff
///
/// POST   /{id}/reinspection                -> create_reinspection
/// GET    /{id}/activities                  -> list_activities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inspection::list_inspections).post(inspection::create_inspection),
        )
        .route(
            "/{id}",
            get(inspection::get_inspection).patch(inspection::update_inspection),
        )
        // Workflow transitions
        .route("/{id}/start", post(inspection::start_inspection))
        .route("/{id}/complete", post(inspection::complete_inspection))
        .route("/{id}/cancel", post(inspection::cancel_inspection))
        // Checklist items
        .route("/{id}/items", post(inspection_item::add_item))
        .route(
            "/{id}/items/{item_id}",
            delete(inspection_item::delete_item).patch(inspection_item::update_item),
        )
        // Corrective actions scoped to the inspection
        .route(
            "/{id}/corrective-actions",
            get(corrective_action::list_actions).post(corrective_action::create_action),
        )
        // Signoffs
        .route(
            "/{id}/signoffs",
            get(signoff::list_signoffs).post(signoff::create_signoff),
        )
        // Follow-up planning and the audit trail
        .route("/{id}/reinspection", post(inspection::create_reinspection))
        .route("/{id}/activities", get(inspection::list_activities))
}
