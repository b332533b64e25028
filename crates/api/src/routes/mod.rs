pub mod corrective_action;
pub mod health;
pub mod inspection;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /inspections                                     list, create
/// /inspections/{id}                                get detail, update
/// /inspections/{id}/start                          start (POST)
/// /inspections/{id}/complete                       complete (POST)
/// /inspections/{id}/cancel                         cancel (POST)
/// /inspections/{id}/items                          add item (POST)
/// /inspections/{id}/items/{item_id}                update, delete item
/// /inspections/{id}/corrective-actions             list, create
/// /inspections/{id}/signoffs                       list, create
/// /inspections/{id}/reinspection                   plan follow-up (POST)
/// /inspections/{id}/activities                     activity trail (GET)
///
/// /corrective-actions/{id}                         update (PATCH)
/// /corrective-actions/{id}/verify                  verify (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Inspection lifecycle and its scoped sub-resources.
        .nest("/inspections", inspection::router())
        // Corrective actions addressed by their own id.
        .nest("/corrective-actions", corrective_action::router())
}
