//! Route definitions for the `/corrective-actions` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::corrective_action;
use crate::state::AppState;

/// Routes mounted at `/corrective-actions`.
///
/// ```text
/// PATCH  /{id}          -> update_action
/// POST   /{id}/verify   -> verify_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", patch(corrective_action::update_action))
        .route("/{id}/verify", post(corrective_action::verify_action))
}
