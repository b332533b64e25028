//! Corrective action models and DTOs.

use cleanops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `corrective_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CorrectiveAction {
    pub id: DbId,
    pub inspection_id: DbId,
    pub item_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub assignee_id: Option<DbId>,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_notes: Option<String>,
    pub verified_by: Option<DbId>,
    pub verified_at: Option<Timestamp>,
    pub follow_up_inspection_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for explicitly adding a corrective action to an inspection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCorrectiveAction {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub item_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub assignee_id: Option<DbId>,
    pub actor_id: Option<DbId>,
}

/// DTO for patching a corrective action. Status transitions to/from
/// `resolved` and `verified` drive the stamp fields; the handler computes
/// the final stamp values before the repository writes them.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCorrectiveAction {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Timestamp>,
    pub assignee_id: Option<DbId>,
    pub resolution_notes: Option<String>,
    pub actor_id: DbId,
}

/// Request body for the verify endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCorrectiveAction {
    pub resolution_notes: Option<String>,
    pub actor_id: DbId,
}

/// Fully-resolved insert values for a corrective action, used both by the
/// completion batch (derived from failed items) and explicit creation.
#[derive(Debug, Clone)]
pub struct InsertCorrectiveAction {
    pub inspection_id: DbId,
    pub item_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub due_date: Option<Timestamp>,
    pub assignee_id: Option<DbId>,
}

/// Fully-resolved update values written by [`CorrectiveActionRepo::update`].
///
/// Every patchable column is written unconditionally; the handler merges
/// the patch into the current row and applies the stamp rules first.
#[derive(Debug, Clone)]
pub struct CorrectiveActionUpdateFields {
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub assignee_id: Option<DbId>,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_notes: Option<String>,
    pub verified_by: Option<DbId>,
    pub verified_at: Option<Timestamp>,
}
