//! Inspection activity-trail models.

use cleanops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `inspection_activities` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionActivity {
    pub id: DbId,
    pub inspection_id: DbId,
    pub action: String,
    pub actor_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// Insert values for an activity row.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub inspection_id: DbId,
    pub action: &'static str,
    pub actor_id: Option<DbId>,
    pub details: serde_json::Value,
}
