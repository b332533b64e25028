//! Inspection entity models and DTOs.

use cleanops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::activity::InspectionActivity;
use crate::models::corrective_action::CorrectiveAction;
use crate::models::inspection_item::InspectionItem;
use crate::models::signoff::InspectionSignoff;

/// A row from the `inspections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inspection {
    pub id: DbId,
    pub number: String,
    pub template_id: Option<DbId>,
    pub facility_id: DbId,
    pub account_id: DbId,
    pub job_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub inspector_id: DbId,
    pub status: String,
    pub scheduled_date: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub overall_score: Option<f64>,
    pub rating: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new inspection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInspection {
    pub facility_id: DbId,
    pub account_id: DbId,
    pub inspector_id: DbId,
    pub scheduled_date: Timestamp,
    pub template_id: Option<DbId>,
    pub job_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_by: DbId,
}

/// DTO for patching inspection metadata (rejected once completed).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInspection {
    pub inspector_id: Option<DbId>,
    pub scheduled_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub summary: Option<String>,
    pub actor_id: DbId,
}

/// Request body for the start endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StartInspection {
    pub actor_id: DbId,
}

/// Request body for the cancel endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelInspection {
    pub actor_id: DbId,
    pub reason: Option<String>,
}

/// Request body for the complete endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteInspection {
    pub summary: String,
    #[serde(default)]
    pub items: Vec<crate::models::inspection_item::ItemScoreEntry>,
    pub actor_id: DbId,
    /// Derive one corrective action per failed item (default: true).
    pub auto_create_corrective_actions: Option<bool>,
    /// Overrides the 7-days-out default on the derived actions.
    pub default_action_due_date: Option<Timestamp>,
}

/// Request body for the reinspection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReinspection {
    /// Explicit corrective actions to scope to; when absent the
    /// reinspection covers all failed source items.
    pub action_ids: Option<Vec<DbId>>,
    pub inspector_id: Option<DbId>,
    pub scheduled_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub actor_id: DbId,
}

/// Filter predicates for the inspection list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspectionFilter {
    pub facility_id: Option<DbId>,
    pub account_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub job_id: Option<DbId>,
    pub inspector_id: Option<DbId>,
    pub status: Option<String>,
    pub scheduled_from: Option<Timestamp>,
    pub scheduled_to: Option<Timestamp>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

/// A list-view row: the inspection plus its open and overdue
/// corrective-action counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionSummary {
    pub id: DbId,
    pub number: String,
    pub facility_id: DbId,
    pub account_id: DbId,
    pub inspector_id: DbId,
    pub status: String,
    pub scheduled_date: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub overall_score: Option<f64>,
    pub rating: Option<String>,
    pub open_action_count: i64,
    pub overdue_action_count: i64,
}

/// Full detail view: the inspection with all of its children.
#[derive(Debug, Serialize)]
pub struct InspectionDetail {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub items: Vec<InspectionItem>,
    pub corrective_actions: Vec<CorrectiveAction>,
    pub signoffs: Vec<InspectionSignoff>,
    pub activities: Vec<InspectionActivity>,
}
