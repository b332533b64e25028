//! Inspection template models.
//!
//! Templates are reusable checklist definitions; their items carry the
//! per-item weight used by the score calculator.

use cleanops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `inspection_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `inspection_template_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateItem {
    pub id: DbId,
    pub template_id: DbId,
    pub category: String,
    pub item_text: String,
    pub weight: f64,
    pub sort_order: i32,
    pub created_at: Timestamp,
}
