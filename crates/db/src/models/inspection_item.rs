//! Inspection checklist item models and DTOs.

use cleanops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `inspection_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionItem {
    pub id: DbId,
    pub inspection_id: DbId,
    pub template_item_id: Option<DbId>,
    pub category: String,
    pub item_text: String,
    pub score: Option<String>,
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an item to a not-yet-completed inspection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInspectionItem {
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "item_text must not be empty"))]
    pub item_text: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    pub score: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub sort_order: Option<i32>,
    pub actor_id: Option<DbId>,
}

/// DTO for patching an item on a not-yet-completed inspection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInspectionItem {
    pub category: Option<String>,
    pub item_text: Option<String>,
    pub score: Option<String>,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub sort_order: Option<i32>,
    pub actor_id: Option<DbId>,
}

/// One item's score submission inside a complete request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemScoreEntry {
    pub item_id: DbId,
    pub score: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}
