//! Repository for the `inspection_templates` and `inspection_template_items` tables.

use cleanops_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{InspectionTemplate, TemplateItem};

/// Column list for `inspection_templates` queries.
const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Column list for `inspection_template_items` queries.
const ITEM_COLUMNS: &str = "id, template_id, category, item_text, weight, sort_order, created_at";

/// Provides read operations for inspection templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Find a template by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InspectionTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspection_templates WHERE id = $1");
        sqlx::query_as::<_, InspectionTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a template's items in checklist order.
    pub async fn list_items(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<TemplateItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM inspection_template_items \
             WHERE template_id = $1 \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, TemplateItem>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }
}
