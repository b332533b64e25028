//! Repository for the `inspection_items` table.
//!
//! The handler pre-checks the parent inspection's status, and every write
//! re-checks it inside the statement, so an inspection that reaches a
//! terminal status concurrently still freezes its items. Each mutation
//! appends an activity row in the same transaction.

use cleanops_core::activity::actions;
use cleanops_core::types::DbId;
use serde_json::json;
use sqlx::PgPool;

use crate::models::activity::CreateActivity;
use crate::models::inspection_item::{
    CreateInspectionItem, InspectionItem, UpdateInspectionItem,
};
use crate::repositories::ActivityRepo;

/// Column list for `inspection_items` queries.
pub(crate) const ITEM_COLUMNS: &str = "id, inspection_id, template_item_id, category, \
    item_text, score, rating, notes, photo_url, sort_order, created_at, updated_at";

/// Provides CRUD operations for inspection checklist items.
pub struct InspectionItemRepo;

impl InspectionItemRepo {
    /// Insert a new item and its activity row in one transaction.
    ///
    /// Returns `None` without writing anything when the parent inspection
    /// is in a terminal status.
    pub async fn create(
        pool: &PgPool,
        inspection_id: DbId,
        input: &CreateInspectionItem,
        actor_id: Option<DbId>,
    ) -> Result<Option<InspectionItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // The status set mirrors InspectionStatus::is_terminal.
        let query = format!(
            "INSERT INTO inspection_items \
                (inspection_id, category, item_text, score, rating, notes, photo_url, sort_order) \
             SELECT $1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0) \
             WHERE EXISTS (SELECT 1 FROM inspections \
                            WHERE id = $1 AND status NOT IN ('completed', 'canceled')) \
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, InspectionItem>(&query)
            .bind(inspection_id)
            .bind(&input.category)
            .bind(&input.item_text)
            .bind(&input.score)
            .bind(input.rating)
            .bind(&input.notes)
            .bind(&input.photo_url)
            .bind(input.sort_order)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(item) = item else {
            return Ok(None);
        };

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id,
                action: actions::ITEM_ADDED,
                actor_id,
                details: json!({ "item_id": item.id, "category": item.category }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Find an item by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InspectionItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM inspection_items WHERE id = $1");
        sqlx::query_as::<_, InspectionItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an inspection's items in checklist order.
    pub async fn list_for_inspection(
        pool: &PgPool,
        inspection_id: DbId,
    ) -> Result<Vec<InspectionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM inspection_items \
             WHERE inspection_id = $1 \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, InspectionItem>(&query)
            .bind(inspection_id)
            .fetch_all(pool)
            .await
    }

    /// Patch an item and append its activity row in one transaction.
    ///
    /// Returns `None` without writing anything when the parent inspection
    /// is in a terminal status.
    pub async fn update(
        pool: &PgPool,
        item: &InspectionItem,
        input: &UpdateInspectionItem,
        actor_id: Option<DbId>,
    ) -> Result<Option<InspectionItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE inspection_items SET \
                category = COALESCE($2, category), \
                item_text = COALESCE($3, item_text), \
                score = COALESCE($4, score), \
                rating = COALESCE($5, rating), \
                notes = COALESCE($6, notes), \
                photo_url = COALESCE($7, photo_url), \
                sort_order = COALESCE($8, sort_order), \
                updated_at = now() \
             WHERE id = $1 \
               AND EXISTS (SELECT 1 FROM inspections \
                            WHERE id = $9 AND status NOT IN ('completed', 'canceled')) \
             RETURNING {ITEM_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, InspectionItem>(&query)
            .bind(item.id)
            .bind(&input.category)
            .bind(&input.item_text)
            .bind(&input.score)
            .bind(input.rating)
            .bind(&input.notes)
            .bind(&input.photo_url)
            .bind(input.sort_order)
            .bind(item.inspection_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id: item.inspection_id,
                action: actions::ITEM_UPDATED,
                actor_id,
                details: json!({ "item_id": item.id }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete an item and append its activity row in one transaction.
    ///
    /// Returns `false` without writing anything when the parent
    /// inspection is in a terminal status.
    pub async fn delete(
        pool: &PgPool,
        item: &InspectionItem,
        actor_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "DELETE FROM inspection_items \
             WHERE id = $1 \
               AND EXISTS (SELECT 1 FROM inspections \
                            WHERE id = $2 AND status NOT IN ('completed', 'canceled'))",
        )
        .bind(item.id)
        .bind(item.inspection_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id: item.inspection_id,
                action: actions::ITEM_DELETED,
                actor_id,
                details: json!({ "item_id": item.id, "category": item.category }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
