//! Repository for the `corrective_actions` table.

use cleanops_core::activity::actions;
use cleanops_core::types::DbId;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::activity::CreateActivity;
use crate::models::corrective_action::{
    CorrectiveAction, CorrectiveActionUpdateFields, InsertCorrectiveAction,
};
use crate::repositories::ActivityRepo;

/// Column list for `corrective_actions` queries.
pub(crate) const ACTION_COLUMNS: &str = "id, inspection_id, item_id, title, description, \
    severity, status, due_date, assignee_id, resolved_by, resolved_at, resolution_notes, \
    verified_by, verified_at, follow_up_inspection_id, created_at, updated_at";

/// Provides CRUD and lifecycle operations for corrective actions.
pub struct CorrectiveActionRepo;

impl CorrectiveActionRepo {
    /// Insert a corrective action inside an existing transaction.
    ///
    /// Used both by explicit creation and by the completion batch.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &InsertCorrectiveAction,
    ) -> Result<CorrectiveAction, sqlx::Error> {
        let query = format!(
            "INSERT INTO corrective_actions \
                (inspection_id, item_id, title, description, severity, due_date, assignee_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ACTION_COLUMNS}"
        );
        sqlx::query_as::<_, CorrectiveAction>(&query)
            .bind(input.inspection_id)
            .bind(input.item_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.severity)
            .bind(input.due_date)
            .bind(input.assignee_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert an explicitly-created corrective action plus its activity row.
    pub async fn create(
        pool: &PgPool,
        input: &InsertCorrectiveAction,
        actor_id: Option<DbId>,
    ) -> Result<CorrectiveAction, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let action = Self::insert_in_tx(&mut tx, input).await?;

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id: input.inspection_id,
                action: actions::ACTION_CREATED,
                actor_id,
                details: json!({
                    "corrective_action_id": action.id,
                    "severity": action.severity,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(action)
    }

    /// Find a corrective action by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CorrectiveAction>, sqlx::Error> {
        let query = format!("SELECT {ACTION_COLUMNS} FROM corrective_actions WHERE id = $1");
        sqlx::query_as::<_, CorrectiveAction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an inspection's corrective actions, newest first.
    pub async fn list_for_inspection(
        pool: &PgPool,
        inspection_id: DbId,
    ) -> Result<Vec<CorrectiveAction>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM corrective_actions \
             WHERE inspection_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CorrectiveAction>(&query)
            .bind(inspection_id)
            .fetch_all(pool)
            .await
    }

    /// Write the merged update for a corrective action plus its activity
    /// row in one transaction.
    ///
    /// Every patchable column is written; the handler has already merged
    /// the patch into the current row and applied the resolution and
    /// verification stamp rules.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        inspection_id: DbId,
        fields: &CorrectiveActionUpdateFields,
        actor_id: Option<DbId>,
    ) -> Result<CorrectiveAction, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE corrective_actions SET \
                title = $2, description = $3, severity = $4, status = $5, \
                due_date = $6, assignee_id = $7, resolved_by = $8, resolved_at = $9, \
                resolution_notes = $10, verified_by = $11, verified_at = $12, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {ACTION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CorrectiveAction>(&query)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.severity)
            .bind(&fields.status)
            .bind(fields.due_date)
            .bind(fields.assignee_id)
            .bind(fields.resolved_by)
            .bind(fields.resolved_at)
            .bind(&fields.resolution_notes)
            .bind(fields.verified_by)
            .bind(fields.verified_at)
            .fetch_one(&mut *tx)
            .await?;

        let activity_action = if updated.status == "verified" {
            actions::ACTION_VERIFIED
        } else {
            actions::ACTION_UPDATED
        };

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id,
                action: activity_action,
                actor_id,
                details: json!({
                    "corrective_action_id": id,
                    "status": updated.status,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// List the still-open actions among `action_ids` that reference an
    /// inspection item. Used to resolve an explicit reinspection scope.
    pub async fn list_open_with_items(
        pool: &PgPool,
        inspection_id: DbId,
        action_ids: &[DbId],
    ) -> Result<Vec<CorrectiveAction>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM corrective_actions \
             WHERE inspection_id = $1 \
               AND id = ANY($2) \
               AND status IN ('open', 'in_progress') \
               AND item_id IS NOT NULL \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CorrectiveAction>(&query)
            .bind(inspection_id)
            .bind(action_ids)
            .fetch_all(pool)
            .await
    }

    /// List all still-open actions on an inspection that reference an item.
    pub async fn list_open_for_inspection(
        pool: &PgPool,
        inspection_id: DbId,
    ) -> Result<Vec<CorrectiveAction>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM corrective_actions \
             WHERE inspection_id = $1 \
               AND status IN ('open', 'in_progress') \
               AND item_id IS NOT NULL \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CorrectiveAction>(&query)
            .bind(inspection_id)
            .fetch_all(pool)
            .await
    }

    /// Point the given open actions at a follow-up inspection. Does not
    /// change their status.
    pub async fn relink_follow_up_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        action_ids: &[DbId],
        follow_up_inspection_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        if action_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE corrective_actions \
             SET follow_up_inspection_id = $2, updated_at = now() \
             WHERE id = ANY($1)",
        )
        .bind(action_ids)
        .bind(follow_up_inspection_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
