//! Repository for the `inspection_activities` table.
//!
//! The activity trail is append-only: there are no update or delete
//! statements here by design.

use cleanops_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::activity::{CreateActivity, InspectionActivity};

/// Column list for `inspection_activities` queries.
const COLUMNS: &str = "id, inspection_id, action, actor_id, details, created_at";

/// Provides append and list operations for the inspection activity trail.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append an activity row inside an existing transaction.
    pub async fn append_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateActivity,
    ) -> Result<InspectionActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspection_activities (inspection_id, action, actor_id, details) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectionActivity>(&query)
            .bind(input.inspection_id)
            .bind(input.action)
            .bind(input.actor_id)
            .bind(&input.details)
            .fetch_one(&mut **tx)
            .await
    }

    /// List an inspection's activity trail, oldest first.
    pub async fn list_for_inspection(
        pool: &PgPool,
        inspection_id: DbId,
    ) -> Result<Vec<InspectionActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspection_activities \
             WHERE inspection_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, InspectionActivity>(&query)
            .bind(inspection_id)
            .fetch_all(pool)
            .await
    }
}
