//! Repository for the `inspection_signoffs` table.
//!
//! Signoffs are append-only; corrections are recorded as new signoffs.
//! The completed-status guard is enforced by the handler before insert.

use cleanops_core::activity::actions;
use cleanops_core::types::DbId;
use serde_json::json;
use sqlx::PgPool;

use crate::models::activity::CreateActivity;
use crate::models::signoff::{CreateSignoff, InspectionSignoff};
use crate::repositories::ActivityRepo;

/// Column list for `inspection_signoffs` queries.
const COLUMNS: &str = "id, inspection_id, signer_type, signer_name, signer_title, \
    comments, signer_user_id, signed_at";

/// Provides append and list operations for inspection signoffs.
pub struct SignoffRepo;

impl SignoffRepo {
    /// Insert a signoff and its activity row in one transaction.
    pub async fn create(
        pool: &PgPool,
        inspection_id: DbId,
        input: &CreateSignoff,
        actor_id: Option<DbId>,
    ) -> Result<InspectionSignoff, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO inspection_signoffs \
                (inspection_id, signer_type, signer_name, signer_title, comments, signer_user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let signoff = sqlx::query_as::<_, InspectionSignoff>(&query)
            .bind(inspection_id)
            .bind(&input.signer_type)
            .bind(&input.signer_name)
            .bind(&input.signer_title)
            .bind(&input.comments)
            .bind(input.signer_user_id)
            .fetch_one(&mut *tx)
            .await?;

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id,
                action: actions::SIGNOFF_RECORDED,
                actor_id,
                details: json!({
                    "signoff_id": signoff.id,
                    "signer_type": signoff.signer_type,
                    "signer_name": signoff.signer_name,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(signoff)
    }

    /// List an inspection's signoffs, oldest first.
    pub async fn list_for_inspection(
        pool: &PgPool,
        inspection_id: DbId,
    ) -> Result<Vec<InspectionSignoff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspection_signoffs \
             WHERE inspection_id = $1 \
             ORDER BY signed_at ASC, id ASC"
        );
        sqlx::query_as::<_, InspectionSignoff>(&query)
            .bind(inspection_id)
            .fetch_all(pool)
            .await
    }
}
