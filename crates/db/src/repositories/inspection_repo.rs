//! Repository for the `inspections` table and its workflow operations.
//!
//! Create, complete, and reinspection are multi-statement operations; each
//! runs in a single transaction so the aggregate is never partially
//! committed. Number reservation is read-then-insert guarded by the
//! `uq_inspections_number` constraint with a bounded retry loop.

use chrono::{Datelike, Utc};
use cleanops_core::activity::actions;
use cleanops_core::numbering;
use cleanops_core::types::{DbId, Timestamp};
use serde_json::json;
use sqlx::{PgPool, Postgres};

use crate::models::activity::CreateActivity;
use crate::models::corrective_action::{CorrectiveAction, InsertCorrectiveAction};
use crate::models::inspection::{
    CreateInspection, Inspection, InspectionFilter, InspectionSummary, UpdateInspection,
};
use crate::models::inspection_item::{InspectionItem, ItemScoreEntry};
use crate::models::template::TemplateItem;
use crate::repositories::{ActivityRepo, CorrectiveActionRepo};

/// Column list for `inspections` queries.
const COLUMNS: &str = "id, number, template_id, facility_id, account_id, job_id, \
    contract_id, inspector_id, status, scheduled_date, completed_at, overall_score, \
    rating, summary, notes, created_by, created_at, updated_at";

/// Everything the completion transaction writes, computed by the caller.
#[derive(Debug)]
pub struct CompleteInspectionData<'a> {
    pub inspection_id: DbId,
    pub summary: &'a str,
    pub item_scores: &'a [ItemScoreEntry],
    pub overall_score: f64,
    pub rating: &'a str,
    pub completed_at: Timestamp,
    pub derived_actions: Vec<InsertCorrectiveAction>,
    pub failed_item_count: usize,
    pub actor_id: DbId,
}

/// Everything the reinspection transaction writes, computed by the caller.
#[derive(Debug)]
pub struct ReinspectionData<'a> {
    pub source: &'a Inspection,
    /// Source items to re-seed onto the new inspection, in relative order.
    pub items: &'a [InspectionItem],
    /// Open corrective actions to point at the new inspection.
    pub relink_action_ids: Vec<DbId>,
    pub inspector_id: DbId,
    pub scheduled_date: Timestamp,
    pub notes: Option<&'a str>,
    pub actor_id: DbId,
}

/// Provides CRUD and workflow operations for inspections.
pub struct InspectionRepo;

impl InspectionRepo {
    /// Create an inspection with a freshly reserved number, seeding items
    /// from the template when one is attached.
    ///
    /// The number is the year-scoped max plus one. Two concurrent creates
    /// can read the same max; the unique constraint rejects the loser and
    /// the reservation is retried with a fresh read, up to
    /// [`numbering::MAX_NUMBER_ATTEMPTS`] times. The final conflict
    /// propagates as the constraint violation for the API layer to
    /// classify as a transient conflict.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInspection,
        template_items: &[TemplateItem],
    ) -> Result<Inspection, sqlx::Error> {
        let year = Utc::now().year();
        let like = format!("{}%", numbering::year_prefix(year));

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut tx = pool.begin().await?;

            let latest: Option<String> = sqlx::query_scalar(
                "SELECT number FROM inspections WHERE number LIKE $1 \
                 ORDER BY length(number) DESC, number DESC LIMIT 1",
            )
            .bind(&like)
            .fetch_optional(&mut *tx)
            .await?;

            let seq = latest
                .as_deref()
                .and_then(numbering::parse_sequence)
                .unwrap_or(0)
                + 1;
            let number = numbering::format_number(year, seq);

            let insert_query = format!(
                "INSERT INTO inspections \
                    (number, template_id, facility_id, account_id, job_id, contract_id, \
                     inspector_id, scheduled_date, notes, created_by) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 RETURNING {COLUMNS}"
            );
            let inserted = sqlx::query_as::<_, Inspection>(&insert_query)
                .bind(&number)
                .bind(input.template_id)
                .bind(input.facility_id)
                .bind(input.account_id)
                .bind(input.job_id)
                .bind(input.contract_id)
                .bind(input.inspector_id)
                .bind(input.scheduled_date)
                .bind(&input.notes)
                .bind(input.created_by)
                .fetch_one(&mut *tx)
                .await;

            let inspection = match inserted {
                Ok(inspection) => inspection,
                Err(err)
                    if attempt < numbering::MAX_NUMBER_ATTEMPTS
                        && crate::is_unique_violation(&err, "uq_inspections_number") =>
                {
                    tracing::warn!(
                        number,
                        attempt,
                        "Inspection number already taken, retrying with a fresh read"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            for (idx, titem) in template_items.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO inspection_items \
                        (inspection_id, template_item_id, category, item_text, sort_order) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(inspection.id)
                .bind(titem.id)
                .bind(&titem.category)
                .bind(&titem.item_text)
                .bind(idx as i32)
                .execute(&mut *tx)
                .await?;
            }

            ActivityRepo::append_in_tx(
                &mut tx,
                &CreateActivity {
                    inspection_id: inspection.id,
                    action: actions::CREATED,
                    actor_id: Some(input.created_by),
                    details: json!({
                        "number": inspection.number,
                        "item_count": template_items.len(),
                    }),
                },
            )
            .await?;

            tx.commit().await?;
            return Ok(inspection);
        }
    }

    /// Find an inspection by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1");
        sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List inspection summaries matching the filter, newest schedule first,
    /// with their open/overdue corrective-action counts.
    pub async fn list(
        pool: &PgPool,
        filter: &InspectionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InspectionSummary>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_filter(filter);

        let query = format!(
            "SELECT i.id, i.number, i.facility_id, i.account_id, i.inspector_id, i.status, \
                i.scheduled_date, i.completed_at, i.overall_score, i.rating, \
                (SELECT COUNT(*) FROM corrective_actions ca \
                  WHERE ca.inspection_id = i.id \
                    AND ca.status IN ('open', 'in_progress'))::BIGINT AS open_action_count, \
                (SELECT COUNT(*) FROM corrective_actions ca \
                  WHERE ca.inspection_id = i.id \
                    AND ca.status IN ('open', 'in_progress') \
                    AND ca.due_date < now())::BIGINT AS overdue_action_count \
             FROM inspections i {where_clause} \
             ORDER BY i.scheduled_date DESC, i.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, InspectionSummary>(&query);
        for value in &bind_values {
            q = bind_value(q, value);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count inspections matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &InspectionFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM inspections i {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for value in &bind_values {
            q = bind_scalar_value(q, value);
        }
        q.fetch_one(pool).await
    }

    /// Patch inspection metadata and append the activity row in one
    /// transaction. The not-completed guard is enforced by the handler.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInspection,
    ) -> Result<Inspection, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE inspections SET \
                inspector_id = COALESCE($2, inspector_id), \
                scheduled_date = COALESCE($3, scheduled_date), \
                notes = COALESCE($4, notes), \
                summary = COALESCE($5, summary), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .bind(input.inspector_id)
            .bind(input.scheduled_date)
            .bind(&input.notes)
            .bind(&input.summary)
            .fetch_one(&mut *tx)
            .await?;

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id: id,
                action: actions::UPDATED,
                actor_id: Some(input.actor_id),
                details: json!({}),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Move an inspection to a new status and append the matching activity
    /// row in one transaction. Used for `start` and `cancel`.
    ///
    /// The UPDATE only matches while the row is still in one of
    /// `from_statuses`; returns `None` without writing anything when it
    /// has moved on since the handler's transition check.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from_statuses: &[&str],
        status: &str,
        activity_action: &'static str,
        actor_id: DbId,
        details: serde_json::Value,
    ) -> Result<Option<Inspection>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE inspections SET status = $2, updated_at = now() \
             WHERE id = $1 AND status = ANY($3) \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .bind(status)
            .bind(from_statuses)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id: id,
                action: activity_action,
                actor_id: Some(actor_id),
                details,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Complete an inspection: persist item scores, the overall score and
    /// rating, batch-create the derived corrective actions, and append the
    /// completion activity, all in one transaction.
    ///
    /// As with [`set_status`](Self::set_status), the status flip only
    /// matches while the row is still in one of `from_statuses`; returns
    /// `None` without writing anything when it has moved on.
    pub async fn complete(
        pool: &PgPool,
        data: &CompleteInspectionData<'_>,
        from_statuses: &[&str],
    ) -> Result<Option<(Inspection, Vec<CorrectiveAction>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE inspections SET \
                status = 'completed', summary = $2, overall_score = $3, rating = $4, \
                completed_at = $5, updated_at = now() \
             WHERE id = $1 AND status = ANY($6) \
             RETURNING {COLUMNS}"
        );
        let inspection = sqlx::query_as::<_, Inspection>(&query)
            .bind(data.inspection_id)
            .bind(data.summary)
            .bind(data.overall_score)
            .bind(data.rating)
            .bind(data.completed_at)
            .bind(from_statuses)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(inspection) = inspection else {
            return Ok(None);
        };

        for entry in data.item_scores {
            sqlx::query(
                "UPDATE inspection_items SET \
                    score = $2, rating = $3, \
                    notes = COALESCE($4, notes), \
                    photo_url = COALESCE($5, photo_url), \
                    updated_at = now() \
                 WHERE id = $1",
            )
            .bind(entry.item_id)
            .bind(&entry.score)
            .bind(entry.rating)
            .bind(&entry.notes)
            .bind(&entry.photo_url)
            .execute(&mut *tx)
            .await?;
        }

        let mut created_actions = Vec::with_capacity(data.derived_actions.len());
        for draft in &data.derived_actions {
            created_actions.push(CorrectiveActionRepo::insert_in_tx(&mut tx, draft).await?);
        }

        ActivityRepo::append_in_tx(
            &mut tx,
            &CreateActivity {
                inspection_id: data.inspection_id,
                action: actions::COMPLETED,
                actor_id: Some(data.actor_id),
                details: json!({
                    "score": data.overall_score,
                    "rating": data.rating,
                    "failed_items": data.failed_item_count,
                    "corrective_actions_created": created_actions.len(),
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some((inspection, created_actions)))
    }

    /// Create a follow-up inspection scoped to the selected source items,
    /// relinking the given open corrective actions, all in one
    /// transaction, with its own number reservation loop.
    pub async fn create_reinspection(
        pool: &PgPool,
        data: &ReinspectionData<'_>,
    ) -> Result<Inspection, sqlx::Error> {
        let year = Utc::now().year();
        let like = format!("{}%", numbering::year_prefix(year));

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut tx = pool.begin().await?;

            let latest: Option<String> = sqlx::query_scalar(
                "SELECT number FROM inspections WHERE number LIKE $1 \
                 ORDER BY length(number) DESC, number DESC LIMIT 1",
            )
            .bind(&like)
            .fetch_optional(&mut *tx)
            .await?;

            let seq = latest
                .as_deref()
                .and_then(numbering::parse_sequence)
                .unwrap_or(0)
                + 1;
            let number = numbering::format_number(year, seq);

            let insert_query = format!(
                "INSERT INTO inspections \
                    (number, template_id, facility_id, account_id, job_id, contract_id, \
                     inspector_id, scheduled_date, notes, created_by) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 RETURNING {COLUMNS}"
            );
            let inserted = sqlx::query_as::<_, Inspection>(&insert_query)
                .bind(&number)
                .bind(data.source.template_id)
                .bind(data.source.facility_id)
                .bind(data.source.account_id)
                .bind(data.source.job_id)
                .bind(data.source.contract_id)
                .bind(data.inspector_id)
                .bind(data.scheduled_date)
                .bind(data.notes)
                .bind(data.actor_id)
                .fetch_one(&mut *tx)
                .await;

            let reinspection = match inserted {
                Ok(inspection) => inspection,
                Err(err)
                    if attempt < numbering::MAX_NUMBER_ATTEMPTS
                        && crate::is_unique_violation(&err, "uq_inspections_number") =>
                {
                    tracing::warn!(
                        number,
                        attempt,
                        "Inspection number already taken, retrying with a fresh read"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            // Re-seed the selected items with fresh ids, keeping the
            // template linkage (and so the weights) and relative order.
            for (idx, item) in data.items.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO inspection_items \
                        (inspection_id, template_item_id, category, item_text, sort_order) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(reinspection.id)
                .bind(item.template_item_id)
                .bind(&item.category)
                .bind(&item.item_text)
                .bind(idx as i32)
                .execute(&mut *tx)
                .await?;
            }

            CorrectiveActionRepo::relink_follow_up_in_tx(
                &mut tx,
                &data.relink_action_ids,
                reinspection.id,
            )
            .await?;

            ActivityRepo::append_in_tx(
                &mut tx,
                &CreateActivity {
                    inspection_id: data.source.id,
                    action: actions::REINSPECTION_CREATED,
                    actor_id: Some(data.actor_id),
                    details: json!({
                        "reinspection_id": reinspection.id,
                        "reinspection_number": reinspection.number,
                        "item_count": data.items.len(),
                    }),
                },
            )
            .await?;

            ActivityRepo::append_in_tx(
                &mut tx,
                &CreateActivity {
                    inspection_id: reinspection.id,
                    action: actions::REINSPECTION_OF,
                    actor_id: Some(data.actor_id),
                    details: json!({
                        "source_id": data.source.id,
                        "source_number": data.source.number,
                    }),
                },
            )
            .await?;

            tx.commit().await?;
            return Ok(reinspection);
        }
    }

}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built inspection list queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
    Double(f64),
}

type SummaryQuery<'q> =
    sqlx::query::QueryAs<'q, Postgres, InspectionSummary, sqlx::postgres::PgArguments>;
type ScalarQuery<'q> = sqlx::query::QueryScalar<'q, Postgres, i64, sqlx::postgres::PgArguments>;

fn bind_value<'q>(q: SummaryQuery<'q>, value: &'q BindValue) -> SummaryQuery<'q> {
    match value {
        BindValue::BigInt(v) => q.bind(*v),
        BindValue::Text(v) => q.bind(v),
        BindValue::Timestamp(v) => q.bind(*v),
        BindValue::Double(v) => q.bind(*v),
    }
}

fn bind_scalar_value<'q>(q: ScalarQuery<'q>, value: &'q BindValue) -> ScalarQuery<'q> {
    match value {
        BindValue::BigInt(v) => q.bind(*v),
        BindValue::Text(v) => q.bind(v),
        BindValue::Timestamp(v) => q.bind(*v),
        BindValue::Double(v) => q.bind(*v),
    }
}

/// Build a WHERE clause and bind values from the list filter.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_filter(filter: &InspectionFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    let mut push = |cond: String, value: BindValue| {
        conditions.push(cond);
        bind_values.push(value);
    };

    if let Some(facility_id) = filter.facility_id {
        push(format!("i.facility_id = ${bind_idx}"), BindValue::BigInt(facility_id));
        bind_idx += 1;
    }
    if let Some(account_id) = filter.account_id {
        push(format!("i.account_id = ${bind_idx}"), BindValue::BigInt(account_id));
        bind_idx += 1;
    }
    if let Some(contract_id) = filter.contract_id {
        push(format!("i.contract_id = ${bind_idx}"), BindValue::BigInt(contract_id));
        bind_idx += 1;
    }
    if let Some(job_id) = filter.job_id {
        push(format!("i.job_id = ${bind_idx}"), BindValue::BigInt(job_id));
        bind_idx += 1;
    }
    if let Some(inspector_id) = filter.inspector_id {
        push(format!("i.inspector_id = ${bind_idx}"), BindValue::BigInt(inspector_id));
        bind_idx += 1;
    }
    if let Some(ref status) = filter.status {
        push(format!("i.status = ${bind_idx}"), BindValue::Text(status.clone()));
        bind_idx += 1;
    }
    if let Some(from) = filter.scheduled_from {
        push(format!("i.scheduled_date >= ${bind_idx}"), BindValue::Timestamp(from));
        bind_idx += 1;
    }
    if let Some(to) = filter.scheduled_to {
        push(format!("i.scheduled_date <= ${bind_idx}"), BindValue::Timestamp(to));
        bind_idx += 1;
    }
    if let Some(min_score) = filter.min_score {
        push(format!("i.overall_score >= ${bind_idx}"), BindValue::Double(min_score));
        bind_idx += 1;
    }
    if let Some(max_score) = filter.max_score {
        push(format!("i.overall_score <= ${bind_idx}"), BindValue::Double(max_score));
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}
