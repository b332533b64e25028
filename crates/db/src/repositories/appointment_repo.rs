//! Repository for the `appointments` table.

use sqlx::PgPool;

use crate::models::appointment::{Appointment, CreateAppointment};

/// Column list for `appointments` queries.
const COLUMNS: &str = "id, inspection_id, user_id, title, starts_at, ends_at, created_at";

/// Provides insert operations for inspection-linked appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments (inspection_id, user_id, title, starts_at, ends_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(input.inspection_id)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(pool)
            .await
    }
}
