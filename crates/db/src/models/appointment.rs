//! Appointment collaborator models.
//!
//! The scheduling subsystem proper lives outside this service; the
//! inspection workflow only creates linked appointment rows as a
//! best-effort side effect.

use cleanops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub inspection_id: Option<DbId>,
    pub user_id: DbId,
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub created_at: Timestamp,
}

/// Insert values for an appointment row.
#[derive(Debug, Clone)]
pub struct CreateAppointment {
    pub inspection_id: Option<DbId>,
    pub user_id: DbId,
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}
