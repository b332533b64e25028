//! Best-effort side effects of workflow operations.
//!
//! Appointment creation and inspector notification are dispatched on
//! detached tasks, decoupled from the primary transaction: a failure here
//! is logged at warn level and never fails or rolls back the workflow
//! operation that triggered it.

use chrono::{Duration, TimeZone, Utc};
use cleanops_db::models::appointment::CreateAppointment;
use cleanops_db::models::inspection::Inspection;
use cleanops_db::models::notification::CreateNotification;
use cleanops_db::repositories::{AppointmentRepo, NotificationRepo};
use cleanops_db::DbPool;
use serde_json::json;

/// Hour (UTC) of the fixed daily slot for inspection appointments.
const APPOINTMENT_START_HOUR: u32 = 9;

/// Length of an inspection appointment slot in hours.
const APPOINTMENT_DURATION_HOURS: i64 = 1;

/// Dispatch the side effects of a freshly created inspection: an
/// appointment for the inspector at the fixed daily slot, and a
/// notification when the inspector is not the creator.
pub fn inspection_created(pool: &DbPool, inspection: &Inspection) {
    spawn_appointment(pool, inspection);

    if inspection.inspector_id != inspection.created_by {
        spawn_notification(
            pool,
            inspection,
            "inspection_assigned",
            "New inspection assigned",
            format!(
                "Inspection {} has been scheduled and assigned to you",
                inspection.number
            ),
        );
    }
}

/// Dispatch the side effects of a freshly created reinspection: an
/// appointment plus a notification to the assigned inspector.
pub fn reinspection_created(pool: &DbPool, inspection: &Inspection, actor_id: i64) {
    spawn_appointment(pool, inspection);

    if inspection.inspector_id != actor_id {
        spawn_notification(
            pool,
            inspection,
            "reinspection_scheduled",
            "Reinspection scheduled",
            format!(
                "Follow-up inspection {} has been scheduled and assigned to you",
                inspection.number
            ),
        );
    }
}

fn spawn_appointment(pool: &DbPool, inspection: &Inspection) {
    let pool = pool.clone();
    let input = CreateAppointment {
        inspection_id: Some(inspection.id),
        user_id: inspection.inspector_id,
        title: format!("Inspection {}", inspection.number),
        starts_at: daily_slot_start(inspection.scheduled_date),
        ends_at: daily_slot_start(inspection.scheduled_date)
            + Duration::hours(APPOINTMENT_DURATION_HOURS),
    };
    let inspection_id = inspection.id;

    tokio::spawn(async move {
        if let Err(err) = AppointmentRepo::create(&pool, &input).await {
            tracing::warn!(
                inspection_id,
                error = %err,
                "Failed to create inspection appointment, continuing"
            );
        }
    });
}

fn spawn_notification(
    pool: &DbPool,
    inspection: &Inspection,
    kind: &'static str,
    title: &'static str,
    body: String,
) {
    let pool = pool.clone();
    let input = CreateNotification {
        user_id: inspection.inspector_id,
        kind: kind.to_string(),
        title: title.to_string(),
        body,
        metadata: json!({ "inspection_id": inspection.id, "number": inspection.number }),
    };
    let inspection_id = inspection.id;

    tokio::spawn(async move {
        if let Err(err) = NotificationRepo::create(&pool, &input).await {
            tracing::warn!(
                inspection_id,
                error = %err,
                "Failed to notify inspector, continuing"
            );
        }
    });
}

/// The fixed daily appointment slot on the inspection's scheduled day.
fn daily_slot_start(scheduled_date: cleanops_core::types::Timestamp) -> cleanops_core::types::Timestamp {
    let date = scheduled_date.date_naive();
    Utc.from_utc_datetime(
        &date
            .and_hms_opt(APPOINTMENT_START_HOUR, 0, 0)
            .unwrap_or_default(),
    )
}
