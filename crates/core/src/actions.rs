//! Corrective-action derivation from failed checklist items.
//!
//! At completion time, every item scored `fail` produces one corrective
//! action. Severity comes from the item's rating when present; the due date
//! defaults to a week out at midnight UTC unless the caller supplies one.

use chrono::{Duration, TimeZone, Utc};

use crate::status::ActionSeverity;
use crate::types::Timestamp;

/// Days until the default due date when none is supplied.
pub const DEFAULT_DUE_DAYS: i64 = 7;

/// Derive severity from an item's optional 1–5 rating.
///
/// `<=2` critical, `==3` major, `>=4` minor. An item without a rating
/// (plain pass/fail checklist) defaults to major.
pub fn derive_severity(rating: Option<i16>) -> ActionSeverity {
    match rating {
        Some(r) if r <= 2 => ActionSeverity::Critical,
        Some(3) => ActionSeverity::Major,
        Some(_) => ActionSeverity::Minor,
        None => ActionSeverity::Major,
    }
}

/// `from + days`, truncated to midnight UTC.
///
/// Shared by the default corrective-action due date and the default
/// reinspection schedule, which both fall a week out at midnight.
pub fn midnight_after_days(from: Timestamp, days: i64) -> Timestamp {
    let date = (from + Duration::days(days)).date_naive();
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

/// Default due date: `completed_at + 7 days`, truncated to midnight UTC.
pub fn default_due_date(completed_at: Timestamp) -> Timestamp {
    midnight_after_days(completed_at, DEFAULT_DUE_DAYS)
}

/// The fields of a corrective action synthesized from a failed item.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDraft {
    pub title: String,
    pub description: String,
    pub severity: ActionSeverity,
    pub due_date: Timestamp,
}

/// Build the corrective-action draft for a failed item.
///
/// The description is the item's note when it has one, otherwise a generic
/// line naming the item's category.
pub fn derive_action(
    item_text: &str,
    category: &str,
    notes: Option<&str>,
    rating: Option<i16>,
    completed_at: Timestamp,
    due_date: Option<Timestamp>,
) -> ActionDraft {
    let description = match notes {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => format!("Failed checklist item in {category}"),
    };

    ActionDraft {
        title: format!("Correct: {item_text}"),
        description,
        severity: derive_severity(rating),
        due_date: due_date.unwrap_or_else(|| default_due_date(completed_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn severity_boundaries() {
        assert_eq!(derive_severity(Some(1)), ActionSeverity::Critical);
        assert_eq!(derive_severity(Some(2)), ActionSeverity::Critical);
        assert_eq!(derive_severity(Some(3)), ActionSeverity::Major);
        assert_eq!(derive_severity(Some(4)), ActionSeverity::Minor);
        assert_eq!(derive_severity(Some(5)), ActionSeverity::Minor);
    }

    #[test]
    fn missing_rating_defaults_to_major() {
        assert_eq!(derive_severity(None), ActionSeverity::Major);
    }

    #[test]
    fn default_due_is_seven_days_out_at_midnight() {
        let completed = Utc.with_ymd_and_hms(2026, 3, 10, 14, 35, 22).unwrap();
        let due = default_due_date(completed);
        assert_eq!(due, Utc.with_ymd_and_hms(2026, 3, 17, 0, 0, 0).unwrap());
        assert_eq!(due.hour(), 0);
    }

    #[test]
    fn default_due_crosses_month_boundary() {
        let completed = Utc.with_ymd_and_hms(2026, 1, 28, 9, 0, 0).unwrap();
        assert_eq!(
            default_due_date(completed),
            Utc.with_ymd_and_hms(2026, 2, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn draft_title_and_fallback_description() {
        let completed = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let draft = derive_action("Mop lobby floor", "Floors", None, None, completed, None);
        assert_eq!(draft.title, "Correct: Mop lobby floor");
        assert_eq!(draft.description, "Failed checklist item in Floors");
        assert_eq!(draft.severity, ActionSeverity::Major);
    }

    #[test]
    fn draft_uses_item_note_when_present() {
        let completed = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let draft = derive_action(
            "Empty bins",
            "Waste",
            Some("Bins overflowing in kitchen"),
            Some(2),
            completed,
            None,
        );
        assert_eq!(draft.description, "Bins overflowing in kitchen");
        assert_eq!(draft.severity, ActionSeverity::Critical);
    }

    #[test]
    fn blank_note_falls_back_to_category_description() {
        let completed = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let draft = derive_action("Dust vents", "Air", Some("   "), None, completed, None);
        assert_eq!(draft.description, "Failed checklist item in Air");
    }

    #[test]
    fn explicit_due_date_wins() {
        let completed = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let explicit = Utc.with_ymd_and_hms(2026, 3, 12, 17, 0, 0).unwrap();
        let draft = derive_action("X", "Y", None, None, completed, Some(explicit));
        assert_eq!(draft.due_date, explicit);
    }
}
