//! Completion-time validation for inspections.
//!
//! An inspection may only complete with a non-empty summary and a note on
//! every existing item. The error message names the categories still
//! missing notes so field staff know what to fill in.

/// A minimal view of an item for completion validation.
#[derive(Debug, Clone)]
pub struct CompletionItem<'a> {
    pub category: &'a str,
    pub notes: Option<&'a str>,
}

/// Validate the completion preconditions.
///
/// Returns the human-readable rejection reason on failure.
pub fn validate_completion(summary: &str, items: &[CompletionItem<'_>]) -> Result<(), String> {
    if summary.trim().is_empty() {
        return Err("Completion requires a non-empty summary".to_string());
    }

    let missing: Vec<&str> = items
        .iter()
        .filter(|item| item.notes.map_or(true, |n| n.trim().is_empty()))
        .map(|item| item.category)
        .collect();

    if !missing.is_empty() {
        return Err(format!(
            "Every item needs a note before completion; missing notes for: {}",
            missing.join(", ")
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item<'a>(category: &'a str, notes: Option<&'a str>) -> CompletionItem<'a> {
        CompletionItem { category, notes }
    }

    #[test]
    fn empty_summary_rejected() {
        let result = validate_completion("", &[]);
        assert!(result.unwrap_err().contains("summary"));
    }

    #[test]
    fn whitespace_summary_rejected() {
        assert!(validate_completion("   \n", &[]).is_err());
    }

    #[test]
    fn missing_note_rejected_and_names_category() {
        let items = vec![item("Floors", Some("clean")), item("Windows", None)];
        let err = validate_completion("All done", &items).unwrap_err();
        assert!(err.contains("Windows"));
        assert!(!err.contains("Floors"));
    }

    #[test]
    fn blank_note_counts_as_missing() {
        let items = vec![item("Kitchen", Some("  "))];
        let err = validate_completion("Done", &items).unwrap_err();
        assert!(err.contains("Kitchen"));
    }

    #[test]
    fn multiple_missing_categories_all_listed() {
        let items = vec![item("A", None), item("B", Some("x")), item("C", None)];
        let err = validate_completion("Done", &items).unwrap_err();
        assert!(err.contains("A"));
        assert!(err.contains("C"));
    }

    #[test]
    fn valid_completion_passes() {
        let items = vec![item("Floors", Some("mopped")), item("Windows", Some("wiped"))];
        assert!(validate_completion("Monthly walkthrough", &items).is_ok());
    }

    #[test]
    fn no_items_with_summary_passes() {
        assert!(validate_completion("Nothing to check", &[]).is_ok());
    }
}
