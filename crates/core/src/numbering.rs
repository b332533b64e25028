//! Human-readable inspection numbering.
//!
//! Inspections carry a year-scoped sequential number of the form
//! `INS-<year>-<4-digit seq>`, starting at 1 each year. The sequence is
//! reserved by the repository layer with a read-then-insert loop backed by
//! a uniqueness constraint on the number column; this module holds the
//! pure formatting/parsing half of that contract plus the retry bound.

/// Prefix for inspection numbers.
pub const NUMBER_PREFIX: &str = "INS";

/// Maximum insert attempts before a numbering conflict is surfaced.
pub const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Year-scoped prefix, e.g. `INS-2026-`.
pub fn year_prefix(year: i32) -> String {
    format!("{NUMBER_PREFIX}-{year}-")
}

/// Format a full inspection number, zero-padding the sequence to 4 digits.
pub fn format_number(year: i32, seq: i64) -> String {
    format!("{NUMBER_PREFIX}-{year}-{seq:04}")
}

/// Parse the sequence component out of a stored inspection number.
///
/// Returns `None` for numbers not matching the `PREFIX-year-seq` shape;
/// the repository treats those as sequence 0 so a malformed stray row can
/// never block new creations.
pub fn parse_sequence(number: &str) -> Option<i64> {
    let seq = number.rsplit('-').next()?;
    if seq.is_empty() {
        return None;
    }
    seq.parse::<i64>().ok()
}
