//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 200;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to `[1, MAX_LIMIT]`, defaulting to [`DEFAULT_LIMIT`].
    pub fn clamp_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Clamp to non-negative, defaulting to 0.
    pub fn clamp_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let params = PaginationParams {
            limit: None,
            offset: None,
        };
        assert_eq!(params.clamp_limit(), DEFAULT_LIMIT);
        assert_eq!(params.clamp_offset(), 0);
    }

    #[test]
    fn limit_clamped_to_cap() {
        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.clamp_limit(), MAX_LIMIT);
        assert_eq!(params.clamp_offset(), 0);
    }

    #[test]
    fn zero_limit_raised_to_one() {
        let params = PaginationParams {
            limit: Some(0),
            offset: Some(20),
        };
        assert_eq!(params.clamp_limit(), 1);
        assert_eq!(params.clamp_offset(), 20);
    }
}
