//! Limit/offset pagination helpers for admin list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 200;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Effective limit, clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PageInfo {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

impl PageInfo {
    pub fn new(query: &PageQuery, total: i64) -> Self {
        Self {
            limit: query.limit(),
            offset: query.offset(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let query = PageQuery {
            limit: Some(10_000),
            offset: None,
        };
        assert_eq!(query.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_limit_clamped_to_min() {
        let query = PageQuery {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn test_negative_offset_treated_as_zero() {
        let query = PageQuery {
            limit: None,
            offset: Some(-5),
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_info() {
        let query = PageQuery {
            limit: Some(25),
            offset: Some(50),
        };
        let info = PageInfo::new(&query, 123);
        assert_eq!(info.limit, 25);
        assert_eq!(info.offset, 50);
        assert_eq!(info.total, 123);
    }
}
