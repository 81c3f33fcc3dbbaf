//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hard cap on page size for all list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Offset/limit pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    /// Number of items to skip. Defaults to 0.
    #[serde(default)]
    pub offset: i64,
    /// Maximum number of items to return (max 100). Defaults to 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageMeta {
    /// Offset that produced this page.
    pub offset: i64,
    /// Limit that produced this page.
    pub limit: i64,
    /// Number of items in this page.
    pub count: usize,
}

fn default_limit() -> i64 {
    MAX_LIMIT
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_LIMIT,
        }
    }
}

impl PageParams {
    /// Clamps `offset` to be non-negative and `limit` to `1..=100`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            offset: self.offset.max(0),
            limit: self.limit.clamp(1, MAX_LIMIT),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limits_page_size() {
        let params = PageParams {
            offset: -5,
            limit: 10_000,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.offset, 0);
        assert_eq!(clamped.limit, MAX_LIMIT);
    }

    #[test]
    fn defaults_apply_when_fields_missing() {
        let parsed: PageParams = match serde_json::from_str("{}") {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(parsed.offset, 0);
        assert_eq!(parsed.limit, MAX_LIMIT);
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        let params = PageParams {
            offset: 3,
            limit: 0,
        };
        assert_eq!(params.clamped().limit, 1);
    }
}
