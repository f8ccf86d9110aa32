//! Pagination configuration

use serde::Deserialize;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

/// Page size bounds applied to every paginated field
///
/// Deserialized values are normalized like [`PaginationConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPaginationConfig")]
pub struct PaginationConfig {
    /// Used when the caller omits `limit` or passes a non-positive one
    pub default_limit: usize,
    /// Upper bound for `limit`
    pub max_limit: usize,
}

impl PaginationConfig {
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            max_limit,
        }
        .normalized()
    }

    /// Read `PAGINATION_DEFAULT_LIMIT` and `PAGINATION_MAX_LIMIT`
    ///
    /// Missing, unparsable or zero values fall back to the defaults.
    ///
    /// ```rust
    /// use social_graphql_helpers::PaginationConfig;
    ///
    /// let config = PaginationConfig::from_env();
    /// assert!(config.default_limit >= 1);
    /// assert!(config.max_limit >= config.default_limit);
    /// ```
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, fallback: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(fallback)
        };
        Self::new(
            read("PAGINATION_DEFAULT_LIMIT", DEFAULT_LIMIT),
            read("PAGINATION_MAX_LIMIT", MAX_LIMIT),
        )
    }

    /// Both bounds positive and `max_limit >= default_limit`
    pub fn normalized(self) -> Self {
        let default_limit = self.default_limit.max(1);
        Self {
            default_limit,
            max_limit: self.max_limit.max(default_limit),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawPaginationConfig {
    default_limit: usize,
    max_limit: usize,
}

impl Default for RawPaginationConfig {
    fn default() -> Self {
        let PaginationConfig {
            default_limit,
            max_limit,
        } = PaginationConfig::default();
        Self {
            default_limit,
            max_limit,
        }
    }
}

impl From<RawPaginationConfig> for PaginationConfig {
    fn from(raw: RawPaginationConfig) -> Self {
        PaginationConfig::new(raw.default_limit, raw.max_limit)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}
