//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Listing parameters (`?limit=`).
///
/// The raw string is kept so an unparsable value falls back to the default
/// instead of rejecting the request. Values are clamped in the repository
/// layer via `clamp_limit`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
}

impl ListParams {
    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_limit() {
        let params = ListParams {
            limit: Some("5".into()),
        };
        assert_eq!(params.limit(), Some(5));
    }

    #[test]
    fn ignores_garbage_limit() {
        let params = ListParams {
            limit: Some("five".into()),
        };
        assert_eq!(params.limit(), None);
        assert_eq!(ListParams::default().limit(), None);
    }
}
