//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async SQL operations.
//! Reads accept `&PgPool`; writes accept `&mut PgConnection` so callers can
//! run them inside a transaction.

pub mod session_repo;

pub use session_repo::SessionRepo;

/// Default page size for list queries.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound for any list query.
pub const MAX_LIMIT: i64 = 100;

/// Resolve an optional client-supplied limit into `[1, MAX_LIMIT]`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_clamped_to_range() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(500)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(5)), 5);
    }
}
