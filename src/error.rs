// SPDX-License-Identifier: MIT

//! Application error types shared by every repository.
//!
//! Fan-out reads deliberately do *not* use these: batch reconstruction
//! drops unresolvable documents with a warning instead of failing the
//! whole batch. Errors here are reserved for the primary entity of an
//! operation.

/// Application error type surfaced by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Mutating operation attempted without a recognized caller identity.
    #[error("Authentication required")]
    Unauthenticated,

    /// Requested single entity does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Document exists but is missing required structure for the
    /// operation (e.g. "item is not a visit").
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Store/transport failure, propagated unchanged. No automatic
    /// retry anywhere in the core; the caller decides.
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("user abc".to_string());
        assert_eq!(err.to_string(), "Resource not found: user abc");

        let err = AppError::InvalidState("item is not a visit".to_string());
        assert_eq!(err.to_string(), "Invalid state: item is not a visit");
    }

    #[test]
    fn test_anyhow_conversion() {
        fn fails() -> Result<()> {
            Err(anyhow::anyhow!("boom"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(AppError::Internal(_))));
    }
}
