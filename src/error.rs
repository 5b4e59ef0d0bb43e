//! Error taxonomy for the spreadsheet store and the repositories above it.

use thiserror::Error;

/// Failures raised by the tabular store client.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Required credential or document id missing at construction. Fatal,
    /// never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication with the sheets backend failed: {0}")]
    Auth(String),

    #[error("HTTP request failed")]
    Request(#[from] reqwest::Error),

    /// Non-2xx answer from the sheets backend.
    #[error("Sheets API error: status={status}, message='{message}'")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A full-sheet rewrite found a different row count than the snapshot it
    /// was computed from. Detection only; the backend offers no way to
    /// prevent the race.
    #[error("sheet {sheet} changed during rewrite: expected {expected} rows, found {found}")]
    ConcurrentModification {
        sheet: String,
        expected: usize,
        found: usize,
    },
}

impl StoreError {
    /// Only backend failures are worth another attempt; a bad configuration
    /// or malformed payload will fail identically every time.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Request(_) | StoreError::Api { .. } | StoreError::Auth(_)
        )
    }
}

/// Domain-level failures surfaced by the repositories.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("{entity} with id {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepoError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        RepoError::NotFound {
            entity,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_failures_are_transient() {
        assert!(StoreError::Auth("token expired".to_string()).is_transient());
        assert!(
            StoreError::Api {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: String::new(),
            }
            .is_transient()
        );
        assert!(!StoreError::Config("missing variable".to_string()).is_transient());
        assert!(
            !StoreError::ConcurrentModification {
                sheet: "Users".to_string(),
                expected: 2,
                found: 3,
            }
            .is_transient()
        );
    }
}
