//! Typed errors for the traversal engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep the failure
//! taxonomy explicit. Only setup and persistence failures cross the walker
//! boundary; per-link fetch or extraction failures are absorbed by the
//! strategy contract (absent map entries, empty field values) and surface
//! as counters in the walk report.

use thiserror::Error;

/// Fatal failures while establishing the initial frontier.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The root page could not be fetched.
    #[error("failed to fetch root page {url}{}", status_suffix(.status))]
    RootFetch {
        /// Address that was fetched.
        url: String,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
    },

    /// The root page was fetched but yielded no seed links.
    #[error("no seed links found at {url}")]
    EmptySeedList {
        /// Address that was inspected.
        url: String,
    },

    /// Strategy-specific setup failure.
    #[error("setup failed: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

/// Failures of the checkpoint persistence port.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StoreError {
    /// Wrap an arbitrary storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Storage(Box::new(err))
    }
}

/// Failures that abort a traversal run.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Seeding failed; queue and history are untouched.
    #[error("seeding failed: {0}")]
    Setup(#[from] SetupError),

    /// A checkpoint save or restore failed.
    #[error("checkpoint failed: {0}")]
    Store(#[from] StoreError),

    /// The output sink rejected a record.
    #[error("sink error: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WalkError {
    /// Wrap an arbitrary sink failure.
    pub fn sink(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        WalkError::Sink(Box::new(err))
    }
}

/// Result alias for walk operations.
pub type WalkResult<T> = std::result::Result<T, WalkError>;

/// Result alias for persistence operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result alias for setup operations.
pub type SetupResult<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::RootFetch {
            url: "https://shop.example/".into(),
            status: Some(503),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch root page https://shop.example/ (status 503)"
        );

        let err = SetupError::RootFetch {
            url: "https://shop.example/".into(),
            status: None,
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch root page https://shop.example/"
        );
    }

    #[test]
    fn test_walk_error_from_setup() {
        let err: WalkError = SetupError::EmptySeedList {
            url: "https://shop.example/".into(),
        }
        .into();
        assert!(matches!(err, WalkError::Setup(_)));
    }
}
