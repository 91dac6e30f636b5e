//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

use lexmetrics_core::error::StoreFailure;

/// Errors that can occur when reading a resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not find, or refused to hand out, a resource.
    #[error("{store} store rejected the request")]
    Access {
        store: String,
        #[source]
        failure: StoreFailure,
    },

    /// The configured resource path does not exist.
    #[error("resource path does not exist: {0}")]
    MissingPath(PathBuf),

    /// Resource files exist but could not be loaded.
    #[error("failed to load resources from {path}: {message}")]
    Load { path: PathBuf, message: String },
}

impl StoreError {
    pub fn not_found(store: &str, id: &str) -> Self {
        StoreError::Access {
            store: store.to_string(),
            failure: StoreFailure::NotFound(id.to_string()),
        }
    }

    pub fn unauthorized(store: &str, id: &str) -> Self {
        StoreError::Access {
            store: store.to_string(),
            failure: StoreFailure::Unauthorized(id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexmetrics_core::error::AnalysisError;

    #[test]
    fn access_errors_classify_through_anyhow() {
        let err = anyhow::Error::new(StoreError::not_found("file", "r1"));
        assert_eq!(
            AnalysisError::from_store(&err),
            AnalysisError::ResourceNotFound("r1".into())
        );

        let err = anyhow::Error::new(StoreError::unauthorized("memory", "r2"));
        assert_eq!(
            AnalysisError::from_store(&err),
            AnalysisError::Unauthorized("r2".into())
        );
    }

    #[test]
    fn load_errors_are_store_unavailable() {
        let err = anyhow::Error::new(StoreError::MissingPath(PathBuf::from("/nope")));
        let classified = AnalysisError::from_store(&err);
        assert!(matches!(classified, AnalysisError::StoreUnavailable(ref m) if m.contains("/nope")));
    }
}
