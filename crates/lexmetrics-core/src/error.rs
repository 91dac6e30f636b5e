//! Analysis error types.
//!
//! These errors describe why an analysis produced no result. Store
//! implementations report their own failures with [`StoreFailure`] so the
//! service can classify them by downcasting instead of string matching.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while analyzing resources.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// No resource matched a single-resource request.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The caller may not access the resource. Decided by the store, passed through here.
    #[error("not authorized to access resource: {0}")]
    Unauthorized(String),

    /// The resource content is null or malformed and yields no text.
    #[error("content processing error for resource {resource_id}: {reason}")]
    ContentProcessing { resource_id: String, reason: String },

    /// Every resource in a non-empty batch failed.
    #[error("content processing error: all {failed} resource(s) in the batch failed")]
    AllResourcesFailed { failed: usize },

    /// The resource store could not be read.
    #[error("resource store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AnalysisError {
    pub fn content(resource_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::ContentProcessing {
            resource_id: resource_id.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::ResourceNotFound(_) => ErrorKind::ResourceNotFound,
            AnalysisError::Unauthorized(_) => ErrorKind::Unauthorized,
            AnalysisError::ContentProcessing { .. } | AnalysisError::AllResourcesFailed { .. } => {
                ErrorKind::ContentProcessingError
            }
            AnalysisError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Classify an error returned by a resource store.
    ///
    /// Looks for a [`StoreFailure`] anywhere in the error chain; anything
    /// else means the store itself is unavailable.
    pub fn from_store(error: &anyhow::Error) -> Self {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<StoreFailure>())
            .map(|failure| failure.clone().into())
            .unwrap_or_else(|| AnalysisError::StoreUnavailable(format!("{error:#}")))
    }
}

/// Outcome taxonomy reported to callers.
///
/// `EmptyResultSet` is never carried by an [`AnalysisError`]: a batch that
/// matched nothing is a success with zero resources analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ResourceNotFound,
    Unauthorized,
    ContentProcessingError,
    EmptyResultSet,
    StoreUnavailable,
}

/// Failure classes a resource store can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreFailure {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("access denied to resource: {0}")]
    Unauthorized(String),
}

impl From<StoreFailure> for AnalysisError {
    fn from(value: StoreFailure) -> Self {
        match value {
            StoreFailure::NotFound(id) => AnalysisError::ResourceNotFound(id),
            StoreFailure::Unauthorized(id) => AnalysisError::Unauthorized(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            AnalysisError::ResourceNotFound("x".into()).kind(),
            ErrorKind::ResourceNotFound
        );
        assert_eq!(
            AnalysisError::content("x", "null content").kind(),
            ErrorKind::ContentProcessingError
        );
        assert_eq!(
            AnalysisError::AllResourcesFailed { failed: 3 }.kind(),
            ErrorKind::ContentProcessingError
        );
    }

    #[test]
    fn store_failures_map_into_analysis_errors() {
        let err: AnalysisError = StoreFailure::Unauthorized("r9".into()).into();
        assert_eq!(err, AnalysisError::Unauthorized("r9".into()));
        assert_eq!(err.to_string(), "not authorized to access resource: r9");
    }

    #[derive(Debug, Error)]
    #[error("store rejected the request")]
    struct Wrapped(#[source] StoreFailure);

    #[test]
    fn classifies_store_errors_through_the_chain() {
        let direct = anyhow::Error::new(StoreFailure::NotFound("a".into()));
        assert_eq!(
            AnalysisError::from_store(&direct),
            AnalysisError::ResourceNotFound("a".into())
        );

        let nested = anyhow::Error::new(Wrapped(StoreFailure::Unauthorized("b".into())))
            .context("fetching b");
        assert_eq!(
            AnalysisError::from_store(&nested),
            AnalysisError::Unauthorized("b".into())
        );

        let io = anyhow::anyhow!("disk on fire");
        let err = AnalysisError::from_store(&io);
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(err.to_string().contains("disk on fire"));
    }
}
