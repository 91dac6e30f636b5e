//! The resource store seam.
//!
//! The engine never reads storage itself. Callers hand it resources through
//! a [`ResourceStore`], implemented by the `lexmetrics-store` crate.

use async_trait::async_trait;

use crate::model::{Resource, ResourceFilter};

/// Read-only access to stored resources.
///
/// Implementations report "not found" and "not authorized" by returning a
/// [`StoreFailure`](crate::error::StoreFailure) inside the `anyhow::Error`
/// (directly or as the source of their own error type) so callers can
/// classify them.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Human-readable store name (e.g. "file").
    fn name(&self) -> &str;

    /// Resources matching the type and owner criteria of `filter`.
    ///
    /// Offset and limit are applied by the engine, so stores may ignore them.
    async fn fetch(&self, filter: &ResourceFilter) -> anyhow::Result<Vec<Resource>>;

    /// A single resource by id.
    async fn get(&self, id: &str) -> anyhow::Result<Resource>;
}
