//! In-memory resource store, for tests and inline configuration.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use lexmetrics_core::model::{Resource, ResourceFilter};
use lexmetrics_core::traits::ResourceStore;

use crate::error::StoreError;

/// A store backed by a fixed list of resources.
///
/// Ids on the deny-list are reported as unauthorized by `get` and are left
/// out of `fetch` results.
pub struct InMemoryStore {
    resources: Vec<Resource>,
    denied: HashSet<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last filter received by `fetch`.
    last_filter: Mutex<Option<ResourceFilter>>,
}

impl InMemoryStore {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            denied: HashSet::new(),
            call_count: AtomicU32::new(0),
            last_filter: Mutex::new(None),
        }
    }

    /// Deny access to the given resource ids.
    pub fn with_denied<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Get the number of calls made to this store.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last filter passed to `fetch`.
    pub fn last_filter(&self) -> Option<ResourceFilter> {
        self.last_filter
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, filter: &ResourceFilter) -> anyhow::Result<Vec<Resource>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_filter.lock() {
            *last = Some(filter.clone());
        }

        Ok(self
            .resources
            .iter()
            .filter(|r| filter.matches(r) && !self.denied.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Resource> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if self.denied.contains(id) {
            return Err(StoreError::unauthorized(self.name(), id).into());
        }
        self.resources
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(self.name(), id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexmetrics_core::error::AnalysisError;
    use lexmetrics_core::model::ResourceType;
    use serde_json::json;

    fn resource(id: &str, resource_type: ResourceType, owner: &str) -> Resource {
        Resource {
            id: id.into(),
            resource_type,
            owner: Some(owner.into()),
            title: None,
            content: Some(json!({"texto": "Hola."})),
        }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new(vec![
            resource("a", ResourceType::Comprension, "u1"),
            resource("b", ResourceType::Oral, "u1"),
            resource("c", ResourceType::Comprension, "u2"),
        ])
        .with_denied(["c"])
    }

    #[tokio::test]
    async fn fetch_filters_and_hides_denied() {
        let store = store();
        let all = store.fetch(&ResourceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let filter = ResourceFilter::by_type(ResourceType::Comprension);
        let reading = store.fetch(&filter).await.unwrap();
        assert_eq!(reading.len(), 1);
        assert_eq!(reading[0].id, "a");

        assert_eq!(store.call_count(), 2);
        assert_eq!(store.last_filter(), Some(filter));
    }

    #[tokio::test]
    async fn get_reports_typed_failures() {
        let store = store();
        assert_eq!(store.get("b").await.unwrap().resource_type, ResourceType::Oral);

        let missing = store.get("zz").await.unwrap_err();
        assert_eq!(
            AnalysisError::from_store(&missing),
            AnalysisError::ResourceNotFound("zz".into())
        );

        let denied = store.get("c").await.unwrap_err();
        assert_eq!(
            AnalysisError::from_store(&denied),
            AnalysisError::Unauthorized("c".into())
        );
    }
}
