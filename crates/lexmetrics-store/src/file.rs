//! File-backed resource store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use lexmetrics_core::model::{Resource, ResourceFilter};
use lexmetrics_core::parser::load_resources;
use lexmetrics_core::traits::ResourceStore;

use crate::error::StoreError;

/// A store over a `.json`/`.toml` resource file or a directory of them.
///
/// Files are read once, on first use.
pub struct FileStore {
    path: PathBuf,
    resources: OnceCell<Vec<Resource>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            resources: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn resources(&self) -> Result<&[Resource], StoreError> {
        let resources = self
            .resources
            .get_or_try_init(|| async {
                if !self.path.exists() {
                    return Err(StoreError::MissingPath(self.path.clone()));
                }
                let path = self.path.clone();
                let loaded = tokio::task::spawn_blocking(move || load_resources(&path))
                    .await
                    .map_err(|e| StoreError::Load {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })?
                    .map_err(|e| StoreError::Load {
                        path: self.path.clone(),
                        message: format!("{e:#}"),
                    })?;
                tracing::debug!(
                    path = %self.path.display(),
                    count = loaded.len(),
                    "loaded resources"
                );
                Ok(loaded)
            })
            .await?;
        Ok(resources.as_slice())
    }
}

#[async_trait]
impl ResourceStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, filter: &ResourceFilter) -> anyhow::Result<Vec<Resource>> {
        let resources = self.resources().await?;
        Ok(resources
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Resource> {
        let resources = self.resources().await?;
        resources
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(self.name(), id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexmetrics_core::error::{AnalysisError, ErrorKind};
    use lexmetrics_core::model::ResourceType;

    const RESOURCES: &str = r#"[
        {"id": "c1", "type": "comprension", "ownerId": "u1",
         "content": {"texto": "El gato subió al árbol."}},
        {"id": "o1", "type": "oral", "ownerId": "u2",
         "content": {"guion": "Buenos días. ¿Cómo estás?"}}
    ]"#;

    #[tokio::test]
    async fn reads_file_once_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");
        std::fs::write(&path, RESOURCES).unwrap();

        let store = FileStore::new(&path);
        let oral = store
            .fetch(&ResourceFilter::by_type(ResourceType::Oral))
            .await
            .unwrap();
        assert_eq!(oral.len(), 1);
        assert_eq!(oral[0].id, "o1");

        // Later calls use the cached contents.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(store.get("c1").await.unwrap().owner.as_deref(), Some("u1"));
        assert_eq!(store.fetch(&ResourceFilter::by_owner("u1")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("r.json"), RESOURCES).unwrap();

        let store = FileStore::new(dir.path());
        let err = store.get("nope").await.unwrap_err();
        assert_eq!(
            AnalysisError::from_store(&err),
            AnalysisError::ResourceNotFound("nope".into())
        );
    }

    #[tokio::test]
    async fn missing_path_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent"));
        let err = store.fetch(&ResourceFilter::default()).await.unwrap_err();
        assert_eq!(AnalysisError::from_store(&err).kind(), ErrorKind::StoreUnavailable);
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn unparsable_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{oops").unwrap();

        let err = FileStore::new(&path)
            .fetch(&ResourceFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Load { .. })
        ));
    }
}
