//! The analysis service: store access plus the engine, behind the
//! response envelope.

use std::sync::Arc;

use crate::aggregate::BatchAnalysis;
use crate::analysis::ResourceReport;
use crate::batch::{BatchObserver, BatchOrchestrator, NoopObserver};
use crate::error::{AnalysisError, ErrorKind};
use crate::model::ResourceFilter;
use crate::report::{ApiResponse, UserReport};
use crate::traits::ResourceStore;

pub struct AnalysisService {
    store: Arc<dyn ResourceStore>,
    orchestrator: BatchOrchestrator,
    parallel: bool,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn ResourceStore>, orchestrator: BatchOrchestrator) -> Self {
        Self {
            store,
            orchestrator,
            parallel: false,
        }
    }

    /// Analyze batches with [`BatchOrchestrator::run_parallel`].
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn store(&self) -> &dyn ResourceStore {
        self.store.as_ref()
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator {
        &self.orchestrator
    }

    /// Detailed analysis of one resource.
    #[tracing::instrument(skip(self))]
    pub async fn analyze_resource(&self, id: &str) -> ApiResponse<ResourceReport> {
        match self.try_analyze_resource(id).await {
            Ok(report) => ApiResponse::ok(report),
            Err(e) => {
                tracing::warn!("resource analysis failed: {e}");
                ApiResponse::failure(&e)
            }
        }
    }

    async fn try_analyze_resource(&self, id: &str) -> Result<ResourceReport, AnalysisError> {
        let resource = self
            .store
            .get(id)
            .await
            .map_err(|e| AnalysisError::from_store(&e))?;
        let (_, report) = self.orchestrator.analyzer().analyze_detailed(&resource)?;
        Ok(report)
    }

    /// Batch analysis of the resources matching `filter`.
    pub async fn analyze_batch(&self, filter: &ResourceFilter) -> ApiResponse<BatchAnalysis> {
        self.analyze_batch_with(filter, &NoopObserver).await
    }

    #[tracing::instrument(skip(self, observer))]
    pub async fn analyze_batch_with(
        &self,
        filter: &ResourceFilter,
        observer: &dyn BatchObserver,
    ) -> ApiResponse<BatchAnalysis> {
        match self.try_analyze_batch(filter, observer).await {
            Ok(batch) if batch.is_empty() => ApiResponse::ok_with(
                ErrorKind::EmptyResultSet,
                "no resources matched the filter",
                batch,
            ),
            Ok(batch) => ApiResponse::ok(batch),
            Err(e) => {
                tracing::warn!("batch analysis failed: {e}");
                ApiResponse::failure(&e)
            }
        }
    }

    async fn try_analyze_batch(
        &self,
        filter: &ResourceFilter,
        observer: &dyn BatchObserver,
    ) -> Result<BatchAnalysis, AnalysisError> {
        let resources = self
            .store
            .fetch(filter)
            .await
            .map_err(|e| AnalysisError::from_store(&e))?;
        tracing::debug!(store = self.store.name(), fetched = resources.len(), "fetched resources");

        if self.parallel {
            self.orchestrator
                .run_parallel(&resources, filter, observer)
                .await
        } else {
            self.orchestrator.run_with(&resources, filter, observer)
        }
    }

    /// Quality report over every resource owned by `user_id`.
    pub async fn user_report(&self, user: &str, user_id: &str) -> ApiResponse<UserReport> {
        let filter = ResourceFilter::by_owner(user_id);
        match self.try_analyze_batch(&filter, &NoopObserver).await {
            Ok(batch) => ApiResponse::ok(UserReport::from_batch(user, user_id, &batch)),
            Err(e) => {
                tracing::warn!(user_id, "user report failed: {e}");
                ApiResponse::failure(&e)
            }
        }
    }
}
