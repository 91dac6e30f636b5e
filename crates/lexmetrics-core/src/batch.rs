//! Batch orchestration.
//!
//! Filters the input, caps it, analyzes every resource independently and
//! folds the results. A resource that fails is recorded and skipped; the
//! batch only fails when every selected resource failed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::aggregate::{aggregate, BatchAnalysis, ResourceError};
use crate::analysis::{ResourceAnalysis, ResourceAnalyzer};
use crate::config::MetricsConfig;
use crate::error::AnalysisError;
use crate::model::{Resource, ResourceFilter};

/// Progress hooks for a batch run.
pub trait BatchObserver: Send + Sync {
    fn on_batch_start(&self, selected: usize);
    fn on_resource_complete(&self, analysis: &ResourceAnalysis);
    fn on_resource_error(&self, resource_id: &str, error: &AnalysisError);
    fn on_batch_complete(&self, analyzed: usize, failed: usize, elapsed: Duration);
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn on_batch_start(&self, _: usize) {}
    fn on_resource_complete(&self, _: &ResourceAnalysis) {}
    fn on_resource_error(&self, _: &str, _: &AnalysisError) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// The resources a batch will analyze.
struct Selection<'a> {
    resources: Vec<&'a Resource>,
    total_matched: usize,
}

impl Selection<'_> {
    fn truncated(&self) -> bool {
        self.total_matched > self.resources.len()
    }
}

type Outcome = (String, Result<ResourceAnalysis, AnalysisError>);

pub struct BatchOrchestrator {
    analyzer: Arc<ResourceAnalyzer>,
    config: MetricsConfig,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::from_config(MetricsConfig::default())
    }
}

impl BatchOrchestrator {
    pub fn new(analyzer: ResourceAnalyzer, config: MetricsConfig) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            config,
        }
    }

    pub fn from_config(config: MetricsConfig) -> Self {
        Self::new(ResourceAnalyzer::from_config(&config), config)
    }

    pub fn analyzer(&self) -> &ResourceAnalyzer {
        &self.analyzer
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Analyze a batch sequentially.
    pub fn run(
        &self,
        resources: &[Resource],
        filter: &ResourceFilter,
    ) -> Result<BatchAnalysis, AnalysisError> {
        self.run_with(resources, filter, &NoopObserver)
    }

    /// Analyze a batch sequentially, reporting progress to `observer`.
    #[tracing::instrument(skip_all, fields(input = resources.len()))]
    pub fn run_with(
        &self,
        resources: &[Resource],
        filter: &ResourceFilter,
        observer: &dyn BatchObserver,
    ) -> Result<BatchAnalysis, AnalysisError> {
        let started = Instant::now();
        let selection = self.select(resources, filter);
        observer.on_batch_start(selection.resources.len());

        let outcomes: Vec<Outcome> = selection
            .resources
            .iter()
            .map(|resource| {
                let result = self.analyzer.analyze(resource);
                report(observer, &resource.id, &result);
                (resource.id.clone(), result)
            })
            .collect();

        self.finish(&selection, outcomes, filter, started, observer)
    }

    /// Analyze a batch with per-resource work spread over blocking tasks.
    ///
    /// At most `batch.parallelism` resources are analyzed at once. Results
    /// are put back in input order before the fold, so the outcome matches
    /// [`run`](Self::run).
    #[tracing::instrument(skip_all, fields(input = resources.len()))]
    pub async fn run_parallel(
        &self,
        resources: &[Resource],
        filter: &ResourceFilter,
        observer: &dyn BatchObserver,
    ) -> Result<BatchAnalysis, AnalysisError> {
        let started = Instant::now();
        let selection = self.select(resources, filter);
        observer.on_batch_start(selection.resources.len());

        let semaphore = Arc::new(Semaphore::new(self.config.batch.parallelism.max(1)));
        let mut futures = FuturesUnordered::new();

        for (index, resource) in selection.resources.iter().enumerate() {
            let analyzer = Arc::clone(&self.analyzer);
            let semaphore = Arc::clone(&semaphore);
            let resource = (*resource).clone();

            futures.push(async move {
                let id = resource.id.clone();
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => tokio::task::spawn_blocking(move || analyzer.analyze(&resource))
                        .await
                        .unwrap_or_else(|e| {
                            Err(AnalysisError::content(&id, format!("analysis task failed: {e}")))
                        }),
                    Err(_) => Err(AnalysisError::content(&id, "semaphore closed")),
                };
                (index, id, result)
            });
        }

        let mut slots: Vec<Option<Outcome>> = Vec::with_capacity(selection.resources.len());
        slots.resize_with(selection.resources.len(), || None);

        while let Some((index, id, result)) = futures.next().await {
            report(observer, &id, &result);
            slots[index] = Some((id, result));
        }

        let outcomes = slots.into_iter().flatten().collect();
        self.finish(&selection, outcomes, filter, started, observer)
    }

    fn select<'a>(&self, resources: &'a [Resource], filter: &ResourceFilter) -> Selection<'a> {
        let mut matched = filter.apply(resources);
        let total_matched = matched.len();
        let cap = self.config.batch.max_resources;
        if total_matched > cap {
            tracing::info!(total_matched, cap, "batch input truncated");
            matched.truncate(cap);
        }
        Selection {
            resources: matched,
            total_matched,
        }
    }

    fn finish(
        &self,
        selection: &Selection<'_>,
        outcomes: Vec<Outcome>,
        filter: &ResourceFilter,
        started: Instant,
        observer: &dyn BatchObserver,
    ) -> Result<BatchAnalysis, AnalysisError> {
        let attempted = outcomes.len();
        let mut analyses = Vec::with_capacity(attempted);
        let mut errors = Vec::new();

        for (resource_id, result) in outcomes {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => errors.push(ResourceError {
                    resource_id,
                    kind: e.kind(),
                    message: e.to_string(),
                }),
            }
        }

        let elapsed = started.elapsed();
        observer.on_batch_complete(analyses.len(), errors.len(), elapsed);

        if attempted > 0 && analyses.is_empty() {
            tracing::error!(failed = attempted, "every resource in the batch failed");
            return Err(AnalysisError::AllResourcesFailed { failed: attempted });
        }

        let budget = self.config.batch.time_budget();
        if elapsed > budget {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "batch analysis exceeded its time budget"
            );
        }

        let mut batch = aggregate(analyses, &self.config);
        batch.total_matched = selection.total_matched;
        batch.truncated = selection.truncated();
        if batch.truncated {
            batch.note = Some(format!(
                "Analysis limited to the first {} of {} matching resources",
                selection.resources.len(),
                selection.total_matched
            ));
        }
        batch.resource_type = filter.resource_type.clone();
        batch.errors = errors;
        batch.duration_ms = elapsed.as_millis() as u64;

        tracing::debug!(
            analyzed = batch.total_resources_analyzed,
            failed = batch.errors.len(),
            duration_ms = batch.duration_ms,
            "batch complete"
        );
        Ok(batch)
    }
}

fn report(
    observer: &dyn BatchObserver,
    resource_id: &str,
    result: &Result<ResourceAnalysis, AnalysisError>,
) {
    match result {
        Ok(analysis) => observer.on_resource_complete(analysis),
        Err(e) => {
            tracing::warn!(resource_id, "skipping resource: {e}");
            observer.on_resource_error(resource_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::QualityLevel;
    use crate::error::ErrorKind;
    use crate::model::ResourceType;
    use serde_json::json;
    use std::sync::Mutex;

    fn reading(id: &str, owner: &str, text: &str) -> Resource {
        Resource {
            id: id.into(),
            resource_type: ResourceType::Comprension,
            owner: Some(owner.into()),
            title: None,
            content: Some(json!({ "texto": text })),
        }
    }

    fn corpus(n: usize) -> Vec<Resource> {
        (0..n)
            .map(|i| {
                reading(
                    &format!("r{i}"),
                    if i % 2 == 0 { "ana" } else { "luis" },
                    "El gato subió al árbol. El perro ladró al gato.",
                )
            })
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl BatchObserver for Recorder {
        fn on_batch_start(&self, selected: usize) {
            self.events.lock().unwrap().push(format!("start:{selected}"));
        }
        fn on_resource_complete(&self, analysis: &ResourceAnalysis) {
            self.events.lock().unwrap().push(format!("ok:{}", analysis.resource_id));
        }
        fn on_resource_error(&self, resource_id: &str, _: &AnalysisError) {
            self.events.lock().unwrap().push(format!("err:{resource_id}"));
        }
        fn on_batch_complete(&self, analyzed: usize, failed: usize, _: Duration) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{analyzed}/{failed}"));
        }
    }

    #[test]
    fn caps_batch_at_fifty_resources() {
        let batch = BatchOrchestrator::default()
            .run(&corpus(60), &ResourceFilter::default())
            .unwrap();
        assert_eq!(batch.total_resources_analyzed, 50);
        assert_eq!(batch.total_matched, 60);
        assert!(batch.truncated);
        assert!(batch.note.as_deref().unwrap().contains("50 of 60"));
        assert_eq!(batch.resources[49].resource_id, "r49");
    }

    #[test]
    fn no_note_under_the_cap() {
        let batch = BatchOrchestrator::default()
            .run(&corpus(10), &ResourceFilter::default())
            .unwrap();
        assert_eq!(batch.total_resources_analyzed, 10);
        assert!(!batch.truncated);
        assert!(batch.note.is_none());
    }

    #[test]
    fn cap_is_configurable() {
        let mut config = MetricsConfig::default();
        config.batch.max_resources = 5;
        let batch = BatchOrchestrator::from_config(config)
            .run(&corpus(8), &ResourceFilter::default())
            .unwrap();
        assert_eq!(batch.total_resources_analyzed, 5);
        assert!(batch.truncated);
    }

    #[test]
    fn empty_match_is_a_successful_empty_batch() {
        let filter = ResourceFilter::by_type(ResourceType::Oral);
        let batch = BatchOrchestrator::default().run(&corpus(3), &filter).unwrap();
        assert_eq!(batch.total_resources_analyzed, 0);
        assert_eq!(batch.summary.overall_quality, QualityLevel::SinDatos);
        assert_eq!(batch.resource_type, Some(ResourceType::Oral));
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn filters_by_owner_before_analysis() {
        let batch = BatchOrchestrator::default()
            .run(&corpus(6), &ResourceFilter::by_owner("luis"))
            .unwrap();
        let ids: Vec<&str> = batch.resources.iter().map(|r| r.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3", "r5"]);
        assert!(batch.resource_type.is_none());
    }

    #[test]
    fn one_broken_resource_does_not_abort_the_batch() {
        let mut resources = corpus(3);
        resources[1].content = None;
        let recorder = Recorder::default();
        let batch = BatchOrchestrator::default()
            .run_with(&resources, &ResourceFilter::default(), &recorder)
            .unwrap();

        assert_eq!(batch.total_resources_analyzed, 2);
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].resource_id, "r1");
        assert_eq!(batch.errors[0].kind, ErrorKind::ContentProcessingError);
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["start:3", "ok:r0", "err:r1", "ok:r2", "done:2/1"]
        );
    }

    #[test]
    fn all_resources_failing_is_an_error() {
        let mut resources = corpus(2);
        for r in &mut resources {
            r.content = Some(json!(null));
        }
        let err = BatchOrchestrator::default()
            .run(&resources, &ResourceFilter::default())
            .unwrap_err();
        assert_eq!(err, AnalysisError::AllResourcesFailed { failed: 2 });
        assert_eq!(err.kind(), ErrorKind::ContentProcessingError);
    }

    #[tokio::test]
    async fn parallel_run_matches_sequential_run() {
        let mut resources = corpus(20);
        resources[7].content = None;
        resources[12] = reading("r12", "ana", "Los perros es grandes. Ellos corren mucho.");

        let orchestrator = BatchOrchestrator::default();
        let filter = ResourceFilter::default();
        let sequential = orchestrator.run(&resources, &filter).unwrap();
        let parallel = orchestrator
            .run_parallel(&resources, &filter, &NoopObserver)
            .await
            .unwrap();

        assert_eq!(parallel.resources, sequential.resources);
        assert_eq!(parallel.summary, sequential.summary);
        assert_eq!(parallel.aggregated_metrics, sequential.aggregated_metrics);
        assert_eq!(parallel.errors, sequential.errors);
        assert_eq!(parallel.quality_distribution, sequential.quality_distribution);
    }

    #[tokio::test]
    async fn parallel_run_applies_cap_and_reports_progress() {
        let recorder = Recorder::default();
        let batch = BatchOrchestrator::default()
            .run_parallel(&corpus(55), &ResourceFilter::default(), &recorder)
            .await
            .unwrap();
        assert_eq!(batch.total_resources_analyzed, 50);
        assert!(batch.note.is_some());

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.first().map(String::as_str), Some("start:50"));
        assert_eq!(events.last().map(String::as_str), Some("done:50/0"));
        assert_eq!(events.iter().filter(|e| e.starts_with("ok:")).count(), 50);
    }
}
