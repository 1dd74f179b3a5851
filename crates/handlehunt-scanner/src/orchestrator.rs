//! Scan orchestrator for fanning probes out across platforms.
//!
//! This module provides the `ScanOrchestrator` which expands a username into
//! probe tasks, runs them with bounded concurrency, classifies every response
//! and aggregates the outcomes into a [`ScanReport`].

use crate::classifier::{Classifier, Verdict, VerdictKind};
use crate::error::{Result, ScanError};
use crate::probe::{HttpProber, Prober};
use crate::results::{ExportScope, ProbeOutcome, ProbeTask, ResultExport, ResultSet};
use crate::variants::username_variants;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use handlehunt_core::{ScanningConfig, Username};
use handlehunt_platforms::{PlatformFilter, PlatformRegistry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{AbortHandle, JoinError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of probes in flight at once.
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 8;

/// Default delay after each processed completion.
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);

/// Number of completions between progress log lines.
pub const PROGRESS_LOG_INTERVAL: usize = 15;

/// Everything a finished (or interrupted) scan produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Validated username the scan was started with
    pub username: Username,
    /// Username variants that were probed
    pub variants: Vec<String>,
    /// Classified outcomes
    pub results: ResultSet,
    /// Number of tasks scheduled
    pub total_tasks: usize,
    /// Number of distinct platforms probed
    pub platforms_checked: usize,
    /// Whether the scan was cancelled before every task completed
    pub interrupted: bool,
    /// Wall-clock start of the scan
    pub started_at: DateTime<Utc>,
    /// Time spent scanning
    pub elapsed: Duration,
}

impl ScanReport {
    /// Build the serializable result document.
    #[must_use]
    pub fn export(&self) -> ResultExport {
        self.results.export(ExportScope {
            platforms_checked: self.platforms_checked,
            total_checks: self.total_tasks,
            interrupted: self.interrupted,
            generated_at: Utc::now(),
        })
    }
}

/// Orchestrates probing a username across the platform catalog.
pub struct ScanOrchestrator {
    /// Platform catalog
    registry: Arc<PlatformRegistry>,
    /// Transport used for every probe
    prober: Arc<dyn Prober>,
    /// Heuristic chain applied to probe results
    classifier: Arc<Classifier>,
    /// Which platforms to probe
    filter: PlatformFilter,
    /// Maximum probes in flight
    max_concurrent_probes: usize,
    /// Delay after each processed completion
    pacing: Duration,
}

impl ScanOrchestrator {
    /// Create a new scan orchestrator with default limits.
    #[must_use]
    pub fn new(registry: Arc<PlatformRegistry>, prober: Arc<dyn Prober>) -> Self {
        Self {
            registry,
            prober,
            classifier: Arc::new(Classifier::default()),
            filter: PlatformFilter::All,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            pacing: DEFAULT_PACING,
        }
    }

    /// Create an orchestrator backed by an [`HttpProber`] built from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(registry: Arc<PlatformRegistry>, config: &ScanningConfig) -> Result<Self> {
        let prober = HttpProber::new(config)?;
        Ok(Self::new(registry, Arc::new(prober))
            .with_max_concurrent_probes(config.concurrency)
            .with_pacing(Duration::from_millis(config.pacing_ms)))
    }

    /// Set the maximum number of concurrent probes.
    ///
    /// Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = max.max(1);
        self
    }

    /// Set the delay applied after each processed completion.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Restrict the scan to a subset of the catalog.
    #[must_use]
    pub fn with_filter(mut self, filter: PlatformFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Build one task per (selected platform, variant) pair.
    ///
    /// Tasks are ordered by platform name, then by variant order.
    #[must_use]
    pub fn build_tasks(&self, variants: &[String]) -> Vec<ProbeTask> {
        self.registry
            .filtered(&self.filter)
            .into_iter()
            .flat_map(|platform| {
                variants
                    .iter()
                    .map(move |variant| ProbeTask::new(Arc::clone(&platform), variant.clone()))
            })
            .collect()
    }

    /// Scan `username` across the selected platforms.
    ///
    /// With `expand_variants` the username is expanded into its case
    /// variants; otherwise it is probed as given.
    pub async fn run(&self, username: &str, expand_variants: bool) -> Result<ScanReport> {
        self.run_until_cancelled(username, expand_variants, CancellationToken::new(), |_| {})
            .await
    }

    /// Scan `username`, stopping early when `cancel` fires.
    ///
    /// `observer` sees every outcome as it is recorded. On cancellation no
    /// further tasks are dispatched, in-flight probes are aborted, and the
    /// report carries the outcomes collected so far with `interrupted` set.
    ///
    /// # Errors
    /// Returns error if the username is invalid or no platform is selected.
    /// Individual probe failures never fail the scan.
    pub async fn run_until_cancelled<F>(
        &self,
        username: &str,
        expand_variants: bool,
        cancel: CancellationToken,
        mut observer: F,
    ) -> Result<ScanReport>
    where
        F: FnMut(&ProbeOutcome),
    {
        let username = Username::new(username)?;
        let variants = if expand_variants {
            username_variants(username.as_str())
        } else {
            vec![username.to_string()]
        };

        let tasks = self.build_tasks(&variants);
        if tasks.is_empty() {
            return Err(ScanError::NoPlatforms);
        }

        let total_tasks = tasks.len();
        let platforms_checked = total_tasks / variants.len();
        info!(
            username = %username,
            variants = variants.len(),
            platforms = platforms_checked,
            total_tasks,
            max_concurrent = self.max_concurrent_probes,
            "starting scan"
        );

        let started_at = Utc::now();
        let start = Instant::now();
        let mut pending = tasks.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut results = ResultSet::default();

        self.dispatch(&mut pending, &mut in_flight);

        loop {
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                next = in_flight.next() => match next {
                    Some(outcome) => outcome,
                    None => break,
                },
            };

            if outcome.kind() == VerdictKind::Found {
                debug!(
                    platform = %outcome.platform,
                    username = %outcome.username,
                    url = %outcome.url,
                    "profile found"
                );
            }
            observer(&outcome);
            results.record(outcome);

            let completed = results.total();
            if completed % PROGRESS_LOG_INTERVAL == 0 {
                info!(
                    completed,
                    total_tasks,
                    found = results.found.len(),
                    "scan progress"
                );
            }

            self.dispatch(&mut pending, &mut in_flight);

            if completed < total_tasks && !self.pacing.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(self.pacing) => {}
                }
            }
        }

        let aborted = in_flight.len();
        drop(in_flight);

        let interrupted = results.total() < total_tasks;
        let elapsed = start.elapsed();
        if interrupted {
            warn!(
                completed = results.total(),
                total_tasks,
                aborted,
                "scan interrupted"
            );
        }
        info!(
            found = results.found.len(),
            not_found = results.not_found.len(),
            uncertain = results.uncertain.len(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "scan finished"
        );

        Ok(ScanReport {
            username,
            variants,
            results,
            total_tasks,
            platforms_checked,
            interrupted,
            started_at,
            elapsed,
        })
    }

    /// Top the in-flight set back up to the concurrency limit.
    fn dispatch(
        &self,
        pending: &mut impl Iterator<Item = ProbeTask>,
        in_flight: &mut FuturesUnordered<BoxFuture<'static, ProbeOutcome>>,
    ) {
        while in_flight.len() < self.max_concurrent_probes {
            match pending.next() {
                Some(task) => in_flight.push(self.spawn_probe(task)),
                None => break,
            }
        }
    }

    /// Spawn one probe onto the runtime.
    ///
    /// The returned future resolves to the task's outcome; dropping it aborts
    /// the probe.
    fn spawn_probe(&self, task: ProbeTask) -> BoxFuture<'static, ProbeOutcome> {
        let prober = Arc::clone(&self.prober);
        let classifier = Arc::clone(&self.classifier);
        let spawned = task.clone();

        let handle = tokio::spawn(async move {
            let url = spawned.url();
            debug!(platform = %spawned.platform.name(), url = %url, "probing");

            let result = prober.probe(&url).await;
            let verdict = classifier.classify(&spawned.platform, &spawned.username, &result);
            let resolved_url = match (&verdict, &result) {
                (Verdict::Found { .. }, Ok(response)) => Some(response.final_url.clone()),
                _ => None,
            };

            ProbeOutcome::new(&spawned, verdict, resolved_url)
        });

        let guard = AbortOnDrop(handle.abort_handle());

        async move {
            let _guard = guard;
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    let message = join_error_message(err);
                    warn!(
                        platform = %task.platform.name(),
                        username = %task.username,
                        error = %message,
                        "probe task failed"
                    );
                    ProbeOutcome::new(&task, Verdict::uncertain(message), None)
                }
            }
        }
        .boxed()
    }
}

/// Aborts a spawned probe when its outcome future is dropped unfinished.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Text of a task failure, using the panic payload when there is one.
fn join_error_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ProbeResponse, ProbeResult};
    use async_trait::async_trait;
    use handlehunt_platforms::{
        Indicators, PlatformCategory, PlatformDefinition, PlatformMetadata,
    };

    struct StaticProber;

    #[async_trait]
    impl Prober for StaticProber {
        async fn probe(&self, url: &str) -> ProbeResult {
            Ok(ProbeResponse::new(404, url, ""))
        }
    }

    fn definition(name: &str, category: PlatformCategory) -> PlatformDefinition {
        PlatformDefinition {
            platform: PlatformMetadata {
                name: name.to_string(),
                url_template: format!("https://{}.example/{{}}", name.to_lowercase()),
                category,
            },
            indicators: Indicators {
                negative: vec![],
                positive: vec!["followers".to_string()],
            },
        }
    }

    fn orchestrator() -> ScanOrchestrator {
        let registry = PlatformRegistry::from_definitions([
            definition("Reddit", PlatformCategory::Social),
            definition("GitHub", PlatformCategory::Developer),
        ])
        .expect("build registry");
        ScanOrchestrator::new(Arc::new(registry), Arc::new(StaticProber))
    }

    #[test]
    fn test_defaults() {
        const _: () = assert!(DEFAULT_MAX_CONCURRENT_PROBES == 8);
        const _: () = assert!(PROGRESS_LOG_INTERVAL == 15);
        assert_eq!(DEFAULT_PACING, Duration::from_millis(200));

        let orchestrator = orchestrator();
        assert_eq!(orchestrator.max_concurrent_probes, 8);
        assert_eq!(orchestrator.pacing, DEFAULT_PACING);
        assert_eq!(orchestrator.with_max_concurrent_probes(0).max_concurrent_probes, 1);
    }

    #[test]
    fn test_from_config() {
        let config = ScanningConfig {
            concurrency: 3,
            pacing_ms: 50,
            ..ScanningConfig::default()
        };
        let registry = Arc::new(PlatformRegistry::new());
        let orchestrator =
            ScanOrchestrator::from_config(registry, &config).expect("build orchestrator");
        assert_eq!(orchestrator.max_concurrent_probes, 3);
        assert_eq!(orchestrator.pacing, Duration::from_millis(50));
    }

    #[test]
    fn test_build_tasks_cross_product() {
        let variants = vec!["EREN".to_string(), "eren".to_string()];
        let tasks = orchestrator().build_tasks(&variants);

        let pairs: Vec<(String, String)> = tasks
            .iter()
            .map(|task| (task.platform.name().to_string(), task.username.clone()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("GitHub".to_string(), "EREN".to_string()),
                ("GitHub".to_string(), "eren".to_string()),
                ("Reddit".to_string(), "EREN".to_string()),
                ("Reddit".to_string(), "eren".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_tasks_respects_filter() {
        let tasks = orchestrator()
            .with_filter(PlatformFilter::Category(PlatformCategory::Developer))
            .build_tasks(&["eren".to_string()]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].url(), "https://github.example/eren");
    }

    #[tokio::test]
    async fn test_join_error_message_uses_panic_payload() {
        let err = tokio::spawn(async { panic!("probe exploded") })
            .await
            .unwrap_err();
        assert_eq!(join_error_message(err), "probe exploded");

        let err = tokio::spawn(async { panic!("{} exploded", "probe") })
            .await
            .unwrap_err();
        assert_eq!(join_error_message(err), "probe exploded");
    }

    #[tokio::test]
    async fn test_run_rejects_empty_selection() {
        let result = orchestrator()
            .with_filter(PlatformFilter::Named(vec!["MySpace".to_string()]))
            .run("eren", false)
            .await;
        assert!(matches!(result.unwrap_err(), ScanError::NoPlatforms));
    }
}
