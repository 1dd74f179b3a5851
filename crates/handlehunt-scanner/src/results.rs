//! Probe tasks, outcomes, and their aggregation.

use crate::classifier::{Verdict, VerdictKind};
use chrono::{DateTime, Utc};
use handlehunt_platforms::PlatformDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One (platform, username) pair to probe.
#[derive(Debug, Clone)]
pub struct ProbeTask {
    /// Platform to probe
    pub platform: Arc<PlatformDefinition>,
    /// Username variant substituted into the profile URL
    pub username: String,
}

impl ProbeTask {
    /// Create a task.
    #[must_use]
    pub fn new(platform: Arc<PlatformDefinition>, username: impl Into<String>) -> Self {
        Self {
            platform,
            username: username.into(),
        }
    }

    /// Profile URL probed for this task.
    #[must_use]
    pub fn url(&self) -> String {
        self.platform.profile_url(&self.username)
    }
}

/// Verdict for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    /// Platform name
    pub platform: String,
    /// Username variant that was probed
    pub username: String,
    /// Profile URL that was requested
    pub url: String,
    /// Classification
    pub verdict: Verdict,
    /// Final URL after redirects, kept for found profiles
    pub resolved_url: Option<String>,
}

impl ProbeOutcome {
    /// Build the outcome of a task.
    #[must_use]
    pub fn new(task: &ProbeTask, verdict: Verdict, resolved_url: Option<String>) -> Self {
        Self {
            platform: task.platform.name().to_string(),
            username: task.username.clone(),
            url: task.url(),
            verdict,
            resolved_url,
        }
    }

    /// The verdict category.
    #[must_use]
    pub fn kind(&self) -> VerdictKind {
        self.verdict.kind()
    }

    /// The verdict reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        self.verdict.reason()
    }
}

/// Outcomes partitioned by verdict, in completion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    /// Profiles that very likely exist
    pub found: Vec<ProbeOutcome>,
    /// Profiles that very likely do not exist
    pub not_found: Vec<ProbeOutcome>,
    /// Probes that could not be judged
    pub uncertain: Vec<ProbeOutcome>,
}

impl ResultSet {
    /// Add an outcome to the bucket matching its verdict.
    pub fn record(&mut self, outcome: ProbeOutcome) {
        match outcome.kind() {
            VerdictKind::Found => self.found.push(outcome),
            VerdictKind::NotFound => self.not_found.push(outcome),
            VerdictKind::Uncertain => self.uncertain.push(outcome),
        }
    }

    /// Number of recorded outcomes across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.found.len() + self.not_found.len() + self.uncertain.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Distinct platform names with a not-found outcome, sorted.
    #[must_use]
    pub fn not_found_platforms(&self) -> Vec<&str> {
        self.not_found
            .iter()
            .map(|outcome| outcome.platform.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Convert into the export shape.
    #[must_use]
    pub fn export(&self, scope: ExportScope) -> ResultExport {
        let found = self
            .found
            .iter()
            .map(|outcome| FoundEntry {
                platform: outcome.platform.clone(),
                username: outcome.username.clone(),
                url: outcome.url.clone(),
                reason: outcome.reason().to_string(),
            })
            .collect();

        let not_found = self
            .not_found
            .iter()
            .map(|outcome| NotFoundEntry {
                platform: outcome.platform.clone(),
                username: outcome.username.clone(),
                reason: outcome.reason().to_string(),
            })
            .collect();

        let errors = self
            .uncertain
            .iter()
            .map(|outcome| {
                format!(
                    "{} ({}): {}",
                    outcome.platform,
                    outcome.username,
                    outcome.reason()
                )
            })
            .collect();

        ResultExport {
            found,
            not_found,
            errors,
            summary: Summary {
                total_found: self.found.len(),
                total_not_found: self.not_found.len(),
                total_errors: self.uncertain.len(),
                total_platforms_checked: scope.platforms_checked,
                total_checks: scope.total_checks,
                interrupted: scope.interrupted,
                confidence_level: ConfidenceLevel::from_counts(
                    self.found.len(),
                    self.uncertain.len(),
                ),
                generated_at: scope.generated_at,
            },
        }
    }
}

/// Scan-level facts carried into the export summary.
#[derive(Debug, Clone, Copy)]
pub struct ExportScope {
    /// Number of distinct platforms probed
    pub platforms_checked: usize,
    /// Number of tasks scheduled
    pub total_checks: usize,
    /// Whether the scan stopped early
    pub interrupted: bool,
    /// When the export was produced
    pub generated_at: DateTime<Utc>,
}

/// Serializable result document handed to the JSON writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultExport {
    /// Found profiles
    pub found: Vec<FoundEntry>,
    /// Not-found probes
    pub not_found: Vec<NotFoundEntry>,
    /// Uncertain probes as `"<platform> (<username>): <reason>"`
    pub errors: Vec<String>,
    /// Totals
    pub summary: Summary,
}

/// A found profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundEntry {
    /// Platform name
    pub platform: String,
    /// Username variant
    pub username: String,
    /// Profile URL
    pub url: String,
    /// Classifier reason
    pub reason: String,
}

/// A probe classified as not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundEntry {
    /// Platform name
    pub platform: String,
    /// Username variant
    pub username: String,
    /// Classifier reason
    pub reason: String,
}

/// Result totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of found profiles
    pub total_found: usize,
    /// Number of not-found probes
    pub total_not_found: usize,
    /// Number of uncertain probes
    pub total_errors: usize,
    /// Number of distinct platforms probed
    pub total_platforms_checked: usize,
    /// Number of tasks scheduled
    pub total_checks: usize,
    /// Whether the scan stopped early
    pub interrupted: bool,
    /// Coarse trust in the found list
    pub confidence_level: ConfidenceLevel,
    /// When the export was produced
    pub generated_at: DateTime<Utc>,
}

/// Coarse confidence derived from the error-to-found ratio.
///
/// There is deliberately no "certain" level: every found profile needs
/// manual verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Fewer uncertain probes than found profiles
    High,
    /// As many or more uncertain probes than found profiles
    Medium,
}

impl ConfidenceLevel {
    /// Derive the level from found and uncertain counts.
    #[must_use]
    pub fn from_counts(found: usize, errors: usize) -> Self {
        if errors < found {
            Self::High
        } else {
            Self::Medium
        }
    }
}
