//! Handlehunt Scanner - Username existence probing.
//!
//! This crate expands a username into case variants, probes every selected
//! platform's profile URL for every variant, and classifies each response as
//! found, not found, or uncertain using a fixed heuristic chain.
//!
//! # Features
//!
//! - Bounded fan-out (8 probes in flight by default) with per-completion pacing
//! - One request per task: probes are never retried
//! - Ordered heuristic classification with platform-specific structural checks
//! - Per-task failure isolation: a failing probe never aborts the scan
//! - Cooperative cancellation that keeps partial results
//!
//! # Example
//!
//! ```rust,ignore
//! use handlehunt_core::ScanningConfig;
//! use handlehunt_platforms::{PlatformLoader, PlatformRegistry};
//! use handlehunt_scanner::ScanOrchestrator;
//! use std::sync::Arc;
//!
//! let registry = PlatformRegistry::load_from(&PlatformLoader::with_default_dir()?)?;
//! let config = ScanningConfig::default();
//! let orchestrator = ScanOrchestrator::from_config(Arc::new(registry), &config)?;
//!
//! let report = orchestrator.run("eren", true).await?;
//! for outcome in &report.results.found {
//!     println!("{}: {}", outcome.platform, outcome.url);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod classifier;
#[allow(missing_docs)]
pub mod error;
pub mod orchestrator;
pub mod probe;
pub mod results;
pub mod variants;

// Re-export commonly used types
pub use classifier::{classify, Classifier, StructuralCheck, StructuralRules, Verdict, VerdictKind};
pub use error::{Result, ScanError};
pub use orchestrator::{
    ScanOrchestrator, ScanReport, DEFAULT_MAX_CONCURRENT_PROBES, DEFAULT_PACING,
    PROGRESS_LOG_INTERVAL,
};
pub use probe::{HttpProber, ProbeFailure, ProbeResponse, ProbeResult, Prober};
pub use results::{
    ConfidenceLevel, ExportScope, FoundEntry, NotFoundEntry, ProbeOutcome, ProbeTask,
    ResultExport, ResultSet, Summary,
};
pub use variants::username_variants;
