//! Heuristic classification of probe responses.
//!
//! [`Classifier::classify`] turns one probe result into exactly one
//! [`Verdict`] by evaluating a fixed chain of rules and stopping at the first
//! that fires:
//!
//! 1. transport failure → uncertain
//! 2. status 404/403/410/500 → not found
//! 3. any other non-200 status → uncertain
//! 4. a negative indicator in the body → not found
//! 5. the platform's structural check, if one is registered
//! 6. landed on `/` although the profile has a path → not found
//! 7. one or more positive indicators → found
//! 8. body shorter than 500 characters → not found
//! 9. two or more generic not-found phrases → not found
//! 10. otherwise → not found
//!
//! Later rules assume the earlier ones already removed the obvious
//! negatives. `Found` is only ever produced by rule 7.

use crate::probe::{ProbeResponse, ProbeResult};
use handlehunt_platforms::PlatformDefinition;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;
use url::Url;

/// Status codes treated as a definite "no such profile".
pub const NOT_FOUND_STATUSES: [u16; 4] = [404, 403, 410, 500];

/// Bodies shorter than this (in characters) are treated as error pages.
pub const MIN_PROFILE_BODY_CHARS: usize = 500;

/// Minimum number of generic phrases for rule 9 to fire.
pub const GENERIC_NOT_FOUND_THRESHOLD: usize = 2;

/// Platform-independent failure phrases, matched against the lower-cased body.
pub const GENERIC_NOT_FOUND_PATTERNS: [&str; 13] = [
    "not found",
    "404",
    "page not found",
    "user not found",
    "doesn't exist",
    "not available",
    "can't find",
    "no such",
    "sorry",
    "oops",
    "error",
    "bulunamadı",
    "mevcut değil",
];

/// Prompts that together mark a signup wall served instead of a profile.
const SIGNUP_MARKERS: [&str; 3] = ["create account", "sign up", "log in"];

/// Coarse verdict category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Positive evidence the profile exists
    Found,
    /// Evidence the profile does not exist
    NotFound,
    /// The probe could not be judged
    Uncertain,
}

/// Terminal classification of one probe, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The profile very likely exists
    Found {
        /// Why the classifier decided so
        reason: String,
    },
    /// The profile very likely does not exist
    NotFound {
        /// Why the classifier decided so
        reason: String,
    },
    /// No judgement possible (transport failure, unexpected status)
    Uncertain {
        /// Why the classifier decided so
        reason: String,
    },
}

impl Verdict {
    /// Build a `Found` verdict.
    #[must_use]
    pub fn found(reason: impl Into<String>) -> Self {
        Self::Found {
            reason: reason.into(),
        }
    }

    /// Build a `NotFound` verdict.
    #[must_use]
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    /// Build an `Uncertain` verdict.
    #[must_use]
    pub fn uncertain(reason: impl Into<String>) -> Self {
        Self::Uncertain {
            reason: reason.into(),
        }
    }

    /// The verdict category.
    #[must_use]
    pub fn kind(&self) -> VerdictKind {
        match self {
            Self::Found { .. } => VerdictKind::Found,
            Self::NotFound { .. } => VerdictKind::NotFound,
            Self::Uncertain { .. } => VerdictKind::Uncertain,
        }
    }

    /// The human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Found { reason } | Self::NotFound { reason } | Self::Uncertain { reason } => {
                reason
            }
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind() {
            VerdictKind::Found => "found",
            VerdictKind::NotFound => "not found",
            VerdictKind::Uncertain => "uncertain",
        };
        write!(f, "{label} ({})", self.reason())
    }
}

/// Platform-specific check run between the negative and positive indicator rules.
///
/// Returns `Some` to end classification with that verdict, `None` to continue.
pub type StructuralCheck = fn(&PlatformDefinition, &ProbeResponse) -> Option<Verdict>;

/// Structural checks keyed by platform name.
#[derive(Clone)]
pub struct StructuralRules {
    checks: HashMap<String, StructuralCheck>,
}

impl StructuralRules {
    /// A rule set with no platform-specific checks.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Register (or replace) the check for a platform.
    #[must_use]
    pub fn with(mut self, platform: impl Into<String>, check: StructuralCheck) -> Self {
        self.checks.insert(platform.into(), check);
        self
    }

    /// Get the check registered for a platform.
    #[must_use]
    pub fn get(&self, platform: &str) -> Option<StructuralCheck> {
        self.checks.get(platform).copied()
    }

    /// Names of platforms with a registered check, sorted.
    #[must_use]
    pub fn platforms(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for StructuralRules {
    fn default() -> Self {
        Self::empty()
            .with("WeHeartIt", signup_gate)
            .with("Instagram", instagram_profile_data)
            .with("Twitter", twitter_user_data)
            .with("GitHub", github_login_data)
    }
}

impl fmt::Debug for StructuralRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralRules")
            .field("platforms", &self.platforms())
            .finish()
    }
}

/// Signup wall served in place of a profile, or a bounce to the bare homepage.
pub fn signup_gate(platform: &PlatformDefinition, response: &ProbeResponse) -> Option<Verdict> {
    let body = &response.body_lower;

    let shows_prompts = SIGNUP_MARKERS.iter().all(|marker| body.contains(marker));
    if shows_prompts && count_indicators(platform.positive_indicators(), body) == 0 {
        return Some(Verdict::not_found(format!(
            "{}: Shows signup page instead of profile",
            platform.name()
        )));
    }

    let bare_homepage = Url::parse(&response.final_url)
        .map(|url| {
            url.path() == "/" && url.query().is_none() && on_platform_host(platform, &url)
        })
        .unwrap_or(false);
    if bare_homepage {
        return Some(Verdict::not_found(format!(
            "{}: Redirected to main page",
            platform.name()
        )));
    }

    None
}

/// Whether `url` is served from the platform's own host or a subdomain of it.
fn on_platform_host(platform: &PlatformDefinition, url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };

    Url::parse(&platform.platform.url_template)
        .ok()
        .and_then(|template| template.host_str().map(|h| h.trim_start_matches("www.").to_owned()))
        .is_some_and(|home| host == home || host.ends_with(&format!(".{home}")))
}

/// Instagram embeds a `"ProfilePage"` or `"User"` object in real profiles.
pub fn instagram_profile_data(
    platform: &PlatformDefinition,
    response: &ProbeResponse,
) -> Option<Verdict> {
    require_marker(
        platform,
        response,
        &["\"ProfilePage\"", "\"User\""],
        "No profile data found",
    )
}

/// Twitter profiles carry the account's screen name.
pub fn twitter_user_data(
    platform: &PlatformDefinition,
    response: &ProbeResponse,
) -> Option<Verdict> {
    require_marker(
        platform,
        response,
        &["\"screen_name\"", "data-screen-name"],
        "No user data found",
    )
}

/// GitHub profiles carry the account's login.
pub fn github_login_data(
    platform: &PlatformDefinition,
    response: &ProbeResponse,
) -> Option<Verdict> {
    require_marker(
        platform,
        response,
        &["\"login\":", "data-login="],
        "No user login data found",
    )
}

/// Not found unless the raw (case-preserved) body contains one of `markers`.
fn require_marker(
    platform: &PlatformDefinition,
    response: &ProbeResponse,
    markers: &[&str],
    missing: &str,
) -> Option<Verdict> {
    if markers.iter().any(|marker| response.body.contains(marker)) {
        None
    } else {
        Some(Verdict::not_found(format!("{}: {missing}", platform.name())))
    }
}

/// Number of indicator phrases present in an already lower-cased body.
fn count_indicators(indicators: &[String], body_lower: &str) -> usize {
    indicators
        .iter()
        .filter(|indicator| body_lower.contains(&indicator.to_lowercase()))
        .count()
}

/// The request was bounced to the site root although the profile lives on a path.
fn redirected_to_homepage(platform: &PlatformDefinition, response: &ProbeResponse) -> bool {
    if platform.username_in_host() {
        return false;
    }

    Url::parse(&response.final_url)
        .map(|url| url.path() == "/")
        .unwrap_or(false)
}

/// The ordered heuristic chain, parameterized by structural checks.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: StructuralRules,
}

impl Classifier {
    /// Create a classifier with the given structural checks.
    #[must_use]
    pub fn new(rules: StructuralRules) -> Self {
        Self { rules }
    }

    /// The structural checks in use.
    #[must_use]
    pub fn rules(&self) -> &StructuralRules {
        &self.rules
    }

    /// Classify one probe result.
    ///
    /// Pure: the same inputs always produce the same verdict and reason.
    #[must_use]
    pub fn classify(
        &self,
        platform: &PlatformDefinition,
        username: &str,
        result: &ProbeResult,
    ) -> Verdict {
        let verdict = self.evaluate(platform, result);
        trace!(
            platform = %platform.name(),
            username,
            verdict = ?verdict.kind(),
            reason = %verdict.reason(),
            "classified probe"
        );
        verdict
    }

    fn evaluate(&self, platform: &PlatformDefinition, result: &ProbeResult) -> Verdict {
        let response = match result {
            Ok(response) => response,
            Err(failure) => return Verdict::uncertain(failure.to_string()),
        };

        if NOT_FOUND_STATUSES.contains(&response.status) {
            return Verdict::not_found(format!("HTTP {}", response.status));
        }

        if response.status != 200 {
            return Verdict::uncertain(format!("HTTP {} - Uncertain", response.status));
        }

        let body = response.body_lower.as_str();

        if let Some(indicator) = platform
            .negative_indicators()
            .iter()
            .find(|indicator| body.contains(&indicator.to_lowercase()))
        {
            return Verdict::not_found(format!("Error indicator found: {indicator}"));
        }

        if let Some(check) = self.rules.get(platform.name()) {
            if let Some(verdict) = check(platform, response) {
                return verdict;
            }
        }

        if redirected_to_homepage(platform, response) {
            return Verdict::not_found("Redirected to homepage - user likely not found");
        }

        let success_count = count_indicators(platform.positive_indicators(), body);
        if success_count >= 1 {
            return Verdict::found(format!("Found {success_count} success indicators"));
        }

        if body.chars().count() < MIN_PROFILE_BODY_CHARS {
            return Verdict::not_found("Content too short - likely error/redirect page");
        }

        let not_found_count = GENERIC_NOT_FOUND_PATTERNS
            .iter()
            .filter(|pattern| body.contains(*pattern))
            .count();
        if not_found_count >= GENERIC_NOT_FOUND_THRESHOLD {
            return Verdict::not_found(format!(
                "Multiple not-found patterns detected ({not_found_count})"
            ));
        }

        Verdict::not_found("No success indicators found - likely not found")
    }
}

static DEFAULT_CLASSIFIER: Lazy<Classifier> = Lazy::new(Classifier::default);

/// Classify with the default structural checks.
#[must_use]
pub fn classify(platform: &PlatformDefinition, username: &str, result: &ProbeResult) -> Verdict {
    DEFAULT_CLASSIFIER.classify(platform, username, result)
}
