//! Platform definition types and structures.
//!
//! This module defines the data structures for platform definitions loaded from TOML files.

use crate::error::{PlatformError, Result};
use serde::{Deserialize, Serialize};

/// Substitution slot for the username in a URL template.
pub const USERNAME_SLOT: &str = "{}";

/// Complete platform definition loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDefinition {
    /// Core platform metadata
    pub platform: PlatformMetadata,

    /// Evidence phrases looked for in the profile page
    pub indicators: Indicators,
}

impl PlatformDefinition {
    /// Get the platform name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.platform.name
    }

    /// Get the platform category.
    #[must_use]
    pub fn category(&self) -> PlatformCategory {
        self.platform.category
    }

    /// Phrases whose presence means the profile does not exist, in catalog order.
    #[must_use]
    pub fn negative_indicators(&self) -> &[String] {
        &self.indicators.negative
    }

    /// Phrases whose presence is evidence the profile exists, in catalog order.
    #[must_use]
    pub fn positive_indicators(&self) -> &[String] {
        &self.indicators.positive
    }

    /// Build the profile URL for a username.
    ///
    /// The username is substituted verbatim; the HTTP layer handles any
    /// escaping it requires.
    #[must_use]
    pub fn profile_url(&self, username: &str) -> String {
        self.platform.url_template.replacen(USERNAME_SLOT, username, 1)
    }

    /// Whether the username is part of the host rather than the path.
    ///
    /// Profiles on such platforms (`https://{}.tumblr.com`) live at the root
    /// path, so landing on `/` is not evidence of a redirect away from them.
    #[must_use]
    pub fn username_in_host(&self) -> bool {
        let template = &self.platform.url_template;
        let rest = template
            .split_once("://")
            .map_or(template.as_str(), |(_, rest)| rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        authority.contains(USERNAME_SLOT)
    }

    /// Validate the platform definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        let name = &self.platform.name;

        if name.trim().is_empty() {
            return Err(PlatformError::ValidationError {
                name: name.clone(),
                reason: "platform name cannot be empty".to_string(),
            });
        }

        let template = &self.platform.url_template;
        if !(template.starts_with("https://") || template.starts_with("http://")) {
            return Err(PlatformError::ValidationError {
                name: name.clone(),
                reason: format!("url_template must be an http(s) URL, got '{template}'"),
            });
        }

        let slots = template.matches(USERNAME_SLOT).count();
        if slots != 1 {
            return Err(PlatformError::ValidationError {
                name: name.clone(),
                reason: format!("url_template must contain exactly one '{{}}' slot, found {slots}"),
            });
        }

        self.indicators.validate(name)
    }
}

/// Core platform metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMetadata {
    /// Unique platform name (e.g., "GitHub", "Last.fm")
    pub name: String,

    /// Profile URL with a single `{}` username slot
    pub url_template: String,

    /// Platform category
    #[serde(default)]
    pub category: PlatformCategory,
}

/// Negative and positive indicator phrases.
///
/// Matching is a case-insensitive substring search over the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicators {
    /// Phrases that mark a missing profile
    #[serde(default)]
    pub negative: Vec<String>,

    /// Phrases that mark an existing profile
    pub positive: Vec<String>,
}

impl Indicators {
    fn validate(&self, name: &str) -> Result<()> {
        if self.positive.is_empty() {
            return Err(PlatformError::ValidationError {
                name: name.to_string(),
                reason: "at least one positive indicator is required".to_string(),
            });
        }

        if self
            .negative
            .iter()
            .chain(&self.positive)
            .any(|phrase| phrase.trim().is_empty())
        {
            return Err(PlatformError::ValidationError {
                name: name.to_string(),
                reason: "indicator phrases cannot be blank".to_string(),
            });
        }

        Ok(())
    }
}

/// Categories of platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformCategory {
    /// General social networks (Instagram, Twitter, Facebook, ...)
    Social,
    /// Code hosting and developer communities
    Developer,
    /// Art, design, and writing portfolios
    Creative,
    /// Music, video, and streaming services
    Media,
    /// Gaming networks
    Gaming,
    /// Professional networking
    Professional,
    /// Shops and payment handles
    Commerce,
    /// Other/uncategorized
    #[default]
    Other,
}

impl PlatformCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Social,
        Self::Developer,
        Self::Creative,
        Self::Media,
        Self::Gaming,
        Self::Professional,
        Self::Commerce,
        Self::Other,
    ];

    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Developer => "Developer",
            Self::Creative => "Creative",
            Self::Media => "Media",
            Self::Gaming => "Gaming",
            Self::Professional => "Professional",
            Self::Commerce => "Commerce",
            Self::Other => "Other",
        }
    }

    /// The kebab-case identifier used in TOML files and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Social => "social",
            Self::Developer => "developer",
            Self::Creative => "creative",
            Self::Media => "media",
            Self::Gaming => "gaming",
            Self::Professional => "professional",
            Self::Commerce => "commerce",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for PlatformCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == needle)
            .ok_or_else(|| format!("unknown platform category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, template: &str) -> PlatformDefinition {
        PlatformDefinition {
            platform: PlatformMetadata {
                name: name.to_string(),
                url_template: template.to_string(),
                category: PlatformCategory::Social,
            },
            indicators: Indicators {
                negative: vec!["User not found".to_string()],
                positive: vec!["followers".to_string()],
            },
        }
    }

    #[test]
    fn test_profile_url_substitution() {
        let def = definition("GitHub", "https://github.com/{}");
        assert_eq!(def.profile_url("eren"), "https://github.com/eren");

        let def = definition("HackerNews", "https://news.ycombinator.com/user?id={}");
        assert_eq!(
            def.profile_url("eren"),
            "https://news.ycombinator.com/user?id=eren"
        );

        let def = definition("CashApp", "https://cash.app/${}");
        assert_eq!(def.profile_url("eren"), "https://cash.app/$eren");
    }

    #[test]
    fn test_username_in_host() {
        assert!(definition("Tumblr", "https://{}.tumblr.com").username_in_host());
        assert!(definition("DeviantArt", "https://{}.deviantart.com/").username_in_host());
        assert!(!definition("GitHub", "https://github.com/{}").username_in_host());
        assert!(
            !definition("HackerNews", "https://news.ycombinator.com/user?id={}")
                .username_in_host()
        );
    }

    #[test]
    fn test_definition_validation() {
        assert!(definition("GitHub", "https://github.com/{}").validate().is_ok());

        // Empty name
        assert!(definition("", "https://github.com/{}").validate().is_err());

        // Not an http(s) URL
        assert!(definition("GitHub", "github.com/{}").validate().is_err());

        // Missing or repeated slot
        assert!(definition("GitHub", "https://github.com/").validate().is_err());
        assert!(definition("GitHub", "https://{}.github.com/{}")
            .validate()
            .is_err());

        // No positive indicators
        let mut def = definition("GitHub", "https://github.com/{}");
        def.indicators.positive.clear();
        assert!(def.validate().is_err());

        // Blank negative indicator
        let mut def = definition("GitHub", "https://github.com/{}");
        def.indicators.negative.push("  ".to_string());
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!(
            "developer".parse::<PlatformCategory>(),
            Ok(PlatformCategory::Developer)
        );
        assert_eq!(
            " Media ".parse::<PlatformCategory>(),
            Ok(PlatformCategory::Media)
        );
        assert!("people-search".parse::<PlatformCategory>().is_err());
        assert_eq!(PlatformCategory::Professional.display_name(), "Professional");
        assert_eq!(PlatformCategory::default(), PlatformCategory::Other);
    }

    #[test]
    fn test_parse_toml_definition() {
        let toml_str = r#"
[platform]
name = "GitHub"
url_template = "https://github.com/{}"
category = "developer"

[indicators]
negative = ["Not Found", "404"]
positive = ["repositories", "contributions", "profile"]
"#;

        let def: PlatformDefinition = toml::from_str(toml_str).expect("parse definition");
        assert_eq!(def.name(), "GitHub");
        assert_eq!(def.category(), PlatformCategory::Developer);
        assert_eq!(def.negative_indicators(), ["Not Found", "404"]);
        assert_eq!(def.positive_indicators().len(), 3);
        assert!(def.validate().is_ok());
    }
}
