//! Selection of a subset of the platform catalog.

use crate::definition::{PlatformCategory, PlatformDefinition};
use serde::{Deserialize, Serialize};

/// Which platforms a scan should probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformFilter {
    /// Every platform in the catalog
    #[default]
    All,
    /// Platforms of a single category
    Category(PlatformCategory),
    /// Platforms named explicitly (case-insensitive)
    Named(Vec<String>),
}

impl PlatformFilter {
    /// Whether a definition is selected by this filter.
    #[must_use]
    pub fn matches(&self, platform: &PlatformDefinition) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => platform.category() == *category,
            Self::Named(names) => names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(platform.name())),
        }
    }
}
