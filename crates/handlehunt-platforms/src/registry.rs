//! Read-only platform definition registry with query support.

use crate::{
    definition::{PlatformCategory, PlatformDefinition},
    error::{PlatformError, Result},
    filter::PlatformFilter,
    loader::PlatformLoader,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Lookup table of platform definitions.
///
/// The registry is built once at startup and never mutated during a scan,
/// so it is shared between probe workers behind an `Arc` without locking.
/// Definitions are handed out as `Arc<PlatformDefinition>` so every probe
/// task can hold its platform cheaply.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    /// Definitions indexed by platform name
    definitions: HashMap<String, Arc<PlatformDefinition>>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and load all definitions from the given loader.
    ///
    /// # Errors
    /// Returns error if loading fails or two files define the same platform.
    pub fn load_from(loader: &PlatformLoader) -> Result<Self> {
        let registry = Self::from_definitions(loader.load_all()?)?;
        info!(count = registry.len(), "built platform registry");
        Ok(registry)
    }

    /// Create a registry from already loaded definitions.
    ///
    /// # Errors
    /// Returns error if a definition is invalid or a name appears twice.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = PlatformDefinition>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.insert(definition)?;
        }
        Ok(registry)
    }

    /// Add a platform definition to the registry.
    ///
    /// # Errors
    /// Returns error if the definition is invalid or the name is taken.
    pub fn insert(&mut self, definition: PlatformDefinition) -> Result<()> {
        definition.validate()?;

        let name = definition.name().to_string();
        if self.definitions.contains_key(&name) {
            return Err(PlatformError::Duplicate { name });
        }

        debug!(platform = %name, "inserted platform definition");
        self.definitions.insert(name, Arc::new(definition));

        Ok(())
    }

    /// Get a platform definition by exact name.
    ///
    /// # Errors
    /// Returns error if the platform is not found.
    pub fn get(&self, name: &str) -> Result<Arc<PlatformDefinition>> {
        self.definitions
            .get(name)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound {
                name: name.to_string(),
            })
    }

    /// Get all platform definitions, sorted by name.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<PlatformDefinition>> {
        let mut all: Vec<_> = self.definitions.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Get the definitions selected by a filter, sorted by name.
    #[must_use]
    pub fn filtered(&self, filter: &PlatformFilter) -> Vec<Arc<PlatformDefinition>> {
        self.all()
            .into_iter()
            .filter(|def| filter.matches(def))
            .collect()
    }

    /// Query platforms by category.
    #[must_use]
    pub fn get_by_category(&self, category: PlatformCategory) -> Vec<Arc<PlatformDefinition>> {
        self.filtered(&PlatformFilter::Category(category))
    }

    /// Get the total number of platforms in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry holds no platforms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Check if a platform exists in the registry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Get all platform names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get platform count by category.
    #[must_use]
    pub fn count_by_category(&self) -> HashMap<PlatformCategory, usize> {
        let mut counts: HashMap<PlatformCategory, usize> = HashMap::new();

        for definition in self.definitions.values() {
            *counts.entry(definition.category()).or_insert(0) += 1;
        }

        counts
    }
}
