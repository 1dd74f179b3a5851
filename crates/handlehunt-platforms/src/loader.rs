//! Platform definition loading from TOML files.
//!
//! This module handles loading platform definitions from the `platform-definitions/` directory.

use crate::{
    definition::PlatformDefinition,
    error::{PlatformError, Result},
};
use handlehunt_core::CatalogConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the catalog directory at the workspace root.
pub const DEFINITIONS_DIR_NAME: &str = "platform-definitions";

/// Loader for platform definitions from TOML files.
#[derive(Debug)]
pub struct PlatformLoader {
    /// Base directory containing platform definitions
    definitions_dir: PathBuf,
}

impl PlatformLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(PlatformError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Create a loader from configuration, falling back to the default directory.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        match &config.definitions_dir {
            Some(dir) => Self::new(dir),
            None => Self::with_default_dir(),
        }
    }

    /// Create a loader using the default definitions directory.
    ///
    /// Looks for `platform-definitions/` relative to the workspace root.
    ///
    /// # Errors
    /// Returns error if the default directory doesn't exist.
    pub fn with_default_dir() -> Result<Self> {
        // Find workspace root by looking for Cargo.toml with [workspace]
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                    if contents.contains("[workspace]") {
                        return Self::new(current_dir.join(DEFINITIONS_DIR_NAME));
                    }
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        // Fall back to the catalog shipped alongside this crate's sources.
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(DEFINITIONS_DIR_NAME);
        if bundled.is_dir() {
            return Self::new(bundled);
        }

        Self::new(PathBuf::from(DEFINITIONS_DIR_NAME))
    }

    /// Directory this loader reads from.
    #[must_use]
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Load a single platform definition by name.
    ///
    /// Names are matched case-insensitively against the `name` field.
    ///
    /// # Errors
    /// Returns error if no valid definition with that name exists.
    pub fn load(&self, name: &str) -> Result<PlatformDefinition> {
        let definition = self
            .load_all()?
            .into_iter()
            .find(|def| def.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PlatformError::NotFound {
                name: name.to_string(),
            })?;

        debug!(
            platform = %definition.name(),
            template = %definition.platform.url_template,
            "loaded platform definition"
        );

        Ok(definition)
    }

    /// Load all platform definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<PlatformDefinition>> {
        let mut definitions = Vec::new();

        Self::walk_and_load_recursive(&self.definitions_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded platform definitions"
        );

        Ok(definitions)
    }

    /// Recursively walk directory and load all TOML files.
    fn walk_and_load_recursive(
        dir: &Path,
        definitions: &mut Vec<PlatformDefinition>,
    ) -> Result<()> {
        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                Self::walk_and_load_recursive(&path, definitions)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                if path.file_name().and_then(|s| s.to_str()) == Some("README.toml") {
                    continue;
                }

                match Self::load_from_path(&path) {
                    Ok(definition) => {
                        if let Err(e) = definition.validate() {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "skipping invalid platform definition"
                            );
                            continue;
                        }
                        definitions.push(definition);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to load platform definition"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Load a platform definition from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<PlatformDefinition> {
        let contents = std::fs::read_to_string(path).map_err(|e| PlatformError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        toml::from_str(&contents).map_err(|e| PlatformError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
