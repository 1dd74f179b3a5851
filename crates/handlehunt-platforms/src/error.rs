//! Error types for the platform catalog.

use thiserror::Error;

/// Errors that can occur while loading or querying platform definitions.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Platform definition not found
    #[error("platform definition not found: {name}")]
    NotFound {
        /// The platform name that was not found
        name: String,
    },

    /// Failed to load platform definition from file
    #[error("failed to load platform definition from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse platform definition TOML
    #[error("failed to parse platform definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid platform definition (validation failed)
    #[error("invalid platform definition for {name}: {reason}")]
    ValidationError {
        /// Platform being validated
        name: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Two definitions share the same platform name
    #[error("duplicate platform definition: {name}")]
    Duplicate {
        /// The repeated platform name
        name: String,
    },

    /// Platform definitions directory not found
    #[error("platform definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing platform definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for platform catalog operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
