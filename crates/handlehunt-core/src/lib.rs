//! Handlehunt Core - Foundation crate for the handlehunt username prober.
//!
//! This crate provides the shared error types, configuration management,
//! and validated newtypes that the other handlehunt crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`Username`)
//!
//! # Example
//!
//! ```rust
//! use handlehunt_core::{AppConfig, Username};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.concurrency, 8);
//!
//! let username = Username::new("eren")?;
//! assert_eq!(username.as_str(), "eren");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CatalogConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, HandleError, Result};
pub use types::Username;
