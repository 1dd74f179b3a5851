//! Handlehunt Platforms - the catalog of probed platforms.
//!
//! This crate provides the types and loading logic for platform definitions:
//! the profile URL template plus the negative and positive indicator phrases
//! the classifier looks for. Definitions live in TOML files and are treated
//! as static configuration for the lifetime of a scan.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed platform metadata and indicators
//! - **Loader** ([`loader`]): TOML file loading from `platform-definitions/` directory
//! - **Registry** ([`registry`]): Read-only lookup table with query support
//! - **Filter** ([`filter`]): Selection of a subset of the catalog
//! - **Errors** ([`error`]): Platform-specific error types
//!
//! # Example
//!
//! ```rust,no_run
//! use handlehunt_platforms::{PlatformLoader, PlatformRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = PlatformLoader::with_default_dir()?;
//! let registry = PlatformRegistry::load_from(&loader)?;
//!
//! let github = registry.get("GitHub")?;
//! println!("Profile URL: {}", github.profile_url("eren"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod filter;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{Indicators, PlatformCategory, PlatformDefinition, PlatformMetadata};
pub use error::{PlatformError, Result};
pub use filter::PlatformFilter;
pub use loader::PlatformLoader;
pub use registry::PlatformRegistry;
