//! # Rivet Configuration
//!
//! Layered settings for the container, the action service and logging.
//!
//! Sources are merged in ascending priority:
//!
//! 1. built-in defaults ([`DefaultSource`](sources::DefaultSource), priority 0)
//! 2. a TOML file ([`TomlFileSource`](sources::TomlFileSource), priority 50)
//! 3. environment variables ([`EnvSource`](sources::EnvSource), priority 100)
//!
//! ```toml
//! [container]
//! strict_singletons = true
//!
//! [actions]
//! default_priority = 750
//!
//! [logging]
//! level = "rivet_di=debug,info"
//! format = "pretty"
//! ```
//!
//! Any value can be overridden from the environment, e.g.
//! `RIVET_LOGGING__LEVEL=trace`.

pub mod builder;
pub mod error;
pub mod settings;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder};
pub use error::{SettingsError, SourceError};
pub use settings::{ActionSettings, ContainerSettings, LogFormat, LoggingSettings, Settings};
