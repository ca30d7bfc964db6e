//! # Rivet Logging
//!
//! Installs a `tracing-subscriber` fmt subscriber configured from
//! [`LoggingSettings`]. Library crates only emit events through `tracing`;
//! applications call [`init`] once at startup.
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

use rivet_conf::{LogFormat, LoggingSettings};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("invalid log filter: {0}")]
	InvalidFilter(String),

	#[error("a global tracing subscriber is already installed")]
	AlreadyInitialized,
}

/// Builds the event filter: `RUST_LOG` if set, otherwise `settings.level`.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
	match std::env::var(EnvFilter::DEFAULT_ENV) {
		Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
			.map_err(|error| LoggingError::InvalidFilter(format!("{}: {error}", EnvFilter::DEFAULT_ENV))),
		_ => EnvFilter::try_new(&settings.level)
			.map_err(|error| LoggingError::InvalidFilter(format!("{}: {error}", settings.level))),
	}
}

/// Installs the global subscriber.
///
/// Fails with [`LoggingError::AlreadyInitialized`] if any global subscriber
/// is already set.
pub fn init(settings: &LoggingSettings) -> Result<(), LoggingError> {
	let filter = env_filter(settings)?;
	let registry = tracing_subscriber::registry().with(filter);

	let result = match settings.format {
		LogFormat::Compact => registry
			.with(fmt::layer().compact().with_ansi(settings.ansi))
			.try_init(),
		LogFormat::Pretty => registry
			.with(fmt::layer().pretty().with_ansi(settings.ansi))
			.try_init(),
		LogFormat::Full => registry
			.with(fmt::layer().with_ansi(settings.ansi))
			.try_init(),
	};
	result.map_err(|_| LoggingError::AlreadyInitialized)?;

	tracing::debug!(level = %settings.level, format = %settings.format, "logging initialized");
	Ok(())
}
