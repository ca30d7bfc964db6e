//! Typed settings

use crate::builder::SettingsBuilder;
use crate::error::SettingsError;
use crate::sources::{DefaultSource, ENV_PREFIX, EnvSource, TomlFileSource};
use rivet_actions::ListenerPriority;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing_subscriber::filter::Directive;

/// Highest priority a listener may be given by default.
pub const MAX_PRIORITY: i32 = ListenerPriority::HIGHEST;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub container: ContainerSettings,
	pub actions: ActionSettings,
	pub logging: LoggingSettings,
}

/// Registration policy of the binding container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
	/// Reject a second singleton of the same contract instead of replacing the
	/// first.
	pub strict_singletons: bool,
	pub max_resolution_depth: usize,
}

impl Default for ContainerSettings {
	fn default() -> Self {
		Self {
			strict_singletons: false,
			max_resolution_depth: rivet_di::MAX_RESOLUTION_DEPTH,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSettings {
	/// Priority used when a listener subscribes without one.
	pub default_priority: i32,
}

impl Default for ActionSettings {
	fn default() -> Self {
		Self {
			default_priority: ListenerPriority::MEDIUM,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Default filter directive, e.g. `info` or `rivet_di=debug,info`.
	pub level: String,
	pub format: LogFormat,
	pub ansi: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
			ansi: true,
		}
	}
}

/// Output layout of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Compact,
	Pretty,
	Full,
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LogFormat::Compact => write!(f, "compact"),
			LogFormat::Pretty => write!(f, "pretty"),
			LogFormat::Full => write!(f, "full"),
		}
	}
}

impl Settings {
	/// Loads defaults, then `path` (if it exists), then `RIVET_*` variables.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let settings: Settings = SettingsBuilder::new()
			.add_source(Self::defaults_source()?)
			.add_source(TomlFileSource::new(path.as_ref()))
			.add_source(EnvSource::new().with_prefix(ENV_PREFIX))
			.build()?
			.into_typed()?;
		settings.validate()?;
		tracing::debug!(?settings, "settings loaded");
		Ok(settings)
	}

	/// The built-in defaults as a configuration source.
	pub fn defaults_source() -> Result<DefaultSource, SettingsError> {
		match serde_json::to_value(Settings::default())? {
			Value::Object(object) => Ok(DefaultSource::from_object(object)),
			_ => Err(SettingsError::Invalid {
				field: "settings",
				message: "defaults did not serialize to a table".to_string(),
			}),
		}
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.container.max_resolution_depth == 0 {
			return Err(SettingsError::Invalid {
				field: "container.max_resolution_depth",
				message: "must be greater than zero".to_string(),
			});
		}

		if !(0..=MAX_PRIORITY).contains(&self.actions.default_priority) {
			return Err(SettingsError::Invalid {
				field: "actions.default_priority",
				message: format!(
					"{} is outside 0..={}",
					self.actions.default_priority, MAX_PRIORITY
				),
			});
		}

		let level = self.logging.level.trim();
		if level.is_empty() {
			return Err(SettingsError::Invalid {
				field: "logging.level",
				message: "must not be empty".to_string(),
			});
		}
		for directive in level.split(',').map(str::trim).filter(|d| !d.is_empty()) {
			if let Err(error) = directive.parse::<Directive>() {
				return Err(SettingsError::Invalid {
					field: "logging.level",
					message: format!("`{}` is not a valid filter directive: {}", directive, error),
				});
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn defaults_are_valid() {
		let settings = Settings::default();

		assert!(settings.validate().is_ok());
		assert_eq!(settings.logging.format, LogFormat::Compact);
		assert_eq!(
			settings.container.max_resolution_depth,
			rivet_di::MAX_RESOLUTION_DEPTH
		);
		assert_eq!(settings.actions.default_priority, ListenerPriority::MEDIUM);
	}

	#[rstest]
	#[case("debug")]
	#[case("WARN")]
	#[case("rivet_di=trace,info")]
	#[case("rivet_di")]
	#[case("info,rivet_actions::service=debug")]
	fn accepted_levels(#[case] level: &str) {
		let mut settings = Settings::default();
		settings.logging.level = level.to_string();

		assert!(settings.validate().is_ok());
	}

	#[rstest]
	#[case("")]
	#[case("rivet_di=loud")]
	#[case("info,rivet_actions=verbose")]
	fn rejected_levels(#[case] level: &str) {
		let mut settings = Settings::default();
		settings.logging.level = level.to_string();

		let result = settings.validate();

		assert!(matches!(
			result,
			Err(SettingsError::Invalid { field: "logging.level", .. })
		));
	}

	#[rstest]
	#[case(-1)]
	#[case(1001)]
	fn priority_out_of_range_is_rejected(#[case] priority: i32) {
		let mut settings = Settings::default();
		settings.actions.default_priority = priority;

		assert!(settings.validate().is_err());
	}

	#[rstest]
	fn zero_depth_is_rejected() {
		let mut settings = Settings::default();
		settings.container.max_resolution_depth = 0;

		assert!(settings.validate().is_err());
	}

	#[rstest]
	fn partial_tables_fall_back_to_defaults() {
		// Arrange
		let raw = r#"
[logging]
format = "pretty"
"#;

		// Act
		let settings: Settings = toml::from_str(raw).unwrap();

		// Assert
		assert_eq!(settings.logging.format, LogFormat::Pretty);
		assert_eq!(settings.logging.level, "info");
		assert_eq!(settings.actions, ActionSettings::default());
	}
}
