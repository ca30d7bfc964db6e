//! Configuration sources
//!
//! Each source yields a map of top-level keys to JSON values. Sources are
//! merged by [`SettingsBuilder`](crate::SettingsBuilder) in ascending
//! priority, so a higher priority source overrides a lower one key by key.

use crate::error::SourceError;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Separator between nested section names in environment variable keys.
pub const ENV_SEPARATOR: &str = "__";

/// Prefix used by [`Settings::load`](crate::Settings::load).
pub const ENV_PREFIX: &str = "RIVET_";

/// A source of configuration values.
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Fixed values, usually the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a default value for a configuration key
	///
	/// # Examples
	///
	/// ```
	/// use rivet_conf::sources::DefaultSource;
	/// use serde_json::json;
	///
	/// let source = DefaultSource::new()
	///     .with_value("logging", json!({ "level": "warn" }));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}

	/// Uses every top-level field of `object` as a default.
	pub fn from_object(object: Map<String, Value>) -> Self {
		Self {
			values: object.into_iter().collect(),
		}
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file configuration source
///
/// A missing file yields no values.
#[derive(Debug, Clone)]
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found; skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable configuration source
///
/// With prefix `RIVET_`, `RIVET_LOGGING__LEVEL=debug` becomes
/// `{ "logging": { "level": "debug" } }`. Values that parse as integers or
/// booleans are typed accordingly.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	prefix: Option<String>,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Only load variables starting with `prefix`, with the prefix stripped.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn load_from<I>(&self, vars: I) -> IndexMap<String, Value>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut config = IndexMap::new();

		for (key, value) in vars {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(stripped) => stripped.to_string(),
					None => continue,
				},
				None => key,
			};

			let path: Vec<String> = clean_key
				.to_lowercase()
				.split(ENV_SEPARATOR)
				.map(str::to_string)
				.collect();
			if path.iter().any(String::is_empty) {
				tracing::debug!(key = %clean_key, "ignoring malformed environment key");
				continue;
			}

			insert_path(&mut config, &path, parse_env_value(value));
		}

		config
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.load_from(std::env::vars_os().filter_map(|(key, value)| decode_var(key, value))))
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

/// Converts an environment entry to UTF-8, skipping entries that are not.
fn decode_var(key: OsString, value: OsString) -> Option<(String, String)> {
	let key = match key.into_string() {
		Ok(key) => key,
		Err(key) => {
			tracing::debug!(key = %key.to_string_lossy(), "ignoring non UTF-8 environment key");
			return None;
		}
	};
	match value.into_string() {
		Ok(value) => Some((key, value)),
		Err(_) => {
			tracing::debug!(%key, "ignoring environment variable with a non UTF-8 value");
			None
		}
	}
}

fn parse_env_value(value: String) -> Value {
	if let Ok(num) = value.parse::<i64>() {
		Value::Number(num.into())
	} else if let Ok(b) = value.trim().to_lowercase().parse::<bool>() {
		Value::Bool(b)
	} else {
		Value::String(value)
	}
}

fn insert_path(config: &mut IndexMap<String, Value>, path: &[String], value: Value) {
	let Some((head, rest)) = path.split_first() else {
		return;
	};
	if rest.is_empty() {
		config.insert(head.clone(), value);
		return;
	}

	let entry = config
		.entry(head.clone())
		.or_insert_with(|| Value::Object(Map::new()));
	if !entry.is_object() {
		*entry = Value::Object(Map::new());
	}
	let mut cursor = entry;
	for segment in &rest[..rest.len() - 1] {
		let Value::Object(map) = cursor else {
			return;
		};
		let next = map
			.entry(segment.clone())
			.or_insert_with(|| Value::Object(Map::new()));
		if !next.is_object() {
			*next = Value::Object(Map::new());
		}
		cursor = next;
	}
	if let (Value::Object(map), Some(last)) = (cursor, rest.last()) {
		map.insert(last.clone(), value);
	}
}
