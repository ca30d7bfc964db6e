use crate::error::SettingsError;
use crate::sources::ConfigSource;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Merges configuration sources by priority.
///
/// # Examples
///
/// ```
/// use rivet_conf::{Settings, SettingsBuilder};
/// use rivet_conf::sources::DefaultSource;
/// use serde_json::json;
///
/// let merged = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("logging", json!({ "level": "warn" })))
///     .build()
///     .unwrap();
///
/// let settings: Settings = merged.into_typed().unwrap();
/// assert_eq!(settings.logging.level, "warn");
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Loads every source and deep-merges them, lowest priority first.
	///
	/// Sources with equal priority are applied in the order they were added.
	pub fn build(mut self) -> Result<MergedSettings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut values = Map::new();
		for source in &self.sources {
			let loaded = source.load().map_err(|error| SettingsError::Source {
				source_description: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = loaded.len(),
				"configuration source loaded"
			);
			for (key, value) in loaded {
				merge_into(&mut values, key, value);
			}
		}

		Ok(MergedSettings { values })
	}
}

fn merge_into(target: &mut Map<String, Value>, key: String, value: Value) {
	match (target.get_mut(&key), value) {
		(Some(Value::Object(existing)), Value::Object(incoming)) => {
			for (key, value) in incoming {
				merge_into(existing, key, value);
			}
		}
		(_, value) => {
			target.insert(key, value);
		}
	}
}

/// The merged key/value view produced by [`SettingsBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSettings {
	values: Map<String, Value>,
}

impl MergedSettings {
	/// Looks up a dotted path such as `logging.level`.
	pub fn get(&self, path: &str) -> Option<&Value> {
		let mut segments = path.split('.');
		let first = segments.next()?;
		segments.try_fold(self.values.get(first)?, |value, segment| value.get(segment))
	}

	pub fn as_map(&self) -> IndexMap<&str, &Value> {
		self.values.iter().map(|(k, v)| (k.as_str(), v)).collect()
	}

	/// Deserializes the merged values.
	pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, SettingsError> {
		Ok(serde_json::from_value(Value::Object(self.values))?)
	}
}
