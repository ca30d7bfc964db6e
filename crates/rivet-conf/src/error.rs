use thiserror::Error;

/// Errors raised while reading a configuration source.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Parse error: {0}")]
	Parse(String),
}

/// Errors raised while building or validating settings.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("failed to load {source_description}: {error}")]
	Source {
		source_description: String,
		#[source]
		error: SourceError,
	},

	#[error("settings do not match the expected shape: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("invalid value for `{field}`: {message}")]
	Invalid { field: &'static str, message: String },
}
