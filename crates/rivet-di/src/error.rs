//! Error types for binding and resolution

use crate::bind_index::{BindId, BindIndex};
use thiserror::Error;

/// Errors raised while configuring bindings or resolving instances.
///
/// Configuration errors (`MissingProvider`, `SingletonConflict`,
/// `DuplicateBinding`, `IdOverride`) are programmer errors: the container logs
/// them and hands them back to the caller instead of retrying.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DiError {
	/// `conclude` was called on a binding that never received a provider.
	#[error("binding for {index} has no provider; call `to`, `from_method`, `to_instance` or `from_provider` first")]
	MissingProvider { index: BindIndex },

	/// A singleton already owns this contract type.
	#[error("{index} is already registered as a singleton")]
	SingletonConflict { index: BindIndex },

	/// A non-singleton binding with the same type and id already exists.
	#[error("{index} is already registered; unbind it first to replace the binding")]
	DuplicateBinding { index: BindIndex },

	/// `with_id` was called on a binding that already had an id.
	#[error("binding for {contract} already has id `{current}`; refusing to override it with `{requested}`")]
	IdOverride {
		contract: &'static str,
		current: BindId,
		requested: BindId,
	},

	/// Nothing is registered under the requested index.
	#[error("{index} was not found in the container")]
	NotBound { index: BindIndex },

	/// The registered provider does not produce the requested contract.
	#[error("provider registered for {index} does not produce the requested contract")]
	ProviderMismatch { index: BindIndex },

	/// A binding (transitively) resolves itself.
	#[error("circular dependency detected while resolving {type_name}: {path}")]
	CircularDependency { type_name: String, path: String },

	/// Nested resolution went deeper than the configured limit.
	#[error("maximum resolution depth of {0} exceeded")]
	MaxDepthExceeded(usize),

	/// A weak container handle outlived its container.
	#[error("the container backing this resolver has been dropped")]
	ContainerDropped,

	/// A factory or injectable constructor failed.
	#[error("failed to construct {type_name}: {message}")]
	Construction {
		type_name: &'static str,
		message: String,
	},
}

impl DiError {
	/// Shorthand for factories that need to report a construction failure.
	pub fn construction<T: ?Sized>(message: impl Into<String>) -> Self {
		DiError::Construction {
			type_name: std::any::type_name::<T>(),
			message: message.into(),
		}
	}

	/// Whether this error reports a missing binding.
	pub fn is_not_bound(&self) -> bool {
		matches!(self, DiError::NotBound { .. })
	}
}

/// Result type used throughout the container.
pub type DiResult<T> = Result<T, DiError>;
