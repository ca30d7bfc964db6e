//! Instance providers
//!
//! A provider is the strategy a binding uses to produce its instance:
//!
//! - [`TransientProvider`] builds a fresh concrete value on every call
//! - [`InstanceProvider`] always returns the same shared instance
//! - [`MethodProvider`] delegates to a user factory
//! - [`CachedProvider`] wraps another provider and memoizes its first result

mod cached;
mod instance;
mod method;
mod transient;

pub use cached::CachedProvider;
pub use instance::InstanceProvider;
pub use method::MethodProvider;
pub use transient::TransientProvider;

use crate::DiResult;
use crate::container::Container;
use std::sync::Arc;

/// Produces instances of contract `C` on demand.
pub trait Provider<C: ?Sized>: Send + Sync {
	/// Returns an instance, building it if necessary.
	fn get_instance(&self, container: &Container) -> DiResult<Arc<C>>;

	/// Whether the most recent `get_instance` call was served from a cache.
	fn was_cached(&self) -> bool {
		false
	}

	/// Short human-readable description used in diagnostics.
	fn describe(&self) -> String;
}
