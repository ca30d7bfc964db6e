use super::Provider;
use crate::container::Container;
use crate::DiResult;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Memoizes the first instance produced by the wrapped provider.
///
/// Construction happens under the cache lock, so concurrent first calls still
/// build exactly one instance. This is the only lock held while a provider
/// runs; the wrapped provider must not resolve its own binding, which the
/// container reports as a circular dependency before the lock is taken
/// again. A failed construction is not cached.
pub struct CachedProvider<C: ?Sized> {
	inner: Arc<dyn Provider<C>>,
	instance: Mutex<Option<Arc<C>>>,
	was_cached: AtomicBool,
}

impl<C: ?Sized> CachedProvider<C> {
	pub fn new(inner: Arc<dyn Provider<C>>) -> Self {
		Self {
			inner,
			instance: Mutex::new(None),
			was_cached: AtomicBool::new(false),
		}
	}

	/// Whether an instance has been stored yet.
	pub fn is_populated(&self) -> bool {
		self.instance.lock().is_some()
	}
}

impl<C: ?Sized + Send + Sync> Provider<C> for CachedProvider<C> {
	fn get_instance(&self, container: &Container) -> DiResult<Arc<C>> {
		let mut slot = self.instance.lock();
		if let Some(instance) = slot.as_ref() {
			self.was_cached.store(true, Ordering::Release);
			return Ok(Arc::clone(instance));
		}

		let instance = self.inner.get_instance(container)?;
		*slot = Some(Arc::clone(&instance));
		self.was_cached.store(false, Ordering::Release);
		Ok(instance)
	}

	fn was_cached(&self) -> bool {
		self.was_cached.load(Ordering::Acquire)
	}

	fn describe(&self) -> String {
		format!("CachedProvider({})", self.inner.describe())
	}
}
