//! Initialize/cleanup lifecycle for long-lived services

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A service with an explicit lifecycle.
pub trait Service: Send + Sync {
	fn initialize(&self);

	fn cleanup(&self);

	fn is_initialized(&self) -> bool;
}

type InitializedCallback = Arc<dyn Fn(&dyn Service) + Send + Sync>;

/// Bookkeeping shared by [`Service`] implementations.
#[derive(Default)]
pub struct ServiceState {
	initialized: AtomicBool,
	callbacks: Mutex<Vec<InitializedCallback>>,
}

impl ServiceState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::Acquire)
	}

	/// Registers a callback run each time the service finishes initializing.
	pub fn on_initialized<F>(&self, callback: F)
	where
		F: Fn(&dyn Service) + Send + Sync + 'static,
	{
		self.callbacks.lock().push(Arc::new(callback));
	}

	/// Flags the service as initialized and notifies the callbacks.
	pub fn mark_initialized(&self, service: &dyn Service) {
		self.initialized.store(true, Ordering::Release);
		let callbacks = self.callbacks.lock().clone();
		for callback in callbacks {
			callback(service);
		}
	}

	pub fn reset(&self) {
		self.initialized.store(false, Ordering::Release);
	}
}

impl std::fmt::Debug for ServiceState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ServiceState")
			.field("initialized", &self.is_initialized())
			.field("callbacks", &self.callbacks.lock().len())
			.finish()
	}
}
