use super::Provider;
use crate::container::Container;
use crate::DiResult;
use std::sync::Arc;

/// Always returns the instance it was created with.
pub struct InstanceProvider<C: ?Sized> {
	instance: Arc<C>,
}

impl<C: ?Sized> InstanceProvider<C> {
	pub fn new(instance: Arc<C>) -> Self {
		Self { instance }
	}
}

impl<C: ?Sized + Send + Sync> Provider<C> for InstanceProvider<C> {
	fn get_instance(&self, _container: &Container) -> DiResult<Arc<C>> {
		Ok(Arc::clone(&self.instance))
	}

	fn describe(&self) -> String {
		format!("InstanceProvider<{}>", std::any::type_name::<C>())
	}
}
