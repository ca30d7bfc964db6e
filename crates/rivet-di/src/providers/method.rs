use super::Provider;
use crate::container::Container;
use crate::injectable::Concrete;
use crate::DiResult;
use std::sync::Arc;

type Factory<C> = Box<dyn Fn(&Container) -> DiResult<Arc<C>> + Send + Sync>;

/// Delegates instance creation to a factory closure.
pub struct MethodProvider<C: ?Sized> {
	factory: Factory<C>,
	produces: &'static str,
}

impl<C: ?Sized + 'static> MethodProvider<C> {
	/// Wraps a factory returning a concrete type bound under `C`.
	pub fn new<T, F>(factory: F) -> Self
	where
		T: Concrete<C>,
		F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
	{
		Self {
			factory: Box::new(move |container: &Container| {
				factory(container)
					.map(|value| <T as Concrete<C>>::into_contract(Arc::new(value)))
			}),
			produces: std::any::type_name::<T>(),
		}
	}

	/// Wraps a factory that already returns the shared contract.
	pub fn shared<F>(factory: F) -> Self
	where
		F: Fn(&Container) -> DiResult<Arc<C>> + Send + Sync + 'static,
	{
		Self {
			factory: Box::new(factory),
			produces: std::any::type_name::<C>(),
		}
	}
}

impl<C: ?Sized + 'static> Provider<C> for MethodProvider<C> {
	fn get_instance(&self, container: &Container) -> DiResult<Arc<C>> {
		(self.factory)(container)
	}

	fn describe(&self) -> String {
		format!(
			"MethodProvider<{} as {}>",
			self.produces,
			std::any::type_name::<C>()
		)
	}
}
