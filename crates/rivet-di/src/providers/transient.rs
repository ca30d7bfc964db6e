use super::Provider;
use crate::container::Container;
use crate::injectable::{Concrete, Injectable};
use crate::DiResult;
use std::marker::PhantomData;
use std::sync::Arc;

/// Builds a new `T` on every call and hands it out as `C`.
pub struct TransientProvider<C: ?Sized, T> {
	construct: fn(&Container) -> DiResult<T>,
	_contract: PhantomData<fn() -> Arc<C>>,
}

impl<C, T> TransientProvider<C, T>
where
	C: ?Sized + 'static,
	T: Concrete<C>,
{
	/// Constructs `T` through `Default`.
	pub fn new() -> Self
	where
		T: Default,
	{
		Self {
			construct: |_: &Container| Ok(T::default()),
			_contract: PhantomData,
		}
	}

	/// Constructs `T` through its [`Injectable`] constructor.
	pub fn injectable() -> Self
	where
		T: Injectable,
	{
		Self {
			construct: T::inject,
			_contract: PhantomData,
		}
	}
}

impl<C, T> Default for TransientProvider<C, T>
where
	C: ?Sized + 'static,
	T: Concrete<C> + Default,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<C, T> Provider<C> for TransientProvider<C, T>
where
	C: ?Sized + 'static,
	T: Concrete<C>,
{
	fn get_instance(&self, container: &Container) -> DiResult<Arc<C>> {
		let value = (self.construct)(container)?;
		Ok(<T as Concrete<C>>::into_contract(Arc::new(value)))
	}

	fn describe(&self) -> String {
		format!(
			"TransientProvider<{} as {}>",
			std::any::type_name::<T>(),
			std::any::type_name::<C>()
		)
	}
}
