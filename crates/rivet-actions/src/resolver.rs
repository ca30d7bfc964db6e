use crate::action::{Action, Pooled};
use crate::error::ActionResult;
use parking_lot::Mutex;
use rivet_di::{BindId, Container, WeakContainer};
use std::sync::Arc;

/// Container view restricted to pooled actions.
///
/// Holds a weak handle, so a resolver bound inside its own container does not
/// keep that container alive.
#[derive(Clone, Debug)]
pub struct ActionResolver {
	container: WeakContainer,
}

impl ActionResolver {
	pub fn new(container: &Container) -> Self {
		Self {
			container: container.downgrade(),
		}
	}

	pub fn container(&self) -> ActionResult<Container> {
		Ok(self.container.upgrade()?)
	}

	pub fn resolve<A: Action>(&self) -> ActionResult<Pooled<A>> {
		Ok(self.container()?.resolve::<Mutex<A>>()?)
	}

	pub fn resolve_id<A: Action>(&self, id: impl Into<BindId>) -> ActionResult<Pooled<A>> {
		Ok(self.container()?.resolve_id::<Mutex<A>>(id)?)
	}

	pub fn can_resolve<A: Action>(&self) -> bool {
		self.container
			.upgrade()
			.is_ok_and(|container| container.can_resolve::<Mutex<A>>())
	}

	pub fn resolve_all<A: Action>(&self) -> ActionResult<Vec<Pooled<A>>> {
		Ok(self.container()?.resolve_all::<Mutex<A>>())
	}

	/// Binds `action` as the pooled instance of its type.
	pub fn register<A: Action>(&self, action: A) -> ActionResult<()> {
		self.container()?
			.bind::<Mutex<A>>()
			.to_instance(Arc::new(Mutex::new(action)))
			.as_singleton()
			.conclude()?;
		Ok(())
	}

	pub fn unregister<A: Action>(&self) -> ActionResult<bool> {
		Ok(self.container()?.unbind::<Mutex<A>>())
	}
}
