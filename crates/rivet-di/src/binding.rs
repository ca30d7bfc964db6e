//! Fluent binding builder

use crate::bind_index::{BindId, BindIndex};
use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::injectable::{Concrete, Injectable};
use crate::providers::{InstanceProvider, MethodProvider, Provider, TransientProvider};
use std::fmt;
use std::sync::Arc;

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
	/// A new instance per resolve.
	#[default]
	Transient,
	/// Memoized after the first resolve.
	Cached,
	/// Memoized, and the only binding of its contract type.
	Singleton,
}

impl Lifecycle {
	/// Whether the provider is wrapped in a cache at registration.
	pub fn is_cached(self) -> bool {
		matches!(self, Lifecycle::Cached | Lifecycle::Singleton)
	}
}

impl fmt::Display for Lifecycle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Lifecycle::Transient => write!(f, "transient"),
			Lifecycle::Cached => write!(f, "cached"),
			Lifecycle::Singleton => write!(f, "singleton"),
		}
	}
}

/// A binding rule under construction.
///
/// Obtained from [`Container::bind`]; nothing is registered until
/// [`conclude`](Binding::conclude) is called. The lifecycle is applied at
/// registration, so `as_cached().to::<T>()` and `to::<T>().as_cached()` are
/// equivalent.
///
/// # Examples
///
/// ```
/// use rivet_di::{Container, Lifecycle};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let container = Container::new();
/// container
///     .bind::<Clock>()
///     .to::<Clock>()
///     .with_id("wall")
///     .as_cached()
///     .conclude()
///     .unwrap();
///
/// let a = container.resolve_id::<Clock>("wall").unwrap();
/// let b = container.resolve_id::<Clock>("wall").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[must_use = "a binding is not registered until `conclude` is called"]
pub struct Binding<'c, C: ?Sized + Send + Sync + 'static> {
	container: &'c Container,
	id: Option<BindId>,
	lifecycle: Lifecycle,
	provider: Option<Arc<dyn Provider<C>>>,
	pending_error: Option<DiError>,
}

impl<'c, C: ?Sized + Send + Sync + 'static> Binding<'c, C> {
	pub(crate) fn new(container: &'c Container) -> Self {
		Self {
			container,
			id: None,
			lifecycle: Lifecycle::Transient,
			provider: None,
			pending_error: None,
		}
	}

	/// Builds a fresh `T` through `Default` on each provision.
	pub fn to<T>(mut self) -> Self
	where
		T: Concrete<C> + Default,
	{
		self.provider = Some(Arc::new(TransientProvider::<C, T>::new()));
		self
	}

	/// Builds a fresh `T` through its [`Injectable`] constructor on each
	/// provision.
	pub fn to_injectable<T>(mut self) -> Self
	where
		T: Concrete<C> + Injectable,
	{
		self.provider = Some(Arc::new(TransientProvider::<C, T>::injectable()));
		self
	}

	/// Delegates construction to `factory`.
	pub fn from_method<T, F>(mut self, factory: F) -> Self
	where
		T: Concrete<C>,
		F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
	{
		self.provider = Some(Arc::new(MethodProvider::new(factory)));
		self
	}

	/// Always hands out `instance`.
	pub fn to_instance<T>(mut self, instance: Arc<T>) -> Self
	where
		T: Concrete<C>,
	{
		let instance = <T as Concrete<C>>::into_contract(instance);
		self.provider = Some(Arc::new(InstanceProvider::new(instance)));
		self
	}

	/// Always hands out an instance that is already shared as the contract.
	pub fn to_contract_instance(mut self, instance: Arc<C>) -> Self {
		self.provider = Some(Arc::new(InstanceProvider::new(instance)));
		self
	}

	/// Installs a custom provider.
	pub fn from_provider<P>(mut self, provider: P) -> Self
	where
		P: Provider<C> + 'static,
	{
		self.provider = Some(Arc::new(provider));
		self
	}

	/// Scopes the binding to `id`.
	///
	/// Overriding an id that was already set is reported by `conclude`.
	pub fn with_id(mut self, id: impl Into<BindId>) -> Self {
		let requested = id.into();
		match &self.id {
			Some(current) if self.pending_error.is_none() => {
				self.pending_error = Some(DiError::IdOverride {
					contract: std::any::type_name::<C>(),
					current: current.clone(),
					requested,
				});
			}
			Some(_) => {}
			None => self.id = Some(requested),
		}
		self
	}

	pub fn as_transient(mut self) -> Self {
		self.lifecycle = Lifecycle::Transient;
		self
	}

	pub fn as_cached(mut self) -> Self {
		self.lifecycle = Lifecycle::Cached;
		self
	}

	/// Marks the binding as the single instance of its contract type.
	///
	/// Singletons are not id-scoped, so any id, set before or after this
	/// call, is dropped with a warning.
	pub fn as_singleton(mut self) -> Self {
		self.lifecycle = Lifecycle::Singleton;
		self.clear_singleton_id();
		self
	}

	fn clear_singleton_id(&mut self) {
		if self.lifecycle != Lifecycle::Singleton {
			return;
		}
		if let Some(id) = self.id.take() {
			tracing::warn!(
				contract = std::any::type_name::<C>(),
				%id,
				"id is not applicable to singleton bindings and has been cleared"
			);
		}
	}

	pub fn id(&self) -> Option<&BindId> {
		self.id.as_ref()
	}

	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle
	}

	pub fn has_provider(&self) -> bool {
		self.provider.is_some()
	}

	/// Index the binding will be registered under.
	pub fn index(&self) -> BindIndex {
		match self.lifecycle {
			Lifecycle::Singleton => BindIndex::of::<C>(None),
			_ => BindIndex::of::<C>(self.id.clone()),
		}
	}

	/// Registers the binding in its container.
	pub fn conclude(mut self) -> DiResult<()> {
		if let Some(error) = self.pending_error.take() {
			tracing::error!(%error, "binding rejected");
			return Err(error);
		}
		self.clear_singleton_id();
		let index = BindIndex::of::<C>(self.id);
		self.container
			.register::<C>(index, self.lifecycle, self.provider)
	}
}

impl<C: ?Sized + Send + Sync + 'static> fmt::Debug for Binding<'_, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("contract", &std::any::type_name::<C>())
			.field("id", &self.id)
			.field("lifecycle", &self.lifecycle)
			.field(
				"provider",
				&self.provider.as_ref().map(|provider| provider.describe()),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Default)]
	struct Widget;

	#[rstest]
	fn as_singleton_clears_the_id() {
		// Arrange
		let container = Container::new();

		// Act
		let binding = container
			.bind::<Widget>()
			.to::<Widget>()
			.with_id("named")
			.as_singleton();

		// Assert
		assert_eq!(binding.lifecycle(), Lifecycle::Singleton);
		assert!(binding.id().is_none());
		assert_eq!(binding.index(), BindIndex::of::<Widget>(None));
	}

	#[rstest]
	fn id_set_after_as_singleton_is_cleared_at_conclude() {
		// Arrange
		let container = Container::new();
		let binding = container
			.bind::<Widget>()
			.to::<Widget>()
			.as_singleton()
			.with_id("late");
		let index = binding.index();

		// Act
		binding.conclude().unwrap();

		// Assert
		assert_eq!(index, BindIndex::of::<Widget>(None));
		assert!(container.resolve::<Widget>().is_ok());
		assert!(!container.can_resolve_id::<Widget>("late"));
	}

	#[rstest]
	fn overriding_an_id_fails_at_conclude() {
		// Arrange
		let container = Container::new();

		// Act
		let result = container
			.bind::<Widget>()
			.to::<Widget>()
			.with_id("first")
			.with_id("second")
			.conclude();

		// Assert
		assert!(matches!(result, Err(DiError::IdOverride { .. })));
		assert!(container.is_empty());
	}

	#[rstest]
	fn debug_describes_the_provider() {
		let container = Container::new();
		let binding = container.bind::<Widget>().to::<Widget>().as_cached();

		let rendered = format!("{:?}", binding);

		assert!(rendered.contains("TransientProvider"));
		assert!(rendered.contains("Cached"));
	}

	#[rstest]
	fn lifecycle_defaults_to_transient() {
		let container = Container::new();
		let binding = container.bind::<Widget>();

		assert_eq!(binding.lifecycle(), Lifecycle::Transient);
		assert!(!binding.has_provider());
	}
}
