//! Binding registry

use crate::bind_index::{BindId, BindIndex};
use crate::binding::{Binding, Lifecycle};
use crate::cycle_detection::{MAX_RESOLUTION_DEPTH, begin_resolution};
use crate::error::{DiError, DiResult};
use crate::providers::{CachedProvider, Provider};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Registration policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
	/// Reject a singleton whose contract already has a singleton instead of
	/// evicting the old one.
	pub strict_singletons: bool,
	/// Maximum nesting of resolutions triggered from providers.
	pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
	fn default() -> Self {
		Self {
			strict_singletons: false,
			max_resolution_depth: MAX_RESOLUTION_DEPTH,
		}
	}
}

struct Registration {
	index: BindIndex,
	lifecycle: Lifecycle,
	/// Holds an `Arc<dyn Provider<C>>` for the contract of `index`.
	provider: Box<dyn Any + Send + Sync>,
	description: String,
}

/// Snapshot of a registered binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
	pub index: BindIndex,
	pub lifecycle: Lifecycle,
	pub provider: String,
}

impl fmt::Display for BindingInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} [{}] via {}", self.index, self.lifecycle, self.provider)
	}
}

struct ContainerInner {
	bindings: RwLock<IndexMap<BindIndex, Arc<Registration>>>,
	config: ContainerConfig,
}

/// Registry of bindings keyed by (contract type, id).
///
/// Cloning is cheap and yields a handle to the same registry. The registry
/// lock is not held while a provider runs, so providers may resolve other
/// bindings. Cached bindings keep their own slot locked during first
/// construction (see [`CachedProvider`]).
///
/// # Examples
///
/// ```
/// use rivet_di::{Container, concrete};
///
/// trait Storage: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct Memory;
/// impl Storage for Memory {
///     fn name(&self) -> &'static str { "memory" }
/// }
///
/// #[derive(Default)]
/// struct Disk;
/// impl Storage for Disk {
///     fn name(&self) -> &'static str { "disk" }
/// }
///
/// concrete!(Memory => dyn Storage);
/// concrete!(Disk => dyn Storage);
///
/// let container = Container::new();
/// container.bind::<dyn Storage>().to::<Memory>().as_singleton().conclude().unwrap();
/// assert_eq!(container.resolve::<dyn Storage>().unwrap().name(), "memory");
///
/// // A second singleton replaces the first.
/// container.bind::<dyn Storage>().to::<Disk>().as_singleton().conclude().unwrap();
/// assert_eq!(container.resolve::<dyn Storage>().unwrap().name(), "disk");
/// assert_eq!(container.len(), 1);
/// ```
#[derive(Clone)]
pub struct Container {
	inner: Arc<ContainerInner>,
}

impl Container {
	pub fn new() -> Self {
		Self::with_config(ContainerConfig::default())
	}

	pub fn with_config(config: ContainerConfig) -> Self {
		Self {
			inner: Arc::new(ContainerInner {
				bindings: RwLock::new(IndexMap::new()),
				config,
			}),
		}
	}

	pub fn config(&self) -> &ContainerConfig {
		&self.inner.config
	}

	/// Non-owning handle, for objects living inside the container that need
	/// to resolve later without keeping it alive.
	pub fn downgrade(&self) -> WeakContainer {
		WeakContainer {
			inner: Arc::downgrade(&self.inner),
		}
	}

	/// Whether both handles point at the same registry.
	pub fn ptr_eq(&self, other: &Container) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Starts a new binding for contract `C`.
	pub fn bind<C: ?Sized + Send + Sync + 'static>(&self) -> Binding<'_, C> {
		Binding::new(self)
	}

	/// Starts a binding of `T` to itself, built through `Default`.
	///
	/// Shorthand for `bind::<T>().to::<T>()`.
	pub fn bind_self<T: Default + Send + Sync + 'static>(&self) -> Binding<'_, T> {
		self.bind::<T>().to::<T>()
	}

	pub(crate) fn register<C: ?Sized + Send + Sync + 'static>(
		&self,
		index: BindIndex,
		lifecycle: Lifecycle,
		provider: Option<Arc<dyn Provider<C>>>,
	) -> DiResult<()> {
		let Some(provider) = provider else {
			return Err(reject(DiError::MissingProvider { index }));
		};

		let provider: Arc<dyn Provider<C>> = if lifecycle.is_cached() {
			Arc::new(CachedProvider::new(provider))
		} else {
			provider
		};

		let registration = Arc::new(Registration {
			index: index.clone(),
			lifecycle,
			description: provider.describe(),
			provider: Box::new(provider),
		});

		let mut bindings = self.inner.bindings.write();

		if lifecycle == Lifecycle::Singleton {
			let same_contract: Vec<BindIndex> = bindings
				.keys()
				.filter(|key| key.same_contract(&index))
				.cloned()
				.collect();

			if self.inner.config.strict_singletons
				&& same_contract
					.iter()
					.any(|key| bindings[key].lifecycle == Lifecycle::Singleton)
			{
				return Err(reject(DiError::SingletonConflict { index }));
			}

			for key in same_contract {
				if let Some(evicted) = bindings.shift_remove(&key) {
					if evicted.lifecycle == Lifecycle::Singleton {
						tracing::warn!(
							evicted = %evicted.index,
							"replacing existing singleton binding"
						);
					} else {
						tracing::info!(
							evicted = %evicted.index,
							lifecycle = %evicted.lifecycle,
							"removing binding superseded by singleton {}",
							index
						);
					}
				}
			}
		}

		if let Some(existing) = bindings.get(&index) {
			let error = if existing.lifecycle == Lifecycle::Singleton {
				DiError::SingletonConflict { index }
			} else {
				DiError::DuplicateBinding { index }
			};
			return Err(reject(error));
		}

		tracing::debug!(%index, %lifecycle, provider = %registration.description, "binding registered");
		bindings.insert(index, registration);
		Ok(())
	}

	/// Whether a binding exists for `C` without an id.
	pub fn can_resolve<C: ?Sized + 'static>(&self) -> bool {
		self.contains(&BindIndex::of::<C>(None))
	}

	/// Whether a binding exists for `C` under `id`.
	pub fn can_resolve_id<C: ?Sized + 'static>(&self, id: impl Into<BindId>) -> bool {
		self.contains(&BindIndex::of::<C>(Some(id.into())))
	}

	pub fn contains(&self, index: &BindIndex) -> bool {
		self.inner.bindings.read().contains_key(index)
	}

	/// Resolves the id-less binding of `C`.
	pub fn resolve<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<C>> {
		self.resolve_index(BindIndex::of::<C>(None))
	}

	/// Resolves the binding of `C` registered under `id`.
	pub fn resolve_id<C: ?Sized + Send + Sync + 'static>(
		&self,
		id: impl Into<BindId>,
	) -> DiResult<Arc<C>> {
		self.resolve_index(BindIndex::of::<C>(Some(id.into())))
	}

	fn resolve_index<C: ?Sized + Send + Sync + 'static>(
		&self,
		index: BindIndex,
	) -> DiResult<Arc<C>> {
		let registration = self.inner.bindings.read().get(&index).cloned();
		let Some(registration) = registration else {
			tracing::debug!(%index, "no binding found");
			return Err(DiError::NotBound { index });
		};

		let provider = registration
			.provider
			.downcast_ref::<Arc<dyn Provider<C>>>()
			.cloned()
			.ok_or_else(|| DiError::ProviderMismatch {
				index: registration.index.clone(),
			})?;

		let _guard = begin_resolution(
			self.owner_id(),
			&registration.index,
			self.inner.config.max_resolution_depth,
		)?;
		let instance = provider.get_instance(self)?;
		if provider.was_cached() {
			tracing::trace!(%index, "served from cache");
		}
		Ok(instance)
	}

	/// Resolves every binding of `C`, in registration order.
	///
	/// Bindings that fail to resolve are logged and skipped.
	pub fn resolve_all<C: ?Sized + Send + Sync + 'static>(&self) -> Vec<Arc<C>> {
		self.indices_of::<C>()
			.into_iter()
			.filter_map(|index| self.resolve_best_effort(index))
			.collect()
	}

	/// Resolves the bindings of `C` registered under `ids`, in the order given.
	///
	/// Failures are logged and skipped, unless exactly one id was requested, in
	/// which case the failure is returned.
	pub fn resolve_all_ids<C, I>(&self, ids: I) -> DiResult<Vec<Arc<C>>>
	where
		C: ?Sized + Send + Sync + 'static,
		I: IntoIterator,
		I::Item: Into<BindId>,
	{
		let ids: Vec<BindId> = ids.into_iter().map(Into::into).collect();
		if let [id] = ids.as_slice() {
			return self
				.resolve_index(BindIndex::of::<C>(Some(id.clone())))
				.map(|instance| vec![instance]);
		}

		Ok(ids
			.into_iter()
			.filter_map(|id| self.resolve_best_effort(BindIndex::of::<C>(Some(id))))
			.collect())
	}

	/// Resolves every binding of `C` and keeps the instances matching
	/// `predicate`.
	pub fn resolve_all_where<C, P>(&self, predicate: P) -> Vec<Arc<C>>
	where
		C: ?Sized + Send + Sync + 'static,
		P: Fn(&C) -> bool,
	{
		self.resolve_all::<C>()
			.into_iter()
			.filter(|instance| predicate(instance))
			.collect()
	}

	fn resolve_best_effort<C: ?Sized + Send + Sync + 'static>(
		&self,
		index: BindIndex,
	) -> Option<Arc<C>> {
		match self.resolve_index::<C>(index.clone()) {
			Ok(instance) => Some(instance),
			Err(error) => {
				tracing::error!(%index, %error, "skipping binding that failed to resolve");
				None
			}
		}
	}

	fn indices_of<C: ?Sized + 'static>(&self) -> Vec<BindIndex> {
		self.inner
			.bindings
			.read()
			.keys()
			.filter(|key| key.is_contract::<C>())
			.cloned()
			.collect()
	}

	/// Removes the id-less binding of `C`.
	pub fn unbind<C: ?Sized + 'static>(&self) -> bool {
		self.remove(&BindIndex::of::<C>(None))
	}

	/// Removes the binding of `C` registered under `id`.
	pub fn unbind_id<C: ?Sized + 'static>(&self, id: impl Into<BindId>) -> bool {
		self.remove(&BindIndex::of::<C>(Some(id.into())))
	}

	pub fn remove(&self, index: &BindIndex) -> bool {
		let removed = self.inner.bindings.write().shift_remove(index).is_some();
		if removed {
			tracing::debug!(%index, "binding removed");
		}
		removed
	}

	/// Removes every binding.
	pub fn clear(&self) {
		self.inner.bindings.write().clear();
	}

	pub fn len(&self) -> usize {
		self.inner.bindings.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.bindings.read().is_empty()
	}

	/// Describes the registered bindings in registration order.
	pub fn bindings(&self) -> Vec<BindingInfo> {
		self.inner
			.bindings
			.read()
			.values()
			.map(|registration| BindingInfo {
				index: registration.index.clone(),
				lifecycle: registration.lifecycle,
				provider: registration.description.clone(),
			})
			.collect()
	}

	fn owner_id(&self) -> usize {
		Arc::as_ptr(&self.inner) as usize
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("config", &self.inner.config)
			.field("bindings", &self.len())
			.finish()
	}
}

/// Weak handle to a [`Container`].
#[derive(Clone, Debug)]
pub struct WeakContainer {
	inner: Weak<ContainerInner>,
}

impl WeakContainer {
	/// Upgrades to a strong handle, failing once the container is gone.
	pub fn upgrade(&self) -> DiResult<Container> {
		self.inner
			.upgrade()
			.map(|inner| Container { inner })
			.ok_or(DiError::ContainerDropped)
	}
}

fn reject(error: DiError) -> DiError {
	tracing::error!(%error, "binding rejected");
	error
}
