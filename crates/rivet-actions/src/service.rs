//! Priority-ordered action dispatcher

use crate::action::{Action, Listener, Pooled};
use crate::error::{ActionError, ActionResult};
use crate::instance::{InstanceKey, Target};
use crate::priority::{ListenerPriority, priority_name};
use crate::resolver::ActionResolver;
use crate::table::{ErasedTable, ListenerTable};
use parking_lot::RwLock;
use rivet_di::{Container, DiResult, Injectable, Service, ServiceState};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Tunables for [`ActionService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionServiceConfig {
	/// Priority used by `subscribe_default` and `subscribe_to_default`.
	pub default_priority: i32,
}

impl Default for ActionServiceConfig {
	fn default() -> Self {
		Self {
			default_priority: ListenerPriority::MEDIUM,
		}
	}
}

/// Lets an action notify listeners of other action types.
///
/// Handed to [`Action::dispatch_as`]; every notification goes to the target
/// currently being dispatched to.
pub struct DispatchAs<'a> {
	service: &'a ActionService,
	target: &'a Target,
}

impl DispatchAs<'_> {
	/// Notifies the listeners of `B` with `view`.
	///
	/// `B::apply` does not run and `view` is not forwarded any further.
	pub fn notify<B: Action>(&self, view: &B) {
		tracing::trace!(
			action = std::any::type_name::<B>(),
			target = %self.target,
			"dispatching as another action type"
		);
		self.service.notify(view, self.target);
	}

	pub fn target(&self) -> &Target {
		self.target
	}
}

/// Dispatches actions to listeners in descending priority order.
///
/// Listeners subscribe either globally or to a specific instance. A dispatch
/// addressed to an instance notifies the global listeners first and then that
/// instance's listeners. Within one priority, listeners run in registration
/// order.
///
/// The table lock is never held while a listener runs, so listeners may
/// subscribe, unsubscribe or dispatch themselves. Each priority bucket is
/// snapshotted when it is reached.
///
/// # Examples
///
/// ```
/// use rivet_actions::{Action, ActionService, ListenerPriority, listener};
/// use std::sync::Arc;
/// use parking_lot::Mutex;
///
/// struct Saved;
/// impl Action for Saved {
///     fn reset(&mut self) {}
/// }
///
/// let service = ActionService::default();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let low = seen.clone();
/// service.subscribe(listener(move |_: &Saved| low.lock().push("low")), ListenerPriority::LOW);
/// let high = seen.clone();
/// service.subscribe(listener(move |_: &Saved| high.lock().push("high")), ListenerPriority::HIGH);
///
/// service.dispatch(&Saved);
/// assert_eq!(*seen.lock(), vec!["high", "low"]);
/// ```
pub struct ActionService {
	delegates: RwLock<HashMap<TypeId, Box<dyn ErasedTable>>>,
	resolver: RwLock<Option<ActionResolver>>,
	config: ActionServiceConfig,
	state: ServiceState,
}

impl ActionService {
	pub fn new(resolver: ActionResolver) -> Self {
		Self::with_config(resolver, ActionServiceConfig::default())
	}

	pub fn with_config(resolver: ActionResolver, config: ActionServiceConfig) -> Self {
		Self {
			delegates: RwLock::new(HashMap::new()),
			resolver: RwLock::new(Some(resolver)),
			config,
			state: ServiceState::new(),
		}
	}

	pub fn config(&self) -> &ActionServiceConfig {
		&self.config
	}

	/// Registers a global listener.
	pub fn subscribe<A: Action>(&self, listener: Listener<A>, priority: i32) {
		self.insert(Target::Global, listener, priority);
	}

	/// Registers a global listener at the configured default priority.
	pub fn subscribe_default<A: Action>(&self, listener: Listener<A>) {
		self.subscribe(listener, self.config.default_priority);
	}

	/// Registers a listener for dispatches addressed to `instance`.
	pub fn subscribe_to<A: Action>(&self, listener: Listener<A>, instance: &InstanceKey, priority: i32) {
		if !instance.is_alive() {
			tracing::warn!(
				action = std::any::type_name::<A>(),
				%instance,
				"tried to subscribe to a dropped instance; no subscription was registered"
			);
			return;
		}
		self.insert(Target::Instance(instance.clone()), listener, priority);
	}

	pub fn subscribe_to_default<A: Action>(&self, listener: Listener<A>, instance: &InstanceKey) {
		self.subscribe_to(listener, instance, self.config.default_priority);
	}

	fn insert<A: Action>(&self, target: Target, listener: Listener<A>, priority: i32) {
		let mut delegates = self.delegates.write();
		let table = delegates
			.entry(TypeId::of::<A>())
			.or_insert_with(|| Box::new(ListenerTable::<A>::default()));
		match table.as_any_mut().downcast_mut::<ListenerTable<A>>() {
			Some(table) => {
				tracing::debug!(
					action = std::any::type_name::<A>(),
					%target,
					priority,
					priority_name = priority_name(priority),
					"listener subscribed"
				);
				table.insert(target, priority, listener);
			}
			None => tracing::error!(
				action = std::any::type_name::<A>(),
				"listener table has an unexpected type"
			),
		}
	}

	/// Removes a global listener. Returns whether anything was removed.
	pub fn unsubscribe<A: Action>(&self, listener: &Listener<A>) -> bool {
		self.remove(&Target::Global, listener)
	}

	/// Removes a listener registered for `instance`.
	pub fn unsubscribe_from<A: Action>(&self, listener: &Listener<A>, instance: &InstanceKey) -> bool {
		if !instance.is_alive() {
			tracing::warn!(
				action = std::any::type_name::<A>(),
				%instance,
				"tried to unsubscribe from a dropped instance"
			);
			return false;
		}
		self.remove(&Target::Instance(instance.clone()), listener)
	}

	fn remove<A: Action>(&self, target: &Target, listener: &Listener<A>) -> bool {
		let mut delegates = self.delegates.write();
		let type_id = TypeId::of::<A>();
		let Some(table) = delegates
			.get_mut(&type_id)
			.and_then(|table| table.as_any_mut().downcast_mut::<ListenerTable<A>>())
		else {
			return false;
		};

		let removed_from = table.remove(target, listener);
		for priority in &removed_from {
			tracing::debug!(
				action = std::any::type_name::<A>(),
				%target,
				priority = *priority,
				priority_name = priority_name(*priority),
				"listener unsubscribed"
			);
		}
		if ErasedTable::is_empty(table) {
			delegates.remove(&type_id);
		}
		!removed_from.is_empty()
	}

	/// Notifies the global listeners of `action`.
	pub fn dispatch<A: Action>(&self, action: &A) {
		action.apply();
		self.notify_all(action, &Target::Global);
	}

	/// Notifies the global listeners and then the listeners of `instance`.
	pub fn dispatch_to<A: Action>(&self, action: &A, instance: &InstanceKey) {
		if !instance.is_alive() {
			tracing::warn!(
				action = std::any::type_name::<A>(),
				%instance,
				"tried to dispatch to a dropped instance; nothing was notified"
			);
			return;
		}
		action.apply();
		self.notify_all(action, &Target::Global);
		self.notify_all(action, &Target::Instance(instance.clone()));
	}

	fn notify_all<A: Action>(&self, action: &A, target: &Target) {
		self.notify(action, target);
		action.dispatch_as(&DispatchAs {
			service: self,
			target,
		});
	}

	fn notify<A: Action>(&self, action: &A, target: &Target) {
		for priority in self.priorities::<A>(target) {
			let bucket = self.with_table::<A, _>(|table| table.bucket(target, priority));
			for listener in bucket.unwrap_or_default() {
				listener(action);
			}
		}
	}

	fn with_table<A: Action, R>(&self, f: impl FnOnce(&ListenerTable<A>) -> R) -> Option<R> {
		let delegates = self.delegates.read();
		delegates
			.get(&TypeId::of::<A>())
			.and_then(|table| table.as_any().downcast_ref::<ListenerTable<A>>())
			.map(f)
	}

	/// Hands out the pooled `A`, reset to its initial state.
	///
	/// Fails with [`ActionError::InFlight`] while the action is locked by an
	/// ongoing dispatch.
	pub fn get<A: Action>(&self) -> ActionResult<Pooled<A>> {
		let pooled = self.resolver()?.resolve::<A>()?;
		{
			let Some(mut action) = pooled.try_lock() else {
				return Err(ActionError::InFlight {
					action: std::any::type_name::<A>(),
				});
			};
			action.reset();
		}
		Ok(pooled)
	}

	/// Registers `action` as the pooled instance of its type.
	pub fn register_action<A: Action>(&self, action: A) -> ActionResult<()> {
		self.resolver()?.register(action)
	}

	/// Resets and dispatches the pooled `A` globally.
	///
	/// The action stays locked while listeners run.
	pub fn dispatch_pooled<A: Action>(&self) -> ActionResult<()> {
		let pooled = self.get::<A>()?;
		let action = pooled.lock();
		self.dispatch(&*action);
		Ok(())
	}

	/// Resets and dispatches the pooled `A` to `instance`.
	pub fn dispatch_pooled_to<A: Action>(&self, instance: &InstanceKey) -> ActionResult<()> {
		let pooled = self.get::<A>()?;
		let action = pooled.lock();
		self.dispatch_to(&*action, instance);
		Ok(())
	}

	fn resolver(&self) -> ActionResult<ActionResolver> {
		self.resolver.read().clone().ok_or(ActionError::NoResolver)
	}

	/// Whether any listener of `A` is registered, globally or per instance.
	pub fn has_listeners<A: Action>(&self) -> bool {
		self.delegates.read().contains_key(&TypeId::of::<A>())
	}

	pub fn listener_count<A: Action>(&self, target: &Target) -> usize {
		self.with_table::<A, _>(|table| table.listener_count(target))
			.unwrap_or(0)
	}

	/// Registered priorities of `A` for `target`, highest first.
	pub fn priorities<A: Action>(&self, target: &Target) -> Vec<i32> {
		self.with_table::<A, _>(|table| table.priorities(target))
			.unwrap_or_default()
	}

	/// Number of action types with at least one listener.
	pub fn action_type_count(&self) -> usize {
		self.delegates.read().len()
	}

	/// Number of targets (global plus instances) registered for `A`.
	pub fn target_count<A: Action>(&self) -> usize {
		self.delegates
			.read()
			.get(&TypeId::of::<A>())
			.map(|table| table.target_count())
			.unwrap_or(0)
	}

	/// Drops the listeners of instances that no longer exist.
	///
	/// Returns the number of instance targets removed.
	pub fn prune_dead_instances(&self) -> usize {
		let mut delegates = self.delegates.write();
		let pruned: usize = delegates
			.values_mut()
			.map(|table| table.prune_dead())
			.sum();
		delegates.retain(|_, table| !table.is_empty());
		if pruned > 0 {
			tracing::debug!(pruned, "dropped listeners of released instances");
		}
		pruned
	}

	/// Registers a callback run whenever the service finishes initializing.
	pub fn on_initialized<F>(&self, callback: F)
	where
		F: Fn(&dyn Service) + Send + Sync + 'static,
	{
		self.state.on_initialized(callback);
	}
}

impl Default for ActionService {
	/// A service without a container: listeners work, pooled actions do not.
	fn default() -> Self {
		Self {
			delegates: RwLock::new(HashMap::new()),
			resolver: RwLock::new(None),
			config: ActionServiceConfig::default(),
			state: ServiceState::new(),
		}
	}
}

impl Service for ActionService {
	fn initialize(&self) {
		tracing::debug!("action service initialized");
		self.state.mark_initialized(self);
	}

	fn cleanup(&self) {
		self.delegates.write().clear();
		self.resolver.write().take();
		self.state.reset();
		tracing::debug!("action service cleaned up");
	}

	fn is_initialized(&self) -> bool {
		self.state.is_initialized()
	}
}

impl Injectable for ActionService {
	fn inject(container: &Container) -> DiResult<Self> {
		let resolver = match container.resolve::<ActionResolver>() {
			Ok(resolver) => (*resolver).clone(),
			Err(error) if error.is_not_bound() => ActionResolver::new(container),
			Err(error) => return Err(error),
		};
		let config = match container.resolve::<ActionServiceConfig>() {
			Ok(config) => *config,
			Err(error) if error.is_not_bound() => ActionServiceConfig::default(),
			Err(error) => return Err(error),
		};
		Ok(Self::with_config(resolver, config))
	}
}

impl fmt::Debug for ActionService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionService")
			.field("config", &self.config)
			.field("action_types", &self.action_type_count())
			.field("has_resolver", &self.resolver.read().is_some())
			.field("state", &self.state)
			.finish()
	}
}
