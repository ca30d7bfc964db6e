use crate::service::DispatchAs;
use parking_lot::Mutex;
use std::sync::Arc;

/// A message dispatched to listeners.
///
/// Actions registered for pooling are reused between dispatches; `reset`
/// returns one to its initial state before it is handed out again.
pub trait Action: Send + Sync + 'static {
	fn reset(&mut self);

	/// Runs once per dispatch, before any listener is notified.
	fn apply(&self) {}

	/// Forwards the action to listeners of other action types.
	///
	/// Called for each notified target right after the action's own
	/// listeners. An action embedding a more general one can hand it on:
	///
	/// ```
	/// use rivet_actions::{Action, ActionService, DispatchAs, ListenerPriority, listener};
	/// use std::sync::Arc;
	/// use std::sync::atomic::{AtomicU32, Ordering};
	///
	/// struct Moved;
	/// impl Action for Moved {
	///     fn reset(&mut self) {}
	/// }
	///
	/// struct Jumped {
	///     moved: Moved,
	/// }
	/// impl Action for Jumped {
	///     fn reset(&mut self) {}
	///
	///     fn dispatch_as(&self, also: &DispatchAs<'_>) {
	///         also.notify(&self.moved);
	///     }
	/// }
	///
	/// let service = ActionService::default();
	/// let moves = Arc::new(AtomicU32::new(0));
	/// let counter = moves.clone();
	/// service.subscribe(
	///     listener(move |_: &Moved| {
	///         counter.fetch_add(1, Ordering::SeqCst);
	///     }),
	///     ListenerPriority::MEDIUM,
	/// );
	///
	/// service.dispatch(&Jumped { moved: Moved });
	/// assert_eq!(moves.load(Ordering::SeqCst), 1);
	/// ```
	fn dispatch_as(&self, _also: &DispatchAs<'_>) {}
}

/// A pooled action as stored in the container.
pub type Pooled<A> = Arc<Mutex<A>>;

/// Callback notified of dispatched actions of type `A`.
pub type Listener<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Wraps a closure as a [`Listener`].
///
/// Keep a clone of the returned handle to unsubscribe it later; listeners are
/// compared by identity.
pub fn listener<A, F>(callback: F) -> Listener<A>
where
	A: Action,
	F: Fn(&A) + Send + Sync + 'static,
{
	Arc::new(callback)
}

pub(crate) fn same_listener<A>(a: &Listener<A>, b: &Listener<A>) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
