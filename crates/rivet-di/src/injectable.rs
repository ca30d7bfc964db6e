//! Traits connecting concrete types to the contracts they are bound under

use crate::DiResult;
use crate::container::Container;
use std::sync::Arc;

/// Declares that `Self` can be handed out as contract `C`.
///
/// Every type is its own contract. Trait-object contracts need one impl per
/// concrete type, which the [`concrete!`](crate::concrete) macro writes:
///
/// ```
/// use rivet_di::{Container, concrete};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// concrete!(English => dyn Greeter);
///
/// let container = Container::new();
/// container.bind::<dyn Greeter>().to::<English>().conclude().unwrap();
/// assert_eq!(container.resolve::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
pub trait Concrete<C: ?Sized>: Send + Sync + 'static {
	fn into_contract(self: Arc<Self>) -> Arc<C>;
}

impl<T: Send + Sync + 'static> Concrete<T> for T {
	fn into_contract(self: Arc<Self>) -> Arc<T> {
		self
	}
}

/// Implements [`Concrete`] for trait-object contracts.
///
/// `concrete!(Foo => dyn Bar, dyn Baz)` lets `Foo` be bound under both
/// `dyn Bar` and `dyn Baz`.
#[macro_export]
macro_rules! concrete {
	($concrete:ty => $($contract:ty),+ $(,)?) => {
		$(
			impl $crate::Concrete<$contract> for $concrete {
				fn into_contract(
					self: ::std::sync::Arc<Self>,
				) -> ::std::sync::Arc<$contract> {
					self
				}
			}
		)+
	};
}

/// Types built by the container with access to other bindings.
///
/// Bind them with [`Binding::to_injectable`](crate::Binding::to_injectable).
/// The constructor runs on every resolve for transient bindings and once for
/// cached or singleton bindings.
pub trait Injectable: Sized + Send + Sync + 'static {
	fn inject(container: &Container) -> DiResult<Self>;
}
