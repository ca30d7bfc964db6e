//! # Rivet Actions
//!
//! Typed publish/subscribe on top of the Rivet container.
//!
//! Listeners register for an action type, optionally scoped to one instance,
//! at an integer priority. Dispatch notifies them from the highest priority
//! down. Frequently dispatched actions can be pooled in the container and
//! reset before each reuse.
//!
//! ## Example
//!
//! ```rust
//! use rivet_actions::{Action, ActionInstaller, ActionService, InstanceKey, ListenerPriority, listener};
//! use rivet_di::{Container, Installer};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Default)]
//! struct Hit {
//!     damage: u32,
//! }
//!
//! impl Action for Hit {
//!     fn reset(&mut self) {
//!         self.damage = 0;
//!     }
//! }
//!
//! let container = Container::new();
//! ActionInstaller::new().install(&container).unwrap();
//! let actions = container.resolve::<ActionService>().unwrap();
//!
//! let enemy = Arc::new("goblin");
//! let taken = Arc::new(AtomicU32::new(0));
//! let sink = taken.clone();
//! actions.subscribe_to(
//!     listener(move |hit: &Hit| {
//!         sink.fetch_add(hit.damage, Ordering::SeqCst);
//!     }),
//!     &InstanceKey::of(&enemy),
//!     ListenerPriority::HIGH,
//! );
//!
//! actions.register_action(Hit::default()).unwrap();
//! let hit = actions.get::<Hit>().unwrap();
//! hit.lock().damage = 7;
//! actions.dispatch_to(&*hit.lock(), &InstanceKey::of(&enemy));
//! assert_eq!(taken.load(Ordering::SeqCst), 7);
//! ```

pub mod action;
pub mod error;
pub mod installer;
pub mod instance;
pub mod priority;
pub mod resolver;
pub mod service;
mod table;

pub use action::{Action, Listener, Pooled, listener};
pub use error::{ActionError, ActionResult};
pub use installer::ActionInstaller;
pub use instance::{InstanceKey, Target};
pub use priority::{ListenerPriority, priority_name};
pub use resolver::ActionResolver;
pub use service::{ActionService, ActionServiceConfig, DispatchAs};
