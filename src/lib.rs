//! # Rivet
//!
//! A binding container and a priority-ordered action dispatcher.
//!
//! ## Crates
//!
//! - [`di`] - bindings, providers, lifecycles and installers
//! - [`actions`] - typed publish/subscribe with global and per-instance listeners
//! - [`conf`] - layered settings from defaults, TOML and the environment
//! - [`logging`] - `tracing-subscriber` setup driven by settings
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything below
//! - `actions` - the action service
//! - `conf` - settings and [`Startup`]
//! - `logging` - global subscriber installation during startup
//!
//! ## Quick Start
//!
//! ```rust
//! use rivet::prelude::*;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct LevelUp;
//!
//! impl Action for LevelUp {
//!     fn reset(&mut self) {}
//! }
//!
//! let mut startup = Startup::new(Settings::default()).with_logging(false);
//! let actions = startup.start().unwrap();
//!
//! let count = Arc::new(AtomicUsize::new(0));
//! let sink = count.clone();
//! actions.subscribe(
//!     listener(move |_: &LevelUp| {
//!         sink.fetch_add(1, Ordering::SeqCst);
//!     }),
//!     ListenerPriority::HIGH,
//! );
//!
//! actions.register_action(LevelUp).unwrap();
//! actions.dispatch_pooled::<LevelUp>().unwrap();
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

pub use rivet_di as di;

#[cfg(feature = "actions")]
pub use rivet_actions as actions;

#[cfg(feature = "conf")]
pub use rivet_conf as conf;

#[cfg(feature = "logging")]
pub use rivet_logging as logging;

#[cfg(feature = "conf")]
pub mod startup;

#[cfg(feature = "conf")]
pub use startup::{Startup, StartupError};

pub mod prelude {
	pub use rivet_di::{
		BindId, Binding, Container, ContainerConfig, Context, DiError, DiResult, Injectable,
		Installer, Lifecycle, Service, concrete,
	};

	#[cfg(feature = "actions")]
	pub use rivet_actions::{
		Action, ActionError, ActionInstaller, ActionService, InstanceKey, Listener,
		DispatchAs, ListenerPriority, Target, listener,
	};

	#[cfg(feature = "conf")]
	pub use crate::{Startup, StartupError};

	#[cfg(feature = "conf")]
	pub use rivet_conf::Settings;
}
