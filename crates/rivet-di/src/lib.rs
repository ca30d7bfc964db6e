//! # Rivet Dependency Injection
//!
//! A binding registry that maps a contract type (usually a `dyn Trait`), plus
//! an optional id, to a provider that produces shared instances of it.
//!
//! ## Features
//!
//! - **Fluent bindings**: `bind::<dyn Trait>().to::<Impl>().as_cached().conclude()`
//! - **Lifecycles**: transient, cached and singleton bindings
//! - **Constructor injection**: [`Injectable`] types pull their own dependencies
//! - **Cycle detection**: self-referential resolution fails instead of recursing
//! - **Installers**: group related bindings and remove them again as a unit
//!
//! ## Example
//!
//! ```rust
//! use rivet_di::{Container, DiResult, Injectable, concrete};
//! use std::sync::Arc;
//!
//! trait Repository: Send + Sync {
//!     fn find(&self, id: u32) -> Option<String>;
//! }
//!
//! #[derive(Default)]
//! struct InMemory;
//!
//! impl Repository for InMemory {
//!     fn find(&self, id: u32) -> Option<String> {
//!         (id == 1).then(|| "alice".to_string())
//!     }
//! }
//!
//! concrete!(InMemory => dyn Repository);
//!
//! struct UserService {
//!     repository: Arc<dyn Repository>,
//! }
//!
//! impl Injectable for UserService {
//!     fn inject(container: &Container) -> DiResult<Self> {
//!         Ok(Self {
//!             repository: container.resolve::<dyn Repository>()?,
//!         })
//!     }
//! }
//!
//! let container = Container::new();
//! container.bind::<dyn Repository>().to::<InMemory>().as_singleton().conclude().unwrap();
//! container.bind::<UserService>().to_injectable::<UserService>().conclude().unwrap();
//!
//! let service = container.resolve::<UserService>().unwrap();
//! assert_eq!(service.repository.find(1).as_deref(), Some("alice"));
//! ```

pub mod bind_index;
pub mod binding;
pub mod container;
pub mod cycle_detection;
pub mod error;
pub mod injectable;
pub mod installer;
pub mod providers;
pub mod service;

pub use bind_index::{BindId, BindIndex};
pub use binding::{Binding, Lifecycle};
pub use container::{BindingInfo, Container, ContainerConfig, WeakContainer};
pub use cycle_detection::{MAX_RESOLUTION_DEPTH, begin_resolution, resolution_depth};
pub use error::{DiError, DiResult};
pub use injectable::{Concrete, Injectable};
pub use installer::{Context, Installer};
pub use providers::{CachedProvider, InstanceProvider, MethodProvider, Provider, TransientProvider};
pub use service::{Service, ServiceState};
