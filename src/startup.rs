//! Application startup
//!
//! Ties settings, logging, the container and the action service together.

use rivet_actions::{ActionInstaller, ActionService, ActionServiceConfig};
use rivet_conf::{Settings, SettingsError};
use rivet_di::{Container, ContainerConfig, Context, DiError, Installer};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StartupError {
	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[cfg(feature = "logging")]
	#[error(transparent)]
	Logging(#[from] rivet_logging::LoggingError),

	#[error(transparent)]
	Di(#[from] DiError),

	#[error("startup has not run yet")]
	NotStarted,
}

/// Builds the container from settings and installs the action service plus
/// any additional installers.
///
/// # Examples
///
/// ```
/// use rivet::Startup;
/// use rivet::conf::Settings;
///
/// let mut startup = Startup::new(Settings::default()).with_logging(false);
/// let actions = startup.start().unwrap();
/// assert!(rivet::di::Service::is_initialized(&*actions));
/// ```
pub struct Startup {
	settings: Settings,
	container: Container,
	installers: Vec<Arc<dyn Installer>>,
	context: Option<Context>,
	init_logging: bool,
}

impl Startup {
	pub fn new(settings: Settings) -> Self {
		let container = Container::with_config(ContainerConfig {
			strict_singletons: settings.container.strict_singletons,
			max_resolution_depth: settings.container.max_resolution_depth,
		});
		Self {
			settings,
			container,
			installers: Vec::new(),
			context: None,
			init_logging: true,
		}
	}

	/// Loads settings from `path` and the environment.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StartupError> {
		Ok(Self::new(Settings::load(path)?))
	}

	/// Adds an installer, run after the action service is installed.
	pub fn with_installer(mut self, installer: Arc<dyn Installer>) -> Self {
		self.installers.push(installer);
		self
	}

	/// Whether `start` installs the global log subscriber. Defaults to true.
	pub fn with_logging(mut self, enabled: bool) -> Self {
		self.init_logging = enabled;
		self
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn container(&self) -> &Container {
		&self.container
	}

	pub fn is_started(&self) -> bool {
		self.context.is_some()
	}

	/// Validates settings, sets up logging and installs every binding.
	///
	/// Calling `start` again after a successful start returns the running
	/// service. If an installer fails, the installers before it are
	/// uninstalled, so a failed start can be retried.
	pub fn start(&mut self) -> Result<Arc<ActionService>, StartupError> {
		if self.context.is_some() {
			return self.action_service();
		}

		self.settings.validate()?;
		if self.init_logging {
			self.init_logging()?;
		}

		let context = Context::with_container(self.container.clone(), self.installer());
		context.install()?;
		self.context = Some(context);
		tracing::info!(installers = self.installers.len() + 1, "startup complete");
		self.action_service()
	}

	/// Uninstalls and reinstalls every binding, yielding a fresh service.
	pub fn reset(&mut self) -> Result<Arc<ActionService>, StartupError> {
		self.shutdown()?;
		let context = Context::with_container(self.container.clone(), self.installer());
		context.install()?;
		self.context = Some(context);
		tracing::info!("startup reset");
		self.action_service()
	}

	/// Uninstalls every binding. A no-op before `start`.
	pub fn shutdown(&mut self) -> Result<(), StartupError> {
		if let Some(context) = self.context.take() {
			context.uninstall()?;
		}
		Ok(())
	}

	pub fn action_service(&self) -> Result<Arc<ActionService>, StartupError> {
		if self.context.is_none() {
			return Err(StartupError::NotStarted);
		}
		Ok(self.container.resolve::<ActionService>()?)
	}

	fn installer(&self) -> Arc<dyn Installer> {
		let actions = ActionInstaller::with_config(ActionServiceConfig {
			default_priority: self.settings.actions.default_priority,
		});
		let mut group: Vec<Arc<dyn Installer>> = vec![Arc::new(actions)];
		group.extend(self.installers.iter().cloned());
		Arc::new(group)
	}

	#[cfg(feature = "logging")]
	fn init_logging(&self) -> Result<(), StartupError> {
		match rivet_logging::init(&self.settings.logging) {
			Err(rivet_logging::LoggingError::AlreadyInitialized) => {
				tracing::debug!("global subscriber already installed; keeping it");
				Ok(())
			}
			other => Ok(other?),
		}
	}

	#[cfg(not(feature = "logging"))]
	fn init_logging(&self) -> Result<(), StartupError> {
		Ok(())
	}
}

impl std::fmt::Debug for Startup {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Startup")
			.field("settings", &self.settings)
			.field("container", &self.container)
			.field("installers", &self.installers.len())
			.field("started", &self.is_started())
			.finish()
	}
}
