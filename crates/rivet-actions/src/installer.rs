use crate::resolver::ActionResolver;
use crate::service::{ActionService, ActionServiceConfig};
use rivet_di::{Container, DiResult, Installer, Service};
use std::sync::Arc;

/// Installs an [`ActionService`] singleton and its resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionInstaller {
	config: ActionServiceConfig,
}

impl ActionInstaller {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: ActionServiceConfig) -> Self {
		Self { config }
	}
}

impl Installer for ActionInstaller {
	fn install(&self, container: &Container) -> DiResult<()> {
		container
			.bind::<ActionResolver>()
			.from_method(|container: &Container| Ok(ActionResolver::new(container)))
			.as_singleton()
			.conclude()?;
		container
			.bind::<ActionServiceConfig>()
			.to_instance(Arc::new(self.config))
			.as_singleton()
			.conclude()?;
		container
			.bind::<ActionService>()
			.to_injectable::<ActionService>()
			.as_singleton()
			.conclude()?;

		let service = container.resolve::<ActionService>()?;
		service.initialize();
		tracing::info!(
			default_priority = self.config.default_priority,
			"action service installed"
		);
		Ok(())
	}

	fn uninstall(&self, container: &Container) -> DiResult<()> {
		match container.resolve::<ActionService>() {
			Ok(service) => service.cleanup(),
			Err(error) if error.is_not_bound() => {}
			Err(error) => return Err(error),
		}
		container.unbind::<ActionService>();
		container.unbind::<ActionServiceConfig>();
		container.unbind::<ActionResolver>();
		tracing::info!("action service uninstalled");
		Ok(())
	}
}
