//! Grouped binding registration

use crate::binding::Binding;
use crate::container::Container;
use crate::error::DiResult;
use std::sync::Arc;

/// Registers (and removes) a related group of bindings.
pub trait Installer: Send + Sync {
	fn install(&self, container: &Container) -> DiResult<()>;

	fn uninstall(&self, container: &Container) -> DiResult<()>;
}

/// Installs each installer in order and uninstalls them in reverse.
///
/// When one installer fails, the ones that already succeeded are uninstalled
/// again before the error is returned.
impl Installer for Vec<Arc<dyn Installer>> {
	fn install(&self, container: &Container) -> DiResult<()> {
		for (position, installer) in self.iter().enumerate() {
			if let Err(error) = installer.install(container) {
				tracing::warn!(%error, installed = position, "installer failed; rolling back");
				for installed in self[..position].iter().rev() {
					if let Err(rollback) = installed.uninstall(container) {
						tracing::error!(error = %rollback, "rollback uninstall failed");
					}
				}
				return Err(error);
			}
		}
		Ok(())
	}

	fn uninstall(&self, container: &Container) -> DiResult<()> {
		for installer in self.iter().rev() {
			installer.uninstall(container)?;
		}
		Ok(())
	}
}

/// A container paired with the installer that populates it.
pub struct Context {
	container: Container,
	installer: Arc<dyn Installer>,
}

impl Context {
	/// Creates a fresh container for `installer`.
	pub fn new(installer: Arc<dyn Installer>) -> Self {
		Self::with_container(Container::new(), installer)
	}

	pub fn with_container(container: Container, installer: Arc<dyn Installer>) -> Self {
		Self {
			container,
			installer,
		}
	}

	pub fn container(&self) -> &Container {
		&self.container
	}

	/// Shorthand for [`Container::bind`].
	pub fn bind<C: ?Sized + Send + Sync + 'static>(&self) -> Binding<'_, C> {
		self.container.bind()
	}

	/// Shorthand for [`Container::unbind`].
	pub fn unbind<C: ?Sized + 'static>(&self) -> bool {
		self.container.unbind::<C>()
	}

	/// Runs the installer against the container.
	pub fn install(&self) -> DiResult<()> {
		tracing::debug!("installing bindings");
		self.installer.install(&self.container)
	}

	/// Runs the installer's uninstall against the container.
	pub fn uninstall(&self) -> DiResult<()> {
		tracing::debug!("uninstalling bindings");
		self.installer.uninstall(&self.container)
	}
}
