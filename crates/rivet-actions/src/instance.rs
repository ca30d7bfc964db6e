//! Identity of the objects listeners subscribe to

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

type Liveness = Arc<dyn Fn() -> bool + Send + Sync>;

/// Identifies a shared object by address without keeping it alive.
///
/// The key holds a weak reference, so the allocation (and with it the
/// address) is not reused while the key exists. Once every strong reference
/// is gone the key reports itself dead and the service ignores it.
#[derive(Clone)]
pub struct InstanceKey {
	address: usize,
	type_name: &'static str,
	liveness: Liveness,
}

impl InstanceKey {
	pub fn of<T: ?Sized + Send + Sync + 'static>(instance: &Arc<T>) -> Self {
		let weak = Arc::downgrade(instance);
		Self {
			address: Arc::as_ptr(instance) as *const () as usize,
			type_name: std::any::type_name::<T>(),
			liveness: Arc::new(move || weak.strong_count() > 0),
		}
	}

	/// Whether the instance is still referenced somewhere.
	pub fn is_alive(&self) -> bool {
		(self.liveness)()
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}
}

impl PartialEq for InstanceKey {
	fn eq(&self, other: &Self) -> bool {
		self.address == other.address
	}
}

impl Eq for InstanceKey {}

impl Hash for InstanceKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.address.hash(state);
	}
}

impl fmt::Debug for InstanceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InstanceKey")
			.field("type", &self.type_name)
			.field("address", &format_args!("{:#x}", self.address))
			.field("alive", &self.is_alive())
			.finish()
	}
}

impl fmt::Display for InstanceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}@{:#x}", self.type_name, self.address)
	}
}

/// Where a listener is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
	/// Notified by every dispatch of the action type.
	Global,
	/// Notified only by dispatches addressed to this instance.
	Instance(InstanceKey),
}

impl From<InstanceKey> for Target {
	fn from(key: InstanceKey) -> Self {
		Target::Instance(key)
	}
}

impl From<&InstanceKey> for Target {
	fn from(key: &InstanceKey) -> Self {
		Target::Instance(key.clone())
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Target::Global => write!(f, "global"),
			Target::Instance(key) => write!(f, "{key}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	trait Named: Send + Sync {}
	struct Player;
	impl Named for Player {}

	#[rstest]
	fn keys_of_the_same_allocation_are_equal() {
		// Arrange
		let player = Arc::new(Player);
		let as_trait: Arc<dyn Named> = player.clone();

		// Act
		let concrete = InstanceKey::of(&player);
		let erased = InstanceKey::of(&as_trait);

		// Assert
		assert_eq!(concrete, erased);
		assert_ne!(concrete, InstanceKey::of(&Arc::new(Player)));
	}

	#[rstest]
	fn key_dies_with_its_instance() {
		// Arrange
		let player = Arc::new(Player);
		let key = InstanceKey::of(&player);
		assert!(key.is_alive());

		// Act
		drop(player);

		// Assert
		assert!(!key.is_alive());
	}
}
