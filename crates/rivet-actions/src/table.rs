//! Per-action-type listener storage

use crate::action::{Action, Listener, same_listener};
use crate::instance::Target;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

/// Listeners of one action type: target -> priority -> registration order.
pub(crate) struct ListenerTable<A> {
	targets: HashMap<Target, BTreeMap<i32, Vec<Listener<A>>>>,
}

impl<A> Default for ListenerTable<A> {
	fn default() -> Self {
		Self {
			targets: HashMap::new(),
		}
	}
}

impl<A: Action> ListenerTable<A> {
	pub(crate) fn insert(&mut self, target: Target, priority: i32, listener: Listener<A>) {
		self.targets
			.entry(target)
			.or_default()
			.entry(priority)
			.or_default()
			.push(listener);
	}

	/// Removes the most recent registration of `listener` from every priority
	/// of `target`, then drops whatever became empty.
	pub(crate) fn remove(&mut self, target: &Target, listener: &Listener<A>) -> Vec<i32> {
		let Some(buckets) = self.targets.get_mut(target) else {
			return Vec::new();
		};

		let mut removed_from = Vec::new();
		for (priority, bucket) in buckets.iter_mut() {
			if let Some(position) = bucket
				.iter()
				.rposition(|candidate| same_listener(candidate, listener))
			{
				bucket.remove(position);
				removed_from.push(*priority);
			}
		}

		buckets.retain(|_, bucket| !bucket.is_empty());
		if buckets.is_empty() {
			self.targets.remove(target);
		}
		removed_from
	}

	/// Priorities registered for `target`, highest first.
	pub(crate) fn priorities(&self, target: &Target) -> Vec<i32> {
		self.targets
			.get(target)
			.map(|buckets| buckets.keys().rev().copied().collect())
			.unwrap_or_default()
	}

	pub(crate) fn bucket(&self, target: &Target, priority: i32) -> Vec<Listener<A>> {
		self.targets
			.get(target)
			.and_then(|buckets| buckets.get(&priority))
			.cloned()
			.unwrap_or_default()
	}

	pub(crate) fn listener_count(&self, target: &Target) -> usize {
		self.targets
			.get(target)
			.map(|buckets| buckets.values().map(Vec::len).sum())
			.unwrap_or(0)
	}
}

/// Object-safe view over a [`ListenerTable`] of any action type.
pub(crate) trait ErasedTable: Send + Sync {
	fn as_any(&self) -> &dyn Any;

	fn as_any_mut(&mut self) -> &mut dyn Any;

	fn is_empty(&self) -> bool;

	/// Drops targets whose instance is gone and returns how many were dropped.
	fn prune_dead(&mut self) -> usize;

	fn target_count(&self) -> usize;
}

impl<A: Action> ErasedTable for ListenerTable<A> {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}

	fn prune_dead(&mut self) -> usize {
		let before = self.targets.len();
		self.targets.retain(|target, _| match target {
			Target::Global => true,
			Target::Instance(key) => key.is_alive(),
		});
		before - self.targets.len()
	}

	fn target_count(&self) -> usize {
		self.targets.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::action::listener;
	use rstest::rstest;

	struct Tick;

	impl Action for Tick {
		fn reset(&mut self) {}
	}

	#[rstest]
	fn removing_the_last_listener_drops_the_target() {
		// Arrange
		let mut table = ListenerTable::<Tick>::default();
		let handle = listener(|_: &Tick| {});
		table.insert(Target::Global, 500, handle.clone());
		table.insert(Target::Global, 750, handle.clone());

		// Act
		let removed_from = table.remove(&Target::Global, &handle);

		// Assert
		assert_eq!(removed_from, vec![500, 750]);
		assert!(ErasedTable::is_empty(&table));
		assert!(table.priorities(&Target::Global).is_empty());
	}

	#[rstest]
	fn removal_takes_the_most_recent_duplicate_only() {
		// Arrange
		let mut table = ListenerTable::<Tick>::default();
		let handle = listener(|_: &Tick| {});
		let other = listener(|_: &Tick| {});
		table.insert(Target::Global, 500, handle.clone());
		table.insert(Target::Global, 500, other.clone());
		table.insert(Target::Global, 500, handle.clone());

		// Act
		table.remove(&Target::Global, &handle);

		// Assert
		let bucket = table.bucket(&Target::Global, 500);
		assert_eq!(bucket.len(), 2);
		assert!(same_listener(&bucket[0], &handle));
		assert!(same_listener(&bucket[1], &other));
	}
}
