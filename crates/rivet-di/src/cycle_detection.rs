//! Thread-local circular dependency detection
//!
//! Resolution is synchronous, so the stack of indices currently being
//! resolved lives in a thread-local. Each entry is tagged with the container it
//! belongs to, which keeps independent containers on one thread apart.
//!
//! The check is deterministic and runs at every depth; the RAII
//! [`ResolutionGuard`] pops the entry again when resolution finishes, whether
//! it succeeded or not.

use crate::bind_index::BindIndex;
use crate::error::DiError;
use std::cell::RefCell;

/// Default maximum resolution depth.
pub const MAX_RESOLUTION_DEPTH: usize = 100;

thread_local! {
	static RESOLUTION_STACK: RefCell<Vec<(usize, BindIndex)>> = const { RefCell::new(Vec::new()) };
}

/// Pops its stack entry on drop.
#[must_use = "dropping the guard immediately ends the resolution scope"]
pub struct ResolutionGuard {
	_private: (),
}

impl Drop for ResolutionGuard {
	fn drop(&mut self) {
		RESOLUTION_STACK.with(|stack| {
			stack.borrow_mut().pop();
		});
	}
}

/// Records that `index` of the container identified by `owner` is being
/// resolved.
///
/// Fails if the same index is already on the stack or the stack is deeper
/// than `max_depth`.
pub fn begin_resolution(
	owner: usize,
	index: &BindIndex,
	max_depth: usize,
) -> Result<ResolutionGuard, DiError> {
	RESOLUTION_STACK.with(|stack| {
		let mut stack = stack.borrow_mut();

		if stack.len() >= max_depth {
			return Err(DiError::MaxDepthExceeded(max_depth));
		}

		if let Some(position) = stack
			.iter()
			.position(|(container, entry)| *container == owner && entry == index)
		{
			let path = stack[position..]
				.iter()
				.filter(|(container, _)| *container == owner)
				.map(|(_, entry)| entry.to_string())
				.chain(std::iter::once(index.to_string()))
				.collect::<Vec<_>>()
				.join(" -> ");
			return Err(DiError::CircularDependency {
				type_name: index.type_name().to_string(),
				path,
			});
		}

		stack.push((owner, index.clone()));
		Ok(ResolutionGuard { _private: () })
	})
}

/// Current nesting depth on this thread.
pub fn resolution_depth() -> usize {
	RESOLUTION_STACK.with(|stack| stack.borrow().len())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn guard_pops_on_drop() {
		// Arrange
		let index = BindIndex::of::<u8>(None);

		// Act
		{
			let _guard = begin_resolution(1, &index, MAX_RESOLUTION_DEPTH).unwrap();
			assert_eq!(resolution_depth(), 1);
		}

		// Assert
		assert_eq!(resolution_depth(), 0);
	}

	#[rstest]
	fn reentering_the_same_index_is_a_cycle() {
		// Arrange
		let outer = BindIndex::of::<u8>(None);
		let inner = BindIndex::of::<u16>(None);
		let _a = begin_resolution(1, &outer, MAX_RESOLUTION_DEPTH).unwrap();
		let _b = begin_resolution(1, &inner, MAX_RESOLUTION_DEPTH).unwrap();

		// Act
		let result = begin_resolution(1, &outer, MAX_RESOLUTION_DEPTH);

		// Assert
		match result {
			Err(DiError::CircularDependency { path, .. }) => {
				assert_eq!(path, "`u8` -> `u16` -> `u8`");
			}
			_ => panic!("expected a circular dependency error"),
		}
	}

	#[rstest]
	fn same_index_in_another_container_is_not_a_cycle() {
		// Arrange
		let index = BindIndex::of::<u8>(None);
		let _a = begin_resolution(1, &index, MAX_RESOLUTION_DEPTH).unwrap();

		// Act
		let nested = begin_resolution(2, &index, MAX_RESOLUTION_DEPTH);

		// Assert
		assert!(nested.is_ok());
	}

	#[rstest]
	fn depth_limit_is_enforced() {
		// Arrange
		let first = BindIndex::of::<u8>(None);
		let second = BindIndex::of::<u16>(None);
		let _a = begin_resolution(1, &first, 1).unwrap();

		// Act
		let result = begin_resolution(1, &second, 1);

		// Assert
		assert!(matches!(result, Err(DiError::MaxDepthExceeded(1))));
	}
}
