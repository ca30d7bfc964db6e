//! Composite lookup keys for the binding registry

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier distinguishing several bindings of the same contract type.
///
/// Ids compare structurally: `BindId::from(1)` and `BindId::from("1")` are
/// different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindId {
	Name(String),
	Number(i64),
}

impl fmt::Display for BindId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BindId::Name(name) => write!(f, "{}", name),
			BindId::Number(number) => write!(f, "{}", number),
		}
	}
}

impl From<&str> for BindId {
	fn from(value: &str) -> Self {
		BindId::Name(value.to_string())
	}
}

impl From<String> for BindId {
	fn from(value: String) -> Self {
		BindId::Name(value)
	}
}

impl From<&String> for BindId {
	fn from(value: &String) -> Self {
		BindId::Name(value.clone())
	}
}

impl From<i64> for BindId {
	fn from(value: i64) -> Self {
		BindId::Number(value)
	}
}

impl From<i32> for BindId {
	fn from(value: i32) -> Self {
		BindId::Number(i64::from(value))
	}
}

impl From<u32> for BindId {
	fn from(value: u32) -> Self {
		BindId::Number(i64::from(value))
	}
}

impl From<&BindId> for BindId {
	fn from(value: &BindId) -> Self {
		value.clone()
	}
}

/// (contract type, id) key under which a binding is registered.
///
/// Equality and hashing only consider the `TypeId` and the id; the type name
/// is carried along for diagnostics.
#[derive(Debug, Clone)]
pub struct BindIndex {
	type_id: TypeId,
	type_name: &'static str,
	id: Option<BindId>,
}

impl BindIndex {
	/// Builds the index for contract `C`.
	///
	/// # Examples
	///
	/// ```
	/// use rivet_di::{BindId, BindIndex};
	///
	/// let a = BindIndex::of::<String>(Some(BindId::from("main")));
	/// let b = BindIndex::of::<String>(Some("main".into()));
	/// assert_eq!(a, b);
	/// assert_ne!(a, BindIndex::of::<String>(None));
	/// ```
	pub fn of<C: ?Sized + 'static>(id: Option<BindId>) -> Self {
		Self {
			type_id: TypeId::of::<C>(),
			type_name: std::any::type_name::<C>(),
			id,
		}
	}

	/// `TypeId` of the contract this index belongs to.
	pub fn contract_type_id(&self) -> TypeId {
		self.type_id
	}

	/// Whether both indices name the same contract, ignoring ids.
	pub fn same_contract(&self, other: &BindIndex) -> bool {
		self.type_id == other.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn id(&self) -> Option<&BindId> {
		self.id.as_ref()
	}

	/// Whether this index belongs to contract `C`, regardless of id.
	pub fn is_contract<C: ?Sized + 'static>(&self) -> bool {
		self.type_id == TypeId::of::<C>()
	}
}

impl PartialEq for BindIndex {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id && self.id == other.id
	}
}

impl Eq for BindIndex {}

impl Hash for BindIndex {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
		self.id.hash(state);
	}
}

impl fmt::Display for BindIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.id {
			Some(id) => write!(f, "`{}` (id `{}`)", self.type_name, id),
			None => write!(f, "`{}`", self.type_name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashSet;

	#[rstest]
	fn same_type_and_id_are_equal() {
		// Arrange
		let a = BindIndex::of::<u8>(Some(BindId::from("x")));
		let b = BindIndex::of::<u8>(Some(BindId::from("x".to_string())));

		// Assert
		assert_eq!(a, b);
		let set: HashSet<_> = [a, b].into_iter().collect();
		assert_eq!(set.len(), 1);
	}

	#[rstest]
	fn same_contract_ignores_the_id() {
		// Arrange
		let named = BindIndex::of::<u8>(Some(BindId::from("x")));
		let bare = BindIndex::of::<u8>(None);
		let other = BindIndex::of::<u16>(None);

		// Assert
		assert!(named.same_contract(&bare));
		assert!(!named.same_contract(&other));
		assert_eq!(named.contract_type_id(), TypeId::of::<u8>());
		assert_ne!(bare.contract_type_id(), other.contract_type_id());
	}

	#[rstest]
	fn missing_ids_compare_equal() {
		assert_eq!(BindIndex::of::<u8>(None), BindIndex::of::<u8>(None));
	}

	#[rstest]
	fn different_types_never_collide() {
		assert_ne!(BindIndex::of::<u8>(None), BindIndex::of::<u16>(None));
	}

	#[rstest]
	fn numeric_and_textual_ids_are_distinct() {
		// Arrange
		let numeric = BindIndex::of::<u8>(Some(BindId::from(1)));
		let textual = BindIndex::of::<u8>(Some(BindId::from("1")));

		// Assert
		assert_ne!(numeric, textual);
		assert_eq!(numeric.id().map(ToString::to_string), textual.id().map(ToString::to_string));
	}

	#[rstest]
	fn display_includes_id_when_present() {
		let index = BindIndex::of::<u8>(Some(BindId::from(7)));
		assert_eq!(index.to_string(), "`u8` (id `7`)");
		assert_eq!(BindIndex::of::<u8>(None).to_string(), "`u8`");
	}
}
