//! Element identity and declaring-type tags.

use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Name and ordinal of one element, fixed when the element is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
	name: &'static str,
	ordinal: usize,
}

impl Identity {
	pub(crate) const fn new(name: &'static str, ordinal: usize) -> Self {
		Self { name, ordinal }
	}

	/// Returns the element name exactly as declared.
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Returns the zero-based declaration position.
	pub const fn ordinal(&self) -> usize {
		self.ordinal
	}
}

/// Runtime tag of a declaring type.
///
/// Two tags are equal only when they describe the very same Rust type. The
/// display name is carried for diagnostics and for the wire format.
#[derive(Clone, Copy)]
pub struct TypeTag {
	name: &'static str,
	id: TypeId,
}

impl TypeTag {
	/// Tags `T` under its full Rust type name.
	pub fn of<T: 'static>() -> Self {
		Self::named::<T>(core::any::type_name::<T>())
	}

	/// Tags `T` under an explicit display name.
	pub fn named<T: 'static>(name: &'static str) -> Self {
		Self {
			name,
			id: TypeId::of::<T>(),
		}
	}

	pub const fn name(&self) -> &'static str {
		self.name
	}

	pub const fn type_id(&self) -> TypeId {
		self.id
	}

	/// Returns true if this tag describes `T`.
	pub fn is<T: 'static>(&self) -> bool {
		self.id == TypeId::of::<T>()
	}
}

impl PartialEq for TypeTag {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TypeTag").field(&self.name).finish()
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Left;
	struct Right;

	#[test]
	fn tags_compare_by_type_not_name() {
		assert_eq!(TypeTag::named::<Left>("Side"), TypeTag::of::<Left>());
		assert_ne!(TypeTag::named::<Left>("Side"), TypeTag::named::<Right>("Side"));
		assert!(TypeTag::of::<Right>().is::<Right>());
	}
}
