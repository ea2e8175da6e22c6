//! Singleton elements and their type-erased view.

use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use std::sync::Arc;

use crate::enumeration::Enumeration;
use crate::error::EnumError;
use crate::identity::{Identity, TypeTag};

/// Shared handle to an element. Equality is identity.
pub type ElementRef<E> = Arc<Element<E>>;

/// Type-erased handle to an element of any enumeration.
pub type ErasedElement = Arc<dyn AnyElement>;

/// One element of `E`: its identity plus the payload built from its arguments.
///
/// Elements are only created by a [`crate::Registry`]. There is no `Clone`:
/// an element equals nothing but itself.
pub struct Element<E> {
	identity: Identity,
	value: E,
}

impl<E: Enumeration> Element<E> {
	pub(crate) fn new(identity: Identity, value: E) -> Self {
		Self { identity, value }
	}

	/// Returns the element name exactly as declared.
	pub fn name(&self) -> &'static str {
		self.identity.name()
	}

	/// Returns the position of this element in its declaration, starting at zero.
	pub fn ordinal(&self) -> usize {
		self.identity.ordinal()
	}

	pub fn identity(&self) -> Identity {
		self.identity
	}

	/// Returns the constructed payload.
	pub fn value(&self) -> &E {
		&self.value
	}

	/// Compares ordinals with an element of possibly another type.
	///
	/// Fails with [`EnumError::TypeMismatch`] unless `other` belongs to `E`.
	pub fn compare_to(&self, other: &dyn AnyElement) -> Result<Ordering, EnumError> {
		if other.type_tag() != E::tag() {
			return Err(EnumError::TypeMismatch {
				expected: E::NAME,
				actual: other.type_tag().name(),
			});
		}
		Ok(self.ordinal().cmp(&other.ordinal()))
	}

	/// Always fails: elements are singletons.
	pub fn try_clone(&self) -> Result<Self, EnumError> {
		Err(EnumError::CloneNotSupported { type_name: E::NAME })
	}
}

impl<E> Deref for Element<E> {
	type Target = E;

	fn deref(&self) -> &E {
		&self.value
	}
}

impl<E> PartialEq for Element<E> {
	fn eq(&self, other: &Self) -> bool {
		core::ptr::eq(self, other)
	}
}

impl<E> Eq for Element<E> {}

impl<E> PartialOrd for Element<E> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Orders by ordinal. Distinct instances sharing an ordinal (built by separate
/// registries) are ordered by address, so `Equal` coincides with identity.
impl<E> Ord for Element<E> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.identity
			.ordinal()
			.cmp(&other.identity.ordinal())
			.then_with(|| core::ptr::from_ref(self).cmp(&core::ptr::from_ref(other)))
	}
}

impl<E> Hash for Element<E> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity.hash(state);
	}
}

impl<E> fmt::Display for Element<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.identity.name())
	}
}

impl<E: Enumeration> fmt::Debug for Element<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", E::NAME, self.identity.name())
	}
}

/// Element view that does not know its declaring type statically.
pub trait AnyElement: Any + Send + Sync + fmt::Debug + fmt::Display {
	fn type_tag(&self) -> TypeTag;

	fn name(&self) -> &'static str;

	fn ordinal(&self) -> usize;

	fn as_any(&self) -> &dyn Any;
}

impl<E: Enumeration> AnyElement for Element<E> {
	fn type_tag(&self) -> TypeTag {
		E::tag()
	}

	fn name(&self) -> &'static str {
		self.identity.name()
	}

	fn ordinal(&self) -> usize {
		self.identity.ordinal()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

impl dyn AnyElement {
	/// Returns true if both views point at the same element.
	pub fn is_same(&self, other: &dyn AnyElement) -> bool {
		core::ptr::addr_eq(self, other)
	}

	/// Ordinal comparison, defined only within one declaring type.
	pub fn compare_to(&self, other: &dyn AnyElement) -> Result<Ordering, EnumError> {
		if self.type_tag() != other.type_tag() {
			return Err(EnumError::TypeMismatch {
				expected: self.type_tag().name(),
				actual: other.type_tag().name(),
			});
		}
		Ok(self.ordinal().cmp(&other.ordinal()))
	}

	pub fn downcast_ref<E: Enumeration>(&self) -> Option<&Element<E>> {
		self.as_any().downcast_ref()
	}
}

impl PartialEq for dyn AnyElement {
	fn eq(&self, other: &Self) -> bool {
		self.is_same(other)
	}
}

/// Anything that can be handed to a map as a key.
pub trait AsElement {
	fn as_element(&self) -> &dyn AnyElement;
}

impl<E: Enumeration> AsElement for Element<E> {
	fn as_element(&self) -> &dyn AnyElement {
		self
	}
}

impl<E: Enumeration> AsElement for Arc<Element<E>> {
	fn as_element(&self) -> &dyn AnyElement {
		self.as_ref()
	}
}

impl AsElement for dyn AnyElement {
	fn as_element(&self) -> &dyn AnyElement {
		self
	}
}

impl AsElement for Arc<dyn AnyElement> {
	fn as_element(&self) -> &dyn AnyElement {
		self.as_ref()
	}
}
