//! Ordinal-indexed map keyed by the elements of one enumeration.
//!
//! # Mental Model
//!
//! An [`EnumMap`] captures the full element list of its key type when it is
//! built and allocates one slot per element. Slot `i` belongs to the element
//! with ordinal `i`, so reads, writes and iteration never hash and always run
//! in declaration order, whatever order keys were inserted in.
//!
//! Each slot is unset, set to null, or set to a value. Null mappings are only
//! accepted when the map was built with `allow_null`, and they count towards
//! [`EnumMap::len`] like any other mapping.
//!
//! # Invariants
//!
//! - Keys must belong to the key type exactly; anything else fails with
//!   [`MapError::InvalidKey`] before a slot is touched.
//! - Non-null values must match the declared [`ValueKind`].
//! - `len` equals the number of set slots.
//! - A failed operation leaves the map unchanged.

mod iter;
mod persist;

use core::fmt;
use std::sync::Arc;

pub use self::iter::{Iter, Keys, Values};
use crate::catalog;
use crate::element::{AnyElement, AsElement, ErasedElement};
use crate::enumeration::Enumeration;
use crate::error::MapError;
use crate::identity::TypeTag;
use crate::mask::Slot;
use crate::registry::{self, ErasedRegistry};
use crate::value::{Value, ValueKind};

/// Dense map from the elements of one enumeration to [`Value`]s.
#[derive(Clone)]
pub struct EnumMap {
	key_type: TypeTag,
	value_kind: ValueKind,
	allow_null: bool,
	universe: Arc<[ErasedElement]>,
	slots: Box<[Slot]>,
	len: usize,
}

impl EnumMap {
	/// Builds an empty map keyed by `K`, realizing every element of `K`.
	pub fn new<K: Enumeration>(value_kind: ValueKind, allow_null: bool) -> Result<Self, MapError> {
		Self::with_registry(registry::global_erased::<K>(), value_kind, allow_null)
	}

	/// Builds an empty map over the elements held by `registry`.
	pub fn with_registry(registry: &dyn ErasedRegistry, value_kind: ValueKind, allow_null: bool) -> Result<Self, MapError> {
		let universe: Arc<[ErasedElement]> = registry.universe()?.into();
		let slots = vec![Slot::default(); universe.len()].into_boxed_slice();
		Ok(Self {
			key_type: registry.tag(),
			value_kind,
			allow_null,
			universe,
			slots,
			len: 0,
		})
	}

	/// Builds an empty map from type names, as found in persisted maps.
	///
	/// `key_type` must name a cataloged enumeration and `value_type` a kind
	/// accepted by [`ValueKind::parse`].
	pub fn for_types(key_type: &str, value_type: &str, allow_null: bool) -> Result<Self, MapError> {
		let registry = catalog::lookup_enum(key_type)?.ok_or_else(|| MapError::InvalidKeyType {
			key_type: key_type.to_owned(),
		})?;
		let value_kind = ValueKind::parse(value_type)?;
		Self::with_registry(registry, value_kind, allow_null)
	}

	/// Builds a non-null boolean map with every element of `K` mapped to `state`.
	pub fn with_state<K: Enumeration>(state: bool) -> Result<Self, MapError> {
		let mut map = Self::new::<K>(ValueKind::Bool, false)?;
		for slot in map.slots.iter_mut() {
			slot.replace(Some(Value::Bool(state)));
		}
		map.len = map.slots.len();
		Ok(map)
	}

	pub fn key_type(&self) -> TypeTag {
		self.key_type
	}

	pub fn value_kind(&self) -> ValueKind {
		self.value_kind
	}

	pub fn allows_null(&self) -> bool {
		self.allow_null
	}

	/// Maps `key` to `value` (`None` is null) and returns the previous value.
	///
	/// The previous value is `None` both when the key was unset and when it
	/// was mapped to null; use [`EnumMap::contains_key`] to tell them apart.
	pub fn put<K: AsElement + ?Sized>(&mut self, key: &K, value: Option<Value>) -> Result<Option<Value>, MapError> {
		let key = key.as_element();
		let index = self.index_of(key)?;
		self.check_value(key, value.as_ref())?;
		let (previous, was_set) = self.slots[index].replace(value);
		if !was_set {
			self.len += 1;
		}
		Ok(previous)
	}

	/// Maps `key` to a non-null value.
	pub fn insert<K: AsElement + ?Sized>(&mut self, key: &K, value: impl Into<Value>) -> Result<Option<Value>, MapError> {
		self.put(key, Some(value.into()))
	}

	/// Returns the value mapped to `key`, `None` when unset or null.
	pub fn get<K: AsElement + ?Sized>(&self, key: &K) -> Result<Option<&Value>, MapError> {
		let index = self.index_of(key.as_element())?;
		Ok(self.slots[index].get())
	}

	/// Unsets `key` and returns its previous value.
	pub fn remove<K: AsElement + ?Sized>(&mut self, key: &K) -> Result<Option<Value>, MapError> {
		let index = self.index_of(key.as_element())?;
		let (previous, was_set) = self.slots[index].take();
		if was_set {
			self.len -= 1;
		}
		Ok(previous)
	}

	/// Returns true if `key` is mapped, including to null.
	pub fn contains_key<K: AsElement + ?Sized>(&self, key: &K) -> Result<bool, MapError> {
		let index = self.index_of(key.as_element())?;
		Ok(self.slots[index].is_set())
	}

	/// Returns true if some key maps to `value`. `None` finds null mappings only.
	pub fn contains_value(&self, value: Option<&Value>) -> bool {
		self.slots.iter().any(|slot| slot.holds(value))
	}

	/// Unsets every key.
	pub fn clear(&mut self) {
		self.slots.fill(Slot::default());
		self.len = 0;
	}

	/// Number of mapped keys, null mappings included.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Values of mapped keys in key ordinal order.
	pub fn values(&self) -> Values<'_> {
		Values::new(self)
	}

	/// Mapped keys in ordinal order.
	pub fn keys(&self) -> Keys<'_> {
		Keys::new(self)
	}

	/// `(key, value)` pairs of mapped keys in ordinal order.
	pub fn iter(&self) -> Iter<'_> {
		Iter::new(self)
	}

	fn index_of(&self, key: &dyn AnyElement) -> Result<usize, MapError> {
		let actual = key.type_tag();
		if actual != self.key_type {
			return Err(MapError::InvalidKey {
				expected: self.key_type.name(),
				actual: actual.name(),
			});
		}
		Ok(key.ordinal())
	}

	fn check_value(&self, key: &dyn AnyElement, value: Option<&Value>) -> Result<(), MapError> {
		match value {
			None if !self.allow_null => Err(MapError::NullNotAllowed { key: key.name() }),
			Some(value) if !self.value_kind.accepts(value) => Err(MapError::WrongValueType {
				key: key.name(),
				expected: self.value_kind.name().to_owned(),
				actual: value.kind_name().to_owned(),
			}),
			_ => Ok(()),
		}
	}
}

/// Equal when key type, value kind, null policy and every slot match.
impl PartialEq for EnumMap {
	fn eq(&self, other: &Self) -> bool {
		self.key_type == other.key_type
			&& self.value_kind == other.value_kind
			&& self.allow_null == other.allow_null
			&& self.len == other.len
			&& self.slots == other.slots
	}
}

/// Renders the map signature: `<Planet,string>`, or `<Planet,?string>` when null is allowed.
impl fmt::Display for EnumMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let nullable = if self.allow_null { "?" } else { "" };
		write!(f, "<{},{nullable}{}>", self.key_type, self.value_kind)
	}
}

impl fmt::Debug for EnumMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "EnumMap{self} ")?;
		f.debug_map().entries(self.iter().map(|(key, value)| (key.name(), value))).finish()
	}
}

impl<'a> IntoIterator for &'a EnumMap {
	type Item = (&'a ErasedElement, Option<&'a Value>);
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Iter<'a> {
		self.iter()
	}
}
