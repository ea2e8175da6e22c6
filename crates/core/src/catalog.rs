//! Name-based lookup of enumerations and value classes.
//!
//! Derived enumerations submit an [`EnumRegistration`] at link time. Types
//! implemented by hand, and value classes a map should accept by name, are
//! added at runtime with [`register_enum`] and [`register_class`].
//!
//! # Invariants
//!
//! - A name resolves to at most one enumeration type. When two types share a
//!   [`Enumeration::NAME`], every lookup of that name fails with
//!   [`EnumError::AmbiguousName`] instead of picking one of them.
//!   - Enforced in: [`register_enum`], [`lookup_enum`], [`ensure_unique`].
//!   - Tested by: `tests/name_conflicts.rs`.
//!   - Failure symptom: payloads decode against the wrong enumeration.

use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::enumeration::Enumeration;
use crate::error::EnumError;
use crate::identity::TypeTag;
use crate::registry::{self, ErasedRegistry};

/// Link-time registration of one enumeration type.
pub struct EnumRegistration {
	pub name: &'static str,
	pub registry: fn() -> &'static dyn ErasedRegistry,
}

impl EnumRegistration {
	pub const fn of<E: Enumeration>() -> Self {
		Self {
			name: E::NAME,
			registry: registry::global_erased::<E>,
		}
	}
}

inventory::collect!(EnumRegistration);

#[derive(Default)]
struct Catalog {
	enums: FxHashMap<&'static str, fn() -> &'static dyn ErasedRegistry>,
	classes: FxHashMap<&'static str, TypeTag>,
}

static CATALOG: LazyLock<RwLock<Catalog>> = LazyLock::new(Default::default);

/// Every distinct enumeration type registered under `name`.
fn candidates(name: &str) -> Vec<&'static dyn ErasedRegistry> {
	let runtime = CATALOG.read().enums.get(name).copied();
	let linked = inventory::iter::<EnumRegistration>().filter(|reg| reg.name == name).map(|reg| reg.registry);

	let mut found: Vec<&'static dyn ErasedRegistry> = Vec::new();
	for registry in runtime.into_iter().chain(linked).map(|registry| registry()) {
		if !found.iter().any(|known| known.tag() == registry.tag()) {
			found.push(registry);
		}
	}
	found
}

fn ambiguous(name: &str, registries: impl IntoIterator<Item = &'static dyn ErasedRegistry>) -> EnumError {
	let mut types: Vec<_> = registries.into_iter().map(|registry| registry.type_name()).collect();
	types.sort_unstable();
	types.dedup();
	tracing::warn!(enumeration = name, ?types, "enumeration name is claimed by several types");
	EnumError::AmbiguousName {
		name: name.to_owned(),
		types,
	}
}

/// Makes `E` reachable by [`Enumeration::NAME`].
///
/// Fails with [`EnumError::AmbiguousName`] if another type already claims the name.
pub fn register_enum<E: Enumeration>() -> Result<(), EnumError> {
	ensure_unique::<E>()?;
	let previous = CATALOG.write().enums.insert(E::NAME, registry::global_erased::<E>);
	if previous.is_some() {
		tracing::debug!(enumeration = E::NAME, "enumeration registered again");
	}
	Ok(())
}

/// Fails if a type other than `E` is registered under [`Enumeration::NAME`].
pub fn ensure_unique<E: Enumeration>() -> Result<(), EnumError> {
	let found = candidates(E::NAME);
	if found.iter().all(|registry| registry.tag() == E::tag()) {
		return Ok(());
	}
	Err(ambiguous(E::NAME, found.into_iter().chain([registry::global_erased::<E>()])))
}

/// Makes objects tagged with `T` acceptable as the value kind `name`.
pub fn register_class<T: 'static>(name: &'static str) -> TypeTag {
	let tag = TypeTag::named::<T>(name);
	CATALOG.write().classes.insert(name, tag);
	tag
}

/// Returns the global registry of the enumeration called `name`.
pub fn lookup_enum(name: &str) -> Result<Option<&'static dyn ErasedRegistry>, EnumError> {
	let found = candidates(name);
	if found.len() > 1 {
		return Err(ambiguous(name, found));
	}
	Ok(found.first().copied())
}

/// Returns the tag of a registered class or enumeration called `name`.
pub fn lookup_type(name: &str) -> Result<Option<TypeTag>, EnumError> {
	if let Some(tag) = CATALOG.read().classes.get(name) {
		return Ok(Some(*tag));
	}
	Ok(lookup_enum(name)?.map(|registry| registry.tag()))
}

/// Names of every known enumeration, sorted.
pub fn enum_names() -> Vec<&'static str> {
	let mut names: Vec<_> = CATALOG.read().enums.keys().copied().collect();
	names.extend(inventory::iter::<EnumRegistration>().map(|reg| reg.name));
	names.sort_unstable();
	names.dedup();
	names
}
