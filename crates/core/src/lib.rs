//! Declared enumerations with singleton elements, and maps keyed by them.
//!
//! An enumeration is a Rust type with a fixed, ordered list of named
//! elements. Each element is built once, shared as an [`ElementRef`], and
//! compared by identity. Its ordinal is its position in the declaration.
//!
//! # Modules
//!
//! - [`declaration`] / [`resolver`] - Element lists and their validation
//! - [`registry`] - Per-type singleton caches
//! - [`element`] - Elements and their type-erased view
//! - [`map`] - [`EnumMap`], the ordinal-indexed map
//! - [`value`] - Values and value kinds stored in maps
//! - [`catalog`] - Lookup of enumerations and value classes by name
//! - [`wire`] - Binary element codec
//!
//! # Declaring an enumeration
//!
//! ```ignore
//! use ordenum::Enumeration;
//!
//! #[derive(Enumeration)]
//! #[elements(MONDAY, TUESDAY, WEDNESDAY, THURSDAY, FRIDAY, SATURDAY, SUNDAY)]
//! #[derive(Default)]
//! pub struct WeekDay;
//!
//! let friday = WeekDay::FRIDAY();
//! assert_eq!(friday.ordinal(), 4);
//! assert!(std::sync::Arc::ptr_eq(&friday, &WeekDay::value_of("FRIDAY")?));
//! ```

extern crate self as ordenum;

pub mod catalog;
pub mod declaration;
pub mod element;
pub mod enumeration;
pub mod error;
pub mod identity;
pub mod map;
mod mask;
pub mod registry;
pub mod resolver;
mod serde_impl;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod value;
pub mod wire;

pub use declaration::{Declaration, DeclarationKind, Draft, EnumerateHook, Enumerator};
pub use element::{AnyElement, AsElement, Element, ElementRef, ErasedElement};
pub use enumeration::{Enumeration, Serialization};
pub use error::{DeclarationFault, EnumError, MapError, WireError};
pub use identity::{Identity, TypeTag};
pub use map::EnumMap;
pub use ordenum_macros::Enumeration;
pub use registry::{ErasedRegistry, Registry};
pub use serde_impl::by_name;
pub use value::{Callable, Object, Value, ValueKind};

/// Support for code generated by `#[derive(Enumeration)]`.
#[doc(hidden)]
pub mod __private {
	pub use inventory;

	use crate::{ElementRef, Enumeration};

	/// Looks up an element whose declaration was validated at compile time.
	///
	/// # Panics
	///
	/// Panics if the element cannot be resolved, which only happens when a
	/// derived type also overrides its declaration by hand.
	#[track_caller]
	pub fn declared<E: Enumeration>(name: &'static str) -> ElementRef<E> {
		match E::value_of(name) {
			Ok(element) => element,
			Err(err) => panic!("derived enumeration {} failed to resolve {name}: {err}", E::NAME),
		}
	}
}
