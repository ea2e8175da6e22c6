//! The capability every declared enumeration type implements.

use std::sync::Arc;

use crate::declaration::Declaration;
use crate::element::ElementRef;
use crate::error::EnumError;
use crate::identity::TypeTag;
use crate::registry::{self, Registry};

/// How elements of a type may travel through serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Serialization {
	/// Serde serialization of elements fails.
	#[default]
	Forbidden,
	/// Elements serialize as their name and resolve back to the existing singleton.
	ByName,
}

/// A type with a fixed, ordered set of singleton elements.
///
/// Implement it with `#[derive(Enumeration)]`, or by hand when the declaration
/// needs an enumeration hook. Every element is built once per registry from
/// [`Enumeration::construct`] (or taken from the hook) and shared afterwards.
///
/// ```ignore
/// #[derive(Enumeration)]
/// #[enumeration(args = (f64, f64))]
/// #[elements(MERCURY(3.303e+23, 2.4397e6), VENUS(4.869e+24, 6.0518e6))]
/// pub struct Planet {
///     mass: f64,
///     radius: f64,
/// }
///
/// assert_eq!(Planet::VENUS().ordinal(), 1);
/// ```
pub trait Enumeration: Sized + Send + Sync + 'static {
	/// Constructor arguments attached to each element. `Default` stands in
	/// when a declaration attaches none.
	type Args: Clone + Default + Send + Sync + 'static;

	/// Declaring type name used in diagnostics and on the wire.
	const NAME: &'static str;

	/// Serde policy for elements of this type.
	const SERIALIZATION: Serialization = Serialization::Forbidden;

	/// Returns the element declaration. Called once per registry resolution.
	fn declaration() -> Declaration<Self>;

	/// Builds the payload of one element from its declared arguments.
	fn construct(args: Self::Args) -> Self;

	/// Returns the tag identifying this declaring type.
	fn tag() -> TypeTag {
		TypeTag::named::<Self>(Self::NAME)
	}

	/// Returns the process-wide registry of this type.
	fn registry() -> &'static Registry<Self> {
		registry::global::<Self>()
	}

	/// Returns the element with exactly this name.
	fn value_of(name: &str) -> Result<ElementRef<Self>, EnumError> {
		Self::registry().value_of(name)
	}

	/// Returns every element in declaration order.
	fn values() -> Result<Arc<[ElementRef<Self>]>, EnumError> {
		Self::registry().values()
	}
}
