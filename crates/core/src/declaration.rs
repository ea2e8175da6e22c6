//! Element declarations as handed to the resolver.
//!
//! A [`Declaration`] is the raw, unvalidated description of an enumeration:
//! the element names in order, the argument lists attached to them and an
//! optional enumeration hook. Nothing here checks consistency; that is the
//! resolver's job.

use core::any::Any;
use core::marker::PhantomData;

use crate::enumeration::Enumeration;
use crate::error::EnumError;

/// Who may construct values of the declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
	/// Not constructible by outsiders; the only kind accepted with a hook.
	Abstract,
	/// Sealed: no further specialization.
	Final,
	/// Open for outside construction. Always rejected.
	Open,
}

/// Hook producing element instances directly instead of from argument lists.
pub type EnumerateHook = fn(&mut Enumerator) -> Result<(), EnumError>;

/// Unvalidated element declaration of `E`.
pub struct Declaration<E: Enumeration> {
	pub(crate) kind: DeclarationKind,
	pub(crate) elements: Vec<&'static str>,
	pub(crate) constants: Vec<(&'static str, E::Args)>,
	pub(crate) enumerate: Option<EnumerateHook>,
}

impl<E: Enumeration> Declaration<E> {
	/// Starts an empty declaration of the given kind.
	pub fn new(kind: DeclarationKind) -> Self {
		Self {
			kind,
			elements: Vec::new(),
			constants: Vec::new(),
			enumerate: None,
		}
	}

	/// Declares the next element.
	pub fn element(mut self, name: &'static str) -> Self {
		self.elements.push(name);
		self
	}

	/// Attaches constructor arguments to a name.
	///
	/// Arguments for names that are never declared as elements are ignored.
	pub fn constant(mut self, name: &'static str, args: E::Args) -> Self {
		self.constants.push((name, args));
		self
	}

	/// Declares the next element together with its constructor arguments.
	pub fn element_with(self, name: &'static str, args: E::Args) -> Self {
		self.element(name).constant(name, args)
	}

	/// Installs an enumeration hook.
	pub fn enumerate(mut self, hook: EnumerateHook) -> Self {
		self.enumerate = Some(hook);
		self
	}

	pub fn kind(&self) -> DeclarationKind {
		self.kind
	}

	/// Returns the declared element names in order.
	pub fn elements(&self) -> &[&'static str] {
		&self.elements
	}
}

pub(crate) struct Produced {
	pub(crate) key: &'static str,
	pub(crate) value: Box<dyn Any + Send + Sync>,
	pub(crate) type_name: &'static str,
}

/// Collects instances produced by an enumeration hook.
pub struct Enumerator {
	type_name: &'static str,
	pub(crate) produced: Vec<Produced>,
}

impl Enumerator {
	pub(crate) fn new(type_name: &'static str) -> Self {
		Self {
			type_name,
			produced: Vec::new(),
		}
	}

	/// Returns the declaring type name.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Adds an instance under `key`, replacing an earlier one with the same key.
	///
	/// The instance is type checked against the declaring type after the hook
	/// returns.
	pub fn add<V: Any + Send + Sync>(&mut self, key: &'static str, value: V) -> Draft<'_, V> {
		if let Some(pos) = self.produced.iter().position(|p| p.key == key) {
			tracing::warn!(enumeration = self.type_name, key, "enumeration hook replaced an instance");
			self.produced.remove(pos);
		}
		self.produced.push(Produced {
			key,
			value: Box::new(value),
			type_name: core::any::type_name::<V>(),
		});
		Draft {
			type_name: self.type_name,
			_enumerator: PhantomData,
			_value: PhantomData,
		}
	}
}

/// An instance still being enumerated.
///
/// Name and ordinal are only assigned once the hook has returned and the
/// declaration has been validated, so both accessors fail here.
pub struct Draft<'a, V> {
	type_name: &'static str,
	_enumerator: PhantomData<&'a mut Enumerator>,
	_value: PhantomData<fn() -> V>,
}

impl<V> Draft<'_, V> {
	pub fn name(&self) -> Result<&'static str, EnumError> {
		Err(EnumError::NotAllowedDuringEnumerate {
			type_name: self.type_name,
			accessor: "name",
		})
	}

	pub fn ordinal(&self) -> Result<usize, EnumError> {
		Err(EnumError::NotAllowedDuringEnumerate {
			type_name: self.type_name,
			accessor: "ordinal",
		})
	}
}
