//! Dynamically typed map values and the kinds a map may be declared with.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog;
use crate::element::ElementRef;
use crate::enumeration::Enumeration;
use crate::error::{EnumError, MapError};
use crate::identity::TypeTag;

/// Shared, type-tagged object. Two objects are equal only if they share the allocation.
#[derive(Clone)]
pub struct Object {
	tag: TypeTag,
	inner: Arc<dyn Any + Send + Sync>,
}

impl Object {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self::from_arc(Arc::new(value))
	}

	pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
		Self {
			tag: TypeTag::of::<T>(),
			inner: value,
		}
	}

	/// Wraps an element so that it is tagged with its declaring enumeration.
	pub fn element<E: Enumeration>(element: ElementRef<E>) -> Self {
		Self {
			tag: E::tag(),
			inner: element,
		}
	}

	pub fn tag(&self) -> TypeTag {
		self.tag
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.downcast_ref()
	}

	/// Returns the wrapped element if this object holds one of `E`.
	pub fn as_element<E: Enumeration>(&self) -> Option<ElementRef<E>> {
		self.inner.clone().downcast::<crate::Element<E>>().ok()
	}
}

impl PartialEq for Object {
	fn eq(&self, other: &Self) -> bool {
		core::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Object({})", self.tag)
	}
}

type CallableFn = dyn Fn(&[Value]) -> Option<Value> + Send + Sync;

/// Shared function value, compared by allocation like [`Object`].
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
	pub fn new(f: impl Fn(&[Value]) -> Option<Value> + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn call(&self, args: &[Value]) -> Option<Value> {
		(self.0)(args)
	}
}

impl PartialEq for Callable {
	fn eq(&self, other: &Self) -> bool {
		core::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
	}
}

impl fmt::Debug for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Callable")
	}
}

/// A value stored in an [`crate::EnumMap`]. Null is represented outside of
/// this type, as `None`.
///
/// Equality is strict: no coercion between kinds, objects and callables by identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Sequence(Vec<Value>),
	Object(Object),
	Callable(Callable),
}

impl Value {
	/// Wraps an element as an object value.
	pub fn element<E: Enumeration>(element: ElementRef<E>) -> Self {
		Self::Object(Object::element(element))
	}

	/// Runtime kind name used in diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Sequence(_) => "array",
			Self::Object(object) => object.tag().name(),
			Self::Callable(_) => "callable",
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(f) => Some(*f),
			_ => None,
		}
	}

	/// Fails for values that only exist in process: objects and callables.
	pub(crate) fn check_serializable(&self) -> Result<(), EnumError> {
		ValueRef::try_from(self).map(drop)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::Sequence(value)
	}
}

impl From<Object> for Value {
	fn from(value: Object) -> Self {
		Self::Object(value)
	}
}

impl From<Callable> for Value {
	fn from(value: Callable) -> Self {
		Self::Callable(value)
	}
}

#[derive(Serialize)]
#[serde(rename = "Value")]
enum ValueRef<'a> {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(&'a str),
	Sequence(Vec<ValueRef<'a>>),
}

#[derive(Deserialize)]
#[serde(rename = "Value")]
enum ValueOwned {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Sequence(Vec<ValueOwned>),
}

impl<'a> TryFrom<&'a Value> for ValueRef<'a> {
	type Error = EnumError;

	fn try_from(value: &'a Value) -> Result<Self, EnumError> {
		Ok(match value {
			Value::Bool(b) => Self::Bool(*b),
			Value::Int(i) => Self::Int(*i),
			Value::Float(f) => Self::Float(*f),
			Value::String(s) => Self::String(s),
			Value::Sequence(items) => Self::Sequence(items.iter().map(ValueRef::try_from).collect::<Result<_, _>>()?),
			Value::Object(object) => {
				return Err(EnumError::SerializeNotSupported {
					type_name: object.tag().name(),
				});
			}
			Value::Callable(_) => return Err(EnumError::SerializeNotSupported { type_name: "callable" }),
		})
	}
}

impl From<ValueOwned> for Value {
	fn from(value: ValueOwned) -> Self {
		match value {
			ValueOwned::Bool(b) => Self::Bool(b),
			ValueOwned::Int(i) => Self::Int(i),
			ValueOwned::Float(f) => Self::Float(f),
			ValueOwned::String(s) => Self::String(s),
			ValueOwned::Sequence(items) => Self::Sequence(items.into_iter().map(Value::from).collect()),
		}
	}
}

/// Objects and callables fail with a custom error naming
/// [`EnumError::SerializeNotSupported`].
impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		ValueRef::try_from(self).map_err(serde::ser::Error::custom)?.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		ValueOwned::deserialize(deserializer).map(Value::from)
	}
}

/// The declared kind of values a map accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Anything.
	Any,
	Bool,
	Int,
	Float,
	String,
	/// Any [`Object`], whatever its tag.
	Object,
	Sequence,
	Callable,
	/// Objects tagged with exactly this type.
	Class(TypeTag),
}

impl ValueKind {
	/// Names accepted by [`ValueKind::parse`] besides catalog class names.
	pub const PRIMITIVE_NAMES: &'static [&'static str] = &[
		"mixed", "any", "bool", "boolean", "int", "integer", "float", "double", "string", "object", "array", "sequence", "callable",
	];

	/// Parses a kind name, falling back to the type catalog for class names.
	pub fn parse(name: &str) -> Result<Self, MapError> {
		let kind = match name {
			"mixed" | "any" => Self::Any,
			"bool" | "boolean" => Self::Bool,
			"int" | "integer" => Self::Int,
			"float" | "double" => Self::Float,
			"string" => Self::String,
			"object" => Self::Object,
			"array" | "sequence" => Self::Sequence,
			"callable" => Self::Callable,
			class => {
				return catalog::lookup_type(class)?.map(Self::Class).ok_or_else(|| MapError::InvalidValueType {
					value_type: class.to_owned(),
				});
			}
		};
		Ok(kind)
	}

	/// Kind whose values are objects tagged with `T`.
	pub fn class<T: 'static>(name: &'static str) -> Self {
		Self::Class(TypeTag::named::<T>(name))
	}

	/// Kind whose values are elements of `E`, wrapped with [`Value::element`].
	pub fn elements_of<E: Enumeration>() -> Self {
		Self::Class(E::tag())
	}

	/// Canonical name; aliases collapse to their first spelling.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Any => "mixed",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::String => "string",
			Self::Object => "object",
			Self::Sequence => "array",
			Self::Callable => "callable",
			Self::Class(tag) => tag.name(),
		}
	}

	pub fn accepts(&self, value: &Value) -> bool {
		match (self, value) {
			(Self::Any, _) => true,
			(Self::Bool, Value::Bool(_))
			| (Self::Int, Value::Int(_))
			| (Self::Float, Value::Float(_))
			| (Self::String, Value::String(_))
			| (Self::Sequence, Value::Sequence(_))
			| (Self::Object, Value::Object(_))
			| (Self::Callable, Value::Callable(_)) => true,
			(Self::Class(tag), Value::Object(object)) => object.tag() == *tag,
			_ => false,
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	struct Moon;

	#[rstest]
	#[case("mixed", ValueKind::Any)]
	#[case("any", ValueKind::Any)]
	#[case("boolean", ValueKind::Bool)]
	#[case("integer", ValueKind::Int)]
	#[case("double", ValueKind::Float)]
	#[case("string", ValueKind::String)]
	#[case("object", ValueKind::Object)]
	#[case("array", ValueKind::Sequence)]
	#[case("callable", ValueKind::Callable)]
	fn parses_primitive_aliases(#[case] name: &str, #[case] kind: ValueKind) {
		assert_eq!(ValueKind::parse(name), Ok(kind));
	}

	#[test]
	fn rejects_unknown_kinds() {
		assert_eq!(
			ValueKind::parse("nonsense"),
			Err(MapError::InvalidValueType {
				value_type: "nonsense".into()
			})
		);
	}

	#[rstest]
	#[case(ValueKind::Any, Value::from("x"), true)]
	#[case(ValueKind::Int, Value::from(1), true)]
	#[case(ValueKind::Int, Value::from(1.0), false)]
	#[case(ValueKind::Float, Value::from(1), false)]
	#[case(ValueKind::String, Value::from(true), false)]
	#[case(ValueKind::Sequence, Value::from(vec![Value::from(1)]), true)]
	#[case(ValueKind::Object, Value::from(Object::new(Moon)), true)]
	#[case(ValueKind::class::<Moon>("Moon"), Value::from(Object::new(Moon)), true)]
	#[case(ValueKind::class::<Moon>("Moon"), Value::from(Object::new(0u8)), false)]
	#[case(ValueKind::Callable, Value::from(Callable::new(|_| None)), true)]
	fn kinds_accept_matching_values(#[case] kind: ValueKind, #[case] value: Value, #[case] accepted: bool) {
		assert_eq!(kind.accepts(&value), accepted);
	}

	#[test]
	fn objects_compare_by_allocation() {
		let moon = Object::new(Moon);
		assert_eq!(moon, moon.clone());
		assert_ne!(moon, Object::new(Moon));

		let double = Callable::new(|args| args.first().and_then(Value::as_int).map(|i| Value::Int(i * 2)));
		assert_eq!(double.call(&[Value::Int(21)]), Some(Value::Int(42)));
		assert_ne!(double, Callable::new(|_| None));
	}

	#[test]
	fn plain_values_serialize() {
		let value = Value::from(vec![Value::from("a"), Value::from(1), Value::from(false)]);
		let json = serde_json::to_string(&value).unwrap();
		assert_eq!(json, r#"{"Sequence":[{"String":"a"},{"Int":1},{"Bool":false}]}"#);
		assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), value);
	}

	#[test]
	fn objects_do_not_serialize() {
		let err = serde_json::to_string(&Value::from(Object::new(Moon))).unwrap_err();
		assert!(err.to_string().contains("Serialize is not supported"));
		assert!(Value::from(Callable::new(|_| None)).check_serializable().is_err());
	}
}
