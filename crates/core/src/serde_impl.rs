//! serde integration for elements.
//!
//! Elements serialize as their bare name when their type opts into
//! [`Serialization::ByName`]. They never deserialize on their own, since that
//! would mint a second instance; fields holding an [`ElementRef`] go through
//! [`by_name`], which resolves the existing singleton.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::element::{Element, ElementRef};
use crate::enumeration::{Enumeration, Serialization};
use crate::error::EnumError;

impl<E: Enumeration> Serialize for Element<E> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match E::SERIALIZATION {
			Serialization::ByName => serializer.serialize_str(self.name()),
			Serialization::Forbidden => Err(S::Error::custom(EnumError::SerializeNotSupported { type_name: E::NAME })),
		}
	}
}

impl<'de, E: Enumeration> Deserialize<'de> for Element<E> {
	fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
		Err(D::Error::custom(EnumError::DeserializeNotSupported { type_name: E::NAME }))
	}
}

/// `#[serde(with = "ordenum::by_name")]` for [`ElementRef`] fields.
///
/// Writes the element name and reads it back through [`Enumeration::value_of`],
/// whatever the type's [`crate::Serialization`] policy.
pub mod by_name {
	use serde::de::Error as _;
	use serde::{Deserialize, Deserializer, Serializer};

	use crate::element::ElementRef;
	use crate::enumeration::Enumeration;

	pub fn serialize<E: Enumeration, S: Serializer>(element: &ElementRef<E>, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(element.name())
	}

	pub fn deserialize<'de, E: Enumeration, D: Deserializer<'de>>(deserializer: D) -> Result<ElementRef<E>, D::Error> {
		let name = String::deserialize(deserializer)?;
		E::value_of(&name).map_err(D::Error::custom)
	}
}
