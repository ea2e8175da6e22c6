//! Binary codec for elements.
//!
//! A payload is the header (magic bytes, then the schema version as a
//! little-endian `u32`) followed by a postcard record of the declaring type
//! name and the element name. Nothing else travels: decoding resolves the
//! singleton already held by the registry.

use std::mem::size_of;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::element::{AsElement, ElementRef, ErasedElement};
use crate::enumeration::Enumeration;
use crate::error::WireError;
use crate::registry::Registry;

/// Magic bytes identifying an ordenum payload.
pub const MAGIC: &[u8; 8] = b"ORDENUM\0";

/// Schema version for payload compatibility.
pub const SCHEMA_VERSION: u32 = 1;

/// Total header size in bytes (magic + version).
pub const HEADER_SIZE: usize = MAGIC.len() + size_of::<u32>();

#[derive(Serialize, Deserialize)]
struct ElementRecord<'a> {
	type_name: &'a str,
	name: &'a str,
}

/// Encodes an element as its type name and element name.
pub fn encode<K: AsElement + ?Sized>(element: &K) -> Result<Vec<u8>, WireError> {
	let element = element.as_element();
	seal(&ElementRecord {
		type_name: element.type_tag().name(),
		name: element.name(),
	})
}

/// Decodes an element of `E` against the global registry.
pub fn decode<E: Enumeration>(bytes: &[u8]) -> Result<ElementRef<E>, WireError> {
	decode_in(bytes, E::registry())
}

/// Decodes an element of `E` against `registry`.
///
/// The payload only carries [`Enumeration::NAME`], so decoding fails with
/// [`crate::EnumError::AmbiguousName`] while another cataloged type shares it.
pub fn decode_in<E: Enumeration>(bytes: &[u8], registry: &Registry<E>) -> Result<ElementRef<E>, WireError> {
	let record: ElementRecord<'_> = postcard::from_bytes(open(bytes)?)?;
	if record.type_name != E::NAME {
		return Err(WireError::TypeMismatch {
			expected: E::NAME,
			actual: record.type_name.to_owned(),
		});
	}
	catalog::ensure_unique::<E>()?;
	Ok(registry.value_of(record.name)?)
}

/// Decodes an element of whatever enumeration the payload names.
pub fn decode_any(bytes: &[u8]) -> Result<ErasedElement, WireError> {
	let record: ElementRecord<'_> = postcard::from_bytes(open(bytes)?)?;
	let registry = catalog::lookup_enum(record.type_name)?.ok_or_else(|| WireError::UnknownType(record.type_name.to_owned()))?;
	Ok(registry.element(record.name)?)
}

/// Prefixes the postcard encoding of `record` with the header.
pub(crate) fn seal<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>, WireError> {
	let mut out = Vec::with_capacity(HEADER_SIZE + 32);
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
	out.extend_from_slice(&postcard::to_stdvec(record)?);
	Ok(out)
}

/// Validates the header and returns the postcard body.
pub(crate) fn open(data: &[u8]) -> Result<&[u8], WireError> {
	let Some((magic, rest)) = data.split_first_chunk::<8>() else {
		return Err(WireError::BadMagic);
	};
	if magic != MAGIC {
		return Err(WireError::BadMagic);
	}
	let Some((version, body)) = rest.split_first_chunk::<4>() else {
		return Err(WireError::Truncated);
	};
	match u32::from_le_bytes(*version) {
		SCHEMA_VERSION => Ok(body),
		other => Err(WireError::UnsupportedVersion(other)),
	}
}
