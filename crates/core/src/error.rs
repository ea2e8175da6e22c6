//! Error types for declarations, lookups, maps and the wire codec.

use core::fmt;

/// Why a declaration was rejected as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFault {
	/// The type is open for outside construction.
	NotAbstractOrFinal,
	/// The type declares an enumeration hook but is not abstract.
	NotAbstract,
	/// The same element name is declared twice.
	DuplicateElement(&'static str),
}

impl fmt::Display for DeclarationFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotAbstractOrFinal => f.write_str("must be declared abstract or final"),
			Self::NotAbstract => f.write_str("must be declared abstract"),
			Self::DuplicateElement(name) => write!(f, "declares element \"{name}\" more than once"),
		}
	}
}

/// Errors raised by enumeration declarations and element lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumError {
	#[error("Enum {type_name} {reason}.")]
	InvalidDeclaration {
		type_name: &'static str,
		reason: DeclarationFault,
	},

	#[error("Element name \"{name}\" in {type_name} does not match pattern /^[a-zA-Z_][a-zA-Z_0-9]*$/.")]
	InvalidElementName { type_name: &'static str, name: &'static str },

	#[error(
		"All enum {type_name} element constants must be declared, {} are missing.",
		quoted_list(.missing)
	)]
	MissingConstants {
		type_name: &'static str,
		missing: Vec<&'static str>,
	},

	#[error("Enum {type_name} is missing element declaration(s) for [{}] produced by its enumeration hook.", .names.join(", "))]
	MissingElementsInDeclaration {
		type_name: &'static str,
		names: Vec<&'static str>,
	},

	#[error("Enum {type_name} is missing key(s) [{}] in its enumeration hook.", .names.join(", "))]
	MissingKeysInEnumeration {
		type_name: &'static str,
		names: Vec<&'static str>,
	},

	#[error("Key \"{key}\" in {type_name}'s enumeration hook must contain an instance of {type_name}, got an instance of {actual}.")]
	InvalidInstance {
		type_name: &'static str,
		key: &'static str,
		actual: &'static str,
	},

	#[error("Enum {type_name} does not have an element \"{name}\".")]
	UnknownElement { type_name: &'static str, name: String },

	#[error("Enum name \"{name}\" is claimed by several types: [{}]. Give each a distinct #[enumeration(name = \"..\")].", .types.join(", "))]
	AmbiguousName { name: String, types: Vec<&'static str> },

	#[error("Cannot call {accessor}() within {type_name}'s enumeration hook.")]
	NotAllowedDuringEnumerate {
		type_name: &'static str,
		accessor: &'static str,
	},

	#[error("Cannot compare an element of {actual} with an element of {expected}.")]
	TypeMismatch {
		expected: &'static str,
		actual: &'static str,
	},

	#[error("Clone is not supported for {type_name}")]
	CloneNotSupported { type_name: &'static str },

	#[error("Serialize is not supported for {type_name}")]
	SerializeNotSupported { type_name: &'static str },

	#[error("Deserialize is not supported for {type_name}")]
	DeserializeNotSupported { type_name: &'static str },
}

/// Errors raised while building or mutating an [`crate::EnumMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
	#[error("Invalid keyType, must be the name of a type implementing Enumeration, got \"{key_type}\"")]
	InvalidKeyType { key_type: String },

	#[error("Invalid valueType, expected one of [{}] or a registered class, got \"{value_type}\"", crate::value::ValueKind::PRIMITIVE_NAMES.join(","))]
	InvalidValueType { value_type: String },

	#[error("Expected an instance of {expected}, got {actual}")]
	InvalidKey {
		expected: &'static str,
		actual: &'static str,
	},

	#[error("Null not allowed, got null for key {key}")]
	NullNotAllowed { key: &'static str },

	#[error("Expected a value of type {expected} for key {key}, got {actual}")]
	WrongValueType {
		key: &'static str,
		expected: String,
		actual: String,
	},

	#[error(transparent)]
	Enum(#[from] EnumError),
}

/// Errors raised by the binary element and map codec.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
	#[error("payload does not start with the ordenum header")]
	BadMagic,

	#[error("payload ends inside the header")]
	Truncated,

	#[error("unsupported schema version {0}")]
	UnsupportedVersion(u32),

	#[error("malformed payload: {0}")]
	Malformed(#[from] postcard::Error),

	#[error("expected an element of {expected}, payload holds one of {actual}")]
	TypeMismatch { expected: &'static str, actual: String },

	#[error("no enumeration named \"{0}\" is registered")]
	UnknownType(String),

	#[error(transparent)]
	Enum(#[from] EnumError),

	#[error(transparent)]
	Map(#[from] MapError),
}

fn quoted_list(names: &[&str]) -> String {
	let quoted: Vec<String> = names.iter().map(|name| format!("\"{name}\"")).collect();
	match quoted.split_last() {
		None => String::new(),
		Some((last, [])) => last.clone(),
		Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
	}
}
