//! Map persistence.
//!
//! A persisted map is its signature (key type name, value kind name, null
//! policy) plus the mapped `(ordinal, value)` pairs. Loading rebuilds the map
//! through [`EnumMap::for_types`] and replays every pair through
//! [`EnumMap::put`], so the usual key and value checks apply to stored data.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::EnumMap;
use crate::error::{MapError, WireError};
use crate::value::Value;
use crate::wire;

#[derive(Serialize, Deserialize)]
struct MapRecord<S, V> {
	key_type: S,
	value_kind: S,
	allow_null: bool,
	entries: Vec<(usize, Option<V>)>,
}

impl EnumMap {
	fn record(&self) -> MapRecord<&'static str, &Value> {
		MapRecord {
			key_type: self.key_type.name(),
			value_kind: self.value_kind.name(),
			allow_null: self.allow_null,
			entries: self
				.slots
				.iter()
				.enumerate()
				.filter_map(|(ordinal, slot)| slot.masked().map(|value| (ordinal, value)))
				.collect(),
		}
	}

	fn from_record(record: MapRecord<String, Value>) -> Result<Self, MapError> {
		let mut map = Self::for_types(&record.key_type, &record.value_kind, record.allow_null)?;
		for (ordinal, value) in record.entries {
			let Some(key) = map.universe.get(ordinal).cloned() else {
				tracing::warn!(key_type = %map.key_type, ordinal, "dropping persisted entry past the last element");
				continue;
			};
			map.put(&key, value)?;
		}
		Ok(map)
	}

	/// Encodes the map with the same header as [`wire::encode`].
	///
	/// Fails with [`crate::EnumError::SerializeNotSupported`] if any value is an
	/// object or a callable.
	pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
		for value in self.values().flatten() {
			value.check_serializable()?;
		}
		wire::seal(&self.record())
	}

	/// Decodes a map written by [`EnumMap::to_bytes`].
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
		let record: MapRecord<String, Value> = postcard::from_bytes(wire::open(bytes)?)?;
		Ok(Self::from_record(record)?)
	}
}

impl Serialize for EnumMap {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		for value in self.values().flatten() {
			value.check_serializable().map_err(S::Error::custom)?;
		}
		self.record().serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for EnumMap {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let record = MapRecord::<String, Value>::deserialize(deserializer)?;
		Self::from_record(record).map_err(D::Error::custom)
	}
}
