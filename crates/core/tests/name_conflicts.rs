//! Two derived enumerations sharing a name must never be confused by name-based lookups.

use ordenum::{EnumError, EnumMap, MapError, ValueKind, WireError, catalog, wire};
use pretty_assertions::assert_eq;

mod traffic {
	use ordenum::Enumeration;

	#[derive(Debug, Default, Enumeration)]
	#[elements(RED, AMBER, GREEN)]
	pub struct Status;
}

mod build {
	use ordenum::Enumeration;

	#[derive(Debug, Default, Enumeration)]
	#[elements(PASSED, FAILED)]
	pub struct Status;
}

mod deploy {
	use ordenum::Enumeration;

	#[derive(Debug, Default, Enumeration)]
	#[enumeration(name = "DeployStatus")]
	#[elements(PENDING, LIVE)]
	pub struct Status;
}

fn assert_ambiguous(err: &EnumError) {
	let EnumError::AmbiguousName { name, types } = err else {
		panic!("expected an ambiguity, got {err:?}");
	};
	assert_eq!(name.as_str(), "Status");
	assert_eq!(types.len(), 2);
	assert!(types.iter().any(|ty| ty.ends_with("traffic::Status")));
	assert!(types.iter().any(|ty| ty.ends_with("build::Status")));
}

#[test]
fn shared_names_do_not_resolve() {
	assert_ambiguous(&catalog::lookup_enum("Status").map(|found| found.map(|registry| registry.tag())).unwrap_err());
	assert_ambiguous(&catalog::lookup_type("Status").unwrap_err());
	assert_ambiguous(&catalog::register_enum::<traffic::Status>().unwrap_err());
	assert_ambiguous(&catalog::ensure_unique::<build::Status>().unwrap_err());
}

#[test]
fn shared_names_fail_element_decoding() {
	let failed = wire::encode(&build::Status::FAILED()).unwrap();

	let Err(WireError::Enum(err)) = wire::decode_any(&failed) else {
		panic!("decoding an ambiguous payload must fail");
	};
	assert_ambiguous(&err);

	let Err(WireError::Enum(err)) = wire::decode::<traffic::Status>(&failed) else {
		panic!("decoding an ambiguous payload must fail");
	};
	assert_ambiguous(&err);
}

#[test]
fn shared_names_fail_map_loading() {
	let mut map = EnumMap::new::<build::Status>(ValueKind::Bool, false).unwrap();
	map.insert(&build::Status::FAILED(), true).unwrap();

	let Err(WireError::Map(MapError::Enum(err))) = EnumMap::from_bytes(&map.to_bytes().unwrap()) else {
		panic!("loading a map keyed by an ambiguous name must fail");
	};
	assert_ambiguous(&err);

	assert!(matches!(
		EnumMap::for_types("Status", "bool", false),
		Err(MapError::Enum(EnumError::AmbiguousName { .. }))
	));
}

#[test]
fn renamed_types_stay_addressable() {
	let live = deploy::Status::LIVE();
	let decoded = wire::decode_any(&wire::encode(&live).unwrap()).unwrap();
	assert!(decoded.is_same(&*live));
	assert_eq!(decoded.type_tag().name(), "DeployStatus");

	let mut map = EnumMap::new::<deploy::Status>(ValueKind::Int, true).unwrap();
	map.insert(&live, 3).unwrap();
	assert_eq!(EnumMap::from_bytes(&map.to_bytes().unwrap()).unwrap(), map);
}
