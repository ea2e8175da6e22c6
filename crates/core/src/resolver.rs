//! Declaration validation and configuration building.
//!
//! # Rules
//!
//! A declaration resolves only if all of these hold, checked in order:
//!
//! 1. The kind is [`DeclarationKind::Final`] or [`DeclarationKind::Abstract`],
//!    and strictly `Abstract` when an enumeration hook is present.
//! 2. Every element name is an identifier (`[A-Za-z_][A-Za-z0-9_]*`) and no
//!    name is declared twice.
//! 3. Either every element has an argument list or none has.
//! 4. With a hook: every produced instance is an `E`, and the produced keys
//!    equal the declared names.
//!
//! The resulting [`Configuration`] assigns ordinals in declaration order.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::declaration::{Declaration, DeclarationKind, Enumerator};
use crate::element::{Element, ElementRef};
use crate::enumeration::Enumeration;
use crate::error::{DeclarationFault, EnumError};
use crate::identity::Identity;

/// How an element is obtained once it is first requested.
pub enum Blueprint<E: Enumeration> {
	/// Build through [`Enumeration::construct`].
	Arguments(E::Args),
	/// Already built by the enumeration hook.
	Instance(ElementRef<E>),
}

/// One resolved element: name, ordinal and blueprint.
pub struct ConfigEntry<E: Enumeration> {
	identity: Identity,
	blueprint: Blueprint<E>,
}

impl<E: Enumeration> ConfigEntry<E> {
	pub fn name(&self) -> &'static str {
		self.identity.name()
	}

	pub fn ordinal(&self) -> usize {
		self.identity.ordinal()
	}

	/// Returns the constructor arguments, if the element is built from them.
	pub fn arguments(&self) -> Option<&E::Args> {
		match &self.blueprint {
			Blueprint::Arguments(args) => Some(args),
			Blueprint::Instance(_) => None,
		}
	}

	pub(crate) fn build(&self) -> ElementRef<E> {
		match &self.blueprint {
			Blueprint::Arguments(args) => {
				tracing::trace!(enumeration = E::NAME, element = self.name(), "constructing element");
				Arc::new(Element::new(self.identity, E::construct(args.clone())))
			}
			Blueprint::Instance(element) => element.clone(),
		}
	}
}

/// Validated, ordered element table of `E`.
pub struct Configuration<E: Enumeration> {
	entries: Vec<ConfigEntry<E>>,
	by_name: FxHashMap<&'static str, usize>,
}

impl<E: Enumeration> Configuration<E> {
	pub fn get(&self, name: &str) -> Option<&ConfigEntry<E>> {
		self.by_name.get(name).map(|&idx| &self.entries[idx])
	}

	/// Returns entries in ordinal order.
	pub fn entries(&self) -> &[ConfigEntry<E>] {
		&self.entries
	}

	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.entries.iter().map(ConfigEntry::name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Validates `declaration` and builds the configuration of `E`.
pub fn resolve<E: Enumeration>(declaration: Declaration<E>) -> Result<Configuration<E>, EnumError> {
	let Declaration {
		kind,
		elements,
		constants,
		enumerate,
	} = declaration;

	check_kind::<E>(kind, enumerate.is_some())?;
	check_names::<E>(&elements)?;

	let mut constants: FxHashMap<&'static str, E::Args> = constants.into_iter().collect();
	let missing: Vec<&'static str> = elements.iter().copied().filter(|name| !constants.contains_key(name)).collect();
	if !missing.is_empty() && missing.len() != elements.len() {
		return Err(EnumError::MissingConstants {
			type_name: E::NAME,
			missing,
		});
	}
	let ignored = constants.keys().filter(|name| !elements.contains(*name)).count();
	if ignored > 0 {
		tracing::debug!(enumeration = E::NAME, ignored, "ignoring argument lists of undeclared names");
	}

	let mut produced = match enumerate {
		Some(hook) => Some(run_hook::<E>(hook, &elements)?),
		None => None,
	};

	let mut entries = Vec::with_capacity(elements.len());
	let mut by_name = FxHashMap::default();
	for (ordinal, name) in elements.into_iter().enumerate() {
		let identity = Identity::new(name, ordinal);
		let blueprint = match produced.as_mut().and_then(|p| p.remove(name)) {
			Some(value) => Blueprint::Instance(Arc::new(Element::new(identity, value))),
			None => Blueprint::Arguments(constants.remove(name).unwrap_or_default()),
		};
		by_name.insert(name, ordinal);
		entries.push(ConfigEntry { identity, blueprint });
	}

	tracing::debug!(enumeration = E::NAME, elements = entries.len(), "resolved enumeration");
	Ok(Configuration { entries, by_name })
}

fn check_kind<E: Enumeration>(kind: DeclarationKind, has_hook: bool) -> Result<(), EnumError> {
	let reason = match (kind, has_hook) {
		(DeclarationKind::Abstract, _) | (DeclarationKind::Final, false) => return Ok(()),
		(DeclarationKind::Final | DeclarationKind::Open, true) => DeclarationFault::NotAbstract,
		(DeclarationKind::Open, false) => DeclarationFault::NotAbstractOrFinal,
	};
	Err(EnumError::InvalidDeclaration {
		type_name: E::NAME,
		reason,
	})
}

fn check_names<E: Enumeration>(elements: &[&'static str]) -> Result<(), EnumError> {
	let mut seen = FxHashSet::default();
	for &name in elements {
		if !is_identifier(name) {
			return Err(EnumError::InvalidElementName {
				type_name: E::NAME,
				name,
			});
		}
		if !seen.insert(name) {
			return Err(EnumError::InvalidDeclaration {
				type_name: E::NAME,
				reason: DeclarationFault::DuplicateElement(name),
			});
		}
	}
	Ok(())
}

/// Matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
		_ => false,
	}
}

fn run_hook<E: Enumeration>(
	hook: crate::declaration::EnumerateHook,
	elements: &[&'static str],
) -> Result<FxHashMap<&'static str, E>, EnumError> {
	let mut enumerator = Enumerator::new(E::NAME);
	hook(&mut enumerator)?;

	let mut produced = FxHashMap::default();
	for item in enumerator.produced {
		let value = item.value.downcast::<E>().map_err(|_| EnumError::InvalidInstance {
			type_name: E::NAME,
			key: item.key,
			actual: item.type_name,
		})?;
		produced.insert(item.key, *value);
	}

	let undeclared: Vec<&'static str> = {
		let mut keys: Vec<_> = produced.keys().copied().filter(|key| !elements.contains(key)).collect();
		keys.sort_unstable();
		keys
	};
	if !undeclared.is_empty() {
		return Err(EnumError::MissingElementsInDeclaration {
			type_name: E::NAME,
			names: undeclared,
		});
	}

	let unproduced: Vec<&'static str> = elements.iter().copied().filter(|name| !produced.contains_key(name)).collect();
	if !unproduced.is_empty() {
		return Err(EnumError::MissingKeysInEnumeration {
			type_name: E::NAME,
			names: unproduced,
		});
	}

	Ok(produced)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[derive(Debug, Default, PartialEq)]
	struct Direction(&'static str);

	impl Enumeration for Direction {
		type Args = (&'static str,);
		const NAME: &'static str = "Direction";

		fn declaration() -> Declaration<Self> {
			Declaration::new(DeclarationKind::Final)
				.element_with("LEFT", ("west",))
				.element_with("RIGHT", ("east",))
		}

		fn construct((heading,): Self::Args) -> Self {
			Direction(heading)
		}
	}

	fn hook_pair(enumerator: &mut Enumerator) -> Result<(), EnumError> {
		enumerator.add("LEFT", Direction("west"));
		enumerator.add("RIGHT", Direction("east"));
		Ok(())
	}

	#[test]
	fn ordinals_follow_declaration_order() {
		let config = resolve(Direction::declaration()).unwrap();
		let names: Vec<_> = config.names().collect();
		assert_eq!(names, ["LEFT", "RIGHT"]);
		assert_eq!(config.get("RIGHT").map(ConfigEntry::ordinal), Some(1));
		assert_eq!(config.get("RIGHT").and_then(|e| e.arguments()), Some(&("east",)));
		assert!(config.get("UP").is_none());
	}

	#[rstest]
	#[case::final_without_hook(DeclarationKind::Final, false, None)]
	#[case::abstract_without_hook(DeclarationKind::Abstract, false, None)]
	#[case::abstract_with_hook(DeclarationKind::Abstract, true, None)]
	#[case::open(DeclarationKind::Open, false, Some(DeclarationFault::NotAbstractOrFinal))]
	#[case::final_with_hook(DeclarationKind::Final, true, Some(DeclarationFault::NotAbstract))]
	fn kind_rules(#[case] kind: DeclarationKind, #[case] with_hook: bool, #[case] fault: Option<DeclarationFault>) {
		let mut declaration = Declaration::<Direction>::new(kind).element("LEFT").element("RIGHT");
		if with_hook {
			declaration = declaration.enumerate(hook_pair);
		}
		let result = resolve(declaration).map(|c| c.len());
		match fault {
			None => assert_eq!(result, Ok(2)),
			Some(reason) => assert_eq!(
				result,
				Err(EnumError::InvalidDeclaration {
					type_name: "Direction",
					reason,
				})
			),
		}
	}

	#[rstest]
	#[case("INVA LID")]
	#[case("1ST")]
	#[case("")]
	#[case("ÉLAN")]
	fn rejects_non_identifiers(#[case] name: &'static str) {
		let declaration = Declaration::<Direction>::new(DeclarationKind::Final).element("LEFT").element(name);
		assert_eq!(
			resolve(declaration).err(),
			Some(EnumError::InvalidElementName {
				type_name: "Direction",
				name,
			})
		);
	}

	#[test]
	fn accepts_identifiers() {
		for name in ["A", "_", "_private", "ELEMENT_B2", "camelCase"] {
			assert!(is_identifier(name), "{name}");
		}
	}

	#[test]
	fn rejects_duplicates() {
		let declaration = Declaration::<Direction>::new(DeclarationKind::Final).element("LEFT").element("LEFT");
		assert!(matches!(
			resolve(declaration),
			Err(EnumError::InvalidDeclaration {
				reason: DeclarationFault::DuplicateElement("LEFT"),
				..
			})
		));
	}

	#[test]
	fn partial_constants_name_the_missing() {
		let declaration = Declaration::<Direction>::new(DeclarationKind::Final)
			.element_with("LEFT", ("west",))
			.element("RIGHT")
			.element("UP");
		assert_eq!(
			resolve(declaration).err(),
			Some(EnumError::MissingConstants {
				type_name: "Direction",
				missing: vec!["RIGHT", "UP"],
			})
		);
	}

	#[test]
	fn no_constants_fall_back_to_default_arguments() {
		let declaration = Declaration::<Direction>::new(DeclarationKind::Final)
			.element("LEFT")
			.constant("UNRELATED", ("nowhere",));
		let config = resolve(declaration).unwrap();
		assert_eq!(config.get("LEFT").and_then(|e| e.arguments()), Some(&("",)));
		assert_eq!(config.get("LEFT").map(|e| e.build().value().0), Some(""));
	}

	#[test]
	fn hook_instances_become_elements() {
		let declaration = Declaration::<Direction>::new(DeclarationKind::Abstract)
			.element("LEFT")
			.element("RIGHT")
			.enumerate(hook_pair);
		let config = resolve(declaration).unwrap();
		let right = config.get("RIGHT").unwrap();
		assert!(right.arguments().is_none());
		let built = right.build();
		assert_eq!(built.value(), &Direction("east"));
		assert_eq!(built.ordinal(), 1);
		assert_eq!(built, right.build());
	}

	#[test]
	fn hook_missing_key() {
		fn only_left(enumerator: &mut Enumerator) -> Result<(), EnumError> {
			enumerator.add("LEFT", Direction("west"));
			Ok(())
		}
		let declaration = Declaration::<Direction>::new(DeclarationKind::Abstract)
			.element("LEFT")
			.element("RIGHT")
			.enumerate(only_left);
		assert_eq!(
			resolve(declaration).err(),
			Some(EnumError::MissingKeysInEnumeration {
				type_name: "Direction",
				names: vec!["RIGHT"],
			})
		);
	}

	#[test]
	fn hook_undeclared_key() {
		fn extra(enumerator: &mut Enumerator) -> Result<(), EnumError> {
			hook_pair(enumerator)?;
			enumerator.add("UNDEFINED_ELEMENT", Direction("up"));
			Ok(())
		}
		let declaration = Declaration::<Direction>::new(DeclarationKind::Abstract)
			.element("LEFT")
			.element("RIGHT")
			.enumerate(extra);
		assert_eq!(
			resolve(declaration).err(),
			Some(EnumError::MissingElementsInDeclaration {
				type_name: "Direction",
				names: vec!["UNDEFINED_ELEMENT"],
			})
		);
	}

	#[test]
	fn hook_wrong_instance() {
		fn wrong(enumerator: &mut Enumerator) -> Result<(), EnumError> {
			enumerator.add("LEFT", Direction("west"));
			enumerator.add("RIGHT", "east");
			Ok(())
		}
		let declaration = Declaration::<Direction>::new(DeclarationKind::Abstract)
			.element("LEFT")
			.element("RIGHT")
			.enumerate(wrong);
		assert_eq!(
			resolve(declaration).err(),
			Some(EnumError::InvalidInstance {
				type_name: "Direction",
				key: "RIGHT",
				actual: "&str",
			})
		);
	}

	#[test]
	fn identity_accessors_fail_inside_hook() {
		fn peek(enumerator: &mut Enumerator) -> Result<(), EnumError> {
			let draft = enumerator.add("LEFT", Direction("west"));
			draft.ordinal()?;
			Ok(())
		}
		let declaration = Declaration::<Direction>::new(DeclarationKind::Abstract).element("LEFT").enumerate(peek);
		assert_eq!(
			resolve(declaration).err(),
			Some(EnumError::NotAllowedDuringEnumerate {
				type_name: "Direction",
				accessor: "ordinal",
			})
		);
	}
}
