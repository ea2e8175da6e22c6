//! Singleton registries.
//!
//! # Mental Model
//!
//! A [`Registry`] owns three caches for one enumeration type: the resolved
//! [`Configuration`], the elements built so far (by name), and the full
//! ordinal-ordered list once every element has been built. Elements are
//! created on first request and never rebuilt while the registry lives.
//!
//! Every type has one process-wide registry, reached through
//! [`Enumeration::registry`]. Tests that need isolation build their own with
//! [`Registry::new`].
//!
//! # Invariants
//!
//! - At most one element per name is ever handed out by a registry. User code
//!   (constructors, hooks) runs outside the lock; when two threads race, the
//!   first inserted element wins and the other is dropped unseen.
//!   - Enforced in: [`Registry::value_of`], [`Registry::values`] (`entry().or_insert`).
//!   - Tested by: `tests::racing_lookups_share_one_instance`
//!   - Failure symptom: two threads hold different instances of one element.
//! - A failed resolution leaves the caches untouched, so the next call retries.
//!   - Tested by: `tests::failed_resolution_is_not_cached`
//! - Once fully loaded, [`Registry::values`] returns the cached list as is.

use core::any::{Any, TypeId};
use std::sync::{Arc, LazyLock};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::element::{ElementRef, ErasedElement};
use crate::enumeration::Enumeration;
use crate::error::EnumError;
use crate::identity::TypeTag;
use crate::resolver::{self, Configuration};

struct State<E: Enumeration> {
	configuration: Option<Arc<Configuration<E>>>,
	instances: FxHashMap<&'static str, ElementRef<E>>,
	loaded: Option<Arc<[ElementRef<E>]>>,
}

impl<E: Enumeration> Default for State<E> {
	fn default() -> Self {
		Self {
			configuration: None,
			instances: FxHashMap::default(),
			loaded: None,
		}
	}
}

/// Element cache of one enumeration type.
pub struct Registry<E: Enumeration> {
	state: Mutex<State<E>>,
}

impl<E: Enumeration> Default for Registry<E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E: Enumeration> Registry<E> {
	/// Creates an empty registry; nothing is resolved until first use.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(State::default()),
		}
	}

	/// Returns the element named `name`, building it on first request.
	pub fn value_of(&self, name: &str) -> Result<ElementRef<E>, EnumError> {
		if let Some(element) = self.state.lock().instances.get(name) {
			return Ok(element.clone());
		}

		let configuration = self.configuration()?;
		let entry = configuration.get(name).ok_or_else(|| EnumError::UnknownElement {
			type_name: E::NAME,
			name: name.to_owned(),
		})?;

		let element = entry.build();
		Ok(self.state.lock().instances.entry(entry.name()).or_insert(element).clone())
	}

	/// Returns every element, ordered by ordinal.
	///
	/// Builds whatever has not been requested yet, then caches the sorted list.
	pub fn values(&self) -> Result<Arc<[ElementRef<E>]>, EnumError> {
		if let Some(all) = &self.state.lock().loaded {
			return Ok(all.clone());
		}

		let configuration = self.configuration()?;
		let missing: Vec<_> = {
			let state = self.state.lock();
			configuration.entries().iter().filter(|entry| !state.instances.contains_key(entry.name())).collect()
		};
		let built: Vec<_> = missing.into_iter().map(|entry| (entry.name(), entry.build())).collect();

		let mut state = self.state.lock();
		for (name, element) in built {
			state.instances.entry(name).or_insert(element);
		}
		if let Some(all) = &state.loaded {
			return Ok(all.clone());
		}

		let mut all: Vec<ElementRef<E>> = state.instances.values().cloned().collect();
		all.sort_by_key(|element| element.ordinal());
		let all: Arc<[ElementRef<E>]> = all.into();
		state.loaded = Some(all.clone());
		tracing::debug!(enumeration = E::NAME, elements = all.len(), "enumeration fully loaded");
		Ok(all)
	}

	/// Returns the resolved configuration, resolving the declaration once.
	pub fn configuration(&self) -> Result<Arc<Configuration<E>>, EnumError> {
		if let Some(configuration) = &self.state.lock().configuration {
			return Ok(configuration.clone());
		}

		let resolved = Arc::new(resolver::resolve(E::declaration())?);
		Ok(self.state.lock().configuration.get_or_insert(resolved).clone())
	}

	/// Returns true once [`Registry::values`] has built every element.
	pub fn is_loaded(&self) -> bool {
		self.state.lock().loaded.is_some()
	}

	/// Returns how many elements have been built so far.
	pub fn realized(&self) -> usize {
		self.state.lock().instances.len()
	}

	/// Drops all three caches.
	pub(crate) fn reset(&self) {
		*self.state.lock() = State::default();
	}
}

/// Registry view that does not know its enumeration type statically.
pub trait ErasedRegistry: Send + Sync {
	fn tag(&self) -> TypeTag;

	/// Full Rust path of the enumeration type, for diagnostics.
	fn type_name(&self) -> &'static str;

	/// Returns every element in ordinal order.
	fn universe(&self) -> Result<Vec<ErasedElement>, EnumError>;

	fn element(&self, name: &str) -> Result<ErasedElement, EnumError>;

	fn reset(&self);
}

impl<E: Enumeration> ErasedRegistry for Registry<E> {
	fn tag(&self) -> TypeTag {
		E::tag()
	}

	fn type_name(&self) -> &'static str {
		core::any::type_name::<E>()
	}

	fn universe(&self) -> Result<Vec<ErasedElement>, EnumError> {
		Ok(self.values()?.iter().map(|element| element.clone() as ErasedElement).collect())
	}

	fn element(&self, name: &str) -> Result<ErasedElement, EnumError> {
		Ok(self.value_of(name)?)
	}

	fn reset(&self) {
		Registry::reset(self);
	}
}

#[derive(Clone, Copy)]
struct GlobalEntry {
	typed: &'static (dyn Any + Send + Sync),
	erased: &'static dyn ErasedRegistry,
}

static REGISTRIES: LazyLock<RwLock<FxHashMap<TypeId, GlobalEntry>>> = LazyLock::new(Default::default);

/// Returns the process-wide registry of `E`, creating it on first use.
pub fn global<E: Enumeration>() -> &'static Registry<E> {
	let key = TypeId::of::<E>();
	let existing = REGISTRIES.read().get(&key).copied();
	let entry = match existing {
		Some(entry) => entry,
		None => *REGISTRIES.write().entry(key).or_insert_with(|| {
			tracing::debug!(enumeration = E::NAME, "creating global registry");
			let registry: &'static Registry<E> = Box::leak(Box::new(Registry::new()));
			GlobalEntry {
				typed: registry,
				erased: registry,
			}
		}),
	};
	match entry.typed.downcast_ref::<Registry<E>>() {
		Some(registry) => registry,
		None => unreachable!("global registry keyed by the TypeId of {}", E::NAME),
	}
}

/// Returns the process-wide registry of `E` as an erased view.
pub fn global_erased<E: Enumeration>() -> &'static dyn ErasedRegistry {
	global::<E>()
}

/// Clears every global registry.
#[cfg(any(test, feature = "test-support"))]
pub(crate) fn reset_all() {
	let entries: Vec<GlobalEntry> = REGISTRIES.read().values().copied().collect();
	tracing::debug!(registries = entries.len(), "clearing enumeration caches");
	for entry in entries {
		entry.erased.reset();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Barrier;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::thread;

	use proptest::prelude::*;

	use super::*;
	use crate::declaration::{Declaration, DeclarationKind};

	static BUILT: AtomicUsize = AtomicUsize::new(0);

	#[derive(Debug)]
	struct Weekday;

	impl Enumeration for Weekday {
		type Args = ();
		const NAME: &'static str = "Weekday";

		fn declaration() -> Declaration<Self> {
			["MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY", "SUNDAY"]
				.into_iter()
				.fold(Declaration::new(DeclarationKind::Final), Declaration::element)
		}

		fn construct((): ()) -> Self {
			BUILT.fetch_add(1, Ordering::Relaxed);
			Weekday
		}
	}

	struct Broken;

	impl Enumeration for Broken {
		type Args = ();
		const NAME: &'static str = "Broken";

		fn declaration() -> Declaration<Self> {
			Declaration::new(DeclarationKind::Open).element("ONLY")
		}

		fn construct((): ()) -> Self {
			Broken
		}
	}

	#[test]
	fn value_of_returns_the_same_instance() {
		let registry = Registry::<Weekday>::new();
		let first = registry.value_of("FRIDAY").unwrap();
		let second = registry.value_of("FRIDAY").unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(first, second);
		assert_ne!(first, registry.value_of("SATURDAY").unwrap());
		assert_eq!(first.ordinal(), 4);
		assert_eq!(registry.realized(), 2);
		assert!(!registry.is_loaded());
	}

	#[test]
	fn unknown_names_fail() {
		let registry = Registry::<Weekday>::new();
		assert_eq!(
			registry.value_of("I_DO_NOT_EXIST").err(),
			Some(EnumError::UnknownElement {
				type_name: "Weekday",
				name: "I_DO_NOT_EXIST".into(),
			})
		);
	}

	#[test]
	fn values_reuse_earlier_lookups() {
		let registry = Registry::<Weekday>::new();
		let saturday = registry.value_of("SATURDAY").unwrap();
		let monday = registry.value_of("MONDAY").unwrap();

		let all = registry.values().unwrap();
		let names: Vec<_> = all.iter().map(|day| day.name()).collect();
		assert_eq!(names, ["MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY", "SUNDAY"]);
		assert!(Arc::ptr_eq(&all[5], &saturday));
		assert!(Arc::ptr_eq(&all[0], &monday));
		assert!(registry.is_loaded());
		assert!(Arc::ptr_eq(&all, &registry.values().unwrap()));
	}

	#[test]
	fn construction_happens_once_per_element() {
		let registry = Registry::<Weekday>::new();
		let before = BUILT.load(Ordering::Relaxed);
		registry.value_of("MONDAY").unwrap();
		registry.values().unwrap();
		registry.values().unwrap();
		registry.value_of("MONDAY").unwrap();
		// Other tests build weekdays concurrently, so only a lower bound holds globally.
		assert!(BUILT.load(Ordering::Relaxed) - before >= 7);
		assert_eq!(registry.realized(), 7);
	}

	#[test]
	fn racing_lookups_share_one_instance() {
		const THREADS: usize = 8;
		let registry = Registry::<Weekday>::new();
		let start = Barrier::new(THREADS);

		let seen: Vec<ElementRef<Weekday>> = thread::scope(|scope| {
			let handles: Vec<_> = (0..THREADS)
				.map(|i| {
					let (registry, start) = (&registry, &start);
					scope.spawn(move || {
						start.wait();
						if i % 2 == 0 {
							registry.value_of("WEDNESDAY").unwrap()
						} else {
							registry.values().unwrap()[2].clone()
						}
					})
				})
				.collect();
			handles.into_iter().map(|handle| handle.join().unwrap()).collect()
		});

		let canonical = registry.value_of("WEDNESDAY").unwrap();
		assert!(seen.iter().all(|day| Arc::ptr_eq(day, &canonical)));
		assert!(Arc::ptr_eq(&registry.values().unwrap()[2], &canonical));
		assert_eq!(registry.realized(), 7);
	}

	#[test]
	fn failed_resolution_is_not_cached() {
		let registry = Registry::<Broken>::new();
		assert!(registry.values().is_err());
		assert!(registry.value_of("ONLY").is_err());
		assert_eq!(registry.realized(), 0);
		assert!(!registry.is_loaded());
	}

	#[test]
	fn reset_rebuilds_elements() {
		let registry = Registry::<Weekday>::new();
		let before = registry.value_of("MONDAY").unwrap();
		registry.reset();
		let after = registry.value_of("MONDAY").unwrap();
		assert!(!Arc::ptr_eq(&before, &after));
		assert_eq!(before.ordinal(), after.ordinal());
	}

	#[test]
	fn erased_view_lists_universe() {
		let registry = Registry::<Weekday>::new();
		let erased: &dyn ErasedRegistry = &registry;
		let universe = erased.universe().unwrap();
		assert_eq!(universe.len(), 7);
		assert_eq!(erased.tag(), Weekday::tag());
		assert!(universe[3].is_same(erased.element("THURSDAY").unwrap().as_ref()));
	}

	#[test]
	fn global_registry_is_shared() {
		assert!(core::ptr::eq(global::<Weekday>(), Weekday::registry()));
	}

	proptest! {
		#[test]
		fn ordinals_are_contiguous_for_any_access_order(order in Just((0..7usize).collect::<Vec<_>>()).prop_shuffle(), take in 0..=7usize) {
			let registry = Registry::<Weekday>::new();
			let configuration = registry.configuration().unwrap();
			let names: Vec<_> = configuration.names().collect();
			for &idx in order.iter().take(take) {
				registry.value_of(names[idx]).unwrap();
			}
			let ordinals: Vec<_> = registry.values().unwrap().iter().map(|day| day.ordinal()).collect();
			prop_assert_eq!(ordinals, (0..7).collect::<Vec<_>>());
		}
	}
}
