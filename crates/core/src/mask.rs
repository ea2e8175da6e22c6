//! Null masking for map slots.
//!
//! A slot is unset, set to null, or set to a value. The outer option records
//! whether the slot is set, the inner one whether the stored value is null, so
//! a null mapping never reads as "absent".

use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Slot(Option<Option<Value>>);

impl Slot {
	pub(crate) fn is_set(&self) -> bool {
		self.0.is_some()
	}

	/// Returns the unmasked value; unset and null both read as `None`.
	pub(crate) fn get(&self) -> Option<&Value> {
		self.0.as_ref().and_then(Option::as_ref)
	}

	/// Returns the masked form, `None` when unset.
	pub(crate) fn masked(&self) -> Option<Option<&Value>> {
		self.0.as_ref().map(Option::as_ref)
	}

	/// Stores `value` and returns the previous unmasked value and whether the slot was set.
	pub(crate) fn replace(&mut self, value: Option<Value>) -> (Option<Value>, bool) {
		unmask(self.0.replace(value))
	}

	/// Unsets the slot and returns the previous unmasked value and whether it was set.
	pub(crate) fn take(&mut self) -> (Option<Value>, bool) {
		unmask(self.0.take())
	}

	/// Compares in masked form: a null needle matches null slots only.
	pub(crate) fn holds(&self, needle: Option<&Value>) -> bool {
		self.masked() == Some(needle)
	}
}

fn unmask(previous: Option<Option<Value>>) -> (Option<Value>, bool) {
	let was_set = previous.is_some();
	(previous.flatten(), was_set)
}
