use core::iter::Zip;
use core::slice;

use super::EnumMap;
use crate::element::ErasedElement;
use crate::mask::Slot;
use crate::value::Value;

/// Iterator over the mapped `(key, value)` pairs of an [`EnumMap`], in ordinal order.
pub struct Iter<'a> {
	inner: Zip<slice::Iter<'a, ErasedElement>, slice::Iter<'a, Slot>>,
	remaining: usize,
}

impl<'a> Iter<'a> {
	pub(super) fn new(map: &'a EnumMap) -> Self {
		Self {
			inner: map.universe.iter().zip(map.slots.iter()),
			remaining: map.len,
		}
	}
}

impl<'a> Iterator for Iter<'a> {
	type Item = (&'a ErasedElement, Option<&'a Value>);

	fn next(&mut self) -> Option<Self::Item> {
		let (key, slot) = self.inner.by_ref().find(|(_, slot)| slot.is_set())?;
		self.remaining -= 1;
		Some((key, slot.get()))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl ExactSizeIterator for Iter<'_> {}

/// Mapped keys of an [`EnumMap`], in ordinal order.
pub struct Keys<'a>(Iter<'a>);

impl<'a> Keys<'a> {
	pub(super) fn new(map: &'a EnumMap) -> Self {
		Self(Iter::new(map))
	}
}

impl<'a> Iterator for Keys<'a> {
	type Item = &'a ErasedElement;

	fn next(&mut self) -> Option<Self::Item> {
		self.0.next().map(|(key, _)| key)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}

impl ExactSizeIterator for Keys<'_> {}

/// Values of the mapped keys of an [`EnumMap`], in key ordinal order. Null
/// mappings yield `None`.
pub struct Values<'a>(Iter<'a>);

impl<'a> Values<'a> {
	pub(super) fn new(map: &'a EnumMap) -> Self {
		Self(Iter::new(map))
	}
}

impl<'a> Iterator for Values<'a> {
	type Item = Option<&'a Value>;

	fn next(&mut self) -> Option<Self::Item> {
		self.0.next().map(|(_, value)| value)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}

impl ExactSizeIterator for Values<'_> {}
