// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Emitter;

/// Values that can be unrolled into an emitter of their items.
///
/// Flattening operators accept any `Sequence` as an inner value.
pub trait Sequence {
    /// The unrolled item type.
    type Item;

    /// Turns the value into an emitter of its items.
    fn into_emitter(self) -> Emitter<Self::Item>;
}

impl<T: 'static> Sequence for Emitter<T> {
    type Item = T;

    fn into_emitter(self) -> Emitter<T> {
        self
    }
}

impl<T: Clone + 'static> Sequence for Vec<T> {
    type Item = T;

    fn into_emitter(self) -> Emitter<T> {
        Emitter::from_iter(self)
    }
}

/// A tree of values for depth-limited flattening.
///
/// A `Leaf` is atomic; a `Many` is a sequence that may itself contain
/// sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    /// An atomic value
    Leaf(T),
    /// A sequence of nested values
    Many(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    /// Builds a `Many` of leaves.
    pub fn many(items: impl IntoIterator<Item = T>) -> Self {
        Nested::Many(items.into_iter().map(Nested::Leaf).collect())
    }

    /// Returns `true` for a `Leaf`.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Nested::Leaf(_))
    }
}

impl<T> From<T> for Nested<T> {
    fn from(value: T) -> Self {
        Nested::Leaf(value)
    }
}
