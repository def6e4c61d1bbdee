// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::FlattenExt;
use emitrx_core::Emitter;

/// Interleaves the values of every input as they are delivered.
///
/// The result completes once every input has completed; the first error from
/// any input fails it.
///
/// # Examples
///
/// ```rust
/// use emitrx_core::Emitter;
/// use emitrx_stream::merge;
///
/// let merged = merge(vec![Emitter::from_iter(vec![1, 2]), Emitter::value(3)]);
/// assert_eq!(merged.collect().try_value().and_then(Result::ok), Some(vec![1, 2, 3]));
/// ```
pub fn merge<T: 'static>(inputs: Vec<Emitter<T>>) -> Emitter<T> {
    Emitter::from_iter(inputs).flatten()
}

/// Extension trait providing the binary `merge_with`.
pub trait MergeExt<T>: Sized {
    /// Interleaves `self` with `other`; see [`merge`].
    fn merge_with(self, other: Emitter<T>) -> Emitter<T>;
}

impl<T: 'static> MergeExt<T> for Emitter<T> {
    fn merge_with(self, other: Emitter<T>) -> Emitter<T> {
        merge(vec![self, other])
    }
}
