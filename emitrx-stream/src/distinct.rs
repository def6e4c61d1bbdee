// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{step_fn, Emitter, Flow, Handle};

/// Extension trait providing the `distinct` operator.
pub trait DistinctExt<T>: Sized {
    /// Drops a value equal to the one forwarded just before it.
    ///
    /// # Behavior
    ///
    /// - The first value is always forwarded
    /// - Only consecutive duplicates are dropped; `1, 2, 1` passes unchanged
    /// - Errors are propagated immediately
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::DistinctExt;
    ///
    /// let changes = Emitter::from_iter(vec![1, 1, 2, 2, 2, 3, 2]).distinct();
    /// assert_eq!(changes.collect().try_value().and_then(Result::ok), Some(vec![1, 2, 3, 2]));
    /// ```
    fn distinct(self) -> Emitter<T>;
}

impl<T: PartialEq + Clone + 'static> DistinctExt<T> for Emitter<T> {
    fn distinct(self) -> Emitter<T> {
        self.pipe(|| {
            let mut last: Option<T> = None;
            step_fn(move |value: T, out: &Handle<T>| {
                if last.as_ref() == Some(&value) {
                    return Ok(Flow::Continue);
                }
                last = Some(value.clone());
                out.next(value)
            })
        })
    }
}
