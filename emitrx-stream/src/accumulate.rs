// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{step_fn, Emitter, Handle};
use std::rc::Rc;

/// Extension trait providing the `accumulate` operator.
pub trait AccumulateExt<T>: Sized {
    /// Running fold: emits the updated accumulator for every value.
    ///
    /// Each subscription starts again from `seed`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::AccumulateExt;
    ///
    /// let sums = Emitter::from_iter(vec![1, 2, 3]).accumulate(|acc, v| acc + v, 0);
    /// assert_eq!(sums.collect().try_value().and_then(Result::ok), Some(vec![1, 3, 6]));
    /// ```
    fn accumulate<A, F>(self, f: F, seed: A) -> Emitter<A>
    where
        A: Clone + 'static,
        F: Fn(&A, T) -> A + 'static;
}

impl<T: 'static> AccumulateExt<T> for Emitter<T> {
    fn accumulate<A, F>(self, f: F, seed: A) -> Emitter<A>
    where
        A: Clone + 'static,
        F: Fn(&A, T) -> A + 'static,
    {
        let f = Rc::new(f);
        self.pipe(move || {
            let f = Rc::clone(&f);
            let mut acc = seed.clone();
            step_fn(move |value: T, out: &Handle<A>| {
                acc = f(&acc, value);
                out.next(acc.clone())
            })
        })
    }
}
