// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{step_fn, Emitter, Handle, Result};
use std::rc::Rc;

/// Extension trait providing synchronous mapping.
pub trait MapExt<T>: Sized {
    /// Applies `f` to every value, in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::MapExt;
    ///
    /// let doubled = Emitter::from_iter(vec![1, 2, 3]).map(|v| v * 2);
    /// assert_eq!(doubled.collect().try_value().and_then(Result::ok), Some(vec![2, 4, 6]));
    /// ```
    fn map<U, F>(self, f: F) -> Emitter<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static;

    /// Applies a fallible `f`; an `Err` fails the subscription.
    fn try_map<U, F>(self, f: F) -> Emitter<U>
    where
        U: 'static,
        F: Fn(T) -> Result<U> + 'static;
}

impl<T: 'static> MapExt<T> for Emitter<T> {
    fn map<U, F>(self, f: F) -> Emitter<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        self.try_map(move |v| Ok(f(v)))
    }

    fn try_map<U, F>(self, f: F) -> Emitter<U>
    where
        U: 'static,
        F: Fn(T) -> Result<U> + 'static,
    {
        let f = Rc::new(f);
        self.pipe(move || {
            let f = Rc::clone(&f);
            step_fn(move |value: T, out: &Handle<U>| out.next(f(value)?))
        })
    }
}
