// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::MapAsyncExt;
use emitrx_core::{Deferred, Emitter, Timer};
use std::time::Duration;

/// Extension trait providing the `delay` operator.
pub trait DelayExt<T>: Sized {
    /// Forwards every value `duration` after it arrived.
    ///
    /// Each value waits on its own timer, so a burst stays a burst shifted in
    /// time, and values are never reordered. Completion and errors wait behind
    /// the values already delayed.
    fn delay<TM: Timer>(self, timer: TM, duration: Duration) -> Emitter<T>;
}

impl<T: Clone + 'static> DelayExt<T> for Emitter<T> {
    fn delay<TM: Timer>(self, timer: TM, duration: Duration) -> Emitter<T> {
        self.map_async(move |value| {
            let deferred = Deferred::new();
            let ready = deferred.clone();
            timer.set_timeout(
                duration,
                Box::new(move || {
                    ready.resolve(value);
                }),
            );
            deferred
        })
    }
}
