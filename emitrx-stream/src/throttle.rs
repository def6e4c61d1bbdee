// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{MapExt, SyncExt};
use emitrx_core::{Emitter, Timer};
use std::time::Duration;

/// Extension trait providing the `throttle` operator.
pub trait ThrottleExt<T>: Sized {
    /// Samples the latest value against a clock ticking every `period`.
    ///
    /// # Behavior
    ///
    /// - Values arriving between two ticks overwrite each other; only the latest
    ///   is emitted
    /// - A tick with no new value emits nothing; the next value is then emitted
    ///   as soon as it arrives
    /// - Completes when the upstream completes without a pending value
    fn throttle<TM: Timer>(self, timer: TM, period: Duration) -> Emitter<T>;
}

impl<T: Clone + 'static> ThrottleExt<T> for Emitter<T> {
    fn throttle<TM: Timer>(self, timer: TM, period: Duration) -> Emitter<T> {
        self.sync_with(Emitter::interval(timer, period))
            .map(|(value, _tick)| value)
    }
}
