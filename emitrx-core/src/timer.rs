// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Deferred;
use core::clone::Clone;
use core::fmt::Debug;
use core::time::Duration;

/// Identifies one scheduled callback so it can be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Callback scheduler driving the time-based operators.
///
/// Callbacks run on the thread that owns the timer, one at a time.
pub trait Timer: Clone + Debug + 'static {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerToken;

    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerToken;

    /// Clearing a token that already fired or was cleared is a no-op.
    fn clear(&self, token: TimerToken);
}

/// Resolves after `delay`.
pub fn sleep<TM: Timer>(timer: &TM, delay: Duration) -> Deferred<()> {
    let deferred = Deferred::new();
    let wake = deferred.clone();
    timer.set_timeout(
        delay,
        Box::new(move || {
            wake.resolve(());
        }),
    );
    deferred
}
