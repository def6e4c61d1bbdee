// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A virtual clock for deterministic time-based tests.

use emitrx_core::{Timer, TimerToken};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

enum Task {
    Once(Box<dyn FnOnce()>),
    Every(Duration, Box<dyn FnMut()>),
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_token: u64,
    next_seq: u64,
    // Keyed by (due, seq) so callbacks due at the same instant run in the order
    // they were scheduled.
    queue: BTreeMap<(Duration, u64), (TimerToken, Task)>,
    running: Option<TimerToken>,
    running_cleared: bool,
    registrations: usize,
    cancellations: usize,
}

impl Clock {
    fn schedule(&mut self, due: Duration, token: TimerToken, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), (token, task));
    }

    fn token(&mut self) -> TimerToken {
        self.next_token += 1;
        self.registrations += 1;
        TimerToken::new(self.next_token)
    }
}

/// A [`Timer`] whose time only moves when the test calls [`advance`](Self::advance).
///
/// ```
/// use emitrx_core::Timer;
/// use emitrx_test_utils::ManualTimer;
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let timer = ManualTimer::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = fired.clone();
/// timer.set_timeout(Duration::from_millis(10), Box::new(move || flag.set(true)));
///
/// timer.advance(Duration::from_millis(9));
/// assert!(!fired.get());
/// timer.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Rc<RefCell<Clock>>,
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.clock.borrow();
        f.debug_struct("ManualTimer")
            .field("now", &clock.now)
            .field("pending", &clock.queue.len())
            .finish()
    }
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// How many timeouts and intervals were ever scheduled.
    pub fn registrations(&self) -> usize {
        self.clock.borrow().registrations
    }

    /// How many live registrations were cleared.
    pub fn cancellations(&self) -> usize {
        self.clock.borrow().cancellations
    }

    /// Moves time forward by `by`, firing every callback that falls due.
    ///
    /// Callbacks run without the clock borrowed, so they may schedule or clear
    /// other callbacks, including themselves.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                match clock.queue.keys().next().copied() {
                    Some(key) if key.0 <= target => {
                        let entry = clock.queue.remove(&key);
                        clock.now = key.0;
                        entry.map(|(token, task)| (key.0, token, task))
                    }
                    _ => None,
                }
            };
            let Some((due, token, task)) = next else {
                break;
            };
            match task {
                Task::Once(callback) => callback(),
                Task::Every(period, mut callback) => {
                    {
                        let mut clock = self.clock.borrow_mut();
                        clock.running = Some(token);
                        clock.running_cleared = false;
                    }
                    callback();
                    let cleared = {
                        let mut clock = self.clock.borrow_mut();
                        clock.running = None;
                        clock.running_cleared
                    };
                    if !cleared {
                        self.clock.borrow_mut().schedule(
                            due + period,
                            token,
                            Task::Every(period, callback),
                        );
                    }
                }
            }
        }
        self.clock.borrow_mut().now = target;
    }
}

impl Timer for ManualTimer {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerToken {
        let mut clock = self.clock.borrow_mut();
        let token = clock.token();
        let due = clock.now + delay;
        clock.schedule(due, token, Task::Once(callback));
        token
    }

    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerToken {
        assert!(!period.is_zero(), "interval period must be positive");
        let mut clock = self.clock.borrow_mut();
        let token = clock.token();
        let due = clock.now + period;
        clock.schedule(due, token, Task::Every(period, callback));
        token
    }

    fn clear(&self, token: TimerToken) {
        let removed = {
            let mut clock = self.clock.borrow_mut();
            let key = clock
                .queue
                .iter()
                .find(|(_, (t, _))| *t == token)
                .map(|(key, _)| *key);
            match key {
                Some(key) => {
                    clock.cancellations += 1;
                    clock.queue.remove(&key)
                }
                None => {
                    if clock.running == Some(token) && !clock.running_cleared {
                        clock.running_cleared = true;
                        clock.cancellations += 1;
                    }
                    None
                }
            }
        };
        // Dropped outside the borrow: the callback may own other timer handles.
        drop(removed);
    }
}
