// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use emitrx_core::{Deferred, Result, Timer, TimerToken};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// [`Timer`] running every callback as a tokio local task.
///
/// Clones share the same registrations.
///
/// # Panics
///
/// Scheduling panics when called outside a tokio `LocalSet`.
#[derive(Clone, Debug, Default)]
pub struct TokioTimer {
    tasks: Rc<RefCell<HashMap<TimerToken, AbortHandle>>>,
    next_token: Rc<Cell<u64>>,
}

impl TokioTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks still scheduled.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    fn token(&self) -> TimerToken {
        let raw = self.next_token.get() + 1;
        self.next_token.set(raw);
        TimerToken::new(raw)
    }
}

impl Timer for TokioTimer {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerToken {
        let token = self.token();
        let tasks = Rc::clone(&self.tasks);
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            tasks.borrow_mut().remove(&token);
            callback();
        });
        self.tasks
            .borrow_mut()
            .insert(token, task.abort_handle());
        token
    }

    fn set_interval(&self, period: Duration, mut callback: Box<dyn FnMut()>) -> TimerToken {
        let token = self.token();
        let task = tokio::task::spawn_local(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                callback();
            }
        });
        self.tasks
            .borrow_mut()
            .insert(token, task.abort_handle());
        token
    }

    fn clear(&self, token: TimerToken) {
        let task = self.tasks.borrow_mut().remove(&token);
        if let Some(task) = task {
            trace!("timer {} cleared", token.get());
            task.abort();
        }
    }
}

/// Runs `future` as a tokio local task and settles the returned
/// [`Deferred`] with its output.
///
/// # Panics
///
/// Panics when called outside a tokio `LocalSet`.
pub fn spawn_deferred<T, F>(future: F) -> Deferred<T>
where
    T: Clone + 'static,
    F: Future<Output = Result<T>> + 'static,
{
    let deferred = Deferred::new();
    let settle = deferred.clone();
    tokio::task::spawn_local(async move {
        settle.settle(future.await);
    });
    deferred
}
