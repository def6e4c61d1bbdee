// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Order-preserving asynchronous mapping.

use crate::logging::error;
use emitrx_core::{Awaitable, Drain, EmitError, Emitter, Flow, Handle, PumpState, Result, Step};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::rc::Rc;

/// Extension trait providing the `map_async` operator.
pub trait MapAsyncExt<T>: Sized {
    /// Maps every value to an [`Awaitable`] and emits the settled results in
    /// input order.
    ///
    /// A result that settles early waits behind every earlier one, so uneven
    /// latencies never reorder the output.
    ///
    /// # Behavior
    ///
    /// - A rejected awaitable fails the subscription once every earlier result
    ///   has been emitted
    /// - An upstream error is queued behind the work already in flight
    /// - Upstream completion is held back until the last result is emitted
    /// - Work in flight when the subscription is cancelled is not aborted; its
    ///   result is discarded
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::{Deferred, Emitter};
    /// use emitrx_stream::MapAsyncExt;
    ///
    /// let slow = Deferred::new();
    /// let fast = Deferred::resolved("fast");
    /// let pending = vec![slow.clone(), fast];
    ///
    /// let results = Emitter::from_iter(vec![0usize, 1])
    ///     .map_async(move |i| pending[i].clone())
    ///     .collect();
    /// assert!(!results.is_settled());
    ///
    /// slow.resolve("slow");
    /// assert_eq!(results.try_value().and_then(Result::ok), Some(vec!["slow", "fast"]));
    /// ```
    fn map_async<U, A, F>(self, f: F) -> Emitter<U>
    where
        U: 'static,
        A: Awaitable<U> + 'static,
        F: Fn(T) -> A + 'static;
}

impl<T: 'static> MapAsyncExt<T> for Emitter<T> {
    fn map_async<U, A, F>(self, f: F) -> Emitter<U>
    where
        U: 'static,
        A: Awaitable<U> + 'static,
        F: Fn(T) -> A + 'static,
    {
        let f = Rc::new(f);
        self.pipe(move || MapAsync {
            f: Rc::clone(&f),
            queue: Rc::new(RefCell::new(Queue::default())),
            _marker: PhantomData,
        })
    }
}

enum Slot<U> {
    Waiting(u64),
    Ready(Result<U>),
    Failed(EmitError),
}

struct Queue<U> {
    slots: VecDeque<Slot<U>>,
    next_seq: u64,
    upstream_done: bool,
    draining: bool,
    resuming: bool,
    closed: bool,
    stash: Option<EmitError>,
    out: Option<Handle<U>>,
}

impl<U> Default for Queue<U> {
    fn default() -> Self {
        Self {
            slots: VecDeque::new(),
            next_seq: 0,
            upstream_done: false,
            draining: false,
            resuming: false,
            closed: false,
            stash: None,
            out: None,
        }
    }
}

enum Delivery<U> {
    Value(U),
    Error(EmitError),
    Complete,
}

type Shared<U> = Rc<RefCell<Queue<U>>>;

fn close<U>(queue: &Shared<U>) {
    let mut q = queue.borrow_mut();
    q.closed = true;
    q.slots.clear();
}

fn fill<U>(queue: &Shared<U>, seq: u64, outcome: Result<U>) {
    let mut q = queue.borrow_mut();
    if q.closed {
        return;
    }
    let slot = q
        .slots
        .iter_mut()
        .find(|slot| matches!(slot, Slot::Waiting(s) if *s == seq));
    if let Some(slot) = slot {
        *slot = Slot::Ready(outcome);
    }
}

fn drain<U: 'static>(queue: &Shared<U>) -> Result<()> {
    {
        let mut q = queue.borrow_mut();
        if q.draining {
            return Ok(());
        }
        q.draining = true;
    }
    let drained = drain_ready(queue);
    queue.borrow_mut().draining = false;
    drained
}

// Emits the ready prefix of the queue; the borrow is released before each
// delivery so downstream may cancel while a value is in transit.
fn drain_ready<U: 'static>(queue: &Shared<U>) -> Result<()> {
    loop {
        let (delivery, out) = {
            let mut q = queue.borrow_mut();
            if q.closed {
                return Ok(());
            }
            let Some(out) = q.out.clone() else {
                return Ok(());
            };
            let delivery = match q.slots.front() {
                Some(Slot::Waiting(_)) => return Ok(()),
                Some(_) => match q.slots.pop_front() {
                    Some(Slot::Ready(Ok(value))) => Delivery::Value(value),
                    Some(Slot::Ready(Err(e)) | Slot::Failed(e)) => Delivery::Error(e),
                    _ => return Ok(()),
                },
                None if q.upstream_done => Delivery::Complete,
                None => return Ok(()),
            };
            if !matches!(delivery, Delivery::Value(_)) {
                q.closed = true;
                q.slots.clear();
            }
            (delivery, out)
        };
        match delivery {
            Delivery::Value(value) => match out.next(value) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Done) => {
                    close(queue);
                    return Ok(());
                }
                Err(e) => {
                    close(queue);
                    return Err(e);
                }
            },
            Delivery::Error(e) => return out.fail(e),
            Delivery::Complete => return out.complete(),
        }
    }
}

struct MapAsync<T, U, A, F> {
    f: Rc<F>,
    queue: Shared<U>,
    _marker: PhantomData<fn(T) -> A>,
}

impl<T, U, A, F> Step<T, U> for MapAsync<T, U, A, F>
where
    U: 'static,
    A: Awaitable<U> + 'static,
    F: Fn(T) -> A,
{
    fn start(&mut self, out: &Handle<U>) -> Result<Flow> {
        self.queue.borrow_mut().out = Some(out.clone());
        Ok(Flow::Continue)
    }

    fn resume(&mut self, value: T, out: &Handle<U>) -> Result<Flow> {
        let seq = {
            let mut q = self.queue.borrow_mut();
            let seq = q.next_seq;
            q.next_seq += 1;
            q.slots.push_back(Slot::Waiting(seq));
            q.resuming = true;
            seq
        };
        let queue = Rc::clone(&self.queue);
        (self.f)(value).on_settle(move |outcome| {
            fill(&queue, seq, outcome);
            if let Err(e) = drain(&queue) {
                let mut q = queue.borrow_mut();
                if q.resuming {
                    q.stash = Some(e);
                } else {
                    error!("unhandled error after asynchronous map settled: {e}");
                }
            }
        });
        let stashed = {
            let mut q = self.queue.borrow_mut();
            q.resuming = false;
            q.stash.take()
        };
        match stashed {
            Some(e) => Err(e),
            None if out.is_closed() => Ok(Flow::Done),
            None => Ok(Flow::Continue),
        }
    }

    fn finish(&mut self, _out: &Handle<U>) -> Result<Drain> {
        let mut q = self.queue.borrow_mut();
        q.upstream_done = true;
        if q.slots.is_empty() && !q.draining {
            q.closed = true;
            Ok(Drain::Complete)
        } else {
            Ok(Drain::Pending)
        }
    }

    fn fail(&mut self, error: EmitError, out: &Handle<U>) -> Result<()> {
        {
            let mut q = self.queue.borrow_mut();
            if !q.slots.is_empty() || q.draining {
                q.slots.push_back(Slot::Failed(error));
                return Ok(());
            }
            q.closed = true;
        }
        out.fail(error)
    }

    fn release(&mut self, state: PumpState) {
        if state == PumpState::Cancelled {
            close(&self.queue);
        }
    }
}
