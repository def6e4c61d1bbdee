// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Suspend/resume engine driving one subscription.
//!
//! A [`Step`] is operator logic written as "process the next value": the
//! [`Pump`] owns it, receives pushes from upstream and resumes the step exactly
//! once per value. Only one logical step is ever in flight, so operator state
//! needs no locking; a push that arrives while a step is running is refused.
//!
//! ```text
//!   upstream ──next/fail/complete──▶ Pump ──resume──▶ Step ──next──▶ downstream
//!            ◀───────Flow::Done──────      ◀──Flow──        ◀─Flow──
//! ```

use crate::logging::warning;
use crate::subscription::Cancel;
use crate::{Drain, EmitError, Flow, Handle, Observer, Result};
use std::cell::{Cell, RefCell};

/// Operator body resumed by a [`Pump`] once per upstream value.
///
/// `out` is the downstream handle of the subscription; its closed state is the
/// explicit cancellation flag every step can consult.
pub trait Step<T, U: 'static> {
    /// Runs when the subscription is activated, before the upstream source.
    ///
    /// Returning `Flow::Done` finishes the subscription without activating the
    /// upstream at all.
    ///
    /// # Errors
    ///
    /// A consumer error, routed to the downstream error channel.
    fn start(&mut self, out: &Handle<U>) -> Result<Flow> {
        let _ = out;
        Ok(Flow::Continue)
    }

    /// Processes one upstream value.
    ///
    /// # Errors
    ///
    /// A consumer error (routed downstream), or an error that escaped downstream.
    fn resume(&mut self, value: T, out: &Handle<U>) -> Result<Flow>;

    /// Upstream is exhausted.
    ///
    /// # Errors
    ///
    /// An error raised while flushing buffered output.
    fn finish(&mut self, out: &Handle<U>) -> Result<Drain> {
        let _ = out;
        Ok(Drain::Complete)
    }

    /// Upstream failed. The default forwards the error downstream.
    ///
    /// # Errors
    ///
    /// The error when nobody downstream handled it.
    fn fail(&mut self, error: EmitError, out: &Handle<U>) -> Result<()> {
        out.fail(error)
    }

    /// The pump reached `state`; drop auxiliary subscriptions.
    fn release(&mut self, state: PumpState) {
        let _ = state;
    }
}

impl<T, U, F> Step<T, U> for F
where
    U: 'static,
    F: FnMut(T, &Handle<U>) -> Result<Flow>,
{
    fn resume(&mut self, value: T, out: &Handle<U>) -> Result<Flow> {
        self(value, out)
    }
}

/// Pins a closure to the [`Step`] signature so its argument types are inferred.
///
/// ```
/// use emitrx_core::{pump::step_fn, Emitter};
///
/// let doubled = Emitter::from_iter(vec![1, 2]).pipe(|| step_fn(|v: i32, out| out.next(v * 2)));
/// assert_eq!(doubled.collect().try_value().and_then(Result::ok), Some(vec![2, 4]));
/// ```
pub fn step_fn<T, U, F>(f: F) -> F
where
    U: 'static,
    F: FnMut(T, &Handle<U>) -> Result<Flow>,
{
    f
}

/// Step that hands every value through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forward;

impl<T: 'static> Step<T, T> for Forward {
    fn resume(&mut self, value: T, out: &Handle<T>) -> Result<Flow> {
        out.next(value)
    }
}

/// Lifecycle of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PumpState {
    /// Created, no value received yet
    Idle,
    /// Receiving values
    Active,
    /// Upstream exhausted or the step finished
    Completed,
    /// Stopped from downstream
    Cancelled,
    /// Ended by an error
    Failed,
}

impl PumpState {
    /// Returns `true` for the three end states.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            PumpState::Completed | PumpState::Cancelled | PumpState::Failed
        )
    }
}

/// Drives a [`Step`] from upstream pushes.
///
/// The teardown hook runs exactly once, on the first transition into a
/// terminal state, whatever the cause.
pub struct Pump<T, U: 'static> {
    state: Cell<PumpState>,
    released: Cell<bool>,
    step: RefCell<Box<dyn Step<T, U>>>,
    out: Handle<U>,
    teardown: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl<T: 'static, U: 'static> Pump<T, U> {
    pub(crate) fn new(
        step: Box<dyn Step<T, U>>,
        out: Handle<U>,
        teardown: Box<dyn FnOnce()>,
    ) -> Self {
        Self {
            state: Cell::new(PumpState::Idle),
            released: Cell::new(false),
            step: RefCell::new(step),
            out,
            teardown: RefCell::new(Some(teardown)),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PumpState {
        self.state.get()
    }

    /// Primes the step. `Flow::Done` means the upstream must not be activated.
    pub(crate) fn start(&self) -> Result<Flow> {
        let outcome = match self.step.try_borrow_mut() {
            Ok(mut step) => step.start(&self.out),
            Err(_) => return Err(EmitError::ReentrantDelivery),
        };
        self.settle(outcome)
    }

    fn terminate(&self, state: PumpState) -> bool {
        if self.state.get().is_terminal() {
            return false;
        }
        self.state.set(state);
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
        true
    }

    // Deferred while the step is running; `settle` retries once it returns.
    fn release(&self) {
        if self.released.get() {
            return;
        }
        if let Ok(mut step) = self.step.try_borrow_mut() {
            self.released.set(true);
            step.release(self.state.get());
        }
    }

    fn settle(&self, outcome: Result<Flow>) -> Result<Flow> {
        if self.state.get().is_terminal() {
            // Cancelled from downstream while the step was running.
            self.release();
            return outcome.map(|_| Flow::Done);
        }
        match outcome {
            Ok(Flow::Continue) => Ok(Flow::Continue),
            Ok(Flow::Done) => {
                if self.out.is_closed() {
                    self.terminate(PumpState::Cancelled);
                    self.release();
                    Ok(Flow::Done)
                } else {
                    self.terminate(PumpState::Completed);
                    self.release();
                    self.out.complete().map(|()| Flow::Done)
                }
            }
            Err(error) if self.out.is_closed() => {
                // Escaped from downstream: hand it to the producer untouched.
                self.terminate(PumpState::Failed);
                self.release();
                Err(error)
            }
            Err(error) => {
                self.terminate(PumpState::Failed);
                self.release();
                self.out.fail(error).map(|()| Flow::Done)
            }
        }
    }
}

impl<T: 'static, U: 'static> Observer<T> for Pump<T, U> {
    fn next(&self, value: T) -> Result<Flow> {
        if self.state.get().is_terminal() {
            return Ok(Flow::Done);
        }
        if self.out.is_closed() {
            self.terminate(PumpState::Cancelled);
            self.release();
            return Ok(Flow::Done);
        }
        let outcome = match self.step.try_borrow_mut() {
            Ok(mut step) => {
                self.state.set(PumpState::Active);
                step.resume(value, &self.out)
            }
            Err(_) => {
                warning!("re-entrant delivery refused: a step is already running");
                return Err(EmitError::ReentrantDelivery);
            }
        };
        self.settle(outcome)
    }

    fn fail(&self, error: EmitError) -> Result<()> {
        if !self.terminate(PumpState::Failed) {
            return Ok(());
        }
        let outcome = match self.step.try_borrow_mut() {
            Ok(mut step) => step.fail(error, &self.out),
            Err(_) => {
                warning!("re-entrant failure refused: a step is already running");
                Err(EmitError::ReentrantDelivery)
            }
        };
        self.release();
        outcome
    }

    fn complete(&self) -> Result<()> {
        if !self.terminate(PumpState::Completed) {
            return Ok(());
        }
        let drained = match self.step.try_borrow_mut() {
            Ok(mut step) => step.finish(&self.out),
            Err(_) => {
                warning!("re-entrant completion refused: a step is already running");
                Err(EmitError::ReentrantDelivery)
            }
        };
        self.release();
        match drained {
            Ok(Drain::Complete) => self.out.complete(),
            Ok(Drain::Pending) => Ok(()),
            Err(error) if self.out.is_closed() => Err(error),
            Err(error) => self.out.fail(error),
        }
    }

    fn is_closed(&self) -> bool {
        self.state.get().is_terminal()
    }
}

impl<T: 'static, U: 'static> Cancel for Pump<T, U> {
    fn cancel(&self) {
        if self.terminate(PumpState::Cancelled) {
            self.release();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.state.get().is_terminal()
    }
}
