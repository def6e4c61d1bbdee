// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! First-match dispatch of values to independent branches.

use emitrx_core::{EmitError, Emitter, Flow, Handle, Result, Step, Subscription, Unrouted};

type TestFn<T> = Box<dyn FnMut(&T) -> bool>;
type NextFn<T> = Box<dyn FnMut(T) -> Result<Flow>>;
type FailFn = Box<dyn FnMut(EmitError) -> Result<()>>;

/// One branch of a [`match_with`](MatchExt::match_with) dispatch.
///
/// A matcher without a `next` handler passes its values to the downstream
/// outlet; a matcher whose handler reports [`Flow::Done`] stops matching.
pub struct Matcher<T> {
    test: TestFn<T>,
    next: Option<NextFn<T>>,
    fail: Option<FailFn>,
    active: bool,
}

impl<T: 'static> Matcher<T> {
    pub fn new<P>(test: P) -> Self
    where
        P: FnMut(&T) -> bool + 'static,
    {
        Self {
            test: Box::new(test),
            next: None,
            fail: None,
            active: true,
        }
    }

    /// Handles every matched value.
    #[must_use]
    pub fn on_next<F>(self, mut next: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        self.on_next_flow(move |value| {
            next(value);
            Ok(Flow::Continue)
        })
    }

    /// Handles matched values and decides whether the branch stays active.
    #[must_use]
    pub fn on_next_flow<F>(mut self, next: F) -> Self
    where
        F: FnMut(T) -> Result<Flow> + 'static,
    {
        self.next = Some(Box::new(next));
        self
    }

    /// Handles the terminal error of the sequence.
    #[must_use]
    pub fn on_error<F>(self, mut on_error: F) -> Self
    where
        F: FnMut(EmitError) + 'static,
    {
        self.on_fail(move |error| {
            on_error(error);
            Ok(())
        })
    }

    /// Installs a raw error handler that may itself re-raise.
    #[must_use]
    pub fn on_fail<F>(mut self, on_fail: F) -> Self
    where
        F: FnMut(EmitError) -> Result<()> + 'static,
    {
        self.fail = Some(Box::new(on_fail));
        self
    }
}

pub(crate) struct Router<T> {
    matchers: Vec<Matcher<T>>,
}

impl<T> Router<T> {
    pub(crate) fn new(matchers: Vec<Matcher<T>>) -> Self {
        Self { matchers }
    }

    fn any_active(&self) -> bool {
        self.matchers.iter().any(|m| m.active)
    }
}

impl<T: 'static> Step<T, T> for Router<T> {
    fn start(&mut self, _out: &Handle<T>) -> Result<Flow> {
        Ok(if self.any_active() {
            Flow::Continue
        } else {
            Flow::Done
        })
    }

    fn resume(&mut self, value: T, out: &Handle<T>) -> Result<Flow> {
        let matched = self
            .matchers
            .iter_mut()
            .position(|m| m.active && (m.test)(&value));
        if let Some(index) = matched {
            let matcher = &mut self.matchers[index];
            match matcher.next.as_mut() {
                None => {
                    out.next(value)?;
                }
                Some(next) => match next(value) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Done) => matcher.active = false,
                    Err(error) => match matcher.fail.as_mut() {
                        Some(fail) => {
                            matcher.active = false;
                            fail(error)?;
                        }
                        None => return Err(error),
                    },
                },
            }
        }
        if out.is_closed() || !self.any_active() {
            Ok(Flow::Done)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn fail(&mut self, error: EmitError, out: &Handle<T>) -> Result<()> {
        let mut handled = false;
        let mut errors = Vec::new();
        for matcher in self.matchers.iter_mut().filter(|m| m.active) {
            if let Some(fail) = matcher.fail.as_mut() {
                handled = true;
                matcher.active = false;
                if let Err(e) = fail(error.clone()) {
                    errors.push(e);
                }
            }
        }
        if !handled {
            return out.fail(error);
        }
        EmitError::aggregate(errors)
    }
}

/// Extension trait providing the terminal `match_with` operation.
pub trait MatchExt<T>: Sized {
    /// Dispatches every value to the first active matcher whose test passes.
    ///
    /// The sequence's error reaches every active matcher with an error handler.
    /// The subscription completes once no matcher is active.
    ///
    /// # Errors
    ///
    /// Returns an error raised synchronously during activation that no matcher
    /// handled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::{MatchExt, Matcher};
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let (small, large) = (Rc::new(RefCell::new(vec![])), Rc::new(RefCell::new(vec![])));
    /// let (s, l) = (small.clone(), large.clone());
    ///
    /// Emitter::from_iter(vec![1, 50, 2, 70])
    ///     .match_with(vec![
    ///         Matcher::new(|v: &i32| *v < 10).on_next(move |v| s.borrow_mut().push(v)),
    ///         Matcher::new(|_: &i32| true).on_next(move |v| l.borrow_mut().push(v)),
    ///     ])
    ///     .unwrap();
    ///
    /// assert_eq!(*small.borrow(), vec![1, 2]);
    /// assert_eq!(*large.borrow(), vec![50, 70]);
    /// ```
    fn match_with(self, matchers: Vec<Matcher<T>>) -> Result<Subscription>;
}

impl<T: 'static> MatchExt<T> for Emitter<T> {
    fn match_with(self, matchers: Vec<Matcher<T>>) -> Result<Subscription> {
        self.pump(Handle::new(Unrouted), Router::new(matchers))
    }
}
