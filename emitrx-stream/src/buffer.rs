// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Windowing of consecutive values.

use crate::MapExt;
use emitrx_core::{
    Consumer, Drain, EmitError, Emitter, Flow, Handle, PumpState, Result, Step, Subscription,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type ClosesFn<T> = Rc<dyn Fn(&T, &[T]) -> bool>;

/// Decides when a [`buffer`](BufferExt::buffer) window closes.
pub enum Window<T> {
    /// Close once the window holds this many values
    Count(usize),
    /// Close when the predicate, given the newest value and the window
    /// including it, returns `true`
    Until(ClosesFn<T>),
    /// Close whenever the notifier emits
    Emitter(Emitter<()>),
}

impl<T> Window<T> {
    /// Closes on a predicate over the newest value and the window so far.
    pub fn until<P>(predicate: P) -> Self
    where
        P: Fn(&T, &[T]) -> bool + 'static,
    {
        Window::Until(Rc::new(predicate))
    }

    /// Closes whenever `notifier` emits.
    pub fn on<N: 'static>(notifier: Emitter<N>) -> Self {
        Window::Emitter(notifier.map(|_| ()))
    }
}

impl<T> Clone for Window<T> {
    fn clone(&self) -> Self {
        match self {
            Window::Count(n) => Window::Count(*n),
            Window::Until(p) => Window::Until(Rc::clone(p)),
            Window::Emitter(e) => Window::Emitter(e.clone()),
        }
    }
}

impl<T> fmt::Debug for Window<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Count(n) => f.debug_tuple("Count").field(n).finish(),
            Window::Until(_) => f.write_str("Until(..)"),
            Window::Emitter(_) => f.write_str("Emitter(..)"),
        }
    }
}

/// Extension trait providing the `buffer` operator.
pub trait BufferExt<T>: Sized {
    /// Groups consecutive values into windows closed by `window`.
    ///
    /// When a window closes it is emitted, and the next one starts with the
    /// last `overlap` values of the closed window. For [`Window::Count`] the
    /// overlap is capped one below the count, so every window makes progress.
    ///
    /// # Behavior
    ///
    /// - A window is emitted only if it holds at least one value not seen in an
    ///   earlier window; carried-over values alone are never re-emitted
    /// - On completion the trailing partial window is emitted under that rule
    /// - For [`Window::Emitter`] the notifier is subscribed alongside the
    ///   upstream, and its errors fail the subscription
    ///
    /// # Panics
    ///
    /// Panics if `window` is `Window::Count(0)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::{BufferExt, Window};
    ///
    /// let pairs = Emitter::from_iter(vec!['a', 'b', 'c', 'd']).buffer(Window::Count(2), 1);
    /// assert_eq!(
    ///     pairs.collect().try_value().and_then(Result::ok),
    ///     Some(vec![vec!['a', 'b'], vec!['b', 'c'], vec!['c', 'd']])
    /// );
    /// ```
    fn buffer(self, window: Window<T>, overlap: usize) -> Emitter<Vec<T>>;
}

impl<T: Clone + 'static> BufferExt<T> for Emitter<T> {
    fn buffer(self, window: Window<T>, overlap: usize) -> Emitter<Vec<T>> {
        let overlap = match window {
            Window::Count(0) => panic!("buffer window count must be at least 1"),
            Window::Count(n) => overlap.min(n - 1),
            _ => overlap,
        };
        self.pipe(move || Buffer {
            window: window.clone(),
            pending: Rc::new(RefCell::new(Pending {
                items: Vec::new(),
                fresh: 0,
                overlap,
            })),
            link: None,
        })
    }
}

struct Pending<T> {
    items: Vec<T>,
    fresh: usize,
    overlap: usize,
}

impl<T: Clone> Pending<T> {
    fn push(&mut self, value: T) {
        self.items.push(value);
        self.fresh += 1;
    }

    /// Closes the current window, keeping the overlap for the next one.
    fn close(&mut self) -> Option<Vec<T>> {
        if self.fresh == 0 {
            return None;
        }
        let window = self.items.clone();
        let keep = self.overlap.min(self.items.len());
        self.items.drain(..self.items.len() - keep);
        self.fresh = 0;
        Some(window)
    }
}

struct Buffer<T> {
    window: Window<T>,
    pending: Rc<RefCell<Pending<T>>>,
    link: Option<Subscription>,
}

impl<T: Clone + 'static> Step<T, Vec<T>> for Buffer<T> {
    fn start(&mut self, out: &Handle<Vec<T>>) -> Result<Flow> {
        if let Window::Emitter(notifier) = &self.window {
            let pending = Rc::clone(&self.pending);
            let (emit, failed) = (out.clone(), out.clone());
            let consumer = Consumer::new(move |()| {
                let window = pending.borrow_mut().close();
                match window {
                    Some(window) => emit.next(window),
                    None if emit.is_closed() => Ok(Flow::Done),
                    None => Ok(Flow::Continue),
                }
            })
            .on_fail(move |e: EmitError| failed.fail(e));
            self.link = Some(notifier.subscribe(consumer)?);
        }
        Ok(if out.is_closed() {
            Flow::Done
        } else {
            Flow::Continue
        })
    }

    fn resume(&mut self, value: T, out: &Handle<Vec<T>>) -> Result<Flow> {
        let window = {
            let mut pending = self.pending.borrow_mut();
            pending.push(value);
            let closes = match &self.window {
                Window::Count(n) => pending.items.len() >= *n,
                Window::Until(predicate) => pending
                    .items
                    .last()
                    .is_some_and(|newest| predicate(newest, &pending.items)),
                Window::Emitter(_) => false,
            };
            if closes {
                pending.close()
            } else {
                None
            }
        };
        match window {
            Some(window) => out.next(window),
            None => Ok(Flow::Continue),
        }
    }

    fn finish(&mut self, out: &Handle<Vec<T>>) -> Result<Drain> {
        let window = self.pending.borrow_mut().close();
        if let Some(window) = window {
            out.next(window)?;
        }
        Ok(Drain::Complete)
    }

    fn release(&mut self, _state: PumpState) {
        if let Some(link) = self.link.take() {
            link.unsubscribe();
        }
    }
}
