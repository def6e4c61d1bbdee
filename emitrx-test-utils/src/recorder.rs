// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{EmitError, Flow, Observer, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Everything an observer can receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T> {
    Next(T),
    /// The error's display form
    Error(String),
    Complete,
}

/// Observer that records every signal for later assertions.
///
/// Clones share the same log, so a test keeps one clone and subscribes the
/// other. Errors are handled (recorded) unless [`rethrow`](Self::rethrow) is
/// set.
#[derive(Debug)]
pub struct Recorder<T> {
    events: Rc<RefCell<Vec<Event<T>>>>,
    limit: Option<usize>,
    taken: Rc<Cell<usize>>,
    rethrow: bool,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
            limit: self.limit,
            taken: Rc::clone(&self.taken),
            rethrow: self.rethrow,
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            limit: None,
            taken: Rc::new(Cell::new(0)),
            rethrow: false,
        }
    }
}

impl<T: Clone> Recorder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports [`Flow::Done`] on the `n`th value.
    #[must_use]
    pub fn cancel_after(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Records errors and then gives them back to the producer.
    #[must_use]
    pub fn rethrow(mut self) -> Self {
        self.rethrow = true;
        self
    }

    pub fn events(&self) -> Vec<Event<T>> {
        self.events.borrow().clone()
    }

    pub fn values(&self) -> Vec<T> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Next(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_completed(&self) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|event| matches!(event, Event::Complete))
    }

    /// Returns `true` once an error or completion was recorded.
    pub fn is_terminated(&self) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|event| !matches!(event, Event::Next(_)))
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl<T: Clone> Observer<T> for Recorder<T> {
    fn next(&self, value: T) -> Result<Flow> {
        self.events.borrow_mut().push(Event::Next(value));
        let taken = self.taken.get() + 1;
        self.taken.set(taken);
        match self.limit {
            Some(limit) if taken >= limit => Ok(Flow::Done),
            _ => Ok(Flow::Continue),
        }
    }

    fn fail(&self, error: EmitError) -> Result<()> {
        self.events
            .borrow_mut()
            .push(Event::Error(error.to_string()));
        if self.rethrow {
            Err(error)
        } else {
            Ok(())
        }
    }

    fn complete(&self) -> Result<()> {
        self.events.borrow_mut().push(Event::Complete);
        Ok(())
    }
}
