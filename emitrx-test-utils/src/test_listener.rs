// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::PushSource;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

type Callback<T> = Rc<RefCell<Box<dyn FnMut(T)>>>;

/// An in-memory event target in the style of a UI listener registry.
///
/// Clones share the same registry: give one to
/// [`Emitter::from_push_source`](emitrx_core::Emitter::from_push_source) and
/// fire events through another.
pub struct TestListener<T> {
    callbacks: Rc<RefCell<BTreeMap<u64, Callback<T>>>>,
    next_token: Rc<Cell<u64>>,
    registrations: Rc<Cell<usize>>,
    unregistrations: Rc<Cell<usize>>,
}

impl<T> Clone for TestListener<T> {
    fn clone(&self) -> Self {
        Self {
            callbacks: Rc::clone(&self.callbacks),
            next_token: Rc::clone(&self.next_token),
            registrations: Rc::clone(&self.registrations),
            unregistrations: Rc::clone(&self.unregistrations),
        }
    }
}

impl<T> Default for TestListener<T> {
    fn default() -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(BTreeMap::new())),
            next_token: Rc::new(Cell::new(0)),
            registrations: Rc::new(Cell::new(0)),
            unregistrations: Rc::new(Cell::new(0)),
        }
    }
}

impl<T: Clone> TestListener<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls every registered callback with `event`.
    pub fn fire(&self, event: T) {
        let callbacks: Vec<Callback<T>> = self.callbacks.borrow().values().cloned().collect();
        for callback in callbacks {
            (*callback.borrow_mut())(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.get()
    }

    pub fn unregistrations(&self) -> usize {
        self.unregistrations.get()
    }
}

impl<T> PushSource<T> for TestListener<T> {
    type Token = u64;

    fn register(&self, callback: Box<dyn FnMut(T)>) -> u64 {
        let token = self.next_token.get() + 1;
        self.next_token.set(token);
        self.registrations.set(self.registrations.get() + 1);
        self.callbacks
            .borrow_mut()
            .insert(token, Rc::new(RefCell::new(callback)));
        token
    }

    fn unregister(&self, token: u64) {
        let removed = self.callbacks.borrow_mut().remove(&token);
        if removed.is_some() {
            self.unregistrations.set(self.unregistrations.get() + 1);
        }
    }
}
