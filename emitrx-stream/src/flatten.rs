// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{
    Drain, EmitError, Emitter, Flow, Handle, Links, Nested, Observer, Result, Sequence, Step,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Extension trait flattening an emitter of sequences.
pub trait FlattenExt<S: Sequence>: Sized {
    /// Unrolls every incoming sequence one level.
    ///
    /// Inner sequences are subscribed as they arrive and run concurrently;
    /// their values are interleaved as they are delivered. The result completes
    /// once the outer emitter and every inner sequence have completed, and the
    /// first error from any of them fails it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::FlattenExt;
    ///
    /// let flat = Emitter::from_iter(vec![vec![1, 2], vec![], vec![3]]).flatten();
    /// assert_eq!(flat.collect().try_value().and_then(Result::ok), Some(vec![1, 2, 3]));
    /// ```
    fn flatten(self) -> Emitter<S::Item>;
}

impl<S> FlattenExt<S> for Emitter<S>
where
    S: Sequence + 'static,
    S::Item: 'static,
{
    fn flatten(self) -> Emitter<S::Item> {
        // Outer and inner subscriptions are parked together so that ending the
        // downstream releases every inner, even after the outer completed.
        let links = Links::new();
        let held = links.clone();
        Emitter::create_with(
            move |out: Handle<S::Item>| {
                let id = out.id();
                let step = Flatten {
                    state: Rc::new(RefCell::new(Inners::default())),
                    links: held.clone(),
                };
                let subscription = self.pump(out.clone(), step)?;
                if !out.is_closed() {
                    held.hold(id, vec![subscription]);
                }
                Ok(())
            },
            move |id| links.release(id),
        )
    }
}

#[derive(Default)]
struct Inners {
    active: usize,
    upstream_done: bool,
}

struct Flatten {
    state: Rc<RefCell<Inners>>,
    links: Links,
}

impl<S> Step<S, S::Item> for Flatten
where
    S: Sequence,
    S::Item: 'static,
{
    fn resume(&mut self, value: S, out: &Handle<S::Item>) -> Result<Flow> {
        self.state.borrow_mut().active += 1;
        let subscription = value.into_emitter().subscribe(Inner {
            out: out.clone(),
            state: Rc::clone(&self.state),
        })?;
        if out.is_closed() {
            subscription.unsubscribe();
            return Ok(Flow::Done);
        }
        self.links.hold(out.id(), vec![subscription]);
        Ok(Flow::Continue)
    }

    fn finish(&mut self, _out: &Handle<S::Item>) -> Result<Drain> {
        let mut state = self.state.borrow_mut();
        state.upstream_done = true;
        Ok(if state.active == 0 {
            Drain::Complete
        } else {
            Drain::Pending
        })
    }
}

struct Inner<U> {
    out: Handle<U>,
    state: Rc<RefCell<Inners>>,
}

impl<U: 'static> Observer<U> for Inner<U> {
    fn next(&self, value: U) -> Result<Flow> {
        self.out.next(value)
    }

    fn fail(&self, error: EmitError) -> Result<()> {
        self.out.fail(error)
    }

    fn complete(&self) -> Result<()> {
        let finished = {
            let mut state = self.state.borrow_mut();
            state.active -= 1;
            state.active == 0 && state.upstream_done
        };
        if finished {
            self.out.complete()
        } else {
            Ok(())
        }
    }

    fn is_closed(&self) -> bool {
        self.out.is_closed()
    }
}

/// Extension trait flattening an emitter of [`Nested`] trees.
pub trait NestedExt<T>: Sized {
    /// Unrolls each incoming tree `depth + 1` levels.
    ///
    /// Leaves are emitted as they are; sequences deeper than `depth` are
    /// emitted whole.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::{Emitter, Nested};
    /// use emitrx_stream::NestedExt;
    ///
    /// let tree = Nested::Many(vec![Nested::Leaf(1), Nested::many(vec![2, 3])]);
    ///
    /// let one_level = Emitter::value(tree.clone()).flatten_depth(0).collect();
    /// assert_eq!(
    ///     one_level.try_value().and_then(Result::ok),
    ///     Some(vec![Nested::Leaf(1), Nested::many(vec![2, 3])])
    /// );
    ///
    /// let two_levels = Emitter::value(tree).flatten_depth(1).collect();
    /// assert_eq!(
    ///     two_levels.try_value().and_then(Result::ok),
    ///     Some(vec![Nested::Leaf(1), Nested::Leaf(2), Nested::Leaf(3)])
    /// );
    /// ```
    fn flatten_depth(self, depth: usize) -> Emitter<Nested<T>>;
}

fn unroll<T>(tree: Nested<T>, depth: usize, into: &mut Vec<Nested<T>>) {
    match tree {
        Nested::Many(items) => {
            for item in items {
                match item {
                    Nested::Many(_) if depth > 0 => unroll(item, depth - 1, into),
                    other => into.push(other),
                }
            }
        }
        leaf => into.push(leaf),
    }
}

impl<T: 'static> NestedExt<T> for Emitter<Nested<T>> {
    fn flatten_depth(self, depth: usize) -> Emitter<Nested<T>> {
        self.pipe(move || {
            move |tree: Nested<T>, out: &Handle<Nested<T>>| {
                let mut items = Vec::new();
                unroll(tree, depth, &mut items);
                for item in items {
                    if out.next(item)?.is_done() {
                        return Ok(Flow::Done);
                    }
                }
                Ok(Flow::Continue)
            }
        })
    }
}
