// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! AND-joins and latest-value joins over several emitters.
//!
//! Every input holds at most one pending value in its slot. A join subscribes
//! all of its inputs per activation and tears them all down together once the
//! join finishes, whichever input caused it.

use crate::logging::trace;
use emitrx_core::{EmitError, Emitter, Flow, Handle, Links, Observer, Result, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every round needs a fresh value from every input
    Sync,
    /// After the first full round, any new value re-emits the latest tuple
    Combine,
}

trait Slots: 'static {
    type Output: 'static;

    fn is_filled(&self, index: usize) -> bool;

    fn is_full(&self) -> bool;

    /// Empties every slot into a tuple. Only called when full.
    fn take(&mut self) -> Option<Self::Output>;

    fn latest(&self) -> Option<Self::Output>;
}

struct Pair<A, B> {
    a: Option<A>,
    b: Option<B>,
}

impl<A: Clone + 'static, B: Clone + 'static> Slots for Pair<A, B> {
    type Output = (A, B);

    fn is_filled(&self, index: usize) -> bool {
        match index {
            0 => self.a.is_some(),
            _ => self.b.is_some(),
        }
    }

    fn is_full(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    fn take(&mut self) -> Option<(A, B)> {
        Some((self.a.take()?, self.b.take()?))
    }

    fn latest(&self) -> Option<(A, B)> {
        Some((self.a.clone()?, self.b.clone()?))
    }
}

struct Many<T>(Vec<Option<T>>);

impl<T: Clone + 'static> Slots for Many<T> {
    type Output = Vec<T>;

    fn is_filled(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(Option::is_some)
    }

    fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    fn take(&mut self) -> Option<Vec<T>> {
        self.0.iter_mut().map(Option::take).collect()
    }

    fn latest(&self) -> Option<Vec<T>> {
        self.0.iter().cloned().collect()
    }
}

struct JoinState<S> {
    mode: Mode,
    slots: S,
    completed: Vec<bool>,
    warmed_up: bool,
    done: bool,
}

impl<S: Slots> JoinState<S> {
    fn new(mode: Mode, slots: S, inputs: usize) -> Self {
        Self {
            mode,
            slots,
            completed: vec![false; inputs],
            warmed_up: false,
            done: false,
        }
    }

    /// The tuple to emit after a slot was filled, if any.
    fn emission(&mut self) -> Option<S::Output> {
        match self.mode {
            Mode::Sync if self.slots.is_full() => self.slots.take(),
            Mode::Combine if self.warmed_up || self.slots.is_full() => {
                self.warmed_up = true;
                self.slots.latest()
            }
            _ => None,
        }
    }

    /// Whether the join can never emit again once input `index` completed.
    fn exhausted_by(&self, index: usize) -> bool {
        match self.mode {
            Mode::Sync => !self.slots.is_filled(index),
            Mode::Combine => {
                self.completed.iter().all(|c| *c)
                    || (!self.warmed_up && !self.slots.is_filled(index))
            }
        }
    }
}

/// Observer for one input of a join.
struct Branch<S: Slots, V> {
    index: usize,
    state: Rc<RefCell<JoinState<S>>>,
    set: fn(&mut S, usize, V),
    out: Handle<S::Output>,
}

impl<S: Slots, V> Branch<S, V> {
    fn finish(&self) -> Result<()> {
        trace!("join finished after input {} completed", self.index);
        self.state.borrow_mut().done = true;
        self.out.complete()
    }
}

impl<S: Slots, V: 'static> Observer<V> for Branch<S, V> {
    fn next(&self, value: V) -> Result<Flow> {
        let (emission, mode) = {
            let mut state = self.state.borrow_mut();
            if state.done {
                return Ok(Flow::Done);
            }
            (self.set)(&mut state.slots, self.index, value);
            (state.emission(), state.mode)
        };
        let Some(tuple) = emission else {
            return Ok(Flow::Continue);
        };
        if self.out.next(tuple)?.is_done() {
            self.state.borrow_mut().done = true;
            return Ok(Flow::Done);
        }
        // A sync round consumed the last pending value of a completed input.
        let drained = mode == Mode::Sync && self.state.borrow().completed.iter().any(|c| *c);
        if drained {
            self.finish()?;
            return Ok(Flow::Done);
        }
        Ok(Flow::Continue)
    }

    fn fail(&self, error: EmitError) -> Result<()> {
        self.state.borrow_mut().done = true;
        self.out.fail(error)
    }

    fn complete(&self) -> Result<()> {
        let exhausted = {
            let mut state = self.state.borrow_mut();
            if state.done {
                return Ok(());
            }
            state.completed[self.index] = true;
            state.exhausted_by(self.index)
        };
        if exhausted {
            self.finish()
        } else {
            Ok(())
        }
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().done || self.out.is_closed()
    }
}

type Attach<S> = Rc<
    dyn Fn(usize, &Rc<RefCell<JoinState<S>>>, &Handle<<S as Slots>::Output>) -> Result<Subscription>,
>;

fn attach<S: Slots, V: 'static>(input: Emitter<V>, set: fn(&mut S, usize, V)) -> Attach<S> {
    Rc::new(move |index, state, out| {
        input.subscribe(Branch {
            index,
            state: Rc::clone(state),
            set,
            out: out.clone(),
        })
    })
}

fn join<S, F>(mode: Mode, make_slots: F, inputs: Vec<Attach<S>>) -> Emitter<S::Output>
where
    S: Slots,
    F: Fn() -> S + 'static,
{
    let links = Links::new();
    let held = links.clone();
    Emitter::create_with(
        move |out: Handle<S::Output>| {
            if inputs.is_empty() {
                return out.complete();
            }
            let state = Rc::new(RefCell::new(JoinState::new(
                mode,
                make_slots(),
                inputs.len(),
            )));
            let mut subscriptions = Vec::with_capacity(inputs.len());
            for (index, input) in inputs.iter().enumerate() {
                if out.is_closed() {
                    break;
                }
                match input(index, &state, &out) {
                    Ok(subscription) => subscriptions.push(subscription),
                    Err(e) => {
                        subscriptions.iter().for_each(Subscription::unsubscribe);
                        return Err(e);
                    }
                }
            }
            if out.is_closed() {
                subscriptions.iter().for_each(Subscription::unsubscribe);
            } else {
                held.hold(out.id(), subscriptions);
            }
            Ok(())
        },
        move |id| links.release(id),
    )
}

fn set_a<A, B>(slots: &mut Pair<A, B>, _index: usize, value: A) {
    slots.a = Some(value);
}

fn set_b<A, B>(slots: &mut Pair<A, B>, _index: usize, value: B) {
    slots.b = Some(value);
}

fn set_nth<T>(slots: &mut Many<T>, index: usize, value: T) {
    slots.0[index] = Some(value);
}

fn pair<A, B>(mode: Mode, a: Emitter<A>, b: Emitter<B>) -> Emitter<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    join(
        mode,
        || Pair { a: None, b: None },
        vec![attach(a, set_a::<A, B>), attach(b, set_b::<A, B>)],
    )
}

fn many<T: Clone + 'static>(mode: Mode, inputs: Vec<Emitter<T>>) -> Emitter<Vec<T>> {
    let count = inputs.len();
    join(
        mode,
        move || Many(vec![None; count]),
        inputs
            .into_iter()
            .map(|input| attach(input, set_nth::<T>))
            .collect(),
    )
}

/// Extension trait providing the binary joins.
pub trait SyncExt<T>: Sized {
    /// AND-joins `self` with `other`.
    ///
    /// A pair is emitted once both sides hold a pending value, and both slots
    /// are then emptied: every pair needs a fresh value from each side. A value
    /// arriving while its own slot is still pending replaces it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Subject;
    /// use emitrx_stream::SyncExt;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let (numbers, letters) = (Subject::new(), Subject::new());
    /// let pairs = Rc::new(RefCell::new(Vec::new()));
    /// let sink = pairs.clone();
    /// numbers
    ///     .emitter()
    ///     .sync_with(letters.emitter())
    ///     .for_each(move |p| sink.borrow_mut().push(p))
    ///     .unwrap();
    ///
    /// numbers.next(1).unwrap();
    /// letters.next("x").unwrap();
    /// numbers.next(2).unwrap();
    ///
    /// assert_eq!(*pairs.borrow(), vec![(1, "x")]);
    /// ```
    fn sync_with<U: Clone + 'static>(self, other: Emitter<U>) -> Emitter<(T, U)>;

    /// Joins `self` with `other`, then re-emits on every new value.
    ///
    /// The first pair waits for a value from both sides; afterwards every value
    /// from either side emits the latest pair.
    fn combine_with<U: Clone + 'static>(self, other: Emitter<U>) -> Emitter<(T, U)>;
}

impl<T: Clone + 'static> SyncExt<T> for Emitter<T> {
    fn sync_with<U: Clone + 'static>(self, other: Emitter<U>) -> Emitter<(T, U)> {
        pair(Mode::Sync, self, other)
    }

    fn combine_with<U: Clone + 'static>(self, other: Emitter<U>) -> Emitter<(T, U)> {
        pair(Mode::Combine, self, other)
    }
}

/// AND-joins any number of emitters of one type; see
/// [`sync_with`](SyncExt::sync_with).
///
/// No inputs completes immediately.
pub fn sync_all<T: Clone + 'static>(inputs: Vec<Emitter<T>>) -> Emitter<Vec<T>> {
    many(Mode::Sync, inputs)
}

/// Latest-value join of any number of emitters of one type; see
/// [`combine_with`](SyncExt::combine_with).
///
/// No inputs completes immediately.
pub fn combine_all<T: Clone + 'static>(inputs: Vec<Emitter<T>>) -> Emitter<Vec<T>> {
    many(Mode::Combine, inputs)
}
