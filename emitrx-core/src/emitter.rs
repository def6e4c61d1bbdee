// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `Emitter` value: a lazily activated, push-driven sequence.

use crate::logging::{error, trace};
use crate::pump::{Forward, Pump, Step};
use crate::{
    Awaitable, Consumer, Container, Deferred, EmitError, Flow, Handle, Links, Observer, Result,
    Subscription, SubscriptionId,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Source<T> = Rc<dyn Fn(Handle<T>) -> Result<()>>;
type Teardown = Rc<dyn Fn(SubscriptionId)>;

/// An immutable description of a sequence of values delivered over time.
///
/// Building an `Emitter` does nothing: the source runs only when a terminal
/// operation subscribes, and it runs once per subscription. Clones share the
/// same description.
///
/// # Example
///
/// ```
/// use emitrx_core::Emitter;
///
/// let readings = Emitter::from_iter(vec![3, 1, 4]);
///
/// // Nothing runs until a terminal operation subscribes.
/// assert_eq!(readings.collect().try_value().and_then(Result::ok), Some(vec![3, 1, 4]));
/// // Each subscription replays the source.
/// assert_eq!(readings.first().try_value().and_then(Result::ok), Some(3));
/// ```
pub struct Emitter<T> {
    source: Source<T>,
    teardown: Option<Teardown>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            teardown: self.teardown.clone(),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

impl<T: 'static> Emitter<T> {
    /// Creates an emitter from a source function.
    ///
    /// `source` runs once per subscription with that subscription's handle. It may
    /// deliver synchronously or keep the handle and deliver later, and it must
    /// stop once [`Handle::next`] answers [`Flow::Done`].
    pub fn create<F>(source: F) -> Self
    where
        F: Fn(Handle<T>) -> Result<()> + 'static,
    {
        Self {
            source: Rc::new(source),
            teardown: None,
        }
    }

    /// Creates an emitter whose `done` hook runs when a subscription ends.
    ///
    /// `done` receives the id of the handle that was given to `source`.
    pub fn create_with<F, D>(source: F, done: D) -> Self
    where
        F: Fn(Handle<T>) -> Result<()> + 'static,
        D: Fn(SubscriptionId) + 'static,
    {
        Self {
            source: Rc::new(source),
            teardown: Some(Rc::new(done)),
        }
    }

    /// Activates one subscription driven by `step`, whose output goes to `out`.
    ///
    /// This is the building block of every operator and terminal operation.
    ///
    /// # Errors
    ///
    /// Returns an error raised synchronously during activation that no
    /// subscriber handled.
    pub fn pump<U, S>(&self, out: Handle<U>, step: S) -> Result<Subscription>
    where
        U: 'static,
        S: Step<T, U> + 'static,
    {
        let id = SubscriptionId::next();
        let teardown = self.teardown.clone();
        let pump = Rc::new(Pump::new(
            Box::new(step),
            out,
            Box::new(move || {
                if let Some(done) = teardown {
                    done(id);
                }
            }),
        ));
        let subscription = Subscription::new(pump.clone());
        if pump.start()?.is_continue() {
            if let Err(error) = (self.source)(Handle::from_rc(id, pump.clone())) {
                // Already settled: the error escaped downstream and is the caller's.
                if pump.state().is_terminal() {
                    return Err(error);
                }
                pump.fail(error)?;
            }
        }
        Ok(subscription)
    }

    /// Builds a derived emitter running a fresh step per subscription.
    ///
    /// Cancelling a downstream subscription cancels the matching upstream one
    /// right away instead of waiting for the next value.
    pub fn pipe<U, S, F>(&self, make_step: F) -> Emitter<U>
    where
        U: 'static,
        S: Step<T, U> + 'static,
        F: Fn() -> S + 'static,
    {
        let upstream = self.clone();
        let links = Links::new();
        let held = links.clone();
        Emitter::create_with(
            move |out: Handle<U>| {
                let id = out.id();
                let subscription = upstream.pump(out.clone(), make_step())?;
                if !out.is_closed() {
                    held.hold(id, vec![subscription]);
                }
                Ok(())
            },
            move |id| links.release(id),
        )
    }

    /// Subscribes `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error raised synchronously during activation that the
    /// observer did not handle.
    pub fn subscribe<O>(&self, observer: O) -> Result<Subscription>
    where
        O: Observer<T> + 'static,
    {
        self.pump(Handle::new(observer), Forward)
    }

    /// Calls `f` for every value. Errors are not handled and propagate back to
    /// the producer.
    ///
    /// # Errors
    ///
    /// Returns an error raised synchronously during activation.
    pub fn for_each<F>(&self, f: F) -> Result<Subscription>
    where
        F: FnMut(T) + 'static,
    {
        self.subscribe(Consumer::each(f))
    }

    /// Calls `f` for every value and `on_error` for the terminal error.
    ///
    /// # Errors
    ///
    /// Returns a re-entrancy error raised synchronously during activation.
    pub fn for_each_with<F, E>(&self, f: F, on_error: E) -> Result<Subscription>
    where
        F: FnMut(T) + 'static,
        E: FnMut(EmitError) + 'static,
    {
        self.subscribe(Consumer::each(f).on_error(on_error))
    }

    /// An emitter that completes immediately.
    pub fn empty() -> Self {
        Self::create(|handle| handle.complete())
    }

    /// An emitter that never delivers anything.
    pub fn never() -> Self {
        Self::create(|_| Ok(()))
    }

    /// An emitter that fails every subscriber with `error`.
    pub fn failed(error: EmitError) -> Self {
        Self::create(move |handle| handle.fail(error.clone()))
    }

    /// Replays `items` synchronously to each subscriber, then completes.
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
    {
        Self::create(move |handle| {
            for item in items.clone() {
                if handle.next(item)?.is_done() {
                    return Ok(());
                }
            }
            handle.complete()
        })
    }

    /// Delivers the settled outcome of `awaitable` to each subscriber.
    ///
    /// A resolved value is followed by completion; a rejection fails the
    /// subscriber.
    pub fn from_awaitable<A>(awaitable: A) -> Self
    where
        A: Awaitable<T> + Clone + 'static,
    {
        Self::create(move |handle| {
            awaitable.clone().on_settle(move |outcome| {
                let delivered = match outcome {
                    Ok(value) => handle.next(value).and_then(|_| handle.complete()),
                    Err(e) => handle.fail(e),
                };
                if let Err(e) = delivered {
                    error!("unhandled error after awaitable settled: {e}");
                }
            });
            Ok(())
        })
    }

    /// Builds a multicast emitter around an external resource.
    ///
    /// `activate` runs when the first subscriber arrives and `deactivate` when
    /// the last one leaves, however many subscribers there are in between. The
    /// activated resource pushes into the [`Container`] it is given.
    pub fn shared<A, D>(activate: A, deactivate: D) -> Self
    where
        A: Fn(&Container<T>) -> Result<()> + 'static,
        D: Fn() + 'static,
    {
        let container = Container::new();
        let registry = container.clone();
        Self::create_with(
            move |handle: Handle<T>| {
                let id = handle.id();
                if container.add(handle) {
                    trace!("multicast source activated");
                    if let Err(error) = activate(&container) {
                        // Never activated, so there is nothing to deactivate.
                        container.remove(id);
                        return Err(error);
                    }
                }
                Ok(())
            },
            move |id| {
                if registry.remove(id) {
                    trace!("multicast source deactivated");
                    deactivate();
                }
            },
        )
    }
}

impl<T: Clone + 'static> Emitter<T> {
    /// A single value followed by completion.
    pub fn value(value: T) -> Self {
        Self::from_iter(std::iter::once(value))
    }

    /// Shares one subscription to this emitter among all subscribers.
    ///
    /// The upstream is subscribed when the first subscriber arrives and
    /// cancelled when the last one leaves.
    pub fn share(&self) -> Self {
        let upstream = self.clone();
        let link: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let held = Rc::clone(&link);
        Self::shared(
            move |container| {
                let subscription = upstream.subscribe(Relay {
                    container: container.clone(),
                })?;
                *held.borrow_mut() = Some(subscription);
                Ok(())
            },
            move || {
                let subscription = link.borrow_mut().take();
                if let Some(subscription) = subscription {
                    subscription.unsubscribe();
                }
            },
        )
    }

    /// Settles with the first value.
    ///
    /// Rejects with the sequence's error, or with [`EmitError::EmptySequence`]
    /// when it completes first.
    pub fn first(&self) -> Deferred<T> {
        let deferred = Deferred::new();
        let on_value = deferred.clone();
        let on_error = deferred.clone();
        let on_complete = deferred.clone();
        let consumer = Consumer::new(move |value| {
            on_value.resolve(value);
            Ok(Flow::Done)
        })
        .on_error(move |e| {
            on_error.reject(e);
        })
        .on_complete(move || {
            on_complete.reject(EmitError::EmptySequence);
        });
        if let Err(e) = self.subscribe(consumer) {
            deferred.reject(e);
        }
        deferred
    }

    /// Settles with every value once the sequence completes.
    pub fn collect(&self) -> Deferred<Vec<T>> {
        let deferred = Deferred::new();
        let items = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&items);
        let on_error = deferred.clone();
        let on_complete = deferred.clone();
        let consumer = Consumer::each(move |value| sink.borrow_mut().push(value))
            .on_error(move |e| {
                on_error.reject(e);
            })
            .on_complete(move || {
                on_complete.resolve(items.take());
            });
        if let Err(e) = self.subscribe(consumer) {
            deferred.reject(e);
        }
        deferred
    }
}

/// Forwards one upstream subscription into a container.
struct Relay<T> {
    container: Container<T>,
}

impl<T: Clone + 'static> Observer<T> for Relay<T> {
    fn next(&self, value: T) -> Result<Flow> {
        self.container.next(value)?;
        if self.container.is_empty() {
            Ok(Flow::Done)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn fail(&self, error: EmitError) -> Result<()> {
        self.container.fail(error)
    }

    fn complete(&self) -> Result<()> {
        self.container.complete()
    }
}
