// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push-based reactive emitters for single-threaded event loops.
//!
//! An [`Emitter`] is a lazy description of values delivered over time. Nothing
//! runs until a terminal operation subscribes; values are then pushed through
//! a chain of operators, and a consumer that has seen enough stops the whole
//! chain by answering [`Flow::Done`]. Hot sources such as timers and event
//! listeners are registered once, however many subscribers share them.
//!
//! # Example
//!
//! ```rust
//! use emitrx::prelude::*;
//!
//! let clicks = Subject::new();
//! let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//! let sink = log.clone();
//!
//! clicks
//!     .emitter()
//!     .filter(|x: &i32| *x < 600)
//!     .map(|x| x * 2)
//!     .head(2)
//!     .for_each(move |x| sink.borrow_mut().push(x))
//!     .unwrap();
//!
//! for x in [100, 700, 200, 300] {
//!     clicks.next(x).unwrap();
//! }
//! assert_eq!(*log.borrow(), vec![200, 400]);
//! ```
//!
//! # Crates
//!
//! - [`emitrx_core`]: the engine (emitters, pumps, multicast, awaitables)
//! - [`emitrx_stream`]: operators and joins
//! - [`emitrx_runtime`]: timers and future integration on real executors

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub use emitrx_core;
pub use emitrx_runtime;
pub use emitrx_stream;

// Re-export core types
pub use emitrx_core::{
    Awaitable, Consumer, Container, Deferred, EmitError, Emitter, Flow, Handle, Nested, Observer,
    PushSource, Result, ResultExt, Sequence, Subject, Subscription, Timer,
};

// Re-export operators
pub use emitrx_stream::{combine_all, merge, sync_all, Matcher, Window};

pub use emitrx_runtime::spawn_awaitable;
#[cfg(feature = "runtime-tokio")]
pub use emitrx_runtime::{spawn_deferred, TokioTimer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use emitrx_core::{
        Awaitable, Consumer, Deferred, EmitError, Emitter, Flow, Nested, Observer, PushSource,
        Subject, Subscription, Timer,
    };
    pub use emitrx_stream::prelude::*;
}
