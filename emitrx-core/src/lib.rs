// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

mod logging;

pub mod awaitable;
pub mod container;
pub mod emitter;
pub mod error;
pub mod flow;
pub mod handle;
pub mod observer;
pub mod pump;
pub mod sequence;
pub mod sources;
pub mod subject;
pub mod subscription;
pub mod timer;

pub use self::awaitable::{Awaitable, Deferred};
pub use self::container::Container;
pub use self::emitter::Emitter;
pub use self::error::{EmitError, IntoEmitError, Result, ResultExt};
pub use self::flow::{Drain, Flow};
pub use self::handle::{Handle, SubscriptionId};
pub use self::observer::{Consumer, Observer, Unrouted};
pub use self::pump::{step_fn, Forward, PumpState, Step};
pub use self::sequence::{Nested, Sequence};
pub use self::sources::PushSource;
pub use self::subject::Subject;
pub use self::subscription::{Links, Subscription};
pub use self::timer::{sleep, Timer, TimerToken};
