// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Event-loop bindings for emitrx.
//!
//! The core engine only knows the [`Timer`](emitrx_core::Timer) and
//! [`Awaitable`](emitrx_core::Awaitable) contracts. This crate fulfils them on
//! real executors: a tokio-backed timer for `LocalSet` tasks, and a bridge that
//! runs any future on a local spawner and exposes its output as a
//! [`Deferred`](emitrx_core::Deferred).

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
mod logging;

pub mod impls;
pub mod spawn;

#[cfg(feature = "runtime-tokio")]
pub use impls::tokio::{spawn_deferred, TokioTimer};
pub use spawn::spawn_awaitable;
