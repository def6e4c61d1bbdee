// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the emitrx push-stream library.
//!
//! Everything here is single-threaded and deterministic: time only moves when
//! a test advances a [`ManualTimer`], and events only happen when a test fires
//! a [`TestListener`].
//!
//! # Key Types
//!
//! - [`ManualTimer`] - a virtual clock implementing `emitrx_core::Timer`
//! - [`Recorder`] - an observer logging every value, error and completion
//! - [`TestListener`] - a register/unregister event target counting its listeners
//! - [`test_data`] - pointer events and points for the pointer-follow scenarios
//!
//! # Example
//!
//! ```rust
//! use emitrx_core::Emitter;
//! use emitrx_test_utils::{Event, Recorder};
//!
//! let recorder = Recorder::new();
//! Emitter::from_iter(vec![1, 2]).subscribe(recorder.clone()).unwrap();
//!
//! assert_eq!(
//!     recorder.events(),
//!     vec![Event::Next(1), Event::Next(2), Event::Complete]
//! );
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod manual_timer;
pub mod point;
pub mod recorder;
pub mod test_data;
pub mod test_listener;

pub use error_injection::{injected, values_then_error};
pub use manual_timer::ManualTimer;
pub use point::Point;
pub use recorder::{Event, Recorder};
pub use test_data::{DataVariant, TestData};
pub use test_listener::TestListener;
