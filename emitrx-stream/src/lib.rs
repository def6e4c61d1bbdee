// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Operators and joins for emitrx push streams.
//!
//! Every operator is an extension trait on [`Emitter`](emitrx_core::Emitter)
//! built from a [`Step`](emitrx_core::Step): a small state machine that
//! processes one upstream value per resume. Operators are lazy; chaining them
//! only describes a pipeline, and each subscription runs its own fresh copy of
//! every step.
//!
//! ## Operator Categories
//!
//! ### Transformation Operators
//!
//! - **[`map`](MapExt::map)** / **[`try_map`](MapExt::try_map)**: Transform each value
//! - **[`map_async`](MapAsyncExt::map_async)**: Transform through an awaitable, preserving input order
//! - **[`accumulate`](AccumulateExt::accumulate)**: Running fold, emitting every intermediate state
//! - **[`buffer`](BufferExt::buffer)**: Group consecutive values into windows
//!
//! ### Filtering Operators
//!
//! - **[`filter`](FilterExt::filter)**: Keep values passing a predicate
//! - **[`filter_by`](FilterExt::filter_by)**: Keep values while a boolean emitter is `true`
//! - **[`distinct`](DistinctExt::distinct)**: Drop consecutive duplicates
//! - **[`until`](UntilExt::until)** / **[`head`](UntilExt::head)**: Terminate early
//!
//! ### Time Operators
//!
//! - **[`delay`](DelayExt::delay)**: Shift every value by a fixed duration
//! - **[`throttle`](ThrottleExt::throttle)**: Sample the latest value against a clock
//!
//! ### Combination Operators
//!
//! - **[`sync_with`](SyncExt::sync_with)** / **[`sync_all`]**: AND-join, one fresh value per input per round
//! - **[`combine_with`](SyncExt::combine_with)** / **[`combine_all`]**: Latest values after the first full round
//! - **[`merge`]** / **[`merge_with`](MergeExt::merge_with)**: Interleave
//! - **[`flatten`](FlattenExt::flatten)** / **[`flatten_depth`](NestedExt::flatten_depth)**: Unroll nested sequences
//!
//! ### Terminal Operators
//!
//! - **[`match_with`](MatchExt::match_with)**: Dispatch values to independent branches
//!
//! # Example
//!
//! ```rust
//! use emitrx_core::Emitter;
//! use emitrx_stream::prelude::*;
//!
//! let totals = Emitter::from_iter(vec![1, 1, 2, 3, 3])
//!     .distinct()
//!     .accumulate(|sum, v| sum + v, 0)
//!     .collect();
//! assert_eq!(totals.try_value().and_then(Result::ok), Some(vec![1, 3, 6]));
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
mod logging;

pub mod accumulate;
pub mod buffer;
pub mod delay;
pub mod distinct;
pub mod filter;
pub mod flatten;
pub mod join;
pub mod map;
pub mod map_async;
pub mod matcher;
pub mod merge;
pub mod prelude;
pub mod throttle;
pub mod until;

pub use accumulate::AccumulateExt;
pub use buffer::{BufferExt, Window};
pub use delay::DelayExt;
pub use distinct::DistinctExt;
pub use filter::FilterExt;
pub use flatten::{FlattenExt, NestedExt};
pub use join::{combine_all, sync_all, SyncExt};
pub use map::MapExt;
pub use map_async::MapAsyncExt;
pub use matcher::{MatchExt, Matcher};
pub use merge::{merge, MergeExt};
pub use throttle::ThrottleExt;
pub use until::UntilExt;
