// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Every operator trait in one import.
//!
//! ```rust
//! use emitrx_core::Emitter;
//! use emitrx_stream::prelude::*;
//!
//! let result = Emitter::from_iter(1..=10)
//!     .filter(|v| v % 2 == 0)
//!     .map(|v| v * 10)
//!     .head(3)
//!     .collect();
//! assert_eq!(result.try_value().and_then(Result::ok), Some(vec![20, 40, 60]));
//! ```

pub use crate::accumulate::AccumulateExt;
pub use crate::buffer::{BufferExt, Window};
pub use crate::delay::DelayExt;
pub use crate::distinct::DistinctExt;
pub use crate::filter::FilterExt;
pub use crate::flatten::{FlattenExt, NestedExt};
pub use crate::join::{combine_all, sync_all, SyncExt};
pub use crate::map::MapExt;
pub use crate::map_async::MapAsyncExt;
pub use crate::matcher::{MatchExt, Matcher};
pub use crate::merge::{merge, MergeExt};
pub use crate::throttle::ThrottleExt;
pub use crate::until::UntilExt;
