// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Outcome of delivering one value downstream.
///
/// `Done` is the backward cancellation signal: the producer must not deliver
/// again on the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// The consumer wants more values
    Continue,
    /// The consumer is finished; stop delivering
    Done,
}

impl Flow {
    /// Returns `true` if this is `Done`.
    pub const fn is_done(self) -> bool {
        matches!(self, Flow::Done)
    }

    /// Returns `true` if this is `Continue`.
    pub const fn is_continue(self) -> bool {
        matches!(self, Flow::Continue)
    }
}

/// What a step wants once its upstream is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drain {
    /// Complete the downstream now
    Complete,
    /// Work is still in flight; the step completes the downstream itself later
    Pending,
}
