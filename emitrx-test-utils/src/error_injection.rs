// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{EmitError, Emitter};

/// Replays `values` synchronously, then fails with `error` instead of completing.
pub fn values_then_error<T: Clone + 'static>(values: Vec<T>, error: EmitError) -> Emitter<T> {
    Emitter::create(move |handle| {
        for value in values.clone() {
            if handle.next(value)?.is_done() {
                return Ok(());
            }
        }
        handle.fail(error.clone())
    })
}

/// A user-callback failure with a recognisable message.
pub fn injected(message: &str) -> EmitError {
    EmitError::stream_error(format!("injected: {message}"))
}
