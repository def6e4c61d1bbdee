// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the emitrx push-stream engine
//!
//! Errors travel the same chain as values but on a separate channel
//! ([`Observer::fail`](crate::Observer::fail)). An error that reaches a terminal
//! consumer without an error handler is handed back to whoever pushed the value
//! or error that caused it, as the `Err` side of the delivery call.
//!
//! # Examples
//!
//! ```
//! use emitrx_core::{EmitError, Result};
//!
//! fn validate(reading: i32) -> Result<i32> {
//!     if reading < 0 {
//!         return Err(EmitError::stream_error("negative reading"));
//!     }
//!     Ok(reading)
//! }
//!
//! assert!(validate(-1).is_err());
//! ```

use std::sync::Arc;

/// Root error type for all emitrx operations
///
/// `EmitError` is cheap to clone: a failing multicast source hands a copy to
/// every registered subscriber.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmitError {
    /// Stream processing encountered an error
    ///
    /// General failure raised by a source or an operator.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// Error raised by a user-supplied callback
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Several subscribers failed during one broadcast
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors
        errors: Vec<EmitError>,
    },

    /// A value was pushed into a step that was still processing the previous one
    #[error("Re-entrant delivery into a running step")]
    ReentrantDelivery,

    /// A sequence completed before producing the value a terminal operation waited for
    #[error("Sequence completed without emitting a value")]
    EmptySequence,

    /// A value or error was pushed into a subject that was already closed
    #[error("Subject is closed")]
    SubjectClosed,
}

impl EmitError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Folds the errors collected during a broadcast into a single result.
    ///
    /// No errors is `Ok(())`, a single error is returned as-is and anything more
    /// is wrapped into [`EmitError::MultipleErrors`].
    ///
    /// # Errors
    ///
    /// Returns `Err` whenever `errors` is not empty.
    pub fn aggregate(mut errors: Vec<EmitError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => Err(Self::MultipleErrors { count, errors }),
        }
    }

    /// Check if this error was produced by user code
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::UserError(_))
    }

    /// Check if this error indicates a misuse of the engine rather than a data failure
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::ReentrantDelivery | Self::SubjectClosed)
    }
}

/// Specialized Result type for emitrx operations
pub type Result<T> = std::result::Result<T, EmitError>;

/// Extension trait for converting errors into `EmitError`
pub trait IntoEmitError {
    /// Convert this error into an `EmitError` with additional context
    fn into_emit_error(self, context: &str) -> EmitError;

    /// Convert this error into an `EmitError` without additional context
    fn into_emit(self) -> EmitError
    where
        Self: Sized,
    {
        self.into_emit_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoEmitError for E {
    fn into_emit_error(self, context: &str) -> EmitError {
        if context.is_empty() {
            EmitError::user_error(self)
        } else {
            EmitError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(EmitError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(EmitError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EmitError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            EmitError::UserError(inner) => EmitError::StreamProcessingError {
                context: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}
