// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

// Conditional logging shim: uses `tracing` when enabled, falls back to eprintln!

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::error!($($arg)*);
        }
        #[cfg(not(feature = "tracing"))]
        {
            eprintln!($($arg)*);
        }
    }};
}

macro_rules! warning {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::warn!($($arg)*);
        }
        #[cfg(not(feature = "tracing"))]
        {
            eprintln!($($arg)*);
        }
    }};
}

// Lifecycle chatter is only worth recording when a subscriber is installed.
macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
    }};
}

pub(crate) use error;
pub(crate) use trace;
pub(crate) use warning;
