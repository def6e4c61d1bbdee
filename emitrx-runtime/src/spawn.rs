// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Deferred, IntoEmitError, Result};
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::future::Future;

/// Spawns `future` on `spawner` and returns a [`Deferred`] settled with its
/// output.
///
/// The result plugs into `Emitter::from_awaitable` and `map_async` like any
/// other awaitable.
///
/// # Errors
///
/// Returns an error when the spawner refuses the task, typically because it
/// was shut down.
///
/// # Examples
///
/// ```rust
/// use emitrx_runtime::spawn_awaitable;
/// use futures::executor::LocalPool;
///
/// let mut pool = LocalPool::new();
/// let answer = spawn_awaitable(&pool.spawner(), async { Ok(42) }).unwrap();
/// assert!(!answer.is_settled());
///
/// pool.run_until_stalled();
/// assert_eq!(answer.try_value().and_then(Result::ok), Some(42));
/// ```
pub fn spawn_awaitable<T, F, S>(spawner: &S, future: F) -> Result<Deferred<T>>
where
    T: Clone + 'static,
    F: Future<Output = Result<T>> + 'static,
    S: LocalSpawn + ?Sized,
{
    let deferred = Deferred::new();
    let settle = deferred.clone();
    spawner
        .spawn_local(async move {
            settle.settle(future.await);
        })
        .map_err(|e| e.into_emit_error("failed to spawn awaitable"))?;
    Ok(deferred)
}
