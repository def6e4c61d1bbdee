// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Awaitable, Deferred, EmitError};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_listeners_run_in_registration_order() {
    // Arrange
    let deferred = Deferred::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in ["a", "b"] {
        let log = log.clone();
        deferred
            .clone()
            .on_settle(move |outcome: Result<i32, EmitError>| {
                log.borrow_mut().push((name, outcome.ok()));
            });
    }

    // Act
    deferred.resolve(3);

    // Assert
    assert_eq!(*log.borrow(), vec![("a", Some(3)), ("b", Some(3))]);
}

#[test]
fn test_late_listener_runs_synchronously() {
    // Arrange
    let deferred = Deferred::resolved(9);
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();

    // Act
    deferred.on_settle(move |outcome| *sink.borrow_mut() = outcome.ok());

    // Assert
    assert_eq!(*seen.borrow(), Some(9));
}

#[test]
fn test_only_first_settlement_counts() {
    // Arrange
    let deferred = Deferred::new();

    // Act
    let first = deferred.resolve(1);
    let second = deferred.reject(EmitError::stream_error("late"));

    // Assert
    assert!(first);
    assert!(!second);
    assert_eq!(deferred.try_value().and_then(Result::ok), Some(1));
}

#[test]
fn test_deferred_is_a_future() -> anyhow::Result<()> {
    // Arrange
    let deferred = Deferred::new();
    let mut pool = LocalPool::new();
    let result = Rc::new(RefCell::new(None));
    let sink = result.clone();
    let waiting = deferred.clone();
    pool.spawner().spawn_local(async move {
        *sink.borrow_mut() = waiting.await.ok();
    })?;
    pool.run_until_stalled();
    assert_eq!(*result.borrow(), None);

    // Act
    deferred.resolve("ready");
    pool.run_until_stalled();

    // Assert
    assert_eq!(*result.borrow(), Some("ready"));
    assert_eq!(block_on(deferred).ok(), Some("ready"));
    Ok(())
}
