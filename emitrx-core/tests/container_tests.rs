// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Container, EmitError, Handle};
use emitrx_test_utils::{injected, Recorder};

#[test]
fn test_add_and_remove_report_only_transitions() {
    // Arrange
    let container = Container::new();
    let a = Handle::new(Recorder::<i32>::new());
    let b = Handle::new(Recorder::<i32>::new());

    // Act & Assert
    assert!(container.add(a.clone()));
    assert!(!container.add(b.clone()));
    assert_eq!(container.len(), 2);
    assert!(!container.remove(a.id()));
    assert!(!container.remove(a.id()));
    assert!(container.remove(b.id()));
    assert!(container.is_empty());
}

#[test]
fn test_broadcast_prunes_finished_handles() -> anyhow::Result<()> {
    // Arrange
    let container = Container::new();
    let once = Recorder::new().cancel_after(1);
    let always = Recorder::new();
    container.add(Handle::new(once.clone()));
    container.add(Handle::new(always.clone()));

    // Act
    container.next(1)?;
    container.next(2)?;

    // Assert
    assert_eq!(once.values(), vec![1]);
    assert_eq!(always.values(), vec![1, 2]);
    assert_eq!(container.len(), 1);
    Ok(())
}

#[test]
fn test_failure_reaches_every_handle_despite_rethrow() {
    // Arrange
    let container = Container::<i32>::new();
    let rethrowing = Recorder::new().rethrow();
    let handling = Recorder::new();
    container.add(Handle::new(rethrowing.clone()));
    container.add(Handle::new(handling.clone()));

    // Act
    let result = container.fail(injected("broadcast"));

    // Assert
    assert_eq!(rethrowing.errors().len(), 1);
    assert_eq!(handling.errors().len(), 1);
    assert!(matches!(
        result,
        Err(EmitError::StreamProcessingError { .. })
    ));
    assert!(container.is_empty());
}

#[test]
fn test_several_escalations_are_aggregated() {
    // Arrange
    let container = Container::<i32>::new();
    container.add(Handle::new(Recorder::new().rethrow()));
    container.add(Handle::new(Recorder::new().rethrow()));

    // Act
    let result = container.fail(injected("twice"));

    // Assert
    assert!(matches!(
        result,
        Err(EmitError::MultipleErrors { count: 2, .. })
    ));
}

#[test]
fn test_complete_closes_every_handle() -> anyhow::Result<()> {
    // Arrange
    let container = Container::new();
    let a = Recorder::<i32>::new();
    let b = Recorder::<i32>::new();
    container.add(Handle::new(a.clone()));
    container.add(Handle::new(b.clone()));

    // Act
    container.complete()?;
    container.next(1)?;

    // Assert
    assert!(a.is_completed() && b.is_completed());
    assert!(a.values().is_empty());
    assert!(container.is_empty());
    Ok(())
}
