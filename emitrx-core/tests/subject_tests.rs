// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{EmitError, Subject};
use emitrx_test_utils::{injected, Event, Recorder};

#[test]
fn test_subject_broadcasts_to_multiple_subscribers() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::new();
    let (a, b) = (Recorder::new(), Recorder::new());
    subject.emitter().subscribe(a.clone())?;
    subject.emitter().subscribe(b.clone())?;

    // Act
    subject.next(1)?;

    // Assert
    assert_eq!(a.values(), vec![1]);
    assert_eq!(b.values(), vec![1]);
    assert_eq!(subject.subscriber_count(), 2);
    Ok(())
}

#[test]
fn test_subject_does_not_replay_to_late_subscribers() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::new();
    subject.next(1)?;
    let late = Recorder::new();

    // Act
    subject.emitter().subscribe(late.clone())?;
    subject.next(2)?;

    // Assert
    assert_eq!(late.values(), vec![2]);
    Ok(())
}

#[test]
fn test_subject_error_reaches_all_and_closes() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    let (a, b) = (Recorder::new(), Recorder::new());
    subject.emitter().subscribe(a.clone())?;
    subject.emitter().subscribe(b.clone())?;

    // Act
    subject.error(injected("subject"))?;

    // Assert
    assert_eq!(a.errors().len(), 1);
    assert_eq!(b.errors().len(), 1);
    assert!(subject.is_closed());
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_next_after_complete_returns_error() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::new();
    subject.complete()?;

    // Act
    let result = subject.next(1);

    // Assert
    assert!(matches!(result, Err(EmitError::SubjectClosed)));
    Ok(())
}

#[test]
fn test_subscribing_to_closed_subject_completes_immediately() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::<i32>::new();
    subject.complete()?;
    let recorder = Recorder::new();

    // Act
    subject.emitter().subscribe(recorder.clone())?;

    // Assert
    assert_eq!(recorder.events(), vec![Event::Complete]);
    Ok(())
}

#[test]
fn test_unsubscribe_removes_subscriber() -> anyhow::Result<()> {
    // Arrange
    let subject = Subject::new();
    let (a, b) = (Recorder::new(), Recorder::new());
    let a_sub = subject.emitter().subscribe(a.clone())?;
    subject.emitter().subscribe(b.clone())?;

    // Act
    a_sub.unsubscribe();
    subject.next(3)?;

    // Assert
    assert_eq!(subject.subscriber_count(), 1);
    assert!(a.values().is_empty());
    assert_eq!(b.values(), vec![3]);
    Ok(())
}
