// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{EmitError, Emitter, Subject};
use emitrx_stream::MapExt;
use emitrx_test_utils::{injected, Event, Recorder};

#[test]
fn test_map_transforms_values_in_order() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![1, 2, 3])
        .map(|v| format!("#{v}"))
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next("#1".to_string()),
            Event::Next("#2".to_string()),
            Event::Next("#3".to_string()),
            Event::Complete,
        ]
    );
    Ok(())
}

#[test]
fn test_map_chains_compose() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .map(|v: i32| v + 1)
        .map(|v| v * 10)
        .subscribe(recorder.clone())?;

    // Act
    source.next(1)?;
    source.next(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![20, 30]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_try_map_error_fails_subscription() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![1, 2, 3])
        .try_map(|v| {
            if v == 2 {
                Err(injected("two"))
            } else {
                Ok(v)
            }
        })
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next(1),
            Event::Error("Stream processing error: injected: two".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_unhandled_map_error_returns_to_caller() {
    // Arrange
    let mapped = Emitter::from_iter(vec![1]).try_map(|_| Err::<i32, _>(injected("boom")));

    // Act
    let result = mapped.for_each(|_| {});

    // Assert
    assert!(matches!(
        result,
        Err(EmitError::StreamProcessingError { .. })
    ));
}
