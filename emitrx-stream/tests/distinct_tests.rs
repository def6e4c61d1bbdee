// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Emitter, Subject};
use emitrx_stream::{DistinctExt, MapExt};
use emitrx_test_utils::test_data::move_to;
use emitrx_test_utils::{injected, values_then_error, Event, Recorder};

#[test]
fn test_distinct_drops_consecutive_duplicates() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let recorder = Recorder::new();
    source.emitter().distinct().subscribe(recorder.clone())?;

    // Act
    for v in [1, 1, 2, 2, 1, 3, 3] {
        source.next(v)?;
    }

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 1, 3]);
    Ok(())
}

#[test]
fn test_distinct_compares_whole_values() -> anyhow::Result<()> {
    // Arrange
    let moves = vec![move_to(1, 1), move_to(1, 1), move_to(2, 1), move_to(2, 1)];
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(moves)
        .distinct()
        .map(|event| event.point().x)
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    Ok(())
}

#[test]
fn test_distinct_propagates_errors() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    values_then_error(vec![5, 5], injected("late"))
        .distinct()
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next(5),
            Event::Error("Stream processing error: injected: late".to_string()),
        ]
    );
    Ok(())
}
