// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Emitter, Subject};
use emitrx_stream::{merge, MergeExt};
use emitrx_test_utils::{injected, Event, Recorder};

#[test]
fn test_merge_interleaves_in_delivery_order() -> anyhow::Result<()> {
    // Arrange
    let (a, b) = (Subject::new(), Subject::new());
    let recorder = Recorder::new();
    a.emitter()
        .merge_with(b.emitter())
        .subscribe(recorder.clone())?;

    // Act
    b.next("b1")?;
    a.next("a1")?;
    b.next("b2")?;

    // Assert
    assert_eq!(recorder.values(), vec!["b1", "a1", "b2"]);
    Ok(())
}

#[test]
fn test_merge_completes_after_every_input() -> anyhow::Result<()> {
    // Arrange
    let live = Subject::new();
    let recorder = Recorder::new();
    merge(vec![Emitter::from_iter(vec![1, 2]), live.emitter()]).subscribe(recorder.clone())?;

    // Act
    live.next(3)?;
    let before = recorder.is_completed();
    live.complete()?;

    // Assert
    assert!(!before);
    assert_eq!(
        recorder.events(),
        vec![Event::Next(1), Event::Next(2), Event::Next(3), Event::Complete]
    );
    Ok(())
}

#[test]
fn test_merge_error_from_any_input_fails() -> anyhow::Result<()> {
    // Arrange
    let (a, b) = (Subject::<i32>::new(), Subject::<i32>::new());
    let recorder = Recorder::new();
    merge(vec![a.emitter(), b.emitter()]).subscribe(recorder.clone())?;

    // Act
    b.error(injected("merge"))?;
    a.next(1)?;

    // Assert
    assert_eq!(recorder.values(), Vec::<i32>::new());
    assert_eq!(recorder.errors().len(), 1);
    assert_eq!(a.subscriber_count(), 0);
    Ok(())
}
