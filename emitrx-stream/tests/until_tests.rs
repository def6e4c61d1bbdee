// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Emitter, Handle, Subject};
use emitrx_stream::UntilExt;
use emitrx_test_utils::{Event, Recorder};
use std::cell::Cell;
use std::rc::Rc;

fn counted(pulled: Rc<Cell<usize>>) -> Emitter<i32> {
    Emitter::create(move |handle: Handle<i32>| {
        for v in 1..=10 {
            pulled.set(pulled.get() + 1);
            if handle.next(v)?.is_done() {
                return Ok(());
            }
        }
        handle.complete()
    })
}

#[test]
fn test_until_excludes_matching_value_and_completes() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![1, 2, 3, 4])
        .until(|v| *v == 3)
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![Event::Next(1), Event::Next(2), Event::Complete]
    );
    Ok(())
}

#[test]
fn test_until_stops_upstream() -> anyhow::Result<()> {
    // Arrange
    let pulled = Rc::new(Cell::new(0));

    // Act
    counted(pulled.clone())
        .until(|v| *v == 3)
        .subscribe(Recorder::new())?;

    // Assert
    assert_eq!(pulled.get(), 3);
    Ok(())
}

#[test]
fn test_until_emitter_completes_on_notification() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let stop = Subject::<()>::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .until_emitter(stop.emitter())
        .subscribe(recorder.clone())?;
    source.next(1)?;
    source.next(2)?;

    // Act
    stop.next(())?;
    source.next(3)?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![Event::Next(1), Event::Next(2), Event::Complete]
    );
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(stop.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_until_emitter_ignores_silent_notifier_completion() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .until_emitter(Emitter::<()>::empty())
        .subscribe(recorder.clone())?;

    // Act
    source.next(1)?;

    // Assert
    assert_eq!(recorder.events(), vec![Event::Next(1)]);
    Ok(())
}

#[test]
fn test_head_takes_first_values() -> anyhow::Result<()> {
    // Arrange
    let pulled = Rc::new(Cell::new(0));
    let recorder = Recorder::new();

    // Act
    counted(pulled.clone()).head(2).subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![Event::Next(1), Event::Next(2), Event::Complete]
    );
    assert_eq!(pulled.get(), 2);
    Ok(())
}

#[test]
fn test_head_zero_never_activates_upstream() -> anyhow::Result<()> {
    // Arrange
    let pulled = Rc::new(Cell::new(0));
    let recorder = Recorder::new();

    // Act
    counted(pulled.clone()).head(0).subscribe(recorder.clone())?;

    // Assert
    assert_eq!(recorder.events(), vec![Event::Complete]);
    assert_eq!(pulled.get(), 0);
    Ok(())
}
