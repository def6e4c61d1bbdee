// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Emitter, Subject};
use emitrx_stream::{BufferExt, Window};
use emitrx_test_utils::{Event, Recorder};

#[test]
fn test_buffer_count_with_overlap_slides_by_one() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec!['a', 'b', 'c', 'd'])
        .buffer(Window::Count(2), 1)
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next(vec!['a', 'b']),
            Event::Next(vec!['b', 'c']),
            Event::Next(vec!['c', 'd']),
            Event::Complete,
        ]
    );
    Ok(())
}

#[test]
fn test_buffer_count_emits_trailing_partial_window() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![1, 2, 3, 4])
        .buffer(Window::Count(3), 0)
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(recorder.values(), vec![vec![1, 2, 3], vec![4]]);
    assert!(recorder.is_completed());
    Ok(())
}

#[test]
fn test_buffer_count_caps_overlap_below_count() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![1, 2, 3])
        .buffer(Window::Count(2), 10)
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(recorder.values(), vec![vec![1, 2], vec![2, 3]]);
    Ok(())
}

#[test]
#[should_panic(expected = "at least 1")]
fn test_buffer_count_zero_panics() {
    let _ = Emitter::from_iter(vec![1]).buffer(Window::Count(0), 0);
}

#[test]
fn test_buffer_until_predicate_sees_window_with_new_value() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![1, 2, 0, 3, 0, 4])
        .buffer(Window::until(|v: &i32, _window: &[i32]| *v == 0), 0)
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(
        recorder.values(),
        vec![vec![1, 2, 0], vec![3, 0], vec![4]]
    );
    Ok(())
}

#[test]
fn test_buffer_until_predicate_on_window_sum() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    Emitter::from_iter(vec![3, 4, 5, 1, 9])
        .buffer(
            Window::until(|_: &i32, window: &[i32]| window.iter().sum::<i32>() >= 7),
            0,
        )
        .subscribe(recorder.clone())?;

    // Assert
    assert_eq!(recorder.values(), vec![vec![3, 4], vec![5, 1, 9]]);
    Ok(())
}

#[test]
fn test_buffer_on_emitter_closes_window_per_notification() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let notifier = Subject::<()>::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .buffer(Window::on(notifier.emitter()), 0)
        .subscribe(recorder.clone())?;

    // Act
    source.next(1)?;
    source.next(2)?;
    notifier.next(())?;
    notifier.next(())?;
    source.next(3)?;
    source.complete()?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next(vec![1, 2]),
            Event::Next(vec![3]),
            Event::Complete
        ]
    );
    assert_eq!(notifier.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_buffer_never_reemits_carried_overlap_alone() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let notifier = Subject::<()>::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .buffer(Window::on(notifier.emitter()), 1)
        .subscribe(recorder.clone())?;

    // Act
    source.next(1)?;
    source.next(2)?;
    notifier.next(())?;
    notifier.next(())?;
    source.next(3)?;
    notifier.next(())?;
    source.complete()?;

    // Assert
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next(vec![1, 2]),
            Event::Next(vec![2, 3]),
            Event::Complete
        ]
    );
    Ok(())
}
