// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{Emitter, Subject};
use emitrx_stream::DelayExt;
use emitrx_test_utils::{injected, Event, ManualTimer, Recorder};
use std::time::Duration;

const STEP: Duration = Duration::from_millis(10);

#[test]
fn test_delay_holds_values_until_due() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let recorder = Recorder::new();
    Emitter::from_iter(vec![1, 2, 3])
        .delay(timer.clone(), STEP)
        .subscribe(recorder.clone())?;
    let before = recorder.events();

    // Act
    timer.advance(STEP);

    // Assert
    assert!(before.is_empty());
    assert_eq!(
        recorder.events(),
        vec![Event::Next(1), Event::Next(2), Event::Next(3), Event::Complete]
    );
    Ok(())
}

#[test]
fn test_delay_is_measured_per_value() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let source = Subject::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .delay(timer.clone(), STEP)
        .subscribe(recorder.clone())?;

    // Act
    source.next("early")?;
    timer.advance(Duration::from_millis(5));
    source.next("late")?;
    timer.advance(Duration::from_millis(5));
    let at_ten = recorder.values();
    timer.advance(Duration::from_millis(5));

    // Assert
    assert_eq!(at_ten, vec!["early"]);
    assert_eq!(recorder.values(), vec!["early", "late"]);
    assert_eq!(timer.registrations(), 2);
    Ok(())
}

#[test]
fn test_delay_error_waits_behind_delayed_values() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let source = Subject::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .delay(timer.clone(), STEP)
        .subscribe(recorder.clone())?;

    // Act
    source.next(1)?;
    source.error(injected("late"))?;
    let before = recorder.events();
    timer.advance(STEP);

    // Assert
    assert!(before.is_empty());
    assert_eq!(
        recorder.events(),
        vec![
            Event::Next(1),
            Event::Error("Stream processing error: injected: late".to_string()),
        ]
    );
    Ok(())
}
