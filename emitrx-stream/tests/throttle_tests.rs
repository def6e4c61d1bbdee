// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::Subject;
use emitrx_stream::ThrottleExt;
use emitrx_test_utils::{ManualTimer, Recorder};
use std::time::Duration;

const PERIOD: Duration = Duration::from_millis(16);

#[test]
fn test_throttle_emits_latest_value_per_tick() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let source = Subject::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .throttle(timer.clone(), PERIOD)
        .subscribe(recorder.clone())?;

    // Act
    source.next(1)?;
    source.next(2)?;
    timer.advance(PERIOD);
    source.next(3)?;
    source.next(4)?;
    timer.advance(PERIOD);

    // Assert
    assert_eq!(recorder.values(), vec![2, 4]);
    Ok(())
}

#[test]
fn test_throttle_quiet_tick_lets_next_value_through_on_arrival() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let source = Subject::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .throttle(timer.clone(), PERIOD)
        .subscribe(recorder.clone())?;

    // Act
    timer.advance(PERIOD);
    let after_quiet_tick = recorder.values();
    source.next(7)?;

    // Assert
    assert!(after_quiet_tick.is_empty());
    assert_eq!(recorder.values(), vec![7]);
    Ok(())
}

#[test]
fn test_throttle_completion_clears_the_clock() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let source = Subject::<i32>::new();
    let recorder = Recorder::new();
    source
        .emitter()
        .throttle(timer.clone(), PERIOD)
        .subscribe(recorder.clone())?;

    // Act
    source.complete()?;

    // Assert
    assert!(recorder.is_completed());
    assert_eq!(timer.registrations(), 1);
    assert_eq!(timer.cancellations(), 1);
    assert_eq!(timer.pending(), 0);
    Ok(())
}
