// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx::prelude::*;
use emitrx_test_utils::{Event, ManualTimer, Recorder, TestListener};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[test]
fn test_map_preserves_push_order() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let recorder = Recorder::new();
    source.emitter().map(|v: i32| v * 10).subscribe(recorder.clone())?;

    // Act
    for v in [3, 1, 4, 1, 5] {
        source.next(v)?;
    }

    // Assert
    assert_eq!(recorder.values(), vec![30, 10, 40, 10, 50]);
    Ok(())
}

#[test]
fn test_map_async_emits_in_input_order_despite_reversed_resolution() -> anyhow::Result<()> {
    // Arrange
    let source = Subject::new();
    let in_flight: Rc<RefCell<Vec<Deferred<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let created = in_flight.clone();
    let recorder = Recorder::new();
    source
        .emitter()
        .map_async(move |_: i32| {
            let deferred = Deferred::new();
            created.borrow_mut().push(deferred.clone());
            deferred
        })
        .subscribe(recorder.clone())?;
    source.next(1)?;
    source.next(2)?;

    // Act
    let (first, second) = {
        let pending = in_flight.borrow();
        (pending[0].clone(), pending[1].clone())
    };
    second.resolve("f(2)".to_string());
    let before_first = recorder.values();
    first.resolve("f(1)".to_string());

    // Assert
    assert!(before_first.is_empty());
    assert_eq!(recorder.values(), vec!["f(1)".to_string(), "f(2)".to_string()]);
    Ok(())
}

#[test]
fn test_shared_interval_registers_once_for_three_subscribers() -> anyhow::Result<()> {
    // Arrange
    let timer = ManualTimer::new();
    let ticks = Emitter::interval(timer.clone(), Duration::from_millis(10));
    let recorders = [Recorder::new(), Recorder::new(), Recorder::new()];

    // Act
    let subscriptions = recorders
        .iter()
        .map(|r| ticks.subscribe(r.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    timer.advance(Duration::from_millis(10));

    // Assert
    assert_eq!(timer.registrations(), 1);
    for recorder in &recorders {
        assert_eq!(recorder.values(), vec![0]);
    }
    subscriptions[0].unsubscribe();
    subscriptions[1].unsubscribe();
    assert_eq!(timer.cancellations(), 0);
    subscriptions[2].unsubscribe();
    assert_eq!(timer.cancellations(), 1);
    assert_eq!(timer.pending(), 0);
    Ok(())
}

#[test]
fn test_sync_needs_fresh_value_from_both_sides() -> anyhow::Result<()> {
    // Arrange
    let (a, b) = (Subject::new(), Subject::new());
    let recorder = Recorder::new();
    a.emitter().sync_with(b.emitter()).subscribe(recorder.clone())?;

    // Act
    a.next(1)?;
    b.next("x")?;
    a.next(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![(1, "x")]);
    b.next("y")?;
    assert_eq!(recorder.values(), vec![(1, "x"), (2, "y")]);
    Ok(())
}

#[test]
fn test_combine_waits_for_both_then_emits_on_either() -> anyhow::Result<()> {
    // Arrange
    let (a, b) = (Subject::new(), Subject::new());
    let recorder = Recorder::new();
    a.emitter().combine_with(b.emitter()).subscribe(recorder.clone())?;

    // Act
    a.next(1)?;
    a.next(2)?;
    b.next("x")?;
    a.next(3)?;
    b.next("y")?;

    // Assert
    assert_eq!(recorder.values(), vec![(2, "x"), (3, "x"), (3, "y")]);
    Ok(())
}

#[test]
fn test_until_never_emits_the_matching_value() -> anyhow::Result<()> {
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
fn test_buffer_with_overlap_drops_trailing_carry() -> anyhow::Result<()> {
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
fn test_done_subscribers_release_shared_source() -> anyhow::Result<()> {
    // Arrange
    let listener = TestListener::new();
    let events = Emitter::from_push_source(listener.clone());
    let (first, second) = (Recorder::new().cancel_after(3), Recorder::new().cancel_after(3));
    events.subscribe(first.clone())?;
    events.subscribe(second.clone())?;

    // Act
    for v in 1..=3 {
        listener.fire(v);
    }
    let released = listener.unregistrations();
    listener.fire(4);

    // Assert
    assert_eq!(listener.registrations(), 1);
    assert_eq!(released, 1);
    assert_eq!(listener.listener_count(), 0);
    assert_eq!(first.values(), vec![1, 2, 3]);
    assert_eq!(second.values(), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_one_done_subscriber_keeps_shared_source_alive() -> anyhow::Result<()> {
    // Arrange
    let listener = TestListener::new();
    let events = Emitter::from_push_source(listener.clone());
    let (short, long) = (Recorder::new().cancel_after(1), Recorder::new());
    events.subscribe(short.clone())?;
    events.subscribe(long.clone())?;

    // Act
    listener.fire(1);
    listener.fire(2);

    // Assert
    assert_eq!(listener.unregistrations(), 0);
    assert_eq!(short.values(), vec![1]);
    assert_eq!(long.values(), vec![1, 2]);
    Ok(())
}
