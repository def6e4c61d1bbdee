// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::point::Point;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataVariant {
    Move,
    Click,
}

/// Pointer events fed through listener-backed emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestData {
    Move(Point),
    Click(Point),
}

impl TestData {
    #[must_use]
    pub const fn variant(&self) -> DataVariant {
        match self {
            TestData::Move(_) => DataVariant::Move,
            TestData::Click(_) => DataVariant::Click,
        }
    }

    #[must_use]
    pub const fn point(&self) -> Point {
        match self {
            TestData::Move(p) | TestData::Click(p) => *p,
        }
    }
}

impl Display for TestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestData::Move(p) => write!(f, "Move({p})"),
            TestData::Click(p) => write!(f, "Click({p})"),
        }
    }
}

pub fn move_to(x: i32, y: i32) -> TestData {
    TestData::Move(Point::new(x, y))
}

pub fn click_at(x: i32, y: i32) -> TestData {
    TestData::Click(Point::new(x, y))
}

pub fn origin() -> Point {
    Point::new(0, 0)
}

pub fn move_top_left() -> TestData {
    move_to(0, 0)
}

pub fn move_center() -> TestData {
    move_to(400, 300)
}

pub fn move_bottom_right() -> TestData {
    move_to(800, 600)
}

pub fn click_center() -> TestData {
    click_at(400, 300)
}
