// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves a fraction `1 / divisor` of the way towards `target`.
    #[must_use]
    pub const fn approach(self, target: Point, divisor: i32) -> Self {
        Self {
            x: self.x + (target.x - self.x) / divisor,
            y: self.y + (target.y - self.y) / divisor,
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point[x={}, y={}]", self.x, self.y)
    }
}
