// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Dominant direction of a movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// No movement.
    #[default]
    None,
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
}

impl Direction {
    /// Classifies `delta` by its dominant axis. Ties favor the horizontal axis.
    #[must_use]
    pub fn of(delta: Vec2) -> Self {
        if delta.x == 0.0 && delta.y == 0.0 {
            Self::None
        } else if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 { Self::Left } else { Self::Right }
        } else if delta.y < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Unit vector pointing in this direction (zero for [`Direction::None`]).
    #[must_use]
    pub fn unit(self) -> Vec2 {
        match self {
            Self::None => Vec2::ZERO,
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
        }
    }
}

/// A snapshot of input movement.
///
/// Every [`InteractionEvent`](crate::InteractionEvent) carries two of these:
/// a *cumulative* gesture measured from the start of the interaction and an
/// *iterative* gesture measured from the previously emitted event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    /// Translation in view space.
    pub delta: Vec2,
    /// Velocity in view pixels per millisecond.
    pub velocity: Vec2,
    /// Dominant direction of `delta`.
    pub direction: Direction,
    /// Centroid of the contributing pointers (or the wheel position).
    pub center: Point,
    /// Pinch scale factor; `1.0` when no pinch is involved.
    pub scale: f64,
    /// Host-defined identifier of the element the interaction started on.
    pub target: Option<u64>,
}

impl Default for Gesture {
    fn default() -> Self {
        Self::IDLE
    }
}

impl Gesture {
    /// No movement, unit scale, centered at the origin.
    pub const IDLE: Self = Self {
        delta: Vec2::ZERO,
        velocity: Vec2::ZERO,
        direction: Direction::None,
        center: Point::ORIGIN,
        scale: 1.0,
        target: None,
    };

    /// An idle gesture centered at `center`.
    #[must_use]
    pub fn at(center: Point) -> Self {
        Self {
            center,
            ..Self::IDLE
        }
    }
}
