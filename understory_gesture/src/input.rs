// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input accepted by the synthesizer.

use kurbo::{Point, Vec2};

/// Lifecycle phase of a pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// The pointer made contact.
    Down,
    /// The pointer moved while in contact.
    Move,
    /// The pointer lifted.
    Up,
    /// The platform aborted the pointer (no fling is recognized).
    Cancel,
}

/// One raw pointer sample, in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Platform pointer identifier, stable for the pointer's lifetime.
    pub id: u64,
    /// Lifecycle phase.
    pub phase: PointerPhase,
    /// Position in view space.
    pub position: Point,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
    /// Host-defined identifier of the element under the pointer.
    pub target: Option<u64>,
}

impl PointerInput {
    /// A sample without a hit target.
    #[must_use]
    pub fn new(id: u64, phase: PointerPhase, position: Point, timestamp: u64) -> Self {
        Self {
            id,
            phase,
            position,
            timestamp,
            target: None,
        }
    }

    /// Returns a copy carrying `target`.
    #[must_use]
    pub fn with_target(mut self, target: u64) -> Self {
        self.target = Some(target);
        self
    }
}

/// One raw wheel sample.
///
/// `delta` follows the platform scroll convention: positive `y` scrolls
/// towards the end of the content, which moves content up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    /// Scroll amount in view pixels.
    pub delta: Vec2,
    /// Pointer position in view space.
    pub position: Point,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
}
