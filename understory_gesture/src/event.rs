// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::gesture::Gesture;

/// The kind of a normalized interaction event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// The first pointer went down; a pointer interaction starts.
    Touch,
    /// A single pointer moved past the drag threshold.
    DragStart,
    /// A single pointer moved while dragging.
    Drag,
    /// Dragging stopped.
    DragEnd,
    /// The last pointer was released fast enough to fling the content.
    Swipe,
    /// The first wheel input after an idle period; a wheel interaction starts.
    MouseWheelStart,
    /// A wheel input.
    MouseWheel,
    /// No wheel input arrived for the idle period.
    MouseWheelEnd,
    /// The last pointer went up; the pointer interaction ends.
    Release,
    /// The measured view size changed.
    Resize,
    /// A second pointer went down; a pinch/transform starts.
    TransformStart,
    /// Two or more pointers moved.
    Transform,
    /// Fewer than two pointers remain.
    TransformEnd,
}

impl InteractionKind {
    /// `true` for events that open a new continuous interaction.
    #[must_use]
    pub fn is_interaction_start(self) -> bool {
        matches!(self, Self::Touch | Self::MouseWheelStart)
    }

    /// `true` for events that close a continuous interaction.
    #[must_use]
    pub fn is_interaction_end(self) -> bool {
        matches!(self, Self::Release | Self::MouseWheelEnd)
    }

    /// `true` for the drag sequence.
    #[must_use]
    pub fn is_drag_class(self) -> bool {
        matches!(self, Self::DragStart | Self::Drag | Self::DragEnd)
    }

    /// `true` for the multi-pointer transform sequence.
    #[must_use]
    pub fn is_transform_class(self) -> bool {
        matches!(
            self,
            Self::TransformStart | Self::Transform | Self::TransformEnd
        )
    }

    /// `true` for the wheel sequence.
    #[must_use]
    pub fn is_wheel_class(self) -> bool {
        matches!(
            self,
            Self::MouseWheelStart | Self::MouseWheel | Self::MouseWheelEnd
        )
    }
}

/// One normalized unit of input.
///
/// Events are produced by [`GestureSynthesizer`](crate::GestureSynthesizer)
/// in causal order, consumed synchronously, and discarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionEvent {
    /// What happened.
    pub kind: InteractionKind,
    /// Movement since the start of the current interaction.
    pub cumulative: Gesture,
    /// Movement since the previously emitted event of the same interaction.
    pub iterative: Gesture,
    /// `true` when the event was produced programmatically rather than by
    /// real input.
    pub simulated: bool,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
}

impl InteractionEvent {
    /// A programmatic event with idle gestures.
    #[must_use]
    pub fn simulated(kind: InteractionKind, timestamp: u64) -> Self {
        Self {
            kind,
            cumulative: Gesture::IDLE,
            iterative: Gesture::IDLE,
            simulated: true,
            timestamp,
        }
    }
}
