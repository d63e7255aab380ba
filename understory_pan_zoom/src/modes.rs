// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How a drag or wheel interaction behaves once it pushes content past a
/// boundary.
///
/// This mode is consulted per axis by
/// [`crate::BoundaryInterceptor`] for drag and wheel events only. Every
/// other event class clamps, and swipes bounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    /// Clamp into the allowed range; content never moves past a boundary.
    #[default]
    Stop,
    /// Let content follow the pointer past a boundary with damped, bounded
    /// resistance.
    ///
    /// The overshoot is the undamped excess divided by
    /// [`crate::SLOW_DAMPING`], capped at a quarter of the scaled content
    /// width on the x axis and a quarter of the viewport height on the y
    /// axis. The following release or wheel end snaps it back.
    Slow,
}

/// Where content that is smaller than the viewport rests along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum Alignment {
    /// Content may rest anywhere inside the viewport.
    #[default]
    Free,
    /// Content is pinned to the leading edge (left or top).
    Start,
    /// Content is centered.
    Center,
}
