// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Vec2};

use crate::easing::Easing;

/// A uniform scale plus translation, optionally reached through an animation.
///
/// Content is drawn at `view = world * scale + translate`. `duration_ms` and
/// `easing` describe how a transition *into* this state should be animated;
/// a duration of zero means the state applies immediately.
///
/// `TransformState` is a plain value: it is compared by value and cloning
/// produces an independent copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Uniform zoom factor. Always finite and positive for a valid state.
    pub scale: f64,
    /// Translation in view (device pixel) space. Always finite for a valid state.
    pub translate: Vec2,
    /// Animation length in milliseconds used when transitioning into this state.
    pub duration_ms: u32,
    /// Curve used when transitioning into this state.
    pub easing: Easing,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformState {
    /// Unit scale, no translation, immediate.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
        duration_ms: 0,
        easing: Easing::EaseOutQuart,
    };

    /// Creates an immediate state with the given scale and translation.
    #[must_use]
    pub fn new(scale: f64, x: f64, y: f64) -> Self {
        Self {
            scale,
            translate: Vec2::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Returns a copy that animates over `duration_ms`.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns a copy that animates with `easing`.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Returns a copy with the given translation.
    #[must_use]
    pub fn with_translate(mut self, translate: Vec2) -> Self {
        self.translate = translate;
        self
    }

    /// Returns a copy that applies immediately.
    #[must_use]
    pub fn immediate(self) -> Self {
        self.with_duration(0)
    }

    /// Checks the numeric invariants: finite positive scale, finite translation.
    pub fn validate(&self) -> Result<(), InvalidTransform> {
        let ok = self.scale.is_finite()
            && self.scale > 0.0
            && self.translate.x.is_finite()
            && self.translate.y.is_finite();
        if ok {
            Ok(())
        } else {
            Err(InvalidTransform {
                scale: self.scale,
                x: self.translate.x,
                y: self.translate.y,
            })
        }
    }

    /// Returns `true` if scale and translation equal `other`'s.
    ///
    /// Animation parameters are ignored.
    #[must_use]
    pub fn same_placement(&self, other: &Self) -> bool {
        self.scale == other.scale && self.translate == other.translate
    }

    /// Scales by `factor` around `anchor` (in view space), keeping the
    /// content under `anchor` fixed.
    #[must_use]
    pub fn zoomed_about(self, anchor: Point, factor: f64) -> Self {
        let anchor = anchor.to_vec2();
        Self {
            scale: self.scale * factor,
            translate: anchor - (anchor - self.translate) * factor,
            ..self
        }
    }

    /// Rescales to an absolute `scale` around `anchor` (in view space).
    #[must_use]
    pub fn scaled_to_about(self, anchor: Point, scale: f64) -> Self {
        if self.scale > 0.0 {
            self.zoomed_about(anchor, scale / self.scale)
        } else {
            Self { scale, ..self }
        }
    }

    /// Interpolates placement towards `to` at eased progress `p`.
    ///
    /// Scale and translation move linearly together, so the view point that
    /// maps to the same content point in both states (the anchor of a
    /// zoom) stays fixed at every step. Duration and easing are taken from
    /// `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, p: f64) -> Self {
        Self {
            scale: self.scale + (to.scale - self.scale) * p,
            translate: self.translate.lerp(to.translate, p),
            duration_ms: to.duration_ms,
            easing: to.easing,
        }
    }

    /// The world → view affine for this state.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Maps a view-space point back into content coordinates.
    #[must_use]
    pub fn view_to_content(&self, pt: Point) -> Point {
        ((pt.to_vec2() - self.translate) / self.scale).to_point()
    }
}

/// A partial [`TransformState`]: only the present fields are replaced.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TransformOverride {
    /// Replacement scale.
    pub scale: Option<f64>,
    /// Replacement horizontal translation.
    pub x: Option<f64>,
    /// Replacement vertical translation.
    pub y: Option<f64>,
    /// Replacement animation duration.
    pub duration_ms: Option<u32>,
    /// Replacement easing.
    pub easing: Option<Easing>,
}

impl TransformOverride {
    /// An override that replaces every placement field of `state` and its
    /// animation parameters.
    #[must_use]
    pub fn from_state(state: &TransformState) -> Self {
        Self {
            scale: Some(state.scale),
            x: Some(state.translate.x),
            y: Some(state.translate.y),
            duration_ms: Some(state.duration_ms),
            easing: Some(state.easing),
        }
    }

    /// Applies the present fields on top of `base`.
    #[must_use]
    pub fn apply_to(&self, base: &TransformState) -> TransformState {
        TransformState {
            scale: self.scale.unwrap_or(base.scale),
            translate: Vec2::new(
                self.x.unwrap_or(base.translate.x),
                self.y.unwrap_or(base.translate.y),
            ),
            duration_ms: self.duration_ms.unwrap_or(base.duration_ms),
            easing: self.easing.unwrap_or(base.easing),
        }
    }
}

/// Error returned when a transform carries a non-finite or non-positive
/// scale, or a non-finite translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidTransform {
    /// The offending scale.
    pub scale: f64,
    /// The offending horizontal translation.
    pub x: f64,
    /// The offending vertical translation.
    pub y: f64,
}

impl fmt::Display for InvalidTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid transform: scale {} and translation ({}, {}) must be finite with a positive scale",
            self.scale, self.x, self.y
        )
    }
}

impl core::error::Error for InvalidTransform {}
