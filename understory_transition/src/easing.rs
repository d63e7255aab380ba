// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves used to shape animated transitions.

/// An easing curve mapping normalized time `t ∈ [0, 1]` to progress.
///
/// Every curve maps `0.0 → 0.0` and `1.0 → 1.0`. Inputs outside `[0, 1]` are
/// clamped before evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic acceleration from rest.
    EaseInQuad,
    /// Quadratic deceleration to rest.
    EaseOutQuad,
    /// Quadratic acceleration then deceleration.
    EaseInOutQuad,
    /// Cubic deceleration to rest.
    EaseOutCubic,
    /// Cubic acceleration then deceleration.
    EaseInOutCubic,
    /// Quartic deceleration to rest.
    ///
    /// This is the default curve for boundary corrections and swipes: it
    /// starts at four times the average speed and settles gently.
    #[default]
    EaseOutQuart,
    /// A CSS-style cubic Bézier timing function with control points
    /// `(x1, y1)` and `(x2, y2)`.
    ///
    /// `x1` and `x2` are expected to lie in `[0, 1]` so that the curve is a
    /// function of time.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Evaluates the curve at `t`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::EaseOutQuart => {
                let u = 1.0 - t;
                let u2 = u * u;
                1.0 - u2 * u2
            }
            Self::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_param(t, x1, x2);
                bezier_coord(s, y1, y2)
            }
        }
    }

    /// The derivative of the curve at `t = 0`, relative to linear motion.
    ///
    /// Used to pick a travel distance whose initial speed matches a release
    /// velocity: a transition of length `d` over `T` ms starts moving at
    /// `initial_slope() * d / T` px/ms.
    #[must_use]
    pub fn initial_slope(self) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::EaseInQuad | Self::EaseInOutQuad | Self::EaseInOutCubic => 0.0,
            Self::EaseOutQuad => 2.0,
            Self::EaseOutCubic => 3.0,
            Self::EaseOutQuart => 4.0,
            Self::CubicBezier(x1, y1, _, _) => {
                if x1 > 0.0 {
                    y1 / x1
                } else {
                    0.0
                }
            }
        }
    }
}

/// One coordinate of a unit cubic Bézier with endpoints 0 and 1.
fn bezier_coord(s: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

fn bezier_coord_derivative(s: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Finds the curve parameter whose x coordinate is `x`.
///
/// Newton iteration converges quickly for well-behaved curves; bisection
/// handles flat regions where the derivative vanishes.
fn solve_bezier_param(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_coord(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let d = bezier_coord_derivative(s, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    s = x;
    for _ in 0..64 {
        let v = bezier_coord(s, x1, x2);
        if (v - x).abs() < EPSILON {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}
