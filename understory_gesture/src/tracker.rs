// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture tracker: derive cumulative and iterative gestures from raw samples.
//!
//! ## Usage
//!
//! 1) Start an interaction by calling [`GestureTracker::begin`] with the raw
//!    sample of the interaction-start event. This captures the cumulative
//!    baseline.
//! 2) For every emitted event, call [`GestureTracker::emit`] to get the
//!    cumulative gesture (relative to the baseline) and the iterative gesture
//!    (relative to the previous emission).
//! 3) End the interaction with [`GestureTracker::reset`] so that the next one
//!    starts from a fresh baseline.
//!
//! Only emissions update the tracker. Samples that are held back (for
//! example, deferred by the synthesizer) do not affect iterative deltas
//! until they are actually emitted.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_gesture::{GestureTracker, RawGesture};
//!
//! let mut tracker = GestureTracker::default();
//! let at = |x: f64, t: u64| RawGesture {
//!     delta: Vec2::new(x, 0.0),
//!     center: Point::new(x, 0.0),
//!     timestamp: t,
//!     ..RawGesture::default()
//! };
//!
//! tracker.begin(&at(0.0, 0));
//! let (cumulative, iterative) = tracker.emit(&at(5.0, 10));
//! assert_eq!(cumulative.delta, Vec2::new(5.0, 0.0));
//! assert_eq!(iterative.delta, Vec2::new(5.0, 0.0));
//!
//! let (cumulative, iterative) = tracker.emit(&at(8.0, 20));
//! assert_eq!(cumulative.delta, Vec2::new(8.0, 0.0));
//! assert_eq!(iterative.delta, Vec2::new(3.0, 0.0));
//! ```

use kurbo::Vec2;

use crate::gesture::{Direction, Gesture};
use crate::recognizer::RawGesture;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Baseline {
    delta: Vec2,
    scale: f64,
}

impl Baseline {
    fn of(raw: &RawGesture) -> Self {
        Self {
            delta: raw.delta,
            scale: if raw.scale > 0.0 { raw.scale } else { 1.0 },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Snapshot {
    cumulative: Gesture,
    timestamp: u64,
}

/// Tracks the baseline and the last emitted snapshot of one input channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureTracker {
    baseline: Option<Baseline>,
    last: Option<Snapshot>,
}

impl GestureTracker {
    /// Starts a new interaction at `raw`, discarding any previous snapshot.
    pub fn begin(&mut self, raw: &RawGesture) {
        self.baseline = Some(Baseline::of(raw));
        self.last = None;
    }

    /// Records an emission of `raw`, returning `(cumulative, iterative)`.
    ///
    /// If no interaction was started, `raw` itself becomes the baseline.
    pub fn emit(&mut self, raw: &RawGesture) -> (Gesture, Gesture) {
        let baseline = *self.baseline.get_or_insert_with(|| Baseline::of(raw));

        let delta = raw.delta - baseline.delta;
        let cumulative = Gesture {
            delta,
            velocity: raw.velocity,
            direction: Direction::of(delta),
            center: raw.center,
            scale: raw.scale / baseline.scale,
            target: raw.target,
        };

        let (prev, prev_time) = match self.last {
            Some(s) => (s.cumulative, Some(s.timestamp)),
            None => (Gesture::IDLE, None),
        };
        let step = cumulative.delta - prev.delta;
        let velocity = match prev_time {
            Some(t) if raw.timestamp > t => {
                let dt = (raw.timestamp - t) as f64;
                step / dt
            }
            _ => raw.velocity,
        };
        let iterative = Gesture {
            delta: step,
            velocity,
            direction: Direction::of(step),
            center: raw.center,
            scale: if prev.scale > 0.0 {
                cumulative.scale / prev.scale
            } else {
                cumulative.scale
            },
            target: raw.target,
        };

        self.last = Some(Snapshot {
            cumulative,
            timestamp: raw.timestamp,
        });
        (cumulative, iterative)
    }

    /// Ends the current interaction.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.last = None;
    }

    /// Returns `true` between [`GestureTracker::begin`] and [`GestureTracker::reset`].
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.baseline.is_some()
    }

    /// The cumulative gesture of the last emission, if any.
    #[must_use]
    pub fn last_cumulative(&self) -> Option<Gesture> {
        self.last.map(|s| s.cumulative)
    }
}
