// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture recognition.
//!
//! A [`Recognizer`] turns raw [`PointerInput`] samples into [`Recognized`]
//! signals (touch, drag, transform, swipe, release). Recognizers are plain
//! strategy objects handed to
//! [`GestureSynthesizer::new`](crate::GestureSynthesizer::new), so tests and
//! hosts with their own recognition can substitute them freely.
//!
//! Recognizers are allowed to report signals out of causal order (for
//! example, drag signals while a transform is still open); the synthesizer
//! restores the order.
//!
//! [`PointerRecognizer`] is the default implementation:
//! - first pointer down → `Touch`;
//! - a single pointer moving past [`RecognizerConfig::drag_threshold`] →
//!   `DragStart`, then `Drag` on every move;
//! - a second pointer → `DragEnd` (if dragging), `TransformStart`, then
//!   `Transform` on every move, with a pinch scale taken from the pointer
//!   spread;
//! - dropping below two pointers → `TransformEnd`;
//! - last pointer up → `DragEnd` (if dragging), `Swipe` (if fast enough),
//!   `Release`.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::event::InteractionKind;
use crate::input::{PointerInput, PointerPhase};

/// Raw gesture data reported by a recognizer.
///
/// `delta` and `scale` are measured from the start of the recognizer's
/// pointer session and must stay continuous when pointers are added or
/// removed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawGesture {
    /// Accumulated translation of the pointer centroid.
    pub delta: Vec2,
    /// Current centroid of the active pointers.
    pub center: Point,
    /// Accumulated pinch scale.
    pub scale: f64,
    /// Smoothed centroid velocity in pixels per millisecond.
    pub velocity: Vec2,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
    /// Host-defined identifier of the element the session started on.
    pub target: Option<u64>,
}

impl Default for RawGesture {
    fn default() -> Self {
        Self {
            delta: Vec2::ZERO,
            center: Point::ORIGIN,
            scale: 1.0,
            velocity: Vec2::ZERO,
            timestamp: 0,
            target: None,
        }
    }
}

/// A signal produced by a [`Recognizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recognized {
    /// What was recognized.
    pub kind: InteractionKind,
    /// Gesture data at the moment of recognition.
    pub raw: RawGesture,
}

impl Recognized {
    /// Creates a signal.
    #[must_use]
    pub fn new(kind: InteractionKind, raw: RawGesture) -> Self {
        Self { kind, raw }
    }
}

/// Strategy that turns raw pointer samples into recognized signals.
pub trait Recognizer {
    /// Processes one pointer sample, appending any recognized signals to `out`.
    fn recognize(&mut self, input: &PointerInput, out: &mut Vec<Recognized>);

    /// Forgets all tracked pointers.
    fn reset(&mut self) {}
}

/// Thresholds used by [`PointerRecognizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecognizerConfig {
    /// Distance in pixels a single pointer must travel before a drag starts.
    pub drag_threshold: f64,
    /// Velocity in pixels per millisecond (on either axis) above which a
    /// release is recognized as a swipe.
    pub swipe_velocity: f64,
    /// Velocity samples older than this many milliseconds at release are
    /// considered stale: the pointer came to rest before lifting.
    pub velocity_stale_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            swipe_velocity: 0.65,
            velocity_stale_ms: 100,
        }
    }
}

impl RecognizerConfig {
    /// Returns a copy with the given drag threshold.
    #[must_use]
    pub fn with_drag_threshold(mut self, drag_threshold: f64) -> Self {
        self.drag_threshold = drag_threshold;
        self
    }

    /// Returns a copy with the given swipe velocity.
    #[must_use]
    pub fn with_swipe_velocity(mut self, swipe_velocity: f64) -> Self {
        self.swipe_velocity = swipe_velocity;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TrackedPointer {
    id: u64,
    position: Point,
    /// Position when the pointer set last changed.
    anchor: Point,
}

/// Default single/multi-pointer recognizer.
#[derive(Clone, Debug)]
pub struct PointerRecognizer {
    config: RecognizerConfig,
    pointers: SmallVec<[TrackedPointer; 4]>,
    dragging: bool,
    transforming: bool,
    translation: Vec2,
    centroid: Point,
    scale: f64,
    scale_base: f64,
    spread_base: f64,
    velocity: Vec2,
    last_time: u64,
    target: Option<u64>,
}

impl Default for PointerRecognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

impl PointerRecognizer {
    /// Creates a recognizer with the given thresholds.
    #[must_use]
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            config,
            pointers: SmallVec::new(),
            dragging: false,
            transforming: false,
            translation: Vec2::ZERO,
            centroid: Point::ORIGIN,
            scale: 1.0,
            scale_base: 1.0,
            spread_base: 0.0,
            velocity: Vec2::ZERO,
            last_time: 0,
            target: None,
        }
    }

    /// The thresholds in use.
    #[must_use]
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Number of pointers currently in contact.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `true` while a single-pointer drag is recognized.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Returns `true` while a multi-pointer transform is recognized.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.transforming
    }

    fn raw(&self, timestamp: u64) -> RawGesture {
        RawGesture {
            delta: self.translation,
            center: self.centroid,
            scale: self.scale,
            velocity: self.velocity,
            timestamp,
            target: self.target,
        }
    }

    fn current_centroid(&self) -> Point {
        if self.pointers.is_empty() {
            return self.centroid;
        }
        let sum = self
            .pointers
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.position.to_vec2());
        let n = self.pointers.len() as f64;
        (sum / n).to_point()
    }

    fn current_spread(&self) -> f64 {
        if self.pointers.len() < 2 {
            return 0.0;
        }
        let c = self.current_centroid();
        let total: f64 = self.pointers.iter().map(|p| (p.position - c).hypot()).sum();
        let n = self.pointers.len() as f64;
        total / n
    }

    /// Re-anchors after the pointer set changed so that translation and
    /// scale continue without jumps.
    fn rebase(&mut self) {
        self.centroid = self.current_centroid();
        self.spread_base = self.current_spread();
        self.scale_base = self.scale;
        for p in &mut self.pointers {
            p.anchor = p.position;
        }
    }

    fn begin_session(&mut self, input: &PointerInput) {
        self.translation = Vec2::ZERO;
        self.scale = 1.0;
        self.scale_base = 1.0;
        self.spread_base = 0.0;
        self.velocity = Vec2::ZERO;
        self.centroid = input.position;
        self.last_time = input.timestamp;
        self.target = input.target;
        self.dragging = false;
        self.transforming = false;
    }

    fn down(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        if self.pointers.iter().any(|p| p.id == input.id) {
            self.moved(input, out);
            return;
        }
        if self.pointers.is_empty() {
            self.begin_session(input);
        }
        self.pointers.push(TrackedPointer {
            id: input.id,
            position: input.position,
            anchor: input.position,
        });
        self.rebase();
        let ts = input.timestamp;
        match self.pointers.len() {
            1 => out.push(Recognized::new(InteractionKind::Touch, self.raw(ts))),
            2 => {
                if self.dragging {
                    self.dragging = false;
                    out.push(Recognized::new(InteractionKind::DragEnd, self.raw(ts)));
                }
                self.transforming = true;
                out.push(Recognized::new(
                    InteractionKind::TransformStart,
                    self.raw(ts),
                ));
            }
            _ => {}
        }
    }

    fn moved(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        let Some(pointer) = self.pointers.iter_mut().find(|p| p.id == input.id) else {
            return;
        };
        pointer.position = input.position;
        let anchor = pointer.anchor;

        let centroid = self.current_centroid();
        let step = centroid - self.centroid;
        self.translation += step;
        if input.timestamp > self.last_time {
            let dt = (input.timestamp - self.last_time) as f64;
            self.velocity = self.velocity * 0.5 + (step / dt) * 0.5;
            self.last_time = input.timestamp;
        }
        self.centroid = centroid;
        let ts = input.timestamp;

        if self.pointers.len() >= 2 {
            if self.spread_base > 0.0 {
                self.scale = self.scale_base * self.current_spread() / self.spread_base;
            }
            out.push(Recognized::new(InteractionKind::Transform, self.raw(ts)));
        } else if self.dragging {
            out.push(Recognized::new(InteractionKind::Drag, self.raw(ts)));
        } else {
            let threshold = self.config.drag_threshold;
            if (input.position - anchor).hypot2() > threshold * threshold {
                self.dragging = true;
                out.push(Recognized::new(InteractionKind::DragStart, self.raw(ts)));
                out.push(Recognized::new(InteractionKind::Drag, self.raw(ts)));
            }
        }
    }

    fn lifted(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        let Some(index) = self.pointers.iter().position(|p| p.id == input.id) else {
            return;
        };
        let before = self.pointers.len();
        self.pointers.remove(index);
        let ts = input.timestamp;

        if before >= 2 && self.pointers.len() < 2 {
            self.transforming = false;
            out.push(Recognized::new(InteractionKind::TransformEnd, self.raw(ts)));
        }

        if !self.pointers.is_empty() {
            self.rebase();
            return;
        }

        if self.dragging {
            self.dragging = false;
            out.push(Recognized::new(InteractionKind::DragEnd, self.raw(ts)));
        }
        if ts.saturating_sub(self.last_time) > self.config.velocity_stale_ms {
            self.velocity = Vec2::ZERO;
        }
        let fast = self.velocity.x.abs() > self.config.swipe_velocity
            || self.velocity.y.abs() > self.config.swipe_velocity;
        if input.phase == PointerPhase::Up && fast {
            out.push(Recognized::new(InteractionKind::Swipe, self.raw(ts)));
        }
        out.push(Recognized::new(InteractionKind::Release, self.raw(ts)));
    }
}

impl Recognizer for PointerRecognizer {
    fn recognize(&mut self, input: &PointerInput, out: &mut Vec<Recognized>) {
        match input.phase {
            PointerPhase::Down => self.down(input, out),
            PointerPhase::Move => self.moved(input, out),
            PointerPhase::Up | PointerPhase::Cancel => self.lifted(input, out),
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}
