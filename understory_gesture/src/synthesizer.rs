// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture synthesizer: merge pointer, wheel, and resize input into one
//! causally ordered stream of [`InteractionEvent`]s.
//!
//! ## Deferred ordering
//!
//! Recognizers may report events of one sequence while another sequence is
//! still open, for example a drag recognized in the middle of a pinch. The
//! synthesizer tracks whether a drag and a transform are active. A signal of
//! one sequence that arrives while the other is active is held in a FIFO
//! list. Once deferral has started, every later signal that does not belong
//! to the blocking sequence is held behind it, so relative order is never
//! lost. When the blocking sequence ends, its end event is emitted and the
//! held signals are replayed in the order they arrived.
//!
//! Gestures are computed at emission time, so held signals never influence
//! iterative deltas until they are actually emitted.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::{
//!     GestureSynthesizer, InteractionKind, PointerInput, PointerPhase,
//! };
//!
//! let mut synth = GestureSynthesizer::default();
//! let mut kinds = Vec::new();
//! for (phase, x, t) in [
//!     (PointerPhase::Down, 0.0, 0),
//!     (PointerPhase::Move, 30.0, 100),
//!     (PointerPhase::Up, 30.0, 400),
//! ] {
//!     let input = PointerInput::new(1, phase, Point::new(x, 0.0), t);
//!     kinds.extend(synth.on_pointer(&input).iter().map(|e| e.kind));
//! }
//! assert_eq!(
//!     kinds,
//!     [
//!         InteractionKind::Touch,
//!         InteractionKind::DragStart,
//!         InteractionKind::Drag,
//!         InteractionKind::DragEnd,
//!         InteractionKind::Release,
//!     ]
//! );
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};

use crate::event::{InteractionEvent, InteractionKind};
use crate::gesture::Gesture;
use crate::input::{PointerInput, WheelInput};
use crate::recognizer::{PointerRecognizer, RawGesture, Recognized, Recognizer};
use crate::tracker::GestureTracker;

/// Settings for [`GestureSynthesizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthesizerConfig {
    /// Milliseconds without wheel input after which the wheel interaction
    /// ends.
    pub wheel_idle_ms: u64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self { wheel_idle_ms: 150 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct WheelSession {
    accumulated: Vec2,
    position: Point,
    last_input: u64,
}

impl WheelSession {
    fn raw(&self, velocity: Vec2, timestamp: u64) -> RawGesture {
        RawGesture {
            delta: self.accumulated,
            center: self.position,
            scale: 1.0,
            velocity,
            timestamp,
            target: None,
        }
    }
}

/// Normalizes concurrent raw input channels into one ordered event stream.
#[derive(Debug)]
pub struct GestureSynthesizer<R = PointerRecognizer> {
    recognizer: R,
    config: SynthesizerConfig,
    drag_active: bool,
    transform_active: bool,
    pointer_active: bool,
    deferred: VecDeque<Recognized>,
    pointer: GestureTracker,
    wheel: GestureTracker,
    wheel_session: Option<WheelSession>,
    measured: Option<Size>,
    scratch: Vec<Recognized>,
}

impl Default for GestureSynthesizer<PointerRecognizer> {
    fn default() -> Self {
        Self::new(PointerRecognizer::default(), SynthesizerConfig::default())
    }
}

impl<R: Recognizer> GestureSynthesizer<R> {
    /// Creates a synthesizer that recognizes pointer input with `recognizer`.
    #[must_use]
    pub fn new(recognizer: R, config: SynthesizerConfig) -> Self {
        Self {
            recognizer,
            config,
            drag_active: false,
            transform_active: false,
            pointer_active: false,
            deferred: VecDeque::new(),
            pointer: GestureTracker::default(),
            wheel: GestureTracker::default(),
            wheel_session: None,
            measured: None,
            scratch: Vec::new(),
        }
    }

    /// The recognizer strategy.
    #[must_use]
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Mutable access to the recognizer strategy.
    pub fn recognizer_mut(&mut self) -> &mut R {
        &mut self.recognizer
    }

    /// The settings in use.
    #[must_use]
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Returns `true` while a drag sequence is open in the emitted stream.
    #[must_use]
    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Returns `true` while a transform sequence is open in the emitted stream.
    #[must_use]
    pub fn is_transform_active(&self) -> bool {
        self.transform_active
    }

    /// Returns `true` between an emitted `Touch` and the matching `Release`.
    #[must_use]
    pub fn is_pointer_active(&self) -> bool {
        self.pointer_active
    }

    /// Returns `true` between `MouseWheelStart` and `MouseWheelEnd`.
    #[must_use]
    pub fn is_wheel_active(&self) -> bool {
        self.wheel_session.is_some()
    }

    /// Number of recognized signals currently held back.
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// The last measured view size.
    #[must_use]
    pub fn measured_size(&self) -> Option<Size> {
        self.measured
    }

    /// Records a view size without emitting an event.
    ///
    /// Hosts call this once at startup so that the first real resize is
    /// compared against the initial layout.
    pub fn set_measured_size(&mut self, size: Size) {
        self.measured = Some(size);
    }

    /// Feeds one pointer sample through the recognizer.
    pub fn on_pointer(&mut self, input: &PointerInput) -> Vec<InteractionEvent> {
        let mut signals = core::mem::take(&mut self.scratch);
        signals.clear();
        self.recognizer.recognize(input, &mut signals);
        let mut out = Vec::new();
        for signal in signals.drain(..) {
            self.ingest(signal, &mut out);
        }
        self.scratch = signals;
        out
    }

    /// Feeds one already-recognized signal, bypassing the recognizer.
    pub fn on_recognized(&mut self, signal: Recognized) -> Vec<InteractionEvent> {
        let mut out = Vec::new();
        self.ingest(signal, &mut out);
        out
    }

    /// Feeds one wheel sample.
    ///
    /// The first sample after an idle period emits `MouseWheelStart` before
    /// its `MouseWheel`.
    pub fn on_wheel(&mut self, input: &WheelInput) -> Vec<InteractionEvent> {
        let mut out = Vec::new();
        let ts = input.timestamp;
        let step = -input.delta;

        let mut session = match self.wheel_session {
            Some(s) => s,
            None => {
                let session = WheelSession {
                    accumulated: Vec2::ZERO,
                    position: input.position,
                    last_input: ts,
                };
                let raw = session.raw(Vec2::ZERO, ts);
                self.wheel.begin(&raw);
                self.push_event(InteractionKind::MouseWheelStart, &raw, Channel::Wheel, &mut out);
                session
            }
        };

        let velocity = if ts > session.last_input {
            step / (ts - session.last_input) as f64
        } else {
            Vec2::ZERO
        };
        session.accumulated += step;
        session.position = input.position;
        session.last_input = ts;
        self.wheel_session = Some(session);

        let raw = session.raw(velocity, ts);
        self.push_event(InteractionKind::MouseWheel, &raw, Channel::Wheel, &mut out);
        out
    }

    /// Emits `MouseWheelEnd` once the wheel has been idle long enough.
    pub fn tick(&mut self, now: u64) -> Option<InteractionEvent> {
        let session = self.wheel_session?;
        if now.saturating_sub(session.last_input) < self.config.wheel_idle_ms {
            return None;
        }
        self.wheel_session = None;
        let mut out = Vec::new();
        let raw = session.raw(Vec2::ZERO, now);
        self.push_event(InteractionKind::MouseWheelEnd, &raw, Channel::Wheel, &mut out);
        self.wheel.reset();
        out.pop()
    }

    /// Feeds a measured view size.
    ///
    /// Emits `Resize` only when the size differs from the last measurement.
    pub fn on_resize(&mut self, size: Size, timestamp: u64) -> Option<InteractionEvent> {
        if self.measured == Some(size) {
            return None;
        }
        self.measured = Some(size);
        let center = Gesture::at(size.to_rect().center());
        Some(InteractionEvent {
            kind: InteractionKind::Resize,
            cumulative: center,
            iterative: center,
            simulated: false,
            timestamp,
        })
    }

    /// Drops all held signals and open sequences, and resets the recognizer.
    pub fn reset(&mut self) {
        self.deferred.clear();
        self.drag_active = false;
        self.transform_active = false;
        self.pointer_active = false;
        self.pointer.reset();
        self.wheel.reset();
        self.wheel_session = None;
        self.recognizer.reset();
    }

    /// `true` if `kind` continues a sequence that is currently open.
    fn continues_open_sequence(&self, kind: InteractionKind) -> bool {
        (kind.is_drag_class() && self.drag_active)
            || (kind.is_transform_class() && self.transform_active)
    }

    /// `true` if `kind` would start a sequence while the other one is open.
    fn blocked_by_other_sequence(&self, kind: InteractionKind) -> bool {
        (kind.is_drag_class() && !self.drag_active && self.transform_active)
            || (kind.is_transform_class() && !self.transform_active && self.drag_active)
    }

    fn ingest(&mut self, signal: Recognized, out: &mut Vec<InteractionEvent>) {
        let kind = signal.kind;
        let hold = !self.continues_open_sequence(kind)
            && (self.blocked_by_other_sequence(kind) || !self.deferred.is_empty());
        if hold {
            tracing::debug!(?kind, held = self.deferred.len() + 1, "deferring signal");
            self.deferred.push_back(signal);
            return;
        }
        if self.emit(signal, out) {
            self.flush(out);
        }
    }

    fn flush(&mut self, out: &mut Vec<InteractionEvent>) {
        while let Some(front) = self.deferred.front() {
            if self.blocked_by_other_sequence(front.kind) {
                tracing::debug!(
                    kind = ?front.kind,
                    held = self.deferred.len(),
                    "flush paused behind reopened sequence"
                );
                break;
            }
            let Some(signal) = self.deferred.pop_front() else {
                break;
            };
            tracing::trace!(kind = ?signal.kind, "replaying deferred signal");
            self.emit(signal, out);
        }
    }

    /// Emits `signal`, returning `true` if it closed a sequence.
    fn emit(&mut self, signal: Recognized, out: &mut Vec<InteractionEvent>) -> bool {
        let mut closed = false;
        match signal.kind {
            InteractionKind::Touch => {
                self.pointer.begin(&signal.raw);
                self.pointer_active = true;
            }
            InteractionKind::DragStart => self.drag_active = true,
            InteractionKind::DragEnd => {
                self.drag_active = false;
                closed = true;
            }
            InteractionKind::TransformStart => self.transform_active = true,
            InteractionKind::TransformEnd => {
                self.transform_active = false;
                closed = true;
            }
            InteractionKind::Release => {
                if self.drag_active || self.transform_active {
                    tracing::debug!(
                        drag = self.drag_active,
                        transform = self.transform_active,
                        "release closed open sequences"
                    );
                    self.drag_active = false;
                    self.transform_active = false;
                }
                closed = true;
            }
            _ => {}
        }
        self.push_event(signal.kind, &signal.raw, Channel::Pointer, out);
        if signal.kind == InteractionKind::Release {
            self.pointer.reset();
            self.pointer_active = false;
        }
        closed
    }

    fn push_event(
        &mut self,
        kind: InteractionKind,
        raw: &RawGesture,
        channel: Channel,
        out: &mut Vec<InteractionEvent>,
    ) {
        let tracker = match channel {
            Channel::Pointer => &mut self.pointer,
            Channel::Wheel => &mut self.wheel,
        };
        let (cumulative, iterative) = tracker.emit(raw);
        tracing::trace!(?kind, dx = iterative.delta.x, dy = iterative.delta.y, "emit");
        out.push(InteractionEvent {
            kind,
            cumulative,
            iterative,
            simulated: false,
            timestamp: raw.timestamp,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Pointer,
    Wheel,
}
