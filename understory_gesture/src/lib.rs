// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: recognized gestures as one causally ordered stream.
//!
//! Pointer, wheel, and resize input arrive on independent channels, and a
//! pointer recognizer may report drag signals while a pinch is still open.
//! This crate normalizes all of it into a single sequence of
//! [`InteractionEvent`]s that a pan/zoom controller can consume in order:
//!
//! - [`PointerRecognizer`]: the default [`Recognizer`], turning raw
//!   [`PointerInput`] into touch, drag, transform, swipe, and release signals.
//! - [`GestureTracker`]: derives cumulative and iterative [`Gesture`]s from
//!   the raw samples that are actually emitted.
//! - [`GestureSynthesizer`]: owns the recognizer and trackers, holds back
//!   signals whose sequence would overlap another open sequence, and adds
//!   the wheel and resize channels.
//!
//! ## Event ordering
//!
//! Drag (`DragStart`, `Drag`, `DragEnd`) and transform (`TransformStart`,
//! `Transform`, `TransformEnd`) sequences never interleave in the output.
//! A sequence that starts while the other is open is replayed, in arrival
//! order, after the open one ends.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_gesture::{GestureSynthesizer, InteractionKind, WheelInput};
//!
//! let mut synth = GestureSynthesizer::default();
//! let events = synth.on_wheel(&WheelInput {
//!     delta: Vec2::new(0.0, 20.0),
//!     position: Point::new(10.0, 10.0),
//!     timestamp: 0,
//! });
//! assert_eq!(events[0].kind, InteractionKind::MouseWheelStart);
//! assert_eq!(events[1].iterative.delta, Vec2::new(0.0, -20.0));
//!
//! // After the idle period the wheel interaction ends.
//! let end = synth.tick(500).unwrap();
//! assert_eq!(end.kind, InteractionKind::MouseWheelEnd);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod gesture;
mod input;
mod recognizer;
mod synthesizer;
mod tracker;

pub use event::{InteractionEvent, InteractionKind};
pub use gesture::{Direction, Gesture};
pub use input::{PointerInput, PointerPhase, WheelInput};
pub use recognizer::{PointerRecognizer, RawGesture, Recognized, Recognizer, RecognizerConfig};
pub use synthesizer::{GestureSynthesizer, SynthesizerConfig};
pub use tracker::GestureTracker;
