// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_transition --heading-base-level=0

//! Understory Transition: transform state and cancellable transitions.
//!
//! This crate provides the value types and the scheduling core shared by
//! pan/zoom controllers:
//! - [`TransformState`]: a uniform scale plus translation, with the duration
//!   and [`Easing`] used to animate into it.
//! - [`TransformOverride`]: a partial state used by programmatic commands.
//! - [`TransformationQueue`]: at most one active transition at a time,
//!   FIFO pending requests, and synchronous cancellation that samples the
//!   currently rendered state.
//!
//! The queue is host-agnostic: it never reads a clock. Hosts call
//! [`TransformationQueue::advance`] with a millisecond timestamp from their
//! frame callback and adopt the returned [`Settled`] states.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_transition::{Easing, Outcome, TransformState, TransformationQueue};
//!
//! let mut queue = TransformationQueue::new();
//! let mut current = TransformState::IDENTITY;
//!
//! let target = TransformState::new(2.0, -50.0, -50.0)
//!     .with_duration(250)
//!     .with_easing(Easing::EaseOutQuart);
//! queue.push(&current, target, ()).unwrap();
//!
//! queue.advance(0);
//! for settled in queue.advance(250) {
//!     assert_eq!(settled.outcome, Outcome::Completed);
//!     current = settled.state;
//! }
//! assert_eq!(current.scale, 2.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod easing;
mod queue;
mod state;

pub use easing::Easing;
pub use queue::{Outcome, QueueState, Settled, TransformationQueue};
pub use state::{InvalidTransform, TransformOverride, TransformState};
