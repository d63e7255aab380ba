// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-flight transition queue.
//!
//! [`TransformationQueue`] accepts commit requests and runs at most one
//! transition at a time. Zero-duration requests made while idle settle
//! synchronously; animated ones interpolate as the host calls
//! [`TransformationQueue::advance`] from its frame callback. Requests made
//! while a transition is running wait in FIFO order.
//!
//! Nothing is delivered through callbacks: every method that can finish a
//! transition returns the resulting [`Settled`] values, in order, and the
//! caller adopts them.
//!
//! ## Minimal example
//!
//! ```
//! use understory_transition::{Outcome, TransformState, TransformationQueue};
//!
//! let mut queue = TransformationQueue::new();
//! let current = TransformState::IDENTITY;
//! let target = TransformState::new(1.0, 100.0, 0.0).with_duration(100);
//!
//! // Animated requests settle later.
//! assert!(queue.push(&current, target, "pan").unwrap().is_empty());
//!
//! // The first frame binds the start time.
//! assert!(queue.advance(1_000).is_empty());
//! queue.advance(1_050);
//! let halfway = queue.rendered().unwrap();
//! assert!(halfway.translate.x > 0.0 && halfway.translate.x < 100.0);
//!
//! // A new interaction interrupts: the settle reports where the content
//! // visually was, not where it was heading.
//! let settled = queue.cancel();
//! assert_eq!(settled[0].outcome, Outcome::Cancelled);
//! assert_eq!(settled[0].state.translate, halfway.translate);
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::state::{InvalidTransform, TransformState};

/// How a transition ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The transition reached its target.
    Completed,
    /// The transition was interrupted, or never started because an earlier
    /// transition was interrupted.
    Cancelled,
}

/// Whether the queue is currently running a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QueueState {
    /// No transition is in flight.
    #[default]
    Idle,
    /// A transition is interpolating towards its target.
    Animating,
}

/// A finished commit request.
#[derive(Clone, Debug, PartialEq)]
pub struct Settled<T> {
    /// The payload passed to [`TransformationQueue::push`].
    pub payload: T,
    /// The state to adopt: the target on completion, or the sampled
    /// rendered state on cancellation.
    pub state: TransformState,
    /// How the transition ended.
    pub outcome: Outcome,
}

#[derive(Debug)]
struct Request<T> {
    target: TransformState,
    payload: T,
}

#[derive(Debug)]
struct Active<T> {
    from: TransformState,
    target: TransformState,
    payload: T,
    /// Bound by the first [`TransformationQueue::advance`] after starting.
    started_at: Option<u64>,
    rendered: TransformState,
}

/// Serializes proposed transforms into at most one active transition.
#[derive(Debug)]
pub struct TransformationQueue<T> {
    active: Option<Active<T>>,
    pending: VecDeque<Request<T>>,
}

impl<T> Default for TransformationQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TransformationQueue<T> {
    /// Creates an idle queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: None,
            pending: VecDeque::new(),
        }
    }

    /// Returns the queue state.
    #[must_use]
    pub fn state(&self) -> QueueState {
        if self.active.is_some() {
            QueueState::Animating
        } else {
            QueueState::Idle
        }
    }

    /// Returns `true` when no transition is in flight or waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Number of requests waiting behind the active transition.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The most recently rendered state of the active transition.
    #[must_use]
    pub fn rendered(&self) -> Option<TransformState> {
        self.active.as_ref().map(|a| a.rendered)
    }

    /// The state the content reaches once every queued transition completes.
    ///
    /// Returns `None` when idle.
    #[must_use]
    pub fn projected(&self) -> Option<TransformState> {
        self.pending
            .back()
            .map(|r| r.target)
            .or_else(|| self.active.as_ref().map(|a| a.target))
    }

    /// Requests a transition from `current` to `target`.
    ///
    /// `current` is only consulted when the queue is idle; queued requests
    /// start from the target of the transition before them.
    ///
    /// A zero-duration request made while idle settles synchronously and is
    /// returned immediately.
    pub fn push(
        &mut self,
        current: &TransformState,
        target: TransformState,
        payload: T,
    ) -> Result<Vec<Settled<T>>, InvalidTransform> {
        target.validate()?;
        let mut out = Vec::new();
        let request = Request { target, payload };
        if self.active.is_some() {
            tracing::trace!(pending = self.pending.len() + 1, "transition queued");
            self.pending.push_back(request);
        } else {
            self.start(*current, request, None, &mut out);
        }
        Ok(out)
    }

    /// Steps the active transition to time `now` (milliseconds).
    ///
    /// Returns every transition that finished, in order. When a transition
    /// finishes, the next pending request starts at the moment the previous
    /// one ended, so long frames do not stretch a chain of transitions.
    pub fn advance(&mut self, now: u64) -> Vec<Settled<T>> {
        let mut out = Vec::new();
        while let Some(active) = self.active.as_mut() {
            let started_at = *active.started_at.get_or_insert(now);
            let duration = u64::from(active.target.duration_ms);
            let elapsed = now.saturating_sub(started_at);
            if elapsed < duration {
                let t = elapsed as f64 / duration as f64;
                let progress = active.target.easing.apply(t);
                active.rendered = active.from.lerp(&active.target, progress);
                tracing::trace!(t, progress, "transition frame");
                break;
            }

            let Some(done) = self.active.take() else {
                break;
            };
            let ended_at = started_at + duration;
            let from = done.target.immediate();
            out.push(Settled {
                payload: done.payload,
                state: done.target,
                outcome: Outcome::Completed,
            });
            self.start_next(from, ended_at, &mut out);
        }
        out
    }

    /// Interrupts the active transition and drops every pending request.
    ///
    /// The active transition settles as [`Outcome::Cancelled`] with its
    /// currently rendered state, which the caller should adopt so that the
    /// next proposal starts where the content visually is. Pending requests
    /// settle as cancelled with the same state. Returns an empty list when
    /// idle.
    pub fn cancel(&mut self) -> Vec<Settled<T>> {
        let mut out = Vec::new();
        let Some(active) = self.active.take() else {
            return out;
        };
        let sampled = active.rendered.immediate();
        tracing::debug!(
            scale = sampled.scale,
            x = sampled.translate.x,
            y = sampled.translate.y,
            dropped = self.pending.len(),
            "transition cancelled"
        );
        out.push(Settled {
            payload: active.payload,
            state: sampled,
            outcome: Outcome::Cancelled,
        });
        out.extend(self.pending.drain(..).map(|r| Settled {
            payload: r.payload,
            state: sampled,
            outcome: Outcome::Cancelled,
        }));
        out
    }

    fn start(
        &mut self,
        from: TransformState,
        request: Request<T>,
        started_at: Option<u64>,
        out: &mut Vec<Settled<T>>,
    ) {
        if request.target.duration_ms == 0 {
            out.push(Settled {
                payload: request.payload,
                state: request.target,
                outcome: Outcome::Completed,
            });
            return;
        }
        tracing::trace!(duration_ms = request.target.duration_ms, "transition started");
        self.active = Some(Active {
            from,
            target: request.target,
            payload: request.payload,
            started_at,
            rendered: from,
        });
    }

    fn start_next(&mut self, mut from: TransformState, at: u64, out: &mut Vec<Settled<T>>) {
        while self.active.is_none() {
            let Some(request) = self.pending.pop_front() else {
                break;
            };
            let target = request.target.immediate();
            self.start(from, request, Some(at), out);
            from = target;
        }
    }
}
