// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_transition::TransformState;

use crate::boundary::Edge;
use crate::interceptor::{Flow, Interaction};

/// Something observers can react to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification<'a> {
    /// The controller started transforming: an input session opened or a
    /// programmatic transition was queued while idle.
    InteractionStarted,
    /// Input ended and every queued transition settled.
    InteractionFinished,
    /// An interaction is about to be processed. Returning [`Flow::Cancel`]
    /// skips it.
    PreTransform(&'a Interaction),
    /// A new state was adopted.
    PostTransform(&'a TransformState),
    /// The adopted scale differs from the previous one.
    ScaleChanged {
        /// The new scale.
        scale: f64,
    },
    /// The adopted translation differs from the previous one.
    TranslationChanged {
        /// The new horizontal translation.
        x: f64,
        /// The new vertical translation.
        y: f64,
    },
    /// A content edge moved out of view.
    EdgeHidden(Edge),
}

/// Handle returned by [`PanZoomController::subscribe`](crate::PanZoomController::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Notification<'_>) -> Flow>;

/// Subscribed observer callbacks, called in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Observers {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        before != self.entries.len()
    }

    /// Delivers `notification` to every observer.
    ///
    /// Returns [`Flow::Cancel`] if any observer asked to cancel; all
    /// observers are still called.
    pub(crate) fn publish(&mut self, notification: &Notification<'_>) -> Flow {
        let mut flow = Flow::Continue;
        for (_, callback) in &mut self.entries {
            if callback(notification).is_cancel() {
                flow = Flow::Cancel;
            }
        }
        flow
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
