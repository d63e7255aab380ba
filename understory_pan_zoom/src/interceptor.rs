// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interceptors: policies that modify or veto proposed transforms.
//!
//! Every processed interaction yields one proposed [`TransformState`]. The
//! controller hands it to its [`InterceptorChain`], which runs each
//! [`Interceptor`] in registration order. An interceptor may rewrite the
//! proposal in place or stop processing by returning [`Flow::Cancel`].
//!
//! Interceptors are attached to exactly one controller. The controller
//! calls [`Interceptor::register`] when the interceptor is added and
//! [`Interceptor::dispose`] when it is removed or the controller is
//! disposed.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use understory_gesture::InteractionEvent;
use understory_transition::{TransformOverride, TransformState};

use crate::host::Extents;
use crate::observer::Notification;

/// Whether processing should go on after a hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep going.
    #[default]
    Continue,
    /// Stop processing the current interaction.
    Cancel,
}

impl Flow {
    /// `true` for [`Flow::Cancel`].
    #[must_use]
    pub fn is_cancel(self) -> bool {
        self == Self::Cancel
    }
}

/// Process-unique identity of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControllerId(usize);

impl ControllerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An interaction event as seen by observers and interceptors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    /// The normalized event.
    pub event: InteractionEvent,
    /// Explicit target of a programmatic command.
    ///
    /// When present, it replaces the computed proposal before interceptors
    /// run.
    pub target_state: Option<TransformOverride>,
}

impl Interaction {
    /// An interaction for a recognized input event.
    #[must_use]
    pub fn new(event: InteractionEvent) -> Self {
        Self {
            event,
            target_state: None,
        }
    }

    /// Returns a copy with an explicit target.
    #[must_use]
    pub fn with_target(mut self, target: TransformOverride) -> Self {
        self.target_state = Some(target);
        self
    }
}

/// What an interceptor may consult while processing a proposal.
#[derive(Debug)]
pub struct InterceptContext<'a> {
    /// The state the proposal was computed from.
    pub base: TransformState,
    /// Current viewport and content extents.
    pub extents: Extents,
    /// Timestamp of the interaction, in milliseconds.
    pub timestamp: u64,
    notifications: &'a mut Vec<Notification<'static>>,
}

impl<'a> InterceptContext<'a> {
    /// Creates a context that collects notifications into `sink`.
    pub fn new(
        base: TransformState,
        extents: Extents,
        timestamp: u64,
        sink: &'a mut Vec<Notification<'static>>,
    ) -> Self {
        Self {
            base,
            extents,
            timestamp,
            notifications: sink,
        }
    }

    /// Queues a notification; the controller publishes it once the chain
    /// has finished.
    pub fn notify(&mut self, notification: Notification<'static>) {
        self.notifications.push(notification);
    }
}

/// A policy attached to a controller.
pub trait Interceptor {
    /// Called when the interceptor is attached to the controller `owner`.
    fn register(&mut self, owner: ControllerId);

    /// Called when the interceptor is detached or its controller is disposed.
    fn dispose(&mut self);

    /// Inspects `interaction` and may rewrite `proposed`.
    ///
    /// Returning [`Flow::Cancel`] stops the chain and discards the proposal.
    fn intercept(
        &mut self,
        interaction: &Interaction,
        proposed: &mut TransformState,
        cx: &mut InterceptContext<'_>,
    ) -> Flow;

    /// Called whenever the controller adopts a new state.
    fn committed(&mut self, state: &TransformState, extents: &Extents) {
        let _ = (state, extents);
    }
}

/// Tracks which controller an interceptor is attached to.
///
/// Embed this in an [`Interceptor`] to get the attach-once bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registration(Option<ControllerId>);

impl Registration {
    /// Records `owner`. Attaching to a second controller is a programming
    /// error.
    pub fn attach(&mut self, owner: ControllerId) {
        debug_assert!(
            self.0.is_none_or(|current| current == owner),
            "interceptor is already attached to {:?}",
            self.0
        );
        self.0 = Some(owner);
    }

    /// Forgets the owner.
    pub fn detach(&mut self) {
        self.0 = None;
    }

    /// The controller this is attached to.
    #[must_use]
    pub fn owner(&self) -> Option<ControllerId> {
        self.0
    }
}

struct Entry {
    type_id: TypeId,
    interceptor: Box<dyn Interceptor>,
}

/// Ordered list of interceptors.
#[derive(Default)]
pub struct InterceptorChain {
    entries: Vec<Entry>,
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl InterceptorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no interceptor is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if an interceptor of type `I` is attached.
    #[must_use]
    pub fn contains<I: Interceptor + 'static>(&self) -> bool {
        let type_id = TypeId::of::<I>();
        self.entries.iter().any(|e| e.type_id == type_id)
    }

    /// Registers `interceptor` with `owner` and appends it.
    pub fn push<I: Interceptor + 'static>(&mut self, owner: ControllerId, mut interceptor: I) {
        interceptor.register(owner);
        self.entries.push(Entry {
            type_id: TypeId::of::<I>(),
            interceptor: Box::new(interceptor),
        });
    }

    /// Disposes and removes every interceptor of type `I`.
    ///
    /// Returns the number removed.
    pub fn remove<I: Interceptor + 'static>(&mut self) -> usize {
        let type_id = TypeId::of::<I>();
        let before = self.entries.len();
        self.entries.retain_mut(|e| {
            if e.type_id == type_id {
                e.interceptor.dispose();
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }

    /// Runs the chain in registration order, stopping at the first
    /// [`Flow::Cancel`].
    pub fn run(
        &mut self,
        interaction: &Interaction,
        proposed: &mut TransformState,
        cx: &mut InterceptContext<'_>,
    ) -> Flow {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry
                .interceptor
                .intercept(interaction, proposed, cx)
                .is_cancel()
            {
                tracing::debug!(
                    index,
                    kind = ?interaction.event.kind,
                    "interceptor cancelled interaction"
                );
                return Flow::Cancel;
            }
        }
        Flow::Continue
    }

    /// Tells every interceptor that `state` was adopted.
    pub fn committed(&mut self, state: &TransformState, extents: &Extents) {
        for entry in &mut self.entries {
            entry.interceptor.committed(state, extents);
        }
    }

    /// Disposes and removes every interceptor.
    pub fn dispose(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.interceptor.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Size, Vec2};
    use understory_gesture::{InteractionEvent, InteractionKind};
    use understory_transition::TransformState;

    use super::{
        ControllerId, Flow, Interaction, InterceptContext, Interceptor, InterceptorChain,
        Registration,
    };
    use crate::host::Extents;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Shift {
        name: &'static str,
        by: f64,
        flow: Flow,
        log: Log,
        registration: Registration,
    }

    impl Interceptor for Shift {
        fn register(&mut self, owner: ControllerId) {
            self.registration.attach(owner);
        }

        fn dispose(&mut self) {
            self.registration.detach();
            self.log.borrow_mut().push("dispose");
        }

        fn intercept(
            &mut self,
            _interaction: &Interaction,
            proposed: &mut TransformState,
            _cx: &mut InterceptContext<'_>,
        ) -> Flow {
            self.log.borrow_mut().push(self.name);
            proposed.translate += Vec2::new(self.by, 0.0);
            self.flow
        }
    }

    struct Other;

    impl Interceptor for Other {
        fn register(&mut self, _owner: ControllerId) {}
        fn dispose(&mut self) {}
        fn intercept(
            &mut self,
            _interaction: &Interaction,
            _proposed: &mut TransformState,
            _cx: &mut InterceptContext<'_>,
        ) -> Flow {
            Flow::Continue
        }
    }

    fn shift(name: &'static str, by: f64, flow: Flow, log: &Log) -> Shift {
        Shift {
            name,
            by,
            flow,
            log: log.clone(),
            registration: Registration::default(),
        }
    }

    fn run(chain: &mut InterceptorChain) -> (Flow, TransformState) {
        let interaction = Interaction::new(InteractionEvent::simulated(InteractionKind::Drag, 0));
        let mut proposed = TransformState::IDENTITY;
        let mut sink = Vec::new();
        let extents = Extents::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0));
        let mut cx = InterceptContext::new(TransformState::IDENTITY, extents, 0, &mut sink);
        let flow = chain.run(&interaction, &mut proposed, &mut cx);
        (flow, proposed)
    }

    #[test]
    fn runs_in_registration_order() {
        let log = Log::default();
        let owner = ControllerId::next();
        let mut chain = InterceptorChain::new();
        chain.push(owner, shift("a", 1.0, Flow::Continue, &log));
        chain.push(owner, shift("b", 2.0, Flow::Continue, &log));

        let (flow, proposed) = run(&mut chain);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(proposed.translate.x, 3.0);
        assert_eq!(*log.borrow(), ["a", "b"]);
    }

    #[test]
    fn cancel_stops_the_chain() {
        let log = Log::default();
        let owner = ControllerId::next();
        let mut chain = InterceptorChain::new();
        chain.push(owner, shift("a", 1.0, Flow::Cancel, &log));
        chain.push(owner, shift("b", 2.0, Flow::Continue, &log));

        let (flow, _) = run(&mut chain);
        assert_eq!(flow, Flow::Cancel);
        assert_eq!(*log.borrow(), ["a"]);
    }

    #[test]
    fn remove_by_type_disposes() {
        let log = Log::default();
        let owner = ControllerId::next();
        let mut chain = InterceptorChain::new();
        chain.push(owner, shift("a", 1.0, Flow::Continue, &log));
        chain.push(owner, Other);
        assert!(chain.contains::<Shift>());

        assert_eq!(chain.remove::<Shift>(), 1);
        assert!(!chain.contains::<Shift>());
        assert!(chain.contains::<Other>());
        assert_eq!(*log.borrow(), ["dispose"]);
        assert_eq!(chain.remove::<Shift>(), 0);
    }

    #[test]
    fn controller_ids_are_unique() {
        assert_ne!(ControllerId::next(), ControllerId::next());
    }

    #[test]
    fn registration_tracks_owner() {
        let owner = ControllerId::next();
        let mut registration = Registration::default();
        registration.attach(owner);
        assert_eq!(registration.owner(), Some(owner));
        registration.detach();
        registration.attach(ControllerId::next());
        assert_ne!(registration.owner(), Some(owner));
    }
}
