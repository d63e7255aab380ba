// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pan/zoom controller.
//!
//! [`PanZoomController`] owns the authoritative [`TransformState`] and runs
//! every interaction through the same pipeline:
//!
//! 1. Interaction starts (`Touch`, `MouseWheelStart`) interrupt any running
//!    transition and adopt the state the content was visually at.
//! 2. Observers see [`Notification::PreTransform`] and may cancel.
//! 3. A proposal is computed from the state every queued transition will
//!    reach, then handed to the [`InterceptorChain`].
//! 4. The result is pushed to the [`TransformationQueue`]; every settled
//!    transition is adopted and announced.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size, Vec2};
use understory_gesture::{
    Direction, Gesture, GestureSynthesizer, InteractionEvent, InteractionKind, PointerInput,
    PointerRecognizer, Recognizer, SynthesizerConfig, WheelInput,
};
use understory_transition::{
    Easing, Outcome, Settled, TransformOverride, TransformState, TransformationQueue,
};

use crate::error::{ConfigError, PanZoomError};
use crate::host::{Extents, Host};
use crate::interceptor::{
    ControllerId, Flow, Interaction, InterceptContext, Interceptor, InterceptorChain,
};
use crate::observer::{Notification, Observers, SubscriptionId};

/// Called once a programmatic command settles, with the adopted state.
pub type DoneCallback = Box<dyn FnOnce(&TransformState, Outcome)>;

/// Settings for [`PanZoomController`], fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Whether hosts should suppress the platform's default wheel handling.
    pub cancel_wheel_default: bool,
    /// Whether real (non-programmatic) input may transform the content.
    pub touch_scrolling_enabled: bool,
    /// Duration of a swipe's glide, in milliseconds.
    pub swipe_duration_ms: u32,
    /// Curve of a swipe's glide.
    pub swipe_easing: Easing,
    /// The state the controller starts in.
    pub initial_state: TransformState,
    /// Settings of the gesture synthesizer.
    pub synthesizer: SynthesizerConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cancel_wheel_default: true,
            touch_scrolling_enabled: true,
            swipe_duration_ms: 600,
            swipe_easing: Easing::EaseOutQuart,
            initial_state: TransformState::IDENTITY,
            synthesizer: SynthesizerConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Returns a copy with the given wheel default-action policy.
    #[must_use]
    pub fn with_cancel_wheel_default(self, cancel_wheel_default: bool) -> Self {
        Self {
            cancel_wheel_default,
            ..self
        }
    }

    /// Returns a copy with real input enabled or disabled.
    #[must_use]
    pub fn with_touch_scrolling(self, touch_scrolling_enabled: bool) -> Self {
        Self {
            touch_scrolling_enabled,
            ..self
        }
    }

    /// Returns a copy with the given swipe glide duration.
    #[must_use]
    pub fn with_swipe_duration(self, swipe_duration_ms: u32) -> Self {
        Self {
            swipe_duration_ms,
            ..self
        }
    }

    /// Returns a copy starting in `initial_state`.
    #[must_use]
    pub fn with_initial_state(self, initial_state: TransformState) -> Self {
        Self {
            initial_state,
            ..self
        }
    }

    /// Returns a copy with the given synthesizer settings.
    #[must_use]
    pub fn with_synthesizer(self, synthesizer: SynthesizerConfig) -> Self {
        Self {
            synthesizer,
            ..self
        }
    }
}

/// Pans the content, by a delta ([`PanZoomController::pan_by`]) or to an
/// absolute translation ([`PanZoomController::pan_to`]).
pub struct PanRequest {
    /// Horizontal amount.
    pub x: f64,
    /// Vertical amount.
    pub y: f64,
    /// Animation length; zero applies immediately.
    pub duration_ms: u32,
    /// Called when the pan settles or is rejected.
    pub done: Option<DoneCallback>,
}

impl PanRequest {
    /// An immediate pan.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            duration_ms: 0,
            done: None,
        }
    }

    /// Returns the request animated over `duration_ms`.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns the request with a completion callback.
    #[must_use]
    pub fn on_done(mut self, done: impl FnOnce(&TransformState, Outcome) + 'static) -> Self {
        self.done = Some(Box::new(done));
        self
    }
}

impl fmt::Debug for PanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanRequest")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("duration_ms", &self.duration_ms)
            .field("done", &self.done.is_some())
            .finish()
    }
}

/// Zooms the content, by a factor ([`PanZoomController::zoom_by`]) or to an
/// absolute scale ([`PanZoomController::zoom_to`]).
pub struct ZoomRequest {
    /// Factor or absolute scale.
    pub scale: f64,
    /// View-space point that stays fixed; the viewport center when `None`.
    pub origin: Option<Point>,
    /// Animation length; zero applies immediately.
    pub duration_ms: u32,
    /// Called when the zoom settles or is rejected.
    pub done: Option<DoneCallback>,
}

impl ZoomRequest {
    /// An immediate zoom about the viewport center.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            origin: None,
            duration_ms: 0,
            done: None,
        }
    }

    /// Returns the request anchored at `origin`.
    #[must_use]
    pub fn about(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Returns the request animated over `duration_ms`.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns the request with a completion callback.
    #[must_use]
    pub fn on_done(mut self, done: impl FnOnce(&TransformState, Outcome) + 'static) -> Self {
        self.done = Some(Box::new(done));
        self
    }
}

impl fmt::Debug for ZoomRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomRequest")
            .field("scale", &self.scale)
            .field("origin", &self.origin)
            .field("duration_ms", &self.duration_ms)
            .field("done", &self.done.is_some())
            .finish()
    }
}

/// Flings the content as if released with `velocity` towards `direction`.
pub struct SwipeRequest {
    /// Direction the content moves in.
    pub direction: Direction,
    /// Release velocity in pixels per millisecond.
    pub velocity: f64,
    /// Glide duration; the configured swipe duration when `None`.
    pub duration_ms: Option<u32>,
    /// Called when the glide settles or is rejected.
    pub done: Option<DoneCallback>,
}

impl SwipeRequest {
    /// A swipe with the configured glide duration.
    #[must_use]
    pub fn new(direction: Direction, velocity: f64) -> Self {
        Self {
            direction,
            velocity,
            duration_ms: None,
            done: None,
        }
    }

    /// Returns the request gliding for `duration_ms`.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Returns the request with a completion callback.
    #[must_use]
    pub fn on_done(mut self, done: impl FnOnce(&TransformState, Outcome) + 'static) -> Self {
        self.done = Some(Box::new(done));
        self
    }
}

impl fmt::Debug for SwipeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeRequest")
            .field("direction", &self.direction)
            .field("velocity", &self.velocity)
            .field("duration_ms", &self.duration_ms)
            .field("done", &self.done.is_some())
            .finish()
    }
}

/// Queue payload: who to tell when a transition settles.
struct Commit {
    done: Option<DoneCallback>,
}

/// Builds a [`PanZoomController`].
pub struct PanZoomControllerBuilder<H, R = PointerRecognizer> {
    id: ControllerId,
    host: Option<H>,
    recognizer: R,
    config: ControllerConfig,
    chain: InterceptorChain,
}

impl<H, R> fmt::Debug for PanZoomControllerBuilder<H, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanZoomControllerBuilder")
            .field("id", &self.id)
            .field("has_host", &self.host.is_some())
            .field("config", &self.config)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Default for PanZoomControllerBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> PanZoomControllerBuilder<H> {
    /// A builder using [`PointerRecognizer`] and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ControllerId::next(),
            host: None,
            recognizer: PointerRecognizer::default(),
            config: ControllerConfig::default(),
            chain: InterceptorChain::new(),
        }
    }
}

impl<H: Host, R: Recognizer> PanZoomControllerBuilder<H, R> {
    /// Sets the host. Required.
    #[must_use]
    pub fn host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Replaces the pointer recognizer.
    #[must_use]
    pub fn recognizer<R2: Recognizer>(self, recognizer: R2) -> PanZoomControllerBuilder<H, R2> {
        PanZoomControllerBuilder {
            id: self.id,
            host: self.host,
            recognizer,
            config: self.config,
            chain: self.chain,
        }
    }

    /// Sets the controller settings.
    #[must_use]
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends an interceptor. Interceptors run in the order they are added.
    #[must_use]
    pub fn interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.chain.push(self.id, interceptor);
        self
    }

    /// Validates the host and settings and creates the controller.
    pub fn build(self) -> Result<PanZoomController<H, R>, ConfigError> {
        let host = self.host.ok_or(ConfigError::MissingHost)?;
        if !host.is_attached() {
            return Err(ConfigError::HostDetached);
        }
        let extents = Extents::of(&host);
        if extents.is_empty() {
            return Err(ConfigError::EmptyViewport);
        }
        let initial = self.config.initial_state.immediate();
        initial.validate().map_err(ConfigError::InvalidInitialState)?;

        let mut chain = self.chain;
        chain.committed(&initial, &extents);
        let mut synth = GestureSynthesizer::new(self.recognizer, self.config.synthesizer);
        synth.set_measured_size(extents.viewport);
        tracing::debug!(
            id = ?self.id,
            width = extents.viewport.width,
            height = extents.viewport.height,
            "pan/zoom controller created"
        );
        Ok(PanZoomController {
            id: self.id,
            host,
            config: self.config,
            current: initial,
            synth,
            queue: TransformationQueue::new(),
            chain,
            observers: Observers::default(),
            extents: Some(extents),
            enabled: true,
            pointer_session: false,
            wheel_session: false,
            started: false,
            now: 0,
        })
    }
}

/// Drives pan and zoom of content inside a fixed view region.
///
/// See the [module documentation](crate::controller) for the pipeline.
pub struct PanZoomController<H, R = PointerRecognizer> {
    id: ControllerId,
    host: H,
    config: ControllerConfig,
    current: TransformState,
    synth: GestureSynthesizer<R>,
    queue: TransformationQueue<Commit>,
    chain: InterceptorChain,
    observers: Observers,
    extents: Option<Extents>,
    enabled: bool,
    pointer_session: bool,
    wheel_session: bool,
    /// Whether `InteractionStarted` was published without a matching
    /// `InteractionFinished` yet.
    started: bool,
    now: u64,
}

impl<H, R> fmt::Debug for PanZoomController<H, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanZoomController")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("queue", &self.queue.state())
            .field("chain", &self.chain)
            .field("observers", &self.observers)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl<H: Host> PanZoomController<H> {
    /// Creates a controller with the default recognizer and no interceptors.
    pub fn new(host: H, config: ControllerConfig) -> Result<Self, ConfigError> {
        PanZoomControllerBuilder::new().host(host).config(config).build()
    }

    /// Starts building a controller.
    #[must_use]
    pub fn builder() -> PanZoomControllerBuilder<H> {
        PanZoomControllerBuilder::new()
    }
}

impl<H: Host, R: Recognizer> PanZoomController<H, R> {
    /// This controller's identity, as passed to [`Interceptor::register`].
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    ///
    /// Call [`PanZoomController::invalidate_extents`] after changing its
    /// extents.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The settings in use.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The gesture synthesizer.
    #[must_use]
    pub fn synthesizer(&self) -> &GestureSynthesizer<R> {
        &self.synth
    }

    /// The authoritative, last committed state.
    #[must_use]
    pub fn current_state(&self) -> TransformState {
        self.current
    }

    /// The state to draw this frame: the interpolated state of a running
    /// transition, or the committed state.
    #[must_use]
    pub fn rendered_state(&self) -> TransformState {
        self.queue.rendered().unwrap_or(self.current)
    }

    /// The committed scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.current.scale
    }

    /// The committed translation.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.current.translate
    }

    /// `true` while an input session is open or a transition is queued.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.pointer_session || self.wheel_session || !self.queue.is_idle()
    }

    /// `true` after [`PanZoomController::disable`].
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        !self.enabled
    }

    /// Lets interactions transform the content again.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Rejects every interaction and command until re-enabled.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Appends an interceptor to the chain.
    ///
    /// The chain is told about the current state right away so that the new
    /// interceptor starts from it.
    pub fn add_interceptor<I: Interceptor + 'static>(&mut self, interceptor: I) {
        self.chain.push(self.id, interceptor);
        let extents = self.extents();
        self.chain.committed(&self.current, &extents);
    }

    /// Disposes and removes every interceptor of type `I`, returning how
    /// many were removed.
    pub fn remove_interceptor<I: Interceptor + 'static>(&mut self) -> usize {
        self.chain.remove::<I>()
    }

    /// The interceptor chain.
    #[must_use]
    pub fn interceptors(&self) -> &InterceptorChain {
        &self.chain
    }

    /// Registers an observer.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Notification<'_>) -> Flow + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(Box::new(observer))
    }

    /// Removes an observer, returning whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Drops the cached extents; they are read from the host on next use.
    pub fn invalidate_extents(&mut self) {
        self.extents = None;
    }

    /// Feeds a pointer sample.
    ///
    /// Every resulting event is processed; the first error is returned.
    pub fn handle_pointer(&mut self, input: &PointerInput) -> Result<(), PanZoomError> {
        self.now = self.now.max(input.timestamp);
        let events = self.synth.on_pointer(input);
        self.handle_all(events)
    }

    /// Feeds a wheel sample.
    ///
    /// Returns whether the host should prevent the platform's default wheel
    /// action.
    pub fn handle_wheel(&mut self, input: &WheelInput) -> Result<bool, PanZoomError> {
        self.now = self.now.max(input.timestamp);
        let events = self.synth.on_wheel(input);
        self.handle_all(events)?;
        Ok(self.config.cancel_wheel_default && self.enabled)
    }

    /// Feeds a measured view size.
    pub fn handle_resize(&mut self, size: Size, timestamp: u64) -> Result<(), PanZoomError> {
        self.now = self.now.max(timestamp);
        match self.synth.on_resize(size, timestamp) {
            Some(event) => self.handle_event(event),
            None => Ok(()),
        }
    }

    /// Advances time to `now` (milliseconds): ends idle wheel sessions and
    /// steps the running transition.
    ///
    /// Hosts call this from their frame callback while
    /// [`PanZoomController::is_transforming`] is `true`.
    pub fn tick(&mut self, now: u64) -> Result<(), PanZoomError> {
        self.now = self.now.max(now);
        let result = match self.synth.tick(now) {
            Some(event) => self.handle_event(event),
            None => Ok(()),
        };
        for settled in self.queue.advance(now) {
            self.adopt(settled);
        }
        self.update_bracket();
        result
    }

    /// Processes one already synthesized event.
    pub fn handle_event(&mut self, event: InteractionEvent) -> Result<(), PanZoomError> {
        self.dispatch(Interaction::new(event), None)
    }

    /// Replaces the state immediately, bypassing interceptors and the queue.
    ///
    /// A running transition is cancelled; its callbacks see
    /// [`Outcome::Cancelled`].
    pub fn transform(&mut self, x: f64, y: f64, scale: f64) -> Result<(), PanZoomError> {
        let next = TransformState::new(scale, x, y);
        if let Err(err) = next.validate() {
            tracing::warn!(scale, x, y, "rejected direct transform");
            return Err(err.into());
        }
        for settled in self.queue.cancel() {
            if let Some(done) = settled.payload.done {
                done(&settled.state, Outcome::Cancelled);
            }
        }
        self.commit(next);
        self.update_bracket();
        Ok(())
    }

    /// Pans by `(request.x, request.y)`.
    pub fn pan_by(&mut self, request: PanRequest) -> Result<(), PanZoomError> {
        let base = self.proposal_base();
        let x = base.translate.x + request.x;
        let y = base.translate.y + request.y;
        self.pan_command(x, y, request)
    }

    /// Pans to the absolute translation `(request.x, request.y)`.
    pub fn pan_to(&mut self, request: PanRequest) -> Result<(), PanZoomError> {
        let (x, y) = (request.x, request.y);
        self.pan_command(x, y, request)
    }

    /// Multiplies the scale by `request.scale`.
    pub fn zoom_by(&mut self, request: ZoomRequest) -> Result<(), PanZoomError> {
        let base = self.proposal_base();
        let scale = base.scale * request.scale;
        self.zoom_command(scale, request)
    }

    /// Zooms to the absolute scale `request.scale`.
    pub fn zoom_to(&mut self, request: ZoomRequest) -> Result<(), PanZoomError> {
        let scale = request.scale;
        self.zoom_command(scale, request)
    }

    /// Flings the content, then releases so that any bounce snaps back.
    pub fn swipe(&mut self, request: SwipeRequest) -> Result<(), PanZoomError> {
        let base = self.proposal_base();
        let duration_ms = request.duration_ms.unwrap_or(self.config.swipe_duration_ms);
        let velocity = request.direction.unit() * request.velocity;
        let travel = self.swipe_travel(velocity, duration_ms);
        let target = TransformOverride {
            x: Some(base.translate.x + travel.x),
            y: Some(base.translate.y + travel.y),
            duration_ms: Some(duration_ms),
            easing: Some(self.config.swipe_easing),
            ..TransformOverride::default()
        };

        let mut event = self.simulated(InteractionKind::Swipe, None);
        event.cumulative.velocity = velocity;
        event.iterative.velocity = velocity;
        event.iterative.direction = request.direction;
        let swiped = self.dispatch(Interaction::new(event).with_target(target), request.done);
        let release = self.simulated(InteractionKind::Release, None);
        let released = self.dispatch(Interaction::new(release), None);
        swiped.and(released)
    }

    /// Detaches every interceptor, then drops every observer.
    ///
    /// Running transitions are cancelled without being adopted.
    pub fn dispose(&mut self) {
        self.chain.dispose();
        self.observers.clear();
        for settled in self.queue.cancel() {
            if let Some(done) = settled.payload.done {
                done(&settled.state, Outcome::Cancelled);
            }
        }
        self.synth.reset();
        self.pointer_session = false;
        self.wheel_session = false;
        self.started = false;
        tracing::debug!(id = ?self.id, "pan/zoom controller disposed");
    }

    fn handle_all(&mut self, events: Vec<InteractionEvent>) -> Result<(), PanZoomError> {
        let mut result = Ok(());
        for event in events {
            let outcome = self.handle_event(event);
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    }

    fn pan_command(&mut self, x: f64, y: f64, request: PanRequest) -> Result<(), PanZoomError> {
        let target = TransformOverride {
            x: Some(x),
            y: Some(y),
            duration_ms: Some(request.duration_ms),
            ..TransformOverride::default()
        };
        let event = self.simulated(InteractionKind::Transform, None);
        self.dispatch(Interaction::new(event).with_target(target), request.done)
    }

    fn zoom_command(&mut self, scale: f64, request: ZoomRequest) -> Result<(), PanZoomError> {
        let base = self.proposal_base();
        let origin = request
            .origin
            .unwrap_or_else(|| self.extents().viewport_center());
        let zoomed = base.scaled_to_about(origin, scale);
        let target = TransformOverride {
            duration_ms: Some(request.duration_ms),
            ..TransformOverride::from_state(&zoomed)
        };
        let event = self.simulated(InteractionKind::Transform, Some(origin));
        self.dispatch(Interaction::new(event).with_target(target), request.done)
    }

    fn simulated(&mut self, kind: InteractionKind, center: Option<Point>) -> InteractionEvent {
        let center = center.unwrap_or_else(|| self.extents().viewport_center());
        let mut event = InteractionEvent::simulated(kind, self.now);
        event.cumulative = Gesture::at(center);
        event.iterative = Gesture::at(center);
        event
    }

    fn extents(&mut self) -> Extents {
        *self.extents.get_or_insert_with(|| Extents::of(&self.host))
    }

    /// The state new proposals are relative to.
    fn proposal_base(&self) -> TransformState {
        self.queue.projected().unwrap_or(self.current).immediate()
    }

    /// Distance whose glide starts at `velocity` under the swipe easing.
    fn swipe_travel(&self, velocity: Vec2, duration_ms: u32) -> Vec2 {
        let slope = self.config.swipe_easing.initial_slope();
        let slope = if slope > 0.0 { slope } else { 1.0 };
        velocity * f64::from(duration_ms) / slope
    }

    fn propose(&self, event: &InteractionEvent, base: TransformState) -> TransformState {
        use InteractionKind as K;
        let step = event.iterative;
        match event.kind {
            K::DragStart | K::Drag | K::DragEnd | K::MouseWheelStart | K::MouseWheel => {
                base.with_translate(base.translate + step.delta)
            }
            K::TransformStart | K::Transform | K::TransformEnd => {
                let zoomed = if step.scale.is_finite() && step.scale > 0.0 {
                    base.zoomed_about(step.center, step.scale)
                } else {
                    base
                };
                zoomed.with_translate(zoomed.translate + step.delta)
            }
            K::Swipe => {
                let duration_ms = self.config.swipe_duration_ms;
                let travel = self.swipe_travel(event.cumulative.velocity, duration_ms);
                base.with_translate(base.translate + travel)
                    .with_duration(duration_ms)
                    .with_easing(self.config.swipe_easing)
            }
            K::Touch | K::Release | K::Resize | K::MouseWheelEnd => base,
        }
    }

    fn dispatch(
        &mut self,
        interaction: Interaction,
        done: Option<DoneCallback>,
    ) -> Result<(), PanZoomError> {
        let event = interaction.event;
        let kind = event.kind;
        self.now = self.now.max(event.timestamp);

        if kind.is_interaction_start() && !event.simulated {
            for settled in self.queue.cancel() {
                self.adopt(settled);
            }
            self.update_bracket();
            match kind {
                InteractionKind::Touch => self.pointer_session = true,
                _ => self.wheel_session = true,
            }
            self.update_bracket();
        }
        if kind == InteractionKind::Resize {
            self.invalidate_extents();
        }

        let result = self.process(&interaction, done);

        if kind.is_interaction_end() && !event.simulated {
            match kind {
                InteractionKind::Release => self.pointer_session = false,
                _ => self.wheel_session = false,
            }
        }
        self.update_bracket();
        result
    }

    fn process(
        &mut self,
        interaction: &Interaction,
        done: Option<DoneCallback>,
    ) -> Result<(), PanZoomError> {
        let event = &interaction.event;
        let flow = self.observers.publish(&Notification::PreTransform(interaction));
        if flow.is_cancel() {
            tracing::debug!(kind = ?event.kind, "interaction cancelled by observer");
            self.reject(done);
            return Ok(());
        }
        if !self.enabled {
            tracing::debug!(kind = ?event.kind, "controller disabled; interaction ignored");
            self.reject(done);
            return Ok(());
        }
        if !self.config.touch_scrolling_enabled && !event.simulated {
            tracing::debug!(kind = ?event.kind, "touch scrolling disabled; interaction ignored");
            self.reject(done);
            return Ok(());
        }

        let base = self.proposal_base();
        let mut proposed = match interaction.target_state {
            Some(target) => target.apply_to(&base),
            None => self.propose(event, base),
        };

        let extents = self.extents();
        let mut sink = Vec::new();
        let mut cx = InterceptContext::new(base, extents, event.timestamp, &mut sink);
        let flow = self.chain.run(interaction, &mut proposed, &mut cx);
        if flow.is_cancel() {
            self.reject(done);
            return Ok(());
        }
        for notification in &sink {
            self.observers.publish(notification);
        }

        if let Err(err) = proposed.validate() {
            tracing::warn!(
                kind = ?event.kind,
                scale = err.scale,
                x = err.x,
                y = err.y,
                "rejected invalid proposal"
            );
            self.reject(done);
            return Err(err.into());
        }
        let current = self.current;
        for settled in self.queue.push(&current, proposed, Commit { done })? {
            self.adopt(settled);
        }
        Ok(())
    }

    fn reject(&mut self, done: Option<DoneCallback>) {
        if let Some(done) = done {
            done(&self.current, Outcome::Cancelled);
        }
    }

    fn adopt(&mut self, settled: Settled<Commit>) {
        tracing::trace!(outcome = ?settled.outcome, "transition settled");
        self.commit(settled.state);
        if let Some(done) = settled.payload.done {
            done(&self.current, settled.outcome);
        }
    }

    fn commit(&mut self, next: TransformState) {
        let prior = self.current;
        self.current = next;
        self.observers
            .publish(&Notification::PostTransform(&self.current));
        if prior.scale != next.scale {
            self.observers
                .publish(&Notification::ScaleChanged { scale: next.scale });
        }
        if prior.translate != next.translate {
            self.observers.publish(&Notification::TranslationChanged {
                x: next.translate.x,
                y: next.translate.y,
            });
        }
        let extents = self.extents();
        self.chain.committed(&self.current, &extents);
    }

    fn update_bracket(&mut self) {
        let transforming = self.is_transforming();
        if transforming && !self.started {
            self.started = true;
            self.observers.publish(&Notification::InteractionStarted);
        } else if !transforming && self.started {
            self.started = false;
            self.observers.publish(&Notification::InteractionFinished);
        }
    }
}
