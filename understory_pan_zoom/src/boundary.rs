// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary enforcement.
//!
//! [`BoundaryInterceptor`] keeps content inside the viewport. Along each
//! axis the allowed translation range is
//! `[min(0, headroom), max(0, headroom)]` with
//! `headroom = viewport - scale * content`: content larger than the viewport
//! may scroll until its far edge reaches the viewport edge, and content
//! smaller than the viewport may rest anywhere inside it (or centered or
//! pinned, per [`BoundaryConfig`]).
//!
//! How a proposal is brought into range depends on the event:
//! - drag and wheel follow [`BoundaryMode`] per axis;
//! - swipes clamp and then bounce [`BOUNCE_OVERSHOOT`] of the viewport past
//!   each clamped boundary, shortening the animation in proportion to the
//!   travel that was cut;
//! - release, wheel end, and resize snap back into range, animated unless
//!   the event is a resize;
//! - everything else clamps.
//!
//! Afterwards, content edges that moved out of view raise
//! [`Notification::EdgeHidden`], debounced per edge.

use kurbo::{Rect, Vec2};
use understory_gesture::InteractionKind;
use understory_transition::{Easing, TransformState};

use crate::host::Extents;
use crate::interceptor::{ControllerId, Flow, Interaction, InterceptContext, Interceptor, Registration};
use crate::modes::{Alignment, BoundaryMode};
use crate::observer::Notification;

/// Fraction of the viewport a swipe may overshoot a boundary by.
pub const BOUNCE_OVERSHOOT: f64 = 0.1;

/// Divisor applied to the excess of a [`BoundaryMode::Slow`] drag.
pub const SLOW_DAMPING: f64 = 4.0;

/// Quiet period of the per-edge notification debounce, in milliseconds.
pub const EDGE_DEBOUNCE_MS: u64 = 90;

/// One side of the content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The leading horizontal edge.
    Left,
    /// The leading vertical edge.
    Top,
    /// The trailing horizontal edge.
    Right,
    /// The trailing vertical edge.
    Bottom,
}

impl Edge {
    /// Every edge, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// The flag for this edge.
    #[must_use]
    pub fn flag(self) -> Edges {
        match self {
            Self::Left => Edges::LEFT,
            Self::Top => Edges::TOP,
            Self::Right => Edges::RIGHT,
            Self::Bottom => Edges::BOTTOM,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
        }
    }
}

bitflags::bitflags! {
    /// A set of content edges.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// The leading horizontal edge.
        const LEFT   = 0b0001;
        /// The leading vertical edge.
        const TOP    = 0b0010;
        /// The trailing horizontal edge.
        const RIGHT  = 0b0100;
        /// The trailing vertical edge.
        const BOTTOM = 0b1000;
    }
}

impl Edges {
    /// Content edges of `state` lying more than `sensitivity` pixels beyond
    /// the matching viewport edge.
    #[must_use]
    pub fn hidden(state: &TransformState, extents: &Extents, sensitivity: f64) -> Self {
        let content = extents.scaled_content(state.scale);
        let t = state.translate;
        let mut hidden = Self::empty();
        hidden.set(Self::LEFT, t.x < -sensitivity);
        hidden.set(Self::TOP, t.y < -sensitivity);
        hidden.set(
            Self::RIGHT,
            t.x + content.width > extents.viewport.width + sensitivity,
        );
        hidden.set(
            Self::BOTTOM,
            t.y + content.height > extents.viewport.height + sensitivity,
        );
        hidden
    }
}

/// Leading-edge debounce, one window per [`Edge`].
///
/// The first signal of a burst passes; every signal (passed or not)
/// restarts the quiet window of its edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeDebouncer {
    window_ms: u64,
    last: [Option<u64>; 4],
}

impl Default for EdgeDebouncer {
    fn default() -> Self {
        Self::new(EDGE_DEBOUNCE_MS)
    }
}

impl EdgeDebouncer {
    /// A debouncer with the given quiet window.
    #[must_use]
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last: [None; 4],
        }
    }

    /// Records a signal for `edge` at `now`, returning `true` if it passes.
    pub fn signal(&mut self, edge: Edge, now: u64) -> bool {
        let window = self.window_ms;
        let slot = &mut self.last[edge.index()];
        let pass = slot.is_none_or(|last| now.saturating_sub(last) >= window);
        *slot = Some(now);
        pass
    }

    /// Forgets every pending window.
    pub fn reset(&mut self) {
        self.last = [None; 4];
    }
}

/// Settings for [`BoundaryInterceptor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryConfig {
    /// Drag/wheel behavior past a horizontal boundary.
    pub mode_x: BoundaryMode,
    /// Drag/wheel behavior past a vertical boundary.
    pub mode_y: BoundaryMode,
    /// Duration of the snap-back animation.
    ///
    /// Applied only when a release or wheel end leaves content out of range;
    /// a release that is already in range commits without animating. Half
    /// of it is the shortest an accelerated swipe may glide.
    pub duration_ms: u32,
    /// Curve of the snap-back animation.
    pub easing: Easing,
    /// Center content narrower than the viewport.
    pub center_content_x: bool,
    /// Center content shorter than the viewport.
    pub center_content_y: bool,
    /// Pin content narrower than the viewport to the left edge.
    ///
    /// Ignored when [`BoundaryConfig::center_content_x`] is set.
    pub pin_to_left: bool,
    /// Pin content shorter than the viewport to the top edge.
    ///
    /// Ignored when [`BoundaryConfig::center_content_y`] is set.
    pub pin_to_top: bool,
    /// Distance in pixels an edge must travel out of view before
    /// [`Notification::EdgeHidden`] fires.
    pub sensitivity: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            mode_x: BoundaryMode::Stop,
            mode_y: BoundaryMode::Stop,
            duration_ms: 250,
            easing: Easing::EaseOutQuart,
            center_content_x: false,
            center_content_y: false,
            pin_to_left: false,
            pin_to_top: false,
            sensitivity: 25.0,
        }
    }
}

impl BoundaryConfig {
    /// Returns a copy using `mode` on both axes.
    #[must_use]
    pub fn with_mode(self, mode: BoundaryMode) -> Self {
        Self {
            mode_x: mode,
            mode_y: mode,
            ..self
        }
    }

    /// Returns a copy using `mode` on the horizontal axis.
    #[must_use]
    pub fn with_mode_x(self, mode_x: BoundaryMode) -> Self {
        Self { mode_x, ..self }
    }

    /// Returns a copy using `mode` on the vertical axis.
    #[must_use]
    pub fn with_mode_y(self, mode_y: BoundaryMode) -> Self {
        Self { mode_y, ..self }
    }

    /// Returns a copy with the given snap-back animation.
    #[must_use]
    pub fn with_animation(self, duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
            ..self
        }
    }

    /// Returns a copy that centers small content on the given axes.
    #[must_use]
    pub fn with_center_content(self, x: bool, y: bool) -> Self {
        Self {
            center_content_x: x,
            center_content_y: y,
            ..self
        }
    }

    /// Returns a copy that pins small content to the leading edges on the
    /// given axes.
    #[must_use]
    pub fn with_pinning(self, left: bool, top: bool) -> Self {
        Self {
            pin_to_left: left,
            pin_to_top: top,
            ..self
        }
    }

    /// Returns a copy with the given edge sensitivity.
    #[must_use]
    pub fn with_sensitivity(self, sensitivity: f64) -> Self {
        Self {
            sensitivity,
            ..self
        }
    }

    fn alignment_x(&self) -> Alignment {
        alignment(self.center_content_x, self.pin_to_left)
    }

    fn alignment_y(&self) -> Alignment {
        alignment(self.center_content_y, self.pin_to_top)
    }
}

fn alignment(center: bool, pin: bool) -> Alignment {
    if center {
        Alignment::Center
    } else if pin {
        Alignment::Start
    } else {
        Alignment::Free
    }
}

/// Allowed translation along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
struct AxisRange {
    lo: f64,
    hi: f64,
}

impl AxisRange {
    fn new(viewport: f64, content: f64, alignment: Alignment) -> Self {
        let headroom = viewport - content;
        if headroom > 0.0 {
            match alignment {
                Alignment::Center => return Self::exact(headroom / 2.0),
                Alignment::Start => return Self::exact(0.0),
                Alignment::Free => {}
            }
        }
        Self {
            lo: headroom.min(0.0),
            hi: headroom.max(0.0),
        }
    }

    fn exact(at: f64) -> Self {
        Self { lo: at, hi: at }
    }

    fn clamp(self, v: f64) -> f64 {
        v.max(self.lo).min(self.hi)
    }

    fn damped(self, raw: f64, threshold: f64) -> f64 {
        if raw < self.lo {
            self.lo + ((raw - self.lo) / SLOW_DAMPING).max(-threshold)
        } else if raw > self.hi {
            self.hi + ((raw - self.hi) / SLOW_DAMPING).min(threshold)
        } else {
            raw
        }
    }

    /// Past either end, lands exactly `overshoot` beyond it.
    fn bounced(self, v: f64, overshoot: f64) -> f64 {
        if v < self.lo {
            self.lo - overshoot
        } else if v > self.hi {
            self.hi + overshoot
        } else {
            v
        }
    }
}

/// Keeps content inside the viewport and reports hidden edges.
#[derive(Clone, Debug, Default)]
pub struct BoundaryInterceptor {
    config: BoundaryConfig,
    registration: Registration,
    /// Undamped translation since the interaction started.
    raw: Option<Vec2>,
    confirmed: Edges,
    debouncer: EdgeDebouncer,
}

impl BoundaryInterceptor {
    /// Creates an interceptor with `config`.
    #[must_use]
    pub fn new(config: BoundaryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The settings in use.
    #[must_use]
    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Edges confirmed out of view by the last committed state.
    #[must_use]
    pub fn hidden_edges(&self) -> Edges {
        self.confirmed
    }

    /// The controller this interceptor is attached to.
    #[must_use]
    pub fn owner(&self) -> Option<ControllerId> {
        self.registration.owner()
    }

    /// The allowed translation at `scale`, as a rectangle of translations.
    #[must_use]
    pub fn allowed_translation(&self, extents: &Extents, scale: f64) -> Rect {
        let (x, y) = self.ranges(extents, scale);
        Rect::new(x.lo, y.lo, x.hi, y.hi)
    }

    /// Clamps the translation of `state` into the allowed range.
    #[must_use]
    pub fn clamp(&self, state: TransformState, extents: &Extents) -> TransformState {
        let (x, y) = self.ranges(extents, state.scale);
        state.with_translate(Vec2::new(x.clamp(state.translate.x), y.clamp(state.translate.y)))
    }

    fn ranges(&self, extents: &Extents, scale: f64) -> (AxisRange, AxisRange) {
        let content = extents.scaled_content(scale);
        (
            AxisRange::new(extents.viewport.width, content.width, self.config.alignment_x()),
            AxisRange::new(extents.viewport.height, content.height, self.config.alignment_y()),
        )
    }

    fn follow(&mut self, proposed: &mut TransformState, cx: &InterceptContext<'_>) {
        let (rx, ry) = self.ranges(&cx.extents, proposed.scale);
        let base = cx.base.translate;
        let raw = self.raw.unwrap_or(base) + (proposed.translate - base);
        self.raw = Some(raw);

        let content = cx.extents.scaled_content(proposed.scale);
        let x = match self.config.mode_x {
            BoundaryMode::Stop => rx.clamp(proposed.translate.x),
            BoundaryMode::Slow => rx.damped(raw.x, content.width / 4.0),
        };
        let y = match self.config.mode_y {
            BoundaryMode::Stop => ry.clamp(proposed.translate.y),
            BoundaryMode::Slow => ry.damped(raw.y, cx.extents.viewport.height / 4.0),
        };
        proposed.translate = Vec2::new(x, y);
    }

    fn bounce(&self, proposed: &mut TransformState, cx: &InterceptContext<'_>) {
        let (rx, ry) = self.ranges(&cx.extents, proposed.scale);
        let viewport = cx.extents.viewport;
        let base = cx.base.translate;
        let requested = (proposed.translate - base).hypot();

        proposed.translate = Vec2::new(
            rx.bounced(proposed.translate.x, viewport.width * BOUNCE_OVERSHOOT),
            ry.bounced(proposed.translate.y, viewport.height * BOUNCE_OVERSHOOT),
        );

        let actual = (proposed.translate - base).hypot();
        if requested > 0.0 && actual < requested {
            proposed.duration_ms = accelerated(
                proposed.duration_ms,
                actual / requested,
                self.config.duration_ms / 2,
            );
        }
    }

    fn snap(&self, proposed: &mut TransformState, cx: &InterceptContext<'_>, animate: bool) {
        let clamped = self.clamp(*proposed, &cx.extents);
        if clamped.same_placement(proposed) {
            return;
        }
        *proposed = if animate {
            clamped
                .with_duration(self.config.duration_ms)
                .with_easing(self.config.easing)
        } else {
            clamped
        };
    }

    fn signal_edges(&mut self, proposed: &TransformState, cx: &mut InterceptContext<'_>) {
        let hidden = Edges::hidden(proposed, &cx.extents, self.config.sensitivity);
        for edge in Edge::ALL {
            if hidden.contains(edge.flag())
                && !self.confirmed.contains(edge.flag())
                && self.debouncer.signal(edge, cx.timestamp)
            {
                cx.notify(Notification::EdgeHidden(edge));
            }
        }
    }
}

/// Scales `duration_ms` by `ratio`, never below `floor_ms` and never above
/// the original.
fn accelerated(duration_ms: u32, ratio: f64, floor_ms: u32) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the product is at most duration_ms, which fits in u32"
    )]
    let scaled = (f64::from(duration_ms) * ratio.clamp(0.0, 1.0)).round() as u32;
    scaled.max(floor_ms).min(duration_ms)
}

impl Interceptor for BoundaryInterceptor {
    fn register(&mut self, owner: ControllerId) {
        self.registration.attach(owner);
    }

    fn dispose(&mut self) {
        self.registration.detach();
        self.raw = None;
        self.confirmed = Edges::empty();
        self.debouncer.reset();
    }

    fn intercept(
        &mut self,
        interaction: &Interaction,
        proposed: &mut TransformState,
        cx: &mut InterceptContext<'_>,
    ) -> Flow {
        if cx.extents.is_empty() {
            return Flow::Continue;
        }
        let kind = interaction.event.kind;
        if kind.is_interaction_start() || kind.is_interaction_end() {
            self.raw = None;
        }

        use InteractionKind as K;
        match kind {
            K::DragStart | K::Drag | K::DragEnd | K::MouseWheelStart | K::MouseWheel => {
                self.follow(proposed, cx);
            }
            K::Swipe => self.bounce(proposed, cx),
            K::Release | K::MouseWheelEnd => self.snap(proposed, cx, true),
            K::Resize => self.snap(proposed, cx, false),
            K::Touch | K::TransformStart | K::Transform | K::TransformEnd => {
                *proposed = self.clamp(*proposed, &cx.extents);
            }
        }

        self.signal_edges(proposed, cx);
        Flow::Continue
    }

    fn committed(&mut self, state: &TransformState, extents: &Extents) {
        if extents.is_empty() {
            return;
        }
        self.confirmed = Edges::hidden(state, extents, self.config.sensitivity);
    }
}
