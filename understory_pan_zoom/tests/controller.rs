// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_pan_zoom` crate.
//!
//! These drive [`PanZoomController`] through its public entry points the way
//! a host would: raw pointer and wheel samples, frame ticks, and
//! programmatic commands.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use understory_gesture::{Direction, InteractionKind, PointerInput, PointerPhase, WheelInput};
use understory_pan_zoom::{
    BoundaryConfig, BoundaryInterceptor, ConfigError, ControllerConfig, Edge, FixedHost, Flow,
    Notification, PanRequest, PanZoomController, PanZoomControllerBuilder, PanZoomError,
    ScaleLimitInterceptor, SwipeRequest, ZoomRequest,
};
use understory_transition::{Outcome, TransformState};

/// Owned copy of a notification, for logging.
#[derive(Clone, Debug, PartialEq)]
enum Seen {
    Started,
    Finished,
    Pre(InteractionKind),
    Post(f64, f64, f64),
    Scale(f64),
    Translation(f64, f64),
    Edge(Edge),
}

impl Seen {
    fn of(notification: &Notification<'_>) -> Self {
        match *notification {
            Notification::InteractionStarted => Self::Started,
            Notification::InteractionFinished => Self::Finished,
            Notification::PreTransform(interaction) => Self::Pre(interaction.event.kind),
            Notification::PostTransform(state) => {
                Self::Post(state.scale, state.translate.x, state.translate.y)
            }
            Notification::ScaleChanged { scale } => Self::Scale(scale),
            Notification::TranslationChanged { x, y } => Self::Translation(x, y),
            Notification::EdgeHidden(edge) => Self::Edge(edge),
        }
    }
}

fn host() -> FixedHost {
    FixedHost::new(Size::new(100.0, 100.0), Size::new(400.0, 400.0))
}

fn bounded() -> PanZoomController<FixedHost> {
    PanZoomController::builder()
        .host(host())
        .interceptor(BoundaryInterceptor::new(BoundaryConfig::default()))
        .build()
        .unwrap()
}

fn unbounded() -> PanZoomController<FixedHost> {
    PanZoomController::new(host(), ControllerConfig::default()).unwrap()
}

fn record(pz: &mut PanZoomController<FixedHost>) -> Rc<RefCell<Vec<Seen>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    pz.subscribe(move |n| {
        sink.borrow_mut().push(Seen::of(n));
        Flow::Continue
    });
    log
}

fn outcomes() -> (
    Rc<RefCell<Vec<(TransformState, Outcome)>>>,
    impl FnOnce(&TransformState, Outcome) + 'static,
) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (log, move |state: &TransformState, outcome: Outcome| {
        sink.borrow_mut().push((*state, outcome));
    })
}

fn pointer(pz: &mut PanZoomController<FixedHost>, id: u64, phase: PointerPhase, x: f64, t: u64) {
    let input = PointerInput::new(id, phase, Point::new(x, 50.0), t);
    pz.handle_pointer(&input).unwrap();
}

fn wheel(dy: f64, t: u64) -> WheelInput {
    WheelInput {
        delta: Vec2::new(0.0, dy),
        position: Point::new(50.0, 50.0),
        timestamp: t,
    }
}

#[test]
fn build_validates_host_and_initial_state() {
    let missing = PanZoomControllerBuilder::<FixedHost>::new().build();
    assert_eq!(missing.err(), Some(ConfigError::MissingHost));

    let mut detached = host();
    detached.attached = false;
    let err = PanZoomController::new(detached, ControllerConfig::default()).err();
    assert_eq!(err, Some(ConfigError::HostDetached));

    let empty = FixedHost::new(Size::new(0.0, 100.0), Size::new(400.0, 400.0));
    let err = PanZoomController::new(empty, ControllerConfig::default()).err();
    assert_eq!(err, Some(ConfigError::EmptyViewport));

    let config = ControllerConfig::default().with_initial_state(TransformState::new(0.0, 0.0, 0.0));
    let err = PanZoomController::new(host(), config).err();
    assert!(matches!(err, Some(ConfigError::InvalidInitialState(_))));
}

#[test]
fn initial_state_is_adopted() {
    let config =
        ControllerConfig::default().with_initial_state(TransformState::new(2.0, -10.0, -20.0));
    let pz = PanZoomController::new(host(), config).unwrap();
    assert_eq!(pz.scale(), 2.0);
    assert_eq!(pz.translation(), Vec2::new(-10.0, -20.0));
    assert!(!pz.is_transforming());
}

#[test]
fn zoom_announces_scale_once() {
    let mut pz = unbounded();
    let log = record(&mut pz);

    pz.zoom_to(ZoomRequest::new(2.0)).unwrap();
    assert_eq!(
        *log.borrow(),
        [
            Seen::Pre(InteractionKind::Transform),
            Seen::Post(2.0, -50.0, -50.0),
            Seen::Scale(2.0),
            Seen::Translation(-50.0, -50.0),
        ]
    );

    log.borrow_mut().clear();
    pz.zoom_to(ZoomRequest::new(2.0)).unwrap();
    assert_eq!(
        *log.borrow(),
        [
            Seen::Pre(InteractionKind::Transform),
            Seen::Post(2.0, -50.0, -50.0),
        ]
    );
}

#[test]
fn zoom_by_anchors_at_origin() {
    let mut pz = unbounded();
    pz.zoom_by(ZoomRequest::new(2.0).about(Point::ORIGIN)).unwrap();
    pz.zoom_by(ZoomRequest::new(1.5).about(Point::ORIGIN)).unwrap();
    assert_eq!(pz.scale(), 3.0);
    assert_eq!(pz.translation(), Vec2::ZERO);
}

#[test]
fn drag_pans_the_content() {
    let mut pz = bounded();
    pointer(&mut pz, 1, PointerPhase::Down, 50.0, 0);
    pointer(&mut pz, 1, PointerPhase::Move, 20.0, 500);
    pointer(&mut pz, 1, PointerPhase::Up, 20.0, 1_000);
    assert_eq!(pz.translation(), Vec2::new(-30.0, 0.0));
    assert!(!pz.is_transforming());
}

#[test]
fn touch_interrupts_animation_at_the_rendered_state() {
    let mut pz = bounded();
    let (done, on_done) = outcomes();
    pz.pan_to(PanRequest::new(-100.0, 0.0).with_duration(100).on_done(on_done))
        .unwrap();
    assert!(pz.is_transforming());

    pz.tick(0).unwrap();
    pz.tick(50).unwrap();
    assert_eq!(pz.rendered_state().translate.x, -93.75);
    assert_eq!(pz.translation().x, 0.0);

    pointer(&mut pz, 1, PointerPhase::Down, 50.0, 50);
    assert_eq!(pz.translation().x, -93.75);
    {
        let done = done.borrow();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0.translate.x, -93.75);
        assert_eq!(done[0].1, Outcome::Cancelled);
    }
    pointer(&mut pz, 1, PointerPhase::Up, 50.0, 60);

    // The next command starts from where the content visually stopped.
    pz.pan_by(PanRequest::new(-10.0, 0.0)).unwrap();
    assert_eq!(pz.translation().x, -103.75);
}

#[test]
fn interaction_bracket_wraps_a_pointer_session() {
    let mut pz = unbounded();
    let log = record(&mut pz);

    pointer(&mut pz, 1, PointerPhase::Down, 50.0, 0);
    assert!(pz.is_transforming());
    pointer(&mut pz, 1, PointerPhase::Move, 20.0, 500);
    pointer(&mut pz, 1, PointerPhase::Up, 20.0, 1_000);
    assert!(!pz.is_transforming());

    let bracket: Vec<_> = log
        .borrow()
        .iter()
        .filter(|s| matches!(s, Seen::Started | Seen::Finished))
        .cloned()
        .collect();
    assert_eq!(bracket, [Seen::Started, Seen::Finished]);
    assert_eq!(log.borrow().first(), Some(&Seen::Started));
    assert_eq!(log.borrow().last(), Some(&Seen::Finished));
}

#[test]
fn observer_cancel_rejects_the_command() {
    let mut pz = unbounded();
    pz.subscribe(|n| match n {
        Notification::PreTransform(_) => Flow::Cancel,
        _ => Flow::Continue,
    });
    let (done, on_done) = outcomes();
    pz.pan_by(PanRequest::new(-10.0, 0.0).on_done(on_done)).unwrap();

    assert_eq!(pz.translation(), Vec2::ZERO);
    let done = done.borrow();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].1, Outcome::Cancelled);
}

#[test]
fn completed_command_reports_the_adopted_state() {
    let mut pz = unbounded();
    let (done, on_done) = outcomes();
    pz.pan_to(PanRequest::new(-40.0, -20.0).with_duration(100).on_done(on_done))
        .unwrap();
    pz.tick(0).unwrap();
    assert!(done.borrow().is_empty());
    pz.tick(100).unwrap();

    let done = done.borrow();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0.translate, Vec2::new(-40.0, -20.0));
    assert_eq!(done[0].1, Outcome::Completed);
    assert!(!pz.is_transforming());
}

#[test]
fn disabled_controller_ignores_input() {
    let mut pz = unbounded();
    pz.disable();
    assert!(pz.is_disabled());
    assert_eq!(pz.handle_wheel(&wheel(20.0, 0)), Ok(false));
    assert_eq!(pz.translation(), Vec2::ZERO);

    let (done, on_done) = outcomes();
    pz.pan_by(PanRequest::new(-10.0, 0.0).on_done(on_done)).unwrap();
    assert_eq!(pz.translation(), Vec2::ZERO);
    assert_eq!(done.borrow()[0].1, Outcome::Cancelled);

    pz.enable();
    assert_eq!(pz.handle_wheel(&wheel(20.0, 10)), Ok(true));
    assert_eq!(pz.translation(), Vec2::new(0.0, -20.0));
}

#[test]
fn wheel_default_action_follows_config() {
    let config = ControllerConfig::default().with_cancel_wheel_default(false);
    let mut pz = PanZoomController::new(host(), config).unwrap();
    assert_eq!(pz.handle_wheel(&wheel(20.0, 0)), Ok(false));
    assert_eq!(pz.translation(), Vec2::new(0.0, -20.0));
}

#[test]
fn touch_scrolling_gate_blocks_only_real_input() {
    let config = ControllerConfig::default().with_touch_scrolling(false);
    let mut pz = PanZoomController::new(host(), config).unwrap();

    pointer(&mut pz, 1, PointerPhase::Down, 50.0, 0);
    pointer(&mut pz, 1, PointerPhase::Move, 20.0, 500);
    pointer(&mut pz, 1, PointerPhase::Up, 20.0, 1_000);
    assert_eq!(pz.translation(), Vec2::ZERO);

    pz.pan_by(PanRequest::new(-10.0, 0.0)).unwrap();
    assert_eq!(pz.translation(), Vec2::new(-10.0, 0.0));
}

#[test]
fn wheel_session_ends_after_idle() {
    let mut pz = bounded();
    let log = record(&mut pz);

    pz.handle_wheel(&wheel(20.0, 0)).unwrap();
    assert_eq!(pz.translation(), Vec2::new(0.0, -20.0));
    assert!(pz.is_transforming());

    pz.tick(100).unwrap();
    assert!(pz.is_transforming());
    pz.tick(150).unwrap();
    assert!(!pz.is_transforming());

    let log = log.borrow();
    assert_eq!(log.first(), Some(&Seen::Started));
    assert_eq!(log.last(), Some(&Seen::Finished));
    assert!(log.contains(&Seen::Pre(InteractionKind::MouseWheelEnd)));
}

#[test]
fn swipe_bounces_then_snaps_back() {
    let mut pz = bounded();
    pz.transform(-250.0, 0.0, 1.0).unwrap();

    let (done, on_done) = outcomes();
    pz.swipe(SwipeRequest::new(Direction::Left, 2.0).on_done(on_done))
        .unwrap();
    assert_eq!(pz.translation().x, -250.0);
    assert!(pz.is_transforming());

    pz.tick(0).unwrap();
    pz.tick(125).unwrap();
    assert_eq!(pz.translation().x, -310.0);
    {
        let done = done.borrow();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0.translate.x, -310.0);
        assert_eq!(done[0].1, Outcome::Completed);
    }

    pz.tick(375).unwrap();
    assert_eq!(pz.translation().x, -300.0);
    assert!(!pz.is_transforming());
}

#[test]
fn short_swipe_past_the_boundary_overshoots_fully() {
    let mut pz = bounded();
    pz.transform(-250.0, 0.0, 1.0).unwrap();

    // Glides 55 px: 5 px past the -300 boundary.
    let velocity = 55.0 * 4.0 / 600.0;
    let (done, on_done) = outcomes();
    pz.swipe(SwipeRequest::new(Direction::Left, velocity).on_done(on_done))
        .unwrap();

    pz.tick(0).unwrap();
    pz.tick(600).unwrap();
    assert_eq!(done.borrow()[0].0.translate.x, -310.0);
    pz.tick(850).unwrap();
    assert_eq!(pz.translation().x, -300.0);
    assert!(!pz.is_transforming());
}

fn bracket_order(log: &[Seen]) -> Vec<Seen> {
    log.iter()
        .filter(|s| matches!(s, Seen::Started | Seen::Finished))
        .cloned()
        .collect()
}

#[test]
fn touch_finishes_the_interrupted_animation_before_starting() {
    let mut pz = unbounded();
    let log = record(&mut pz);
    pz.pan_to(PanRequest::new(-100.0, 0.0).with_duration(100))
        .unwrap();
    pz.tick(0).unwrap();
    pz.tick(50).unwrap();
    assert_eq!(bracket_order(&log.borrow()), [Seen::Started]);
    log.borrow_mut().clear();

    pointer(&mut pz, 1, PointerPhase::Down, 50.0, 50);
    let seen = log.borrow();
    assert_eq!(bracket_order(&seen), [Seen::Finished, Seen::Started]);
    // The sampled state is adopted before the touch is processed.
    let finished = seen.iter().position(|s| *s == Seen::Finished).unwrap();
    let touch = seen
        .iter()
        .position(|s| *s == Seen::Pre(InteractionKind::Touch))
        .unwrap();
    assert_eq!(seen[0], Seen::Post(1.0, -93.75, 0.0));
    assert!(finished < touch);
}

#[test]
fn wheel_finishes_the_interrupted_animation_before_starting() {
    let mut pz = unbounded();
    let log = record(&mut pz);
    pz.pan_to(PanRequest::new(-100.0, 0.0).with_duration(100))
        .unwrap();
    pz.tick(0).unwrap();
    pz.tick(50).unwrap();
    log.borrow_mut().clear();

    pz.handle_wheel(&wheel(20.0, 50)).unwrap();
    let seen = log.borrow();
    assert_eq!(bracket_order(&seen), [Seen::Finished, Seen::Started]);
    let started = seen.iter().position(|s| *s == Seen::Started).unwrap();
    let wheel_start = seen
        .iter()
        .position(|s| *s == Seen::Pre(InteractionKind::MouseWheelStart))
        .unwrap();
    assert!(started < wheel_start);
    assert_eq!(pz.translation(), Vec2::new(-93.75, -20.0));
}

#[test]
fn edge_hidden_is_announced_once_per_drag() {
    let mut pz = bounded();
    let log = record(&mut pz);

    pointer(&mut pz, 1, PointerPhase::Down, 90.0, 0);
    for (x, t) in [(79.0, 10), (59.0, 20), (39.0, 30), (19.0, 40)] {
        pointer(&mut pz, 1, PointerPhase::Move, x, t);
    }
    pointer(&mut pz, 1, PointerPhase::Up, 19.0, 500);
    assert_eq!(pz.translation().x, -71.0);

    let edges: Vec<_> = log
        .borrow()
        .iter()
        .filter(|s| matches!(s, Seen::Edge(_)))
        .cloned()
        .collect();
    assert_eq!(edges, [Seen::Edge(Edge::Left)]);
}

#[test]
fn pinch_zooms_about_the_centroid() {
    let mut pz = unbounded();
    pointer(&mut pz, 1, PointerPhase::Down, 25.0, 0);
    pointer(&mut pz, 2, PointerPhase::Down, 75.0, 10);
    pointer(&mut pz, 2, PointerPhase::Move, 125.0, 20);
    assert_eq!(pz.scale(), 2.0);
    assert_eq!(pz.translation(), Vec2::new(-50.0, -50.0));
}

#[test]
fn scale_limit_caps_a_pinch() {
    let mut pz = PanZoomController::builder()
        .host(host())
        .interceptor(ScaleLimitInterceptor::new(0.25, 1.5))
        .build()
        .unwrap();
    pointer(&mut pz, 1, PointerPhase::Down, 25.0, 0);
    pointer(&mut pz, 2, PointerPhase::Down, 75.0, 10);
    pointer(&mut pz, 2, PointerPhase::Move, 125.0, 20);
    assert_eq!(pz.scale(), 1.5);
    assert_eq!(pz.translation(), Vec2::new(-18.75, -25.0));
}

#[test]
fn invalid_direct_transform_is_an_error() {
    let mut pz = unbounded();
    let err = pz.transform(0.0, 0.0, 0.0);
    assert!(matches!(err, Err(PanZoomError::InvalidTransform(_))));
    assert!(pz.transform(f64::NAN, 0.0, 1.0).is_err());
    assert_eq!(pz.current_state(), TransformState::IDENTITY);
}

#[test]
fn direct_transform_cancels_running_transition() {
    let mut pz = unbounded();
    let (done, on_done) = outcomes();
    pz.pan_to(PanRequest::new(-100.0, 0.0).with_duration(100).on_done(on_done))
        .unwrap();
    pz.transform(-5.0, -5.0, 1.0).unwrap();

    assert_eq!(done.borrow()[0].1, Outcome::Cancelled);
    assert_eq!(pz.translation(), Vec2::new(-5.0, -5.0));
    assert!(!pz.is_transforming());
}

#[test]
fn removing_the_boundary_lifts_limits() {
    let mut pz = bounded();
    pz.pan_to(PanRequest::new(500.0, 0.0)).unwrap();
    assert_eq!(pz.translation().x, 0.0);

    assert_eq!(pz.remove_interceptor::<BoundaryInterceptor>(), 1);
    assert!(pz.interceptors().is_empty());
    pz.pan_to(PanRequest::new(500.0, 0.0)).unwrap();
    assert_eq!(pz.translation().x, 500.0);
}

#[test]
fn resize_snaps_content_into_range() {
    let mut pz = bounded();
    pz.transform(-300.0, -300.0, 1.0).unwrap();

    let bigger = Size::new(200.0, 200.0);
    pz.host_mut().extents.viewport = bigger;
    pz.handle_resize(bigger, 10).unwrap();
    assert_eq!(pz.translation(), Vec2::new(-200.0, -200.0));

    // Same size again is not a resize.
    let log = record(&mut pz);
    pz.handle_resize(bigger, 20).unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut pz = unbounded();
    let log = Rc::new(RefCell::new(0_u32));
    let sink = log.clone();
    let id = pz.subscribe(move |_| {
        *sink.borrow_mut() += 1;
        Flow::Continue
    });
    assert!(pz.unsubscribe(id));
    assert!(!pz.unsubscribe(id));
    pz.pan_by(PanRequest::new(-10.0, 0.0)).unwrap();
    assert_eq!(*log.borrow(), 0);
}

#[test]
fn dispose_detaches_everything() {
    let mut pz = bounded();
    let log = record(&mut pz);
    pz.dispose();
    assert!(pz.interceptors().is_empty());

    pz.pan_to(PanRequest::new(500.0, 0.0)).unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(pz.translation().x, 500.0);
}
