// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom --heading-base-level=0

//! Understory Pan/Zoom: a headless pan/zoom controller.
//!
//! This crate turns touch, wheel, and programmatic input into a single
//! authoritative transform for content shown inside a fixed view region.
//! It focuses on:
//! - Ordering: input is normalized by `understory_gesture` into one causally
//!   ordered stream of interaction events.
//! - Policy: proposed transforms pass through an [`InterceptorChain`];
//!   [`BoundaryInterceptor`] keeps content in view and
//!   [`ScaleLimitInterceptor`] bounds zoom.
//! - Commit: results go through a cancellable
//!   [`TransformationQueue`](understory_transition::TransformationQueue), so
//!   a new touch always starts from where the content visually is.
//!
//! It does **not** render, lay out, or virtualize content. Hosts implement
//! [`Host`] to report extents, forward raw input, call
//! [`PanZoomController::tick`] from their frame callback, and draw with
//! [`PanZoomController::rendered_state`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_gesture::{PointerInput, PointerPhase};
//! use understory_pan_zoom::{
//!     BoundaryConfig, BoundaryInterceptor, ControllerConfig, FixedHost, PanZoomController,
//!     ZoomRequest,
//! };
//!
//! let host = FixedHost::new(Size::new(100.0, 100.0), Size::new(400.0, 400.0));
//! let mut pz = PanZoomController::builder()
//!     .host(host)
//!     .config(ControllerConfig::default())
//!     .interceptor(BoundaryInterceptor::new(BoundaryConfig::default()))
//!     .build()
//!     .unwrap();
//!
//! // Drag the content 30px to the left.
//! for (phase, x, t) in [
//!     (PointerPhase::Down, 50.0, 0),
//!     (PointerPhase::Move, 20.0, 500),
//!     (PointerPhase::Up, 20.0, 1_000),
//! ] {
//!     let input = PointerInput::new(1, phase, Point::new(x, 50.0), t);
//!     pz.handle_pointer(&input).unwrap();
//! }
//! assert_eq!(pz.translation().x, -30.0);
//!
//! // Zoom in about the viewport center.
//! pz.zoom_to(ZoomRequest::new(2.0)).unwrap();
//! assert_eq!(pz.scale(), 2.0);
//! ```
//!
//! ## Notifications
//!
//! Observers registered with [`PanZoomController::subscribe`] receive every
//! [`Notification`]. Returning [`Flow::Cancel`] from
//! [`Notification::PreTransform`] skips the interaction.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod boundary;
pub mod controller;
mod error;
mod host;
mod interceptor;
mod modes;
mod observer;
mod scale_limit;

pub use boundary::{
    BOUNCE_OVERSHOOT, BoundaryConfig, BoundaryInterceptor, EDGE_DEBOUNCE_MS, Edge,
    EdgeDebouncer, Edges, SLOW_DAMPING,
};
pub use controller::{
    ControllerConfig, DoneCallback, PanRequest, PanZoomController, PanZoomControllerBuilder,
    SwipeRequest, ZoomRequest,
};
pub use error::{ConfigError, PanZoomError};
pub use host::{Extents, FixedHost, Host};
pub use interceptor::{
    ControllerId, Flow, Interaction, InterceptContext, Interceptor, InterceptorChain,
    Registration,
};
pub use modes::BoundaryMode;
pub use observer::{Notification, SubscriptionId};
pub use scale_limit::ScaleLimitInterceptor;
