// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};

/// The view a [`PanZoomController`](crate::PanZoomController) drives.
///
/// Hosts own layout and rendering. The controller only asks for the two
/// extents it needs to enforce boundaries, and caches them until the next
/// resize or an explicit
/// [`invalidate_extents`](crate::PanZoomController::invalidate_extents).
pub trait Host {
    /// Returns `true` while the view is part of a live view tree.
    fn is_attached(&self) -> bool {
        true
    }

    /// Size of the fixed view region, in device pixels.
    fn viewport_size(&self) -> Size;

    /// Unscaled size of the content, in content units.
    fn content_size(&self) -> Size;
}

/// Viewport and content extents, as read from the [`Host`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Extents {
    /// Size of the fixed view region.
    pub viewport: Size,
    /// Unscaled size of the content.
    pub content: Size,
}

impl Extents {
    /// Creates extents from a viewport and content size.
    #[must_use]
    pub fn new(viewport: Size, content: Size) -> Self {
        Self { viewport, content }
    }

    /// Reads the current extents from `host`.
    #[must_use]
    pub fn of(host: &impl Host) -> Self {
        Self::new(host.viewport_size(), host.content_size())
    }

    /// Center of the viewport, in view space.
    #[must_use]
    pub fn viewport_center(&self) -> Point {
        self.viewport.to_rect().center()
    }

    /// Content size at `scale`.
    #[must_use]
    pub fn scaled_content(&self, scale: f64) -> Size {
        self.content * scale
    }

    /// `true` when the viewport has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewport.width <= 0.0 || self.viewport.height <= 0.0
    }
}

/// A [`Host`] with fixed extents, handy for tests and headless use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedHost {
    /// Extents reported to the controller.
    pub extents: Extents,
    /// Reported by [`Host::is_attached`].
    pub attached: bool,
}

impl FixedHost {
    /// An attached host with the given viewport and content sizes.
    #[must_use]
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            extents: Extents::new(viewport, content),
            attached: true,
        }
    }
}

impl Host for FixedHost {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn viewport_size(&self) -> Size {
        self.extents.viewport
    }

    fn content_size(&self) -> Size {
        self.extents.content
    }
}
