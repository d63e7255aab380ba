// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_transition::TransformState;

use crate::interceptor::{ControllerId, Flow, Interaction, InterceptContext, Interceptor, Registration};

/// Keeps the proposed scale within `[min_scale, max_scale]`.
///
/// When the scale is clamped, the translation is re-derived about the
/// event's center so that the content under the zoom anchor stays put.
/// Register it before [`BoundaryInterceptor`](crate::BoundaryInterceptor)
/// so that boundaries are computed for the final scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLimitInterceptor {
    min_scale: f64,
    max_scale: f64,
    registration: Registration,
}

impl Default for ScaleLimitInterceptor {
    fn default() -> Self {
        Self::new(0.25, 8.0)
    }
}

impl ScaleLimitInterceptor {
    /// Creates a limiter; the bounds are swapped if given in reverse order.
    #[must_use]
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        Self {
            min_scale,
            max_scale,
            registration: Registration::default(),
        }
    }

    /// The smallest allowed scale.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// The largest allowed scale.
    #[must_use]
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }
}

impl Interceptor for ScaleLimitInterceptor {
    fn register(&mut self, owner: ControllerId) {
        self.registration.attach(owner);
    }

    fn dispose(&mut self) {
        self.registration.detach();
    }

    fn intercept(
        &mut self,
        interaction: &Interaction,
        proposed: &mut TransformState,
        _cx: &mut InterceptContext<'_>,
    ) -> Flow {
        let clamped = proposed.scale.max(self.min_scale).min(self.max_scale);
        if clamped != proposed.scale {
            let anchor = interaction.event.iterative.center;
            tracing::trace!(from = proposed.scale, to = clamped, "scale limited");
            *proposed = proposed.scaled_to_about(anchor, clamped);
        }
        Flow::Continue
    }
}
