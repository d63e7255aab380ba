// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use understory_transition::InvalidTransform;

/// Error returned by [`PanZoomControllerBuilder::build`](crate::PanZoomControllerBuilder::build).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// No host was supplied.
    MissingHost,
    /// The host is not attached to a view tree.
    HostDetached,
    /// The host's viewport has no area.
    EmptyViewport,
    /// The configured initial state is not a valid transform.
    InvalidInitialState(InvalidTransform),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHost => f.write_str("pan/zoom controller requires a host"),
            Self::HostDetached => f.write_str("pan/zoom host is not attached"),
            Self::EmptyViewport => f.write_str("pan/zoom host has an empty viewport"),
            Self::InvalidInitialState(err) => write!(f, "initial state rejected: {err}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidInitialState(err) => Some(err),
            _ => None,
        }
    }
}

/// Error returned by controller entry points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanZoomError {
    /// A transform with a non-finite or non-positive value was rejected.
    InvalidTransform(InvalidTransform),
}

impl From<InvalidTransform> for PanZoomError {
    fn from(err: InvalidTransform) -> Self {
        Self::InvalidTransform(err)
    }
}

impl fmt::Display for PanZoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransform(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for PanZoomError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidTransform(err) => Some(err),
        }
    }
}
