//! Viewport control: turns framing intents into camera commands.
//!
//! Follow mode is one-way: every user-initiated camera change turns it off,
//! and only an explicit recenter on the user turns it back on.

use foundation::{EdgeInsets, GeoBounds, LatLng, bounding_box_of};
use serde::Serialize;
use tracing::debug;

use crate::location::LocationError;

/// Zoom for framing a single result or recentering on the user.
pub const FRAME_ZOOM: f64 = 14.0;
/// Zoom for an explicitly selected place.
pub const FOCUS_ZOOM: f64 = 15.0;
/// Zoom applied when a cluster is tapped.
pub const CLUSTER_ZOOM: f64 = 14.0;
pub const FRAME_ANIMATION_MS: u32 = 1000;
pub const CLUSTER_ANIMATION_MS: u32 = 500;
/// Geographic padding around multi-result frames, in degrees.
pub const FRAME_PADDING_DEG: f64 = 0.01;
/// Screen padding around multi-result frames, in pixels.
pub const FRAME_INSET_PX: f64 = 50.0;

/// Desired camera state, consumed once by the map layer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraCommand {
    Center {
        center: LatLng,
        zoom: f64,
        animation_duration_ms: u32,
    },
    FitBounds {
        bounds: GeoBounds,
        padding: EdgeInsets,
        animation_duration_ms: u32,
    },
}

impl CameraCommand {
    pub fn animation_duration_ms(&self) -> u32 {
        match self {
            CameraCommand::Center {
                animation_duration_ms,
                ..
            }
            | CameraCommand::FitBounds {
                animation_duration_ms,
                ..
            } => *animation_duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    follow_mode: bool,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self { follow_mode: true }
    }
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the camera tracks the user's live location.
    pub fn follow_mode(&self) -> bool {
        self.follow_mode
    }

    /// Frames a result set.
    ///
    /// - empty: no command, follow mode unchanged
    /// - one point: center on it at [`FRAME_ZOOM`]
    /// - more: fit the padded bounding box with [`FRAME_INSET_PX`] insets
    pub fn frame(&mut self, points: &[LatLng]) -> Option<CameraCommand> {
        let command = match points {
            [] => return None,
            [only] => CameraCommand::Center {
                center: *only,
                zoom: FRAME_ZOOM,
                animation_duration_ms: FRAME_ANIMATION_MS,
            },
            many => {
                let bounds = bounding_box_of(many.iter().copied(), FRAME_PADDING_DEG).ok()?;
                CameraCommand::FitBounds {
                    bounds,
                    padding: EdgeInsets::uniform(FRAME_INSET_PX),
                    animation_duration_ms: FRAME_ANIMATION_MS,
                }
            }
        };
        self.follow_mode = false;
        debug!(points = points.len(), "framing results");
        Some(command)
    }

    /// Centers on the user and re-enables follow mode.
    pub fn recenter_on_user(
        &mut self,
        user_location: Option<LatLng>,
    ) -> Result<CameraCommand, LocationError> {
        let center = user_location.ok_or(LocationError::Unavailable)?;
        self.follow_mode = true;
        Ok(CameraCommand::Center {
            center,
            zoom: FRAME_ZOOM,
            animation_duration_ms: FRAME_ANIMATION_MS,
        })
    }

    pub fn focus_on(&mut self, point: LatLng) -> CameraCommand {
        self.follow_mode = false;
        CameraCommand::Center {
            center: point,
            zoom: FOCUS_ZOOM,
            animation_duration_ms: FRAME_ANIMATION_MS,
        }
    }

    /// Zooms toward a tapped cluster. Membership stays with the map layer.
    pub fn zoom_to_cluster(&mut self, cluster: LatLng) -> CameraCommand {
        self.follow_mode = false;
        CameraCommand::Center {
            center: cluster,
            zoom: CLUSTER_ZOOM,
            animation_duration_ms: CLUSTER_ANIMATION_MS,
        }
    }

    /// The user panned or zoomed the map by hand.
    pub fn on_user_gesture(&mut self) {
        self.follow_mode = false;
    }

    /// Location is not usable (permission denied); stop following.
    pub fn disable_follow(&mut self) {
        self.follow_mode = false;
    }
}
