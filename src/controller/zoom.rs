//! Provides [`ZoomRange`] settings and the zoom scaling math.

use bevy_reflect::prelude::*;
use serde::{Deserialize, Serialize};

/// Bounds the camera's orbit distance, in scene-size-relative units.
#[derive(Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
pub struct ZoomRange {
    /// Closest allowed distance, as a fraction of the scene size. The world
    /// space lower bound also includes the camera's near clip distance, so a
    /// `min` of zero still keeps the focal point in front of the near plane.
    pub min: f32,
    /// Farthest allowed distance, as a fraction of the scene size. A `max` at
    /// or below `min` leaves the far side unbounded.
    pub max: f32,
}

impl ZoomRange {
    /// Does this range leave the far side open?
    pub fn max_unbounded(&self) -> bool {
        self.max <= self.min
    }

    /// Clamp a world space distance to this range.
    pub fn clamp_distance(&self, distance: f32, near_clip: f32, scene_size: f32) -> f32 {
        let min = near_clip + self.min * scene_size;
        let max = if self.max_unbounded() {
            f32::INFINITY
        } else {
            self.max * scene_size
        };
        distance.clamp(min, max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

/// Sensitivity factor for a zoom input at the given distance.
///
/// Zoom inputs cover less distance the closer the camera is to its focal
/// point, down to `scale_min` of full sensitivity, so fine positioning near an
/// object does not overshoot. A `scale_min` of one disables the falloff.
pub fn zoom_scale(current_distance: f32, scene_size: f32, scale_min: f32) -> f32 {
    (current_distance / scene_size).clamp(scale_min, 1.0)
}
