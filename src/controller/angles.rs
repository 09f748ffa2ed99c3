//! Angle math used by the camera controller: normalization, shortest angular
//! distance, and azimuth clamping. All angles are in degrees.

use bevy_reflect::prelude::*;
use serde::{Deserialize, Serialize};

/// Reduce any angle into the half-open interval `(-180, 180]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// The shortest signed distance from `b` to `a`, in `(-180, 180]`.
pub fn angle_difference(a: f32, b: f32) -> f32 {
    normalize_angle(a - b)
}

/// A pitch limit in degrees. Either bound set at or beyond the
/// [`PitchRange::UNBOUNDED_DEGREES`] sentinel is treated as unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct PitchRange {
    /// Lowest allowed pitch, in degrees.
    pub min: f32,
    /// Highest allowed pitch, in degrees.
    pub max: f32,
}

impl PitchRange {
    /// Bounds at or beyond this magnitude leave that side of the range open.
    pub const UNBOUNDED_DEGREES: f32 = 360.0;

    /// A range that does not constrain pitch at all.
    pub const UNBOUNDED: Self = Self {
        min: -Self::UNBOUNDED_DEGREES,
        max: Self::UNBOUNDED_DEGREES,
    };

    /// Create a new pitch range. `min` must not exceed `max` unless one of the
    /// two is a sentinel bound.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `pitch` to this range, honoring the unbounded sentinels.
    pub fn clamp(&self, pitch: f32) -> f32 {
        let min = if self.min <= -Self::UNBOUNDED_DEGREES {
            f32::NEG_INFINITY
        } else {
            self.min
        };
        let max = if self.max >= Self::UNBOUNDED_DEGREES {
            f32::INFINITY
        } else {
            self.max
        };
        pitch.clamp(min, max)
    }
}

impl Default for PitchRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// A limit on the camera's yaw (azimuth), in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub enum AzimuthConstraint {
    /// Yaw is free to accumulate without wrapping.
    #[default]
    Unlimited,
    /// Yaw must stay within `half_width` degrees of `center`.
    Range {
        /// Center of the allowed arc, in degrees.
        center: f32,
        /// Half the angular width of the allowed arc. Must be non-negative.
        half_width: f32,
    },
}

/// Clamp `angle` against `constraint`.
///
/// For [`AzimuthConstraint::Unlimited`] this is the identity. For a range, the
/// shortest signed distance to the center is clamped to the half width, so the
/// result stays within the arc regardless of how many turns `angle` has
/// accumulated. Constrained output is always normalized into `(-180, 180]`.
pub fn clamp_azimuth(angle: f32, constraint: &AzimuthConstraint) -> f32 {
    match *constraint {
        AzimuthConstraint::Unlimited => angle,
        AzimuthConstraint::Range { center, half_width } => {
            let d = angle_difference(angle, center).clamp(-half_width, half_width);
            normalize_angle(center + d)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_covers_boundaries() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(540.0), 180.0);
        assert_eq!(normalize_angle(-540.0), 180.0);
        assert!((normalize_angle(370.0) - 10.0).abs() < 1e-5);
        assert!((normalize_angle(-370.0) + 10.0).abs() < 1e-5);
    }

    #[test]
    fn normalize_is_idempotent() {
        for a in [-1234.5, -180.0, -0.1, 0.0, 17.3, 180.0, 359.9, 7200.25] {
            let once = normalize_angle(a);
            assert!(once > -180.0 && once <= 180.0);
            assert_eq!(normalize_angle(once), once);
        }
    }

    #[test]
    fn difference_takes_the_short_way() {
        assert_eq!(angle_difference(10.0, 350.0), 20.0);
        assert_eq!(angle_difference(350.0, 10.0), -20.0);
        assert_eq!(angle_difference(180.0, -180.0), 0.0);
    }

    #[test]
    fn unlimited_azimuth_is_identity() {
        for a in [-720.0, -10.0, 0.0, 90.0, 1234.0] {
            assert_eq!(clamp_azimuth(a, &AzimuthConstraint::Unlimited), a);
        }
    }

    #[test]
    fn clamped_azimuth_stays_within_half_width() {
        let constraint = AzimuthConstraint::Range {
            center: 170.0,
            half_width: 30.0,
        };
        for a in [-720.0, -185.0, -170.0, 0.0, 90.0, 160.0, 175.0, 575.0] {
            let clamped = clamp_azimuth(a, &constraint);
            assert!(clamped > -180.0 && clamped <= 180.0);
            assert!(angle_difference(clamped, 170.0).abs() <= 30.0 + 1e-4);
        }
        // Angles already inside the arc are untouched (modulo normalization).
        assert!((clamp_azimuth(175.0, &constraint) - 175.0).abs() < 1e-5);
        // The arc wraps across the +/-180 seam.
        assert!((clamp_azimuth(-175.0, &constraint) + 175.0).abs() < 1e-5);
    }

    #[test]
    fn pitch_range_sentinels_are_open() {
        let range = PitchRange::default();
        assert_eq!(range.clamp(-1000.0), -1000.0);
        assert_eq!(range.clamp(1000.0), 1000.0);

        let range = PitchRange::new(-80.0, -5.0);
        assert_eq!(range.clamp(-90.0), -80.0);
        assert_eq!(range.clamp(0.0), -5.0);
        assert_eq!(range.clamp(-30.0), -30.0);

        let half_open = PitchRange::new(-360.0, 10.0);
        assert_eq!(half_open.clamp(-2000.0), -2000.0);
        assert_eq!(half_open.clamp(90.0), 10.0);
    }
}
