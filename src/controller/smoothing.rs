//! The critically-damped interpolation primitive behind every animated
//! quantity in the controller: positions, angles, and zoom all converge on
//! their targets with `value = lerp(value, target, damp_rate(damping, dt))`.

use bevy_reflect::prelude::*;

/// Frequency constant used for camera motion. Fades and other slow properties
/// use a much lower constant via [`damp_rate_scaled`].
pub const CAMERA_RATE_SCALE: f32 = 450.0;

/// Quadratic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Per-tick interpolation rate for a damped quantity, using the camera
/// frequency constant. See [`damp_rate_scaled`].
pub fn damp_rate(damping: f32, dt: f32) -> f32 {
    damp_rate_scaled(damping, dt, CAMERA_RATE_SCALE)
}

/// Per-tick interpolation rate `ease_in_out_quad(1 - damping^(dt * scale))`.
///
/// `damping` is a factor in `(0, 1)`; values closer to one converge more
/// slowly. The rate approaches zero as `dt` approaches zero, approaches one as
/// `dt` grows, and is monotonic in `dt` for a fixed damping. A negative `dt`
/// is the snap sentinel: the rate is exactly one, used when a property is set
/// before the controller has started simulating.
pub fn damp_rate_scaled(damping: f32, dt: f32, scale: f32) -> f32 {
    if dt < 0.0 {
        return 1.0;
    }
    ease_in_out_quad(1.0 - damping.powf(dt * scale))
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Damping factors for the controller's smoothed quantities, each in `(0, 1)`.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Smoothing {
    /// Damping applied to position and angle smoothing during normal motion.
    pub movement: f32,
    /// Damping applied to the zoom distance.
    pub zoom: f32,
    /// Damping used instead of `movement` while a smooth focus transition is
    /// converging.
    pub focus: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            movement: 0.97,
            zoom: 0.97,
            focus: 0.985,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_means_no_motion() {
        for damping in [0.1, 0.5, 0.97, 0.999] {
            assert_eq!(damp_rate(damping, 0.0), 0.0);
        }
    }

    #[test]
    fn huge_dt_means_full_snap() {
        for damping in [0.1, 0.5, 0.97, 0.999] {
            assert!((damp_rate(damping, 1e6) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn negative_dt_is_the_snap_sentinel() {
        assert_eq!(damp_rate(0.97, -1.0), 1.0);
        assert_eq!(damp_rate_scaled(0.5, -1.0, 1.0), 1.0);
    }

    #[test]
    fn rate_is_monotonic_in_dt() {
        let damping = 0.97;
        let mut last = 0.0;
        for i in 1..200 {
            let rate = damp_rate(damping, i as f32 * 1e-3);
            assert!(rate >= last);
            last = rate;
        }
    }

    #[test]
    fn slower_damping_converges_slower() {
        let dt = 1.0 / 60.0;
        assert!(damp_rate(0.99, dt) < damp_rate(0.9, dt));
    }
}
