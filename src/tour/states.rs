//! Authored per-section camera states and the scroll interpolation between
//! them. States are plain data, typically deserialized from the scene
//! manifest, and are immutable once loaded into [`TourStates`].

use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_platform::collections::HashMap;
use bevy_reflect::prelude::*;
use serde::Deserialize;

use super::sections::{section_index, section_progress};
use crate::controller::{
    angles::{AzimuthConstraint, PitchRange},
    zoom::ZoomRange,
};

/// Constraint overrides applied to a controller when its section activates.
#[derive(Debug, Clone, Copy, Default, Reflect, Deserialize)]
#[serde(default)]
pub struct CameraConstraints {
    /// Pitch bounds, in degrees.
    pub pitch: PitchRange,
    /// Yaw bounds, in degrees.
    pub azimuth: AzimuthConstraint,
    /// Zoom distance bounds, relative to the scene size.
    pub zoom: ZoomRange,
}

/// One authored camera state, bound to one scroll section.
#[derive(Debug, Clone, Reflect, Deserialize)]
pub struct CamState {
    /// The eye position for this section.
    pub position: Vec3,
    /// The look-at point for this section.
    pub target: Vec3,
    /// For non-scroll states, how long to wait after the section activates
    /// before focusing, in milliseconds.
    #[serde(default)]
    pub delay: Option<f32>,
    /// Scroll states are interpolated continuously with scroll progress;
    /// non-scroll states are applied once when their section activates.
    #[serde(default = "default_is_scroll")]
    pub is_scroll: bool,
    /// Constraints to apply to the controller while this section is active.
    #[serde(default)]
    pub constraints: CameraConstraints,
}

fn default_is_scroll() -> bool {
    true
}

impl CamState {
    /// A scroll-interpolated state looking at `target` from `position`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            delay: None,
            is_scroll: true,
            constraints: CameraConstraints::default(),
        }
    }
}

/// The table of authored camera states, keyed by section index. Sections
/// without a state are simply not driven.
#[derive(Resource, Debug, Clone, Default)]
pub struct TourStates {
    /// The authored states.
    pub states: HashMap<usize, CamState>,
}

impl TourStates {
    /// Build the table from `(section index, state)` pairs.
    pub fn from_states(states: impl IntoIterator<Item = (usize, CamState)>) -> Self {
        Self {
            states: states.into_iter().collect(),
        }
    }

    /// The state authored for `index`, if any.
    pub fn get(&self, index: usize) -> Option<&CamState> {
        self.states.get(&index)
    }
}

/// The pair of states bracketing a scroll position, and how to blend them.
#[derive(Debug, Clone, Copy)]
pub struct InterpolationData<'a> {
    /// The state of the section containing the scroll position.
    pub from: &'a CamState,
    /// The next section's state, or `from` again at the sequence boundary.
    pub to: &'a CamState,
    /// Blend fraction in `[0, 1]`.
    pub progress: f32,
    /// False at the terminal section or when the next state is missing; the
    /// caller then uses `from` directly.
    pub should_interpolate: bool,
}

/// Resolve the states bracketing `scroll` and the blend fraction between
/// them.
///
/// Returns `None` when the layout is empty or no state is authored for the
/// current section. In the last section, or when the next section has no
/// state, blending is disabled and `from` is returned for both ends.
pub fn interpolation_data<'a>(
    scroll: f32,
    heights: &[f32],
    states: &'a HashMap<usize, CamState>,
) -> Option<InterpolationData<'a>> {
    if heights.is_empty() {
        return None;
    }
    let index = section_index(scroll, heights);
    let progress = section_progress(scroll, index, heights);
    let from = states.get(&index)?;
    let last = heights.len() - 1;
    let next = (index + 1).min(last);
    match states.get(&next) {
        Some(to) if index < last => Some(InterpolationData {
            from,
            to,
            progress,
            should_interpolate: true,
        }),
        _ => Some(InterpolationData {
            from,
            to: from,
            progress: 1.0,
            should_interpolate: false,
        }),
    }
}
