//! The interactive camera controller: the orbit-fly-pan state machine, its
//! damped smoothing primitives, and the input plumbing that feeds it.

pub mod angles;
pub mod component;
pub mod focus;
pub mod inputs;
pub mod smoothing;
pub mod zoom;

use bevy_app::prelude::*;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_window::RequestRedraw;

/// Adds the [`TourCam`](component::TourCam) input and update systems.
///
/// Input systems run in [`PreUpdate`] so a controller's per-frame update in
/// [`Update`] always sees this frame's inputs.
pub struct TourCamPlugin;

impl Plugin for TourCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<component::CameraMoved>()
            .add_event::<focus::FocusTrigger>()
            // Idempotent; normally added by the window plugin, but this keeps
            // headless apps working.
            .add_event::<RequestRedraw>()
            .add_systems(
                PreUpdate,
                (
                    inputs::mouse_input,
                    inputs::touch_input,
                    inputs::wheel_input,
                    inputs::keyboard_input,
                    focus::FocusTrigger::receive,
                )
                    .chain(),
            )
            .add_systems(Update, component::TourCam::update_camera_rigs)
            .register_type::<component::TourCam>()
            .register_type::<angles::PitchRange>()
            .register_type::<angles::AzimuthConstraint>()
            .register_type::<zoom::ZoomRange>()
            .register_type::<smoothing::Smoothing>();
    }
}
