//! Programmatic focus: send a [`FocusTrigger`] event to retarget a controller
//! from anywhere, without needing mutable access to its component. Used by the
//! scroll driver and available to scripted tours and click-to-focus features.

use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_transform::prelude::*;

use super::component::{ConstraintHooks, TourCam};

/// Send this event to retarget a [`TourCam`] to look at `target`, optionally
/// from an explicit `eye` position. See [`TourCam::focus`] for the exact
/// semantics of each field.
#[derive(Debug, Clone, Event)]
pub struct FocusTrigger {
    /// The camera to retarget.
    pub camera: Entity,
    /// The new look-at point.
    pub target: Vec3,
    /// The new eye position. When omitted, the focal point relocates without
    /// reorienting the camera.
    pub eye: Option<Vec3>,
    /// Converge over subsequent frames rather than snapping.
    pub smooth: bool,
}

impl FocusTrigger {
    /// A smoothly-converging focus.
    pub fn smooth(camera: Entity, target: Vec3, eye: Option<Vec3>) -> Self {
        Self {
            camera,
            target,
            eye,
            smooth: true,
        }
    }

    /// An instant focus; the camera is in place the same frame.
    pub fn instant(camera: Entity, target: Vec3, eye: Option<Vec3>) -> Self {
        Self {
            camera,
            target,
            eye,
            smooth: false,
        }
    }

    /// Forward queued triggers to their controllers. Triggers aimed at
    /// entities without a controller are dropped.
    pub fn receive(
        mut events: EventReader<Self>,
        mut cameras: Query<(&mut TourCam, &mut Transform, Option<&ConstraintHooks>)>,
    ) {
        for event in events.read() {
            let Ok((mut rig, mut transform, hooks)) = cameras.get_mut(event.camera) else {
                continue;
            };
            rig.focus(&mut transform, hooks, event.target, event.eye, event.smooth);
        }
    }
}
