//! A scroll-driven tour camera controller for Bevy.
//!
//! This crate turns a camera into the centerpiece of a scrollable 3D
//! showcase: a pointer and keyboard driven orbit-pan-fly controller with
//! critically damped motion, plus a mapping layer that converts a page scroll
//! position into camera poses, either by interpolating authored per-section
//! camera states or by sampling spline paths built from recorded waypoints.
//!
//! # Usage
//!
//! Add [`DefaultTourCamPlugins`], attach a [`TourCam`](prelude::TourCam) to a
//! camera, and push scroll values into
//! [`ScrollPosition`](prelude::ScrollPosition):
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tour_cam::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, DefaultTourCamPlugins))
//!         .insert_resource(SectionLayout(vec![600.0, 600.0, 600.0]))
//!         .insert_resource(TourStates::from_states([
//!             (0, CamState::new(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO)),
//!             (1, CamState::new(Vec3::new(6.0, 3.0, 0.0), Vec3::new(2.0, 0.0, 0.0))),
//!             (2, CamState::new(Vec3::new(0.0, 8.0, 0.1), Vec3::ZERO)),
//!         ]))
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn((Camera3d::default(), TourCam::default(), ScrollDriven));
//!         })
//!         .run();
//! }
//! ```
//!
//! Cameras without the [`ScrollDriven`](prelude::ScrollDriven) marker stay
//! fully manual. Programmatic drivers (click-to-focus, scripted tours) send
//! [`FocusTrigger`](prelude::FocusTrigger) events instead of touching the
//! component.

pub mod controller;
pub mod tour;

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            angles::{AzimuthConstraint, PitchRange},
            component::{
                CameraMoved, ConstraintHooks, EnabledMotion, MotionKind, MoveSpeed, TourCam,
            },
            focus::FocusTrigger,
            inputs::{MoveKey, MoveModifier, PointerButton},
            smoothing::Smoothing,
            zoom::ZoomRange,
            TourCamPlugin,
        },
        tour::{
            driver::{ActiveSection, PendingFocus, ScrollDriven, ScrollPosition},
            sections::SectionLayout,
            spline::{CameraPath, CameraPathError, PathPose, Waypoint},
            states::{CamState, CameraConstraints, TourStates},
            ScrollTourPlugin,
        },
        DefaultTourCamPlugins,
    };
}

use bevy_app::{PluginGroup, PluginGroupBuilder};

/// The controller and scroll mapping plugins together. This is all you need
/// for a scroll-driven scene; add the plugins individually if you only want
/// the interactive controller.
pub struct DefaultTourCamPlugins;

impl PluginGroup for DefaultTourCamPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(controller::TourCamPlugin)
            .add(tour::ScrollTourPlugin)
    }
}
