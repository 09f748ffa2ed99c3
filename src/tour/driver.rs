//! Wires the external scroll position through the section mapper and the
//! authored states or spline path into controller focus calls.

use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;

use super::{
    sections::{section_index, section_progress, SectionLayout},
    spline::CameraPath,
    states::{interpolation_data, TourStates},
};
use crate::controller::component::{ConstraintHooks, TourCam};

/// The page scroll position pushed by the host, in pixels.
#[derive(Resource, Debug, Clone, Copy, Default, Deref, DerefMut, Reflect)]
pub struct ScrollPosition(pub f32);

/// The section the scroll position currently falls in. Recomputed whenever
/// the scroll position or the layout changes.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Deref, DerefMut, Reflect)]
pub struct ActiveSection(pub usize);

/// Marks a [`TourCam`] as driven by the scroll position. Cameras without this
/// marker keep full manual control.
#[derive(Component, Debug, Default, Reflect)]
pub struct ScrollDriven;

/// A focus call scheduled by a delayed non-scroll state. Dropped with the
/// camera entity, so despawning cancels the pending focus.
#[derive(Component, Debug, Reflect)]
pub struct PendingFocus {
    /// Time left until the focus fires.
    pub timer: Timer,
    /// The look-at point to focus on.
    pub target: Vec3,
    /// The eye position to focus from.
    pub eye: Vec3,
}

/// Recompute [`ActiveSection`] from the scroll position and layout.
pub fn update_active_section(
    scroll: Res<ScrollPosition>,
    layout: Res<SectionLayout>,
    mut active: ResMut<ActiveSection>,
) {
    if !(scroll.is_changed() || layout.is_changed()) {
        return;
    }
    if !scroll.is_finite() {
        return;
    }
    let index = section_index(**scroll, &layout);
    if **active != index {
        **active = index;
    }
}

/// Drive scroll-marked cameras from the scroll position.
///
/// A [`CameraPath`] resource takes precedence: the active section selects the
/// chunk and the intra-section progress selects `t`. Otherwise the authored
/// state table is interpolated. Either way the resulting pose goes through
/// [`TourCam::focus`], whose epsilon check keeps repeated deliveries of the
/// same scroll position from causing redundant transform writes.
pub fn drive_scroll(
    scroll: Res<ScrollPosition>,
    layout: Res<SectionLayout>,
    states: Option<Res<TourStates>>,
    path: Option<Res<CameraPath>>,
    mut cameras: Query<
        (&mut TourCam, &mut Transform, Option<&ConstraintHooks>),
        With<ScrollDriven>,
    >,
) {
    if !(scroll.is_changed() || layout.is_changed()) {
        return;
    }
    if !scroll.is_finite() || layout.is_empty() {
        return;
    }
    let index = section_index(**scroll, &layout);
    let progress = section_progress(**scroll, index, &layout);

    if let Some(path) = path {
        match path.pose(index, progress) {
            Ok(pose) => {
                for (mut rig, mut transform, hooks) in cameras.iter_mut() {
                    rig.focus(&mut transform, hooks, pose.target, Some(pose.position), true);
                }
            }
            Err(error) => warn_once!("scroll-driven camera path is unusable: {error}"),
        }
        return;
    }

    let Some(states) = states else {
        return;
    };
    let Some(data) = interpolation_data(**scroll, &layout, &states.states) else {
        return;
    };
    // Non-scroll states are applied once on section activation instead.
    if !data.from.is_scroll {
        return;
    }
    let (position, target) = if data.should_interpolate {
        (
            data.from.position.lerp(data.to.position, data.progress),
            data.from.target.lerp(data.to.target, data.progress),
        )
    } else {
        (data.from.position, data.from.target)
    };
    for (mut rig, mut transform, hooks) in cameras.iter_mut() {
        rig.focus(&mut transform, hooks, target, Some(position), true);
    }
}

/// When the active section changes, apply the new section's constraints to
/// every scroll-driven camera, and focus (possibly after the authored delay)
/// for non-scroll states.
pub fn apply_section_states(
    active: Res<ActiveSection>,
    states: Option<Res<TourStates>>,
    mut commands: Commands,
    mut cameras: Query<
        (Entity, &mut TourCam, &mut Transform, Option<&ConstraintHooks>),
        With<ScrollDriven>,
    >,
) {
    if !active.is_changed() {
        return;
    }
    let Some(states) = states else {
        return;
    };
    let Some(state) = states.get(**active) else {
        return;
    };
    for (entity, mut rig, mut transform, hooks) in cameras.iter_mut() {
        rig.set_pitch_range(state.constraints.pitch);
        rig.set_azimuth_constraint(state.constraints.azimuth);
        rig.set_zoom_range(state.constraints.zoom);
        rig.reapply_constraints(hooks);

        if state.is_scroll {
            continue;
        }
        match state.delay {
            Some(delay_ms) if delay_ms > 0.0 => {
                commands.entity(entity).insert(PendingFocus {
                    timer: Timer::from_seconds(delay_ms / 1000.0, TimerMode::Once),
                    target: state.target,
                    eye: state.position,
                });
            }
            _ => rig.focus(&mut transform, hooks, state.target, Some(state.position), true),
        }
    }
}

/// Count down scheduled focus calls and fire the ones that are due.
pub fn tick_pending_focus(
    time: Res<Time>,
    mut commands: Commands,
    mut cameras: Query<(
        Entity,
        &mut TourCam,
        &mut Transform,
        &mut PendingFocus,
        Option<&ConstraintHooks>,
    )>,
) {
    for (entity, mut rig, mut transform, mut pending, hooks) in cameras.iter_mut() {
        if pending.timer.tick(time.delta()).finished() {
            let (target, eye) = (pending.target, pending.eye);
            rig.focus(&mut transform, hooks, target, Some(eye), true);
            commands.entity(entity).remove::<PendingFocus>();
        }
    }
}
