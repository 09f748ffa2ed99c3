//! The primary [`Component`] of the controller, [`TourCam`].

use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_math::{prelude::*, EulerRot};
use bevy_platform::collections::{HashMap, HashSet};
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    angles::{clamp_azimuth, AzimuthConstraint, PitchRange},
    inputs::{MoveKey, MoveModifier, PointerButton, PointerSample},
    smoothing::{damp_rate, lerp, Smoothing},
    zoom::{zoom_scale, ZoomRange},
};

/// Positions or rotations closer than this to the already-applied transform
/// are not written back, so repeated identical inputs cause no redraws.
pub const TRANSFORM_EPSILON: f32 = 1e-3;

/// Tracks all state of a camera's controller, including its inputs, motion,
/// and settings.
///
/// The controller owns a focal anchor (`origin`), a smoothed eye position, a
/// smoothed pitch/yaw pair in degrees, and a smoothed zoom distance along the
/// camera's local z axis. Every smoothed quantity converges on its target with
/// the damped rate from [`super::smoothing::damp_rate`], so motion stays frame
/// rate independent.
///
/// # Moving the camera
///
/// The [`TourCamPlugin`](crate::controller::TourCamPlugin) wires mouse, touch,
/// and keyboard input into the controller and runs [`TourCam::update_camera_rigs`]
/// once per frame. To drive the camera manually:
///
/// 1. Begin a motion with [`TourCam::pointer_down`] (or set a pose directly
///    with [`TourCam::focus`]).
/// 2. While the motion is active, send inputs with [`TourCam::look`],
///    [`TourCam::pan`], and [`TourCam::zoom`].
/// 3. End the motion with [`TourCam::pointer_up`].
#[derive(Debug, Clone, Reflect, Component)]
pub struct TourCam {
    /// What input motions are currently allowed?
    pub enabled_motion: EnabledMotion,
    /// Orbit/fly look sensitivity, in degrees per pixel of pointer movement.
    pub rotate_speed: f32,
    /// Fly movement speeds, in scene sizes per second.
    pub move_speed: MoveSpeed,
    /// Zoom input sensitivity.
    pub zoom_speed: f32,
    /// Lower bound on the zoom sensitivity falloff. See
    /// [`zoom_scale`](super::zoom::zoom_scale).
    pub zoom_scale_min: f32,
    /// Bounds on the zoom distance, relative to `scene_size`.
    pub zoom_range: ZoomRange,
    /// Bounds on the camera pitch, in degrees.
    pub pitch_range: PitchRange,
    /// Bounds on the camera yaw, in degrees.
    pub azimuth_constraint: AzimuthConstraint,
    /// Damping factors for the smoothed quantities.
    pub smoothing: Smoothing,
    /// Characteristic size of the scene; scales fly movement and zoom.
    pub scene_size: f32,
    /// The focal anchor the camera looks toward and orbits around, or the fly
    /// anchor while flying. Managed by the controller.
    pub origin: Vec3,
    /// Smoothed base position, converging on `origin`. Managed by the
    /// controller.
    pub position: Vec3,
    /// Smoothed (pitch, yaw) in degrees. Managed by the controller.
    pub angles: Vec2,
    /// Target (pitch, yaw) in degrees, already clamped. Managed by the
    /// controller.
    pub target_angles: Vec2,
    /// Target zoom distance in world units. While flying this instead holds
    /// the captured fly offset. Managed by the controller.
    pub zoom_target: f32,
    /// Smoothed zoom distance in world units. Managed by the controller.
    pub zoom_current: f32,
    /// True while a pointer is flying the camera. Managed by the controller.
    pub flying: bool,
    /// True while a pointer is orbiting the camera. Managed by the controller.
    pub orbiting: bool,
    /// True while one or two pointers are panning the camera. Managed by the
    /// controller.
    pub panning: bool,
    /// True while a smooth focus transition is converging; switches the
    /// damping to [`Smoothing::focus`]. Managed by the controller.
    pub focusing: bool,
    /// Near clip distance of the camera's projection, mirrored here each
    /// frame so zoom clamping can use it. Managed by the controller.
    pub near_clip: f32,
    /// Movement keys currently held. Managed by the input systems.
    #[reflect(ignore)]
    pub active_keys: HashSet<MoveKey>,
    /// Current sprint/crouch modifier. Managed by the input systems.
    pub move_modifier: MoveModifier,
    /// Live pointers, keyed by pointer id. Managed by the controller.
    #[reflect(ignore)]
    pub pointers: HashMap<u64, PointerSample>,
    /// Midpoint of the current two-pointer gesture, in viewport pixels.
    /// Managed by the input systems.
    pub pinch_midpoint: Vec2,
    /// Separation of the current two-pointer gesture, in viewport pixels.
    /// Managed by the input systems.
    pub pinch_distance: f32,
    initialized: bool,
}

impl Default for TourCam {
    fn default() -> Self {
        TourCam {
            enabled_motion: Default::default(),
            rotate_speed: 0.2,
            move_speed: Default::default(),
            zoom_speed: 0.15,
            zoom_scale_min: 0.01,
            zoom_range: Default::default(),
            pitch_range: Default::default(),
            azimuth_constraint: Default::default(),
            smoothing: Default::default(),
            scene_size: 5.0,
            origin: Vec3::ZERO,
            position: Vec3::ZERO,
            angles: Vec2::ZERO,
            target_angles: Vec2::ZERO,
            zoom_target: 0.0,
            zoom_current: 0.0,
            flying: false,
            orbiting: false,
            panning: false,
            focusing: false,
            near_clip: 0.1,
            active_keys: Default::default(),
            move_modifier: Default::default(),
            pointers: Default::default(),
            pinch_midpoint: Vec2::ZERO,
            pinch_distance: 0.0,
            initialized: false,
        }
    }
}

impl TourCam {
    /// Create a controller for a scene of the given characteristic size.
    pub fn new(scene_size: f32) -> Self {
        Self {
            scene_size,
            ..Default::default()
        }
    }

    /// Is the controller in none of the orbit/pan/fly states?
    pub fn is_idle(&self) -> bool {
        !(self.orbiting || self.panning || self.flying)
    }

    /// The smoothed world rotation of the camera.
    pub fn smoothed_rotation(&self) -> Quat {
        Self::rotation_from_angles(self.angles)
    }

    /// The rotation the camera is converging on.
    pub fn target_rotation(&self) -> Quat {
        Self::rotation_from_angles(self.target_angles)
    }

    fn rotation_from_angles(angles: Vec2) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            angles.y.to_radians(),
            angles.x.to_radians(),
            0.0,
        )
    }

    /// Adopt the entity's current transform as the controller's starting
    /// state. Runs once, the first time the controller sees its transform.
    fn ensure_initialized(&mut self, transform: &Transform) {
        if self.initialized {
            return;
        }
        let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
        self.angles = Vec2::new(pitch.to_degrees(), yaw.to_degrees());
        self.target_angles = self.angles;
        self.origin = transform.translation;
        self.position = transform.translation;
        self.zoom_target = 0.0;
        self.zoom_current = 0.0;
        self.initialized = true;
    }

    /// Resolve which motion a single-pointer press starts, given the enabled
    /// features, the pressed button, and the shift modifier.
    ///
    /// The resolution order is pan, then fly, then orbit; the first rule that
    /// matches wins. The rules are asymmetric on purpose so that every
    /// combination of enabled features keeps a usable binding; see the matrix
    /// tests below before changing anything here.
    pub fn resolve_motion(&self, button: PointerButton, shift: bool) -> Option<MotionKind> {
        let EnabledMotion { orbit, pan, fly } = self.enabled_motion;
        if pan
            && (shift
                || (!orbit && !fly)
                || ((orbit ^ fly)
                    && matches!(
                        button,
                        PointerButton::Auxiliary | PointerButton::Secondary
                    ))
                || button == PointerButton::Auxiliary)
        {
            return Some(MotionKind::Pan);
        }
        if fly
            && ((!orbit && !pan)
                || (!orbit && button == PointerButton::Primary)
                || button == PointerButton::Secondary)
        {
            return Some(MotionKind::Fly);
        }
        if orbit && ((!fly && !pan) || button == PointerButton::Primary) {
            return Some(MotionKind::Orbit);
        }
        None
    }

    /// Register a pointer press and enter the resolved motion state.
    ///
    /// A second simultaneous pointer switches to panning regardless of the
    /// single-pointer mode, recording the pinch midpoint and separation.
    /// Repeated downs for a live pointer id are ignored.
    pub fn pointer_down(&mut self, id: u64, button: PointerButton, shift: bool, position: Vec2) {
        if self.pointers.contains_key(&id) {
            return;
        }
        self.pointers.insert(id, PointerSample { position, button });
        self.focusing = false;

        if self.pointers.len() >= 2 {
            if self.enabled_motion.pan {
                if self.flying {
                    self.end_fly();
                }
                self.orbiting = false;
                self.panning = true;
                let (midpoint, distance) = self.pinch_midpoint_distance();
                self.pinch_midpoint = midpoint;
                self.pinch_distance = distance;
            }
            return;
        }

        match self.resolve_motion(button, shift) {
            Some(MotionKind::Pan) => self.panning = true,
            Some(MotionKind::Fly) => self.begin_fly(),
            Some(MotionKind::Orbit) => self.orbiting = true,
            None => (),
        }
    }

    /// Register a pointer release. Unknown pointer ids are ignored. Releasing
    /// the second pointer of a pinch exits panning; releasing the last pointer
    /// exits orbiting, or folds the fly offset and exits flying.
    pub fn pointer_up(&mut self, id: u64) {
        if self.pointers.remove(&id).is_none() {
            return;
        }
        if self.panning && self.pointers.len() < 2 {
            self.panning = false;
        }
        if self.pointers.is_empty() {
            if self.flying {
                self.end_fly();
            }
            self.orbiting = false;
        }
    }

    /// Capture the current eye as the fly anchor. The zoom offset is baked
    /// into the base position and remembered in `zoom_target`, so the visible
    /// pose does not change.
    fn begin_fly(&mut self) {
        let offset = self.smoothed_rotation() * Vec3::Z * self.zoom_current;
        self.position += offset;
        self.origin = self.position;
        self.zoom_target = self.zoom_current;
        self.zoom_current = 0.0;
        self.flying = true;
    }

    /// Fold the remembered fly offset back into the permanent origin and
    /// position and restore the zoom, leaving the visible pose unchanged. The
    /// focal anchor ends up ahead of the camera at the pre-fly orbit distance.
    fn end_fly(&mut self) {
        let forward = self.smoothed_rotation() * Vec3::NEG_Z;
        let offset = forward * self.zoom_target;
        self.origin += offset;
        self.position += offset;
        self.zoom_current = self.zoom_target;
        self.flying = false;
    }

    /// Midpoint and separation of the first two live pointers, in viewport
    /// pixels.
    pub fn pinch_midpoint_distance(&self) -> (Vec2, f32) {
        let mut pointers = self.pointers.values();
        match (pointers.next(), pointers.next()) {
            (Some(a), Some(b)) => (
                (a.position + b.position) / 2.0,
                a.position.distance(b.position),
            ),
            _ => (Vec2::ZERO, 0.0),
        }
    }

    /// Adjust the target pitch and yaw from a pointer delta, through the
    /// clamp path. Only applies while orbiting or flying.
    pub fn look(&mut self, delta: Vec2, hooks: Option<&ConstraintHooks>) {
        if !(self.orbiting || self.flying) {
            return;
        }
        let next = Vec2::new(
            self.target_angles.x - delta.y * self.rotate_speed,
            self.target_angles.y - delta.x * self.rotate_speed,
        );
        self.target_angles = self.clamp_angles(next, hooks);
    }

    /// Drag the focal anchor so the world point under the pointer follows it.
    ///
    /// Both screen positions are projected onto the plane through the focal
    /// point perpendicular to the view direction; the world space delta
    /// between the two intersections is subtracted from the origin.
    pub fn pan(
        &mut self,
        from: Vec2,
        to: Vec2,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) {
        if !self.enabled_motion.pan {
            return;
        }
        let normal = self.target_rotation() * Vec3::NEG_Z;
        let Some(a) = self.screen_to_focal_plane(from, normal, camera, camera_transform) else {
            return;
        };
        let Some(b) = self.screen_to_focal_plane(to, normal, camera, camera_transform) else {
            return;
        };
        self.origin -= b - a;
    }

    fn screen_to_focal_plane(
        &self,
        screen: Vec2,
        normal: Vec3,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) -> Option<Vec3> {
        let ray = camera.viewport_to_world(camera_transform, screen).ok()?;
        let denom = normal.dot(*ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = normal.dot(self.origin - ray.origin) / denom;
        (t > 0.0).then(|| ray.origin + ray.direction * t)
    }

    /// Apply a zoom input. Positive deltas zoom out. Disabled while flying.
    ///
    /// The delta is scaled by the scene size and by the sensitivity falloff,
    /// then the resulting distance is clamped to the zoom range.
    pub fn zoom(&mut self, delta: f32) {
        if self.flying {
            return;
        }
        let scale = zoom_scale(self.zoom_current, self.scene_size, self.zoom_scale_min);
        let distance = self.zoom_target + delta * self.zoom_speed * self.scene_size * scale;
        self.zoom_target = self
            .zoom_range
            .clamp_distance(distance, self.near_clip, self.scene_size);
    }

    /// Retarget the controller to look at `target`.
    ///
    /// With `eye` omitted this is a pure focal point relocation: the origin
    /// (and, when not smooth, the position) moves to `target` with no
    /// reorientation. With `eye` supplied, the target angles are derived from
    /// the `eye - target` direction and run through the clamp path, the base
    /// is rebased at the camera's current transform so the transition starts
    /// from wherever the camera is now, and the zoom target becomes the
    /// clamped distance between the two points.
    ///
    /// When `smooth` is false every smoothed quantity snaps and the transform
    /// is recomputed in this call, leaving the camera exactly at `eye` looking
    /// at `target`; calling it again with the same arguments changes nothing.
    /// When `smooth` is true the controller marks itself focusing and
    /// converges over subsequent ticks using the focus damping.
    pub fn focus(
        &mut self,
        transform: &mut Transform,
        hooks: Option<&ConstraintHooks>,
        target: Vec3,
        eye: Option<Vec3>,
        smooth: bool,
    ) {
        self.ensure_initialized(transform);

        let Some(eye) = eye else {
            self.origin = target;
            if smooth {
                self.focusing = true;
            } else {
                self.position = target;
                self.apply_transform(transform);
            }
            return;
        };

        let dir = eye - target;
        let elevation = dir.y.atan2(dir.x.hypot(dir.z)).to_degrees();
        let azimuth = dir.x.atan2(dir.z).to_degrees();
        self.target_angles = self.clamp_angles(Vec2::new(-elevation, azimuth), hooks);

        // Rebase at the currently applied pose so the transition starts from
        // wherever the camera is now, not from a half-smoothed value.
        let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
        self.angles = Vec2::new(pitch.to_degrees(), yaw.to_degrees());
        self.position = transform.translation;
        self.zoom_current = 0.0;

        self.origin = target;
        self.zoom_target =
            self.zoom_range
                .clamp_distance(dir.length(), self.near_clip, self.scene_size);

        if smooth {
            self.focusing = true;
        } else {
            self.focusing = false;
            self.snap_to_targets();
            self.apply_transform(transform);
        }
    }

    /// Set the zoom distance directly, clamped to the zoom range.
    pub fn reset_zoom(&mut self, distance: f32, smooth: bool) {
        self.zoom_target = self
            .zoom_range
            .clamp_distance(distance, self.near_clip, self.scene_size);
        if !smooth {
            self.zoom_current = self.zoom_target;
        }
    }

    /// [`TourCam::focus`] with an optional explicit zoom distance override.
    pub fn refocus(
        &mut self,
        transform: &mut Transform,
        hooks: Option<&ConstraintHooks>,
        target: Vec3,
        eye: Option<Vec3>,
        zoom_distance: Option<f32>,
        smooth: bool,
    ) {
        self.focus(transform, hooks, target, eye, smooth);
        if let Some(distance) = zoom_distance {
            self.reset_zoom(distance, smooth);
            if !smooth {
                self.apply_transform(transform);
            }
        }
    }

    /// Store a new pitch range. Call [`TourCam::reapply_constraints`] to
    /// re-clamp live state afterwards.
    pub fn set_pitch_range(&mut self, range: PitchRange) {
        self.pitch_range = range;
    }

    /// Store a new azimuth constraint. Call [`TourCam::reapply_constraints`]
    /// to re-clamp live state afterwards.
    pub fn set_azimuth_constraint(&mut self, constraint: AzimuthConstraint) {
        self.azimuth_constraint = constraint;
    }

    /// Store a new zoom range. Call [`TourCam::reapply_constraints`] to
    /// re-clamp live state afterwards.
    pub fn set_zoom_range(&mut self, range: ZoomRange) {
        self.zoom_range = range;
    }

    /// Re-clamp the target angles and zoom distance against the current
    /// constraints. Kept separate from the setters so a batch of constraint
    /// changes re-clamps exactly once.
    pub fn reapply_constraints(&mut self, hooks: Option<&ConstraintHooks>) {
        self.target_angles = self.clamp_angles(self.target_angles, hooks);
        self.zoom_target = self
            .zoom_range
            .clamp_distance(self.zoom_target, self.near_clip, self.scene_size);
    }

    fn clamp_angles(&self, angles: Vec2, hooks: Option<&ConstraintHooks>) -> Vec2 {
        let clamped = Vec2::new(
            self.pitch_range.clamp(angles.x),
            clamp_azimuth(angles.y, &self.azimuth_constraint),
        );
        match hooks.and_then(|hooks| hooks.clamp_angles.as_ref()) {
            Some(clamp) => clamp(clamped),
            None => clamped,
        }
    }

    fn snap_to_targets(&mut self) {
        let rate = damp_rate(self.smoothing.movement, -1.0);
        self.angles = Vec2::new(
            lerp(self.angles.x, self.target_angles.x, rate),
            lerp(self.angles.y, self.target_angles.y, rate),
        );
        self.position = self.position.lerp(self.origin, rate);
        self.zoom_current = lerp(self.zoom_current, self.zoom_target, rate);
    }

    fn converged(&self) -> bool {
        self.position.distance_squared(self.origin) < 1e-6
            && (self.angles - self.target_angles).length_squared() < 1e-4
            && (self.zoom_current - self.zoom_target).abs() < 1e-3
    }

    /// Advance the controller by `dt` seconds and write the composed world
    /// transform if it moved more than [`TRANSFORM_EPSILON`]. Returns whether
    /// the transform was written.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        hooks: Option<&ConstraintHooks>,
        dt: f32,
    ) -> bool {
        self.ensure_initialized(transform);

        if self.flying && !self.active_keys.is_empty() {
            let mut direction = Vec3::ZERO;
            for key in &self.active_keys {
                direction += key.direction();
            }
            if direction != Vec3::ZERO {
                let direction = (self.target_rotation() * direction).normalize();
                let speed = self.move_speed.for_modifier(self.move_modifier);
                let mut origin =
                    self.origin + direction * (self.scene_size * speed * dt.max(0.0));
                if let Some(clamp) = hooks.and_then(|hooks| hooks.clamp_position.as_ref()) {
                    origin = clamp(origin);
                }
                self.origin = origin;
            }
        }

        if !self.flying {
            self.zoom_current = lerp(
                self.zoom_current,
                self.zoom_target,
                damp_rate(self.smoothing.zoom, dt),
            );
        }

        let damping = if self.focusing {
            self.smoothing.focus
        } else {
            self.smoothing.movement
        };
        let rate = damp_rate(damping, dt);
        self.angles = Vec2::new(
            lerp(self.angles.x, self.target_angles.x, rate),
            lerp(self.angles.y, self.target_angles.y, rate),
        );
        self.position = self.position.lerp(self.origin, rate);

        if self.focusing && self.converged() {
            self.focusing = false;
        }

        self.apply_transform(transform)
    }

    /// Compose base position, smoothed angles, and the local z zoom offset
    /// into a world transform, skipping the write when nothing moved.
    fn apply_transform(&self, transform: &mut Transform) -> bool {
        let rotation = self.smoothed_rotation();
        let translation = self.position + rotation * Vec3::Z * self.zoom_current;
        let moved = translation.distance(transform.translation) > TRANSFORM_EPSILON
            || rotation.angle_between(transform.rotation) > TRANSFORM_EPSILON;
        if moved {
            transform.translation = translation;
            transform.rotation = rotation;
        }
        moved
    }

    /// Advance every controller once per frame, mirroring each camera's near
    /// clip distance and emitting [`CameraMoved`] and [`RequestRedraw`] only
    /// when a transform actually changed.
    pub fn update_camera_rigs(
        mut cameras: Query<(
            Entity,
            &mut TourCam,
            &mut Transform,
            Option<&Projection>,
            Option<&ConstraintHooks>,
        )>,
        mut moved: EventWriter<CameraMoved>,
        mut redraw: EventWriter<RequestRedraw>,
        time: Res<Time>,
    ) {
        for (entity, mut rig, mut transform, projection, hooks) in cameras.iter_mut() {
            if let Some(projection) = projection {
                rig.near_clip = match projection {
                    Projection::Perspective(perspective) => perspective.near,
                    Projection::Orthographic(orthographic) => orthographic.near,
                    _ => rig.near_clip,
                };
            }
            if rig.tick(&mut transform, hooks, time.delta_secs()) {
                moved.write(CameraMoved {
                    camera: entity,
                    position: transform.translation,
                    angles: rig.angles,
                });
                redraw.write(RequestRedraw);
            }
        }
    }
}

/// Fired when a controller's computed transform actually changed this frame.
#[derive(Debug, Clone, Event)]
pub struct CameraMoved {
    /// The camera entity that moved.
    pub camera: Entity,
    /// The camera's new world position.
    pub position: Vec3,
    /// The camera's new (pitch, yaw) in degrees.
    pub angles: Vec2,
}

/// The motion a pointer press resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MotionKind {
    /// Rotate around the focal anchor.
    Orbit,
    /// Translate the focal anchor in the focal plane.
    Pan,
    /// First-person flight from the current eye.
    Fly,
}

/// Controls what kinds of motions are allowed to initiate.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct EnabledMotion {
    /// Should orbit be enabled?
    pub orbit: bool,
    /// Should pan be enabled?
    pub pan: bool,
    /// Should fly be enabled?
    pub fly: bool,
}

impl Default for EnabledMotion {
    fn default() -> Self {
        Self {
            orbit: true,
            pan: true,
            fly: true,
        }
    }
}

/// Fly movement speeds, in scene sizes per second.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct MoveSpeed {
    /// Speed with no modifier held.
    pub normal: f32,
    /// Sprint speed.
    pub fast: f32,
    /// Crouch speed.
    pub slow: f32,
}

impl MoveSpeed {
    /// The speed for the given modifier.
    pub fn for_modifier(&self, modifier: MoveModifier) -> f32 {
        match modifier {
            MoveModifier::Normal => self.normal,
            MoveModifier::Fast => self.fast,
            MoveModifier::Slow => self.slow,
        }
    }
}

impl Default for MoveSpeed {
    fn default() -> Self {
        Self {
            normal: 1.2,
            fast: 4.8,
            slow: 0.3,
        }
    }
}

/// Optional callbacks for constraining camera state beyond the controller's
/// built-in pitch and azimuth clamps, e.g. to keep the camera inside a volume
/// or to apply a constraint that depends on world state. Invoked from the
/// clamp paths, including programmatic focus calls.
#[derive(Component, Clone, Default)]
pub struct ConstraintHooks {
    /// Maps proposed (pitch, yaw) target angles to allowed ones. Runs after
    /// the built-in pitch and azimuth clamps.
    pub clamp_angles: Option<Arc<dyn Fn(Vec2) -> Vec2 + Send + Sync>>,
    /// Maps a proposed fly origin to an allowed one.
    pub clamp_position: Option<Arc<dyn Fn(Vec3) -> Vec3 + Send + Sync>>,
}

impl ConstraintHooks {
    /// Add an angle clamp callback.
    #[must_use = "with_clamp_angles returns a modified ConstraintHooks"]
    pub fn with_clamp_angles<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec2) -> Vec2 + Send + Sync + 'static,
    {
        self.clamp_angles = Some(Arc::new(f));
        self
    }

    /// Add a position clamp callback.
    #[must_use = "with_clamp_position returns a modified ConstraintHooks"]
    pub fn with_clamp_position<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec3) -> Vec3 + Send + Sync + 'static,
    {
        self.clamp_position = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for ConstraintHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = |opt: bool| if opt { "Some(<function>)" } else { "None" };
        f.debug_struct("ConstraintHooks")
            .field("clamp_angles", &present(self.clamp_angles.is_some()))
            .field("clamp_position", &present(self.clamp_position.is_some()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam() -> TourCam {
        TourCam::default()
    }

    fn motion_with(orbit: bool, pan: bool, fly: bool, button: PointerButton) -> Option<MotionKind> {
        let mut cam = cam();
        cam.enabled_motion = EnabledMotion { orbit, pan, fly };
        cam.resolve_motion(button, false)
    }

    #[test]
    fn motion_matrix_all_enabled() {
        use MotionKind::*;
        use PointerButton::*;
        assert_eq!(motion_with(true, true, true, Primary), Some(Orbit));
        assert_eq!(motion_with(true, true, true, Auxiliary), Some(Pan));
        assert_eq!(motion_with(true, true, true, Secondary), Some(Fly));
    }

    #[test]
    fn motion_matrix_single_feature() {
        use MotionKind::*;
        use PointerButton::*;
        // A lone enabled feature claims every button.
        for button in [Primary, Auxiliary, Secondary] {
            assert_eq!(motion_with(true, false, false, button), Some(Orbit));
            assert_eq!(motion_with(false, true, false, button), Some(Pan));
            assert_eq!(motion_with(false, false, true, button), Some(Fly));
        }
    }

    #[test]
    fn motion_matrix_pairs() {
        use MotionKind::*;
        use PointerButton::*;
        // Orbit + pan: pan takes the non-primary buttons.
        assert_eq!(motion_with(true, true, false, Primary), Some(Orbit));
        assert_eq!(motion_with(true, true, false, Auxiliary), Some(Pan));
        assert_eq!(motion_with(true, true, false, Secondary), Some(Pan));
        // Fly + pan: fly takes primary, pan the rest.
        assert_eq!(motion_with(false, true, true, Primary), Some(Fly));
        assert_eq!(motion_with(false, true, true, Auxiliary), Some(Pan));
        assert_eq!(motion_with(false, true, true, Secondary), Some(Pan));
        // Orbit + fly: the middle button resolves to nothing.
        assert_eq!(motion_with(true, false, true, Primary), Some(Orbit));
        assert_eq!(motion_with(true, false, true, Auxiliary), None);
        assert_eq!(motion_with(true, false, true, Secondary), Some(Fly));
    }

    #[test]
    fn motion_matrix_nothing_enabled() {
        use PointerButton::*;
        for button in [Primary, Auxiliary, Secondary] {
            assert_eq!(motion_with(false, false, false, button), None);
        }
    }

    #[test]
    fn shift_forces_pan_when_enabled() {
        let mut cam = cam();
        assert_eq!(
            cam.resolve_motion(PointerButton::Primary, true),
            Some(MotionKind::Pan)
        );
        cam.enabled_motion.pan = false;
        assert_ne!(
            cam.resolve_motion(PointerButton::Primary, true),
            Some(MotionKind::Pan)
        );
    }

    #[test]
    fn two_pointers_enter_panning_and_one_release_exits() {
        let mut cam = cam();
        cam.pointer_down(1, PointerButton::Primary, false, Vec2::new(10.0, 10.0));
        assert!(cam.orbiting);
        cam.pointer_down(2, PointerButton::Primary, false, Vec2::new(30.0, 10.0));
        assert!(cam.panning);
        assert!(!cam.orbiting);
        assert!((cam.pinch_distance - 20.0).abs() < 1e-5);
        assert!((cam.pinch_midpoint - Vec2::new(20.0, 10.0)).length() < 1e-5);
        // Releasing one of the two pointers drops to idle, not back to orbit.
        cam.pointer_up(2);
        assert!(cam.is_idle());
        cam.pointer_up(1);
        assert!(cam.is_idle());
        // A release without a matching down is ignored.
        cam.pointer_up(7);
        assert!(cam.is_idle());
    }

    #[test]
    fn duplicate_pointer_down_is_ignored() {
        let mut cam = cam();
        cam.pointer_down(1, PointerButton::Primary, false, Vec2::ZERO);
        cam.pointer_down(1, PointerButton::Secondary, false, Vec2::ZERO);
        assert_eq!(cam.pointers.len(), 1);
        assert!(cam.orbiting);
        assert!(!cam.flying);
    }

    #[test]
    fn instant_focus_is_exact_and_idempotent() {
        let mut cam = cam();
        let mut transform = Transform::default();
        let target = Vec3::new(1.0, 2.0, 3.0);
        let eye = Vec3::new(4.0, 6.0, -2.0);

        cam.focus(&mut transform, None, target, Some(eye), false);
        assert!(transform.translation.distance(eye) < 1e-3);
        let forward = transform.rotation * Vec3::NEG_Z;
        let expected = (target - eye).normalize();
        assert!(forward.distance(expected) < 1e-3);

        let snapshot = transform;
        cam.focus(&mut transform, None, target, Some(eye), false);
        assert!(transform.translation.distance(snapshot.translation) < 1e-4);
        assert!(transform.rotation.angle_between(snapshot.rotation) < 1e-4);
    }

    #[test]
    fn focus_without_eye_relocates_without_reorienting() {
        let mut cam = cam();
        let mut transform = Transform::default();
        cam.focus(
            &mut transform,
            None,
            Vec3::ZERO,
            Some(Vec3::new(0.0, 0.0, 5.0)),
            false,
        );
        let rotation = transform.rotation;

        cam.focus(&mut transform, None, Vec3::new(10.0, 0.0, 0.0), None, false);
        assert!(transform.rotation.angle_between(rotation) < 1e-4);
        assert!(cam.origin.distance(Vec3::new(10.0, 0.0, 0.0)) < 1e-5);
    }

    #[test]
    fn smooth_focus_converges_over_ticks() {
        let mut cam = cam();
        let mut transform = Transform::default();
        let target = Vec3::new(0.0, 1.0, 0.0);
        let eye = Vec3::new(3.0, 3.0, 3.0);
        cam.focus(&mut transform, None, target, Some(eye), true);
        assert!(cam.focusing);
        for _ in 0..2000 {
            cam.tick(&mut transform, None, 1.0 / 60.0);
        }
        assert!(transform.translation.distance(eye) < 1e-2);
        assert!(!cam.focusing);
    }

    #[test]
    fn programmatic_focus_respects_constraints() {
        let mut cam = cam();
        cam.pitch_range = PitchRange::new(-10.0, 10.0);
        let mut transform = Transform::default();
        // An eye far above the target would need a steep downward pitch.
        cam.focus(
            &mut transform,
            None,
            Vec3::ZERO,
            Some(Vec3::new(0.0, 10.0, 1.0)),
            false,
        );
        assert!(cam.target_angles.x >= -10.0 - 1e-4);
    }

    #[test]
    fn clamp_hook_sees_programmatic_focus() {
        let mut cam = cam();
        let hooks = ConstraintHooks::default()
            .with_clamp_angles(|angles| Vec2::new(angles.x.clamp(-5.0, 5.0), angles.y));
        let mut transform = Transform::default();
        cam.focus(
            &mut transform,
            Some(&hooks),
            Vec3::ZERO,
            Some(Vec3::new(0.0, 10.0, 1.0)),
            false,
        );
        assert!(cam.target_angles.x >= -5.0 - 1e-4);
    }

    #[test]
    fn fly_fold_preserves_the_visible_pose() {
        let mut cam = cam();
        let mut transform = Transform::default();
        cam.focus(
            &mut transform,
            None,
            Vec3::ZERO,
            Some(Vec3::new(0.0, 2.0, 8.0)),
            false,
        );
        let before = transform;

        cam.enabled_motion = EnabledMotion {
            orbit: false,
            pan: false,
            fly: true,
        };
        cam.pointer_down(1, PointerButton::Primary, false, Vec2::ZERO);
        assert!(cam.flying);
        cam.tick(&mut transform, None, 1.0 / 60.0);
        assert!(transform.translation.distance(before.translation) < 1e-3);

        cam.pointer_up(1);
        assert!(!cam.flying);
        cam.tick(&mut transform, None, 1.0 / 60.0);
        assert!(transform.translation.distance(before.translation) < 1e-2);
        // The focal anchor folded ahead of the camera.
        assert!(cam.origin.distance(Vec3::ZERO) < 1e-2);
    }

    #[test]
    fn fly_keys_move_the_origin() {
        let mut cam = cam();
        let mut transform = Transform::default();
        cam.enabled_motion = EnabledMotion {
            orbit: false,
            pan: false,
            fly: true,
        };
        cam.pointer_down(1, PointerButton::Primary, false, Vec2::ZERO);
        cam.active_keys.insert(MoveKey::Forward);
        let before = cam.origin;
        cam.tick(&mut transform, None, 0.1);
        let delta = cam.origin - before;
        assert!(delta.length() > 0.0);
        // Facing -Z by default, forward moves toward -Z.
        assert!(delta.z < 0.0);
    }

    #[test]
    fn position_clamp_hook_bounds_flight() {
        let mut cam = cam();
        let mut transform = Transform::default();
        let hooks = ConstraintHooks::default()
            .with_clamp_position(|p| p.clamp(Vec3::splat(-1.0), Vec3::splat(1.0)));
        cam.enabled_motion = EnabledMotion {
            orbit: false,
            pan: false,
            fly: true,
        };
        cam.pointer_down(1, PointerButton::Primary, false, Vec2::ZERO);
        cam.active_keys.insert(MoveKey::Back);
        for _ in 0..600 {
            cam.tick(&mut transform, Some(&hooks), 0.1);
        }
        assert!(cam.origin.z <= 1.0 + 1e-5);
    }

    #[test]
    fn zoom_is_scaled_clamped_and_frozen_while_flying() {
        let mut cam = cam();
        cam.zoom_range = ZoomRange { min: 0.1, max: 2.0 };
        cam.near_clip = 0.1;
        cam.zoom_target = 2.0;
        cam.zoom_current = 2.0;

        cam.zoom(1000.0);
        assert!((cam.zoom_target - cam.zoom_range.max * cam.scene_size).abs() < 1e-4);
        cam.zoom(-1000.0);
        let min = cam.near_clip + cam.zoom_range.min * cam.scene_size;
        assert!((cam.zoom_target - min).abs() < 1e-4);

        cam.flying = true;
        let frozen = cam.zoom_target;
        cam.zoom(5.0);
        assert_eq!(cam.zoom_target, frozen);
    }

    #[test]
    fn identical_state_skips_the_transform_write() {
        let mut cam = cam();
        let mut transform = Transform::default();
        cam.focus(
            &mut transform,
            None,
            Vec3::ZERO,
            Some(Vec3::new(0.0, 0.0, 5.0)),
            false,
        );
        // Settled: repeated ticks must not report movement.
        cam.tick(&mut transform, None, 1.0 / 60.0);
        assert!(!cam.tick(&mut transform, None, 1.0 / 60.0));
        assert!(!cam.tick(&mut transform, None, 1.0 / 60.0));
    }

    #[test]
    fn look_only_applies_while_orbiting_or_flying() {
        let mut cam = cam();
        let before = cam.target_angles;
        cam.look(Vec2::new(10.0, 5.0), None);
        assert_eq!(cam.target_angles, before);

        cam.pointer_down(1, PointerButton::Primary, false, Vec2::ZERO);
        assert!(cam.orbiting);
        cam.look(Vec2::new(10.0, 5.0), None);
        assert!((cam.target_angles.y - (before.y - 10.0 * cam.rotate_speed)).abs() < 1e-5);
        assert!((cam.target_angles.x - (before.x - 5.0 * cam.rotate_speed)).abs() < 1e-5);
    }
}
