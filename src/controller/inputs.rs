//! Translates raw mouse, touch, wheel, and keyboard input into operations on
//! every [`TourCam`] in the world.

use bevy_ecs::prelude::*;
use bevy_input::{
    keyboard::KeyCode,
    mouse::{MouseButton, MouseMotion, MouseScrollUnit, MouseWheel},
    touch::Touches,
    ButtonInput,
};
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::{PrimaryWindow, Window};

use super::component::{ConstraintHooks, TourCam};

/// Pointer id used for the mouse, which has no id of its own. Touches use
/// their platform-assigned ids, which start near zero.
pub const MOUSE_POINTER_ID: u64 = u64::MAX;

/// Zoom delta per pixel of pinch separation change.
const PINCH_ZOOM_SCALE: f32 = 0.025;

/// Pixel wheel events are scaled down to roughly match line scrolls.
const WHEEL_PIXEL_SCALE: f32 = 0.05;

/// A device-independent pointer button, matching the host convention of
/// numbering primary, auxiliary (wheel), and secondary buttons 0, 1, and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PointerButton {
    /// The left mouse button, or any touch contact.
    Primary,
    /// The middle (wheel) mouse button.
    Auxiliary,
    /// The right mouse button.
    Secondary,
    /// Any other button, e.g. back/forward thumb buttons.
    Other,
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Middle => PointerButton::Auxiliary,
            MouseButton::Right => PointerButton::Secondary,
            _ => PointerButton::Other,
        }
    }
}

/// The last observed state of a live pointer.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct PointerSample {
    /// Last viewport position, in pixels.
    pub position: Vec2,
    /// The button the pointer went down with.
    pub button: PointerButton,
}

/// A direction the fly mode can move in, relative to the camera orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MoveKey {
    /// Along the view direction.
    Forward,
    /// Against the view direction.
    Back,
    /// To the camera's left.
    Left,
    /// To the camera's right.
    Right,
    /// Along the camera's up.
    Up,
    /// Against the camera's up.
    Down,
}

impl MoveKey {
    /// The camera-local unit direction for this key.
    pub fn direction(&self) -> Vec3 {
        match self {
            MoveKey::Forward => Vec3::NEG_Z,
            MoveKey::Back => Vec3::Z,
            MoveKey::Left => Vec3::NEG_X,
            MoveKey::Right => Vec3::X,
            MoveKey::Up => Vec3::Y,
            MoveKey::Down => Vec3::NEG_Y,
        }
    }

    /// Map a key code to a movement direction, if it is bound to one.
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveKey::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveKey::Back),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveKey::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveKey::Right),
            KeyCode::KeyE => Some(MoveKey::Up),
            KeyCode::KeyQ => Some(MoveKey::Down),
            _ => None,
        }
    }
}

/// Fly speed modifier derived from held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum MoveModifier {
    /// No modifier held.
    #[default]
    Normal,
    /// Sprint (shift held).
    Fast,
    /// Crouch (control held).
    Slow,
}

/// Feed mouse buttons and motion into the controllers.
pub fn mouse_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut motion: EventReader<MouseMotion>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(
        &mut TourCam,
        &Camera,
        &GlobalTransform,
        Option<&ConstraintHooks>,
    )>,
) {
    let cursor = windows.iter().next().and_then(|window| window.cursor_position());
    let delta: Vec2 = motion.read().map(|motion| motion.delta).sum();
    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    for (mut rig, camera, camera_transform, hooks) in cameras.iter_mut() {
        if let Some(position) = cursor {
            for button in mouse.get_just_pressed() {
                rig.pointer_down(MOUSE_POINTER_ID, PointerButton::from(*button), shift, position);
            }
        }

        // The mouse counts as one pointer; only releasing the button that
        // started the motion ends it.
        if let Some(sample) = rig.pointers.get(&MOUSE_POINTER_ID).copied() {
            if mouse
                .get_just_released()
                .any(|button| PointerButton::from(*button) == sample.button)
            {
                rig.pointer_up(MOUSE_POINTER_ID);
            }
        }

        if delta != Vec2::ZERO {
            if rig.orbiting || rig.flying {
                rig.look(delta, hooks);
            } else if rig.panning {
                let from = rig.pointers.get(&MOUSE_POINTER_ID).map(|sample| sample.position);
                if let (Some(from), Some(to)) = (from, cursor) {
                    rig.pan(from, to, camera, camera_transform);
                }
            }
        }

        if let Some(position) = cursor {
            if let Some(sample) = rig.pointers.get_mut(&MOUSE_POINTER_ID) {
                sample.position = position;
            }
        }
    }
}

/// Feed touch contacts into the controllers. Two simultaneous contacts form a
/// pinch gesture: the midpoint pans and the separation change zooms.
pub fn touch_input(
    touches: Res<Touches>,
    mut cameras: Query<(
        &mut TourCam,
        &Camera,
        &GlobalTransform,
        Option<&ConstraintHooks>,
    )>,
) {
    for (mut rig, camera, camera_transform, hooks) in cameras.iter_mut() {
        for touch in touches.iter_just_pressed() {
            rig.pointer_down(touch.id(), PointerButton::Primary, false, touch.position());
        }
        for touch in touches.iter_just_released() {
            rig.pointer_up(touch.id());
        }
        for touch in touches.iter_just_canceled() {
            rig.pointer_up(touch.id());
        }

        for touch in touches.iter() {
            if let Some(sample) = rig.pointers.get_mut(&touch.id()) {
                sample.position = touch.position();
            }
        }

        if rig.panning && rig.pointers.len() >= 2 {
            let (midpoint, distance) = rig.pinch_midpoint_distance();
            let last_midpoint = rig.pinch_midpoint;
            let last_distance = rig.pinch_distance;
            if midpoint != last_midpoint {
                rig.pan(last_midpoint, midpoint, camera, camera_transform);
            }
            if distance > 0.0 && last_distance > 0.0 {
                rig.zoom((last_distance - distance) * PINCH_ZOOM_SCALE);
            }
            rig.pinch_midpoint = midpoint;
            rig.pinch_distance = distance;
        } else if rig.orbiting || rig.flying {
            let delta: Vec2 = touches.iter().map(|touch| touch.delta()).sum();
            if delta != Vec2::ZERO {
                rig.look(delta, hooks);
            }
        }
    }
}

/// Feed wheel scrolls into the zoom. Scrolling up zooms in.
pub fn wheel_input(mut wheel: EventReader<MouseWheel>, mut cameras: Query<&mut TourCam>) {
    let mut amount = 0.0;
    for event in wheel.read() {
        amount += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * WHEEL_PIXEL_SCALE,
        };
    }
    if amount == 0.0 {
        return;
    }
    for mut rig in cameras.iter_mut() {
        rig.zoom(-amount);
    }
}

/// Mirror held movement and modifier keys into the controllers for the fly
/// mode to consume on its next tick.
pub fn keyboard_input(keys: Res<ButtonInput<KeyCode>>, mut cameras: Query<&mut TourCam>) {
    let modifier = if keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        MoveModifier::Fast
    } else if keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
        MoveModifier::Slow
    } else {
        MoveModifier::Normal
    };

    for mut rig in cameras.iter_mut() {
        rig.active_keys.clear();
        for key in keys.get_pressed() {
            if let Some(move_key) = MoveKey::from_key_code(*key) {
                rig.active_keys.insert(move_key);
            }
        }
        rig.move_modifier = modifier;
    }
}
