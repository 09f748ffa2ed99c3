//! Drives the camera from a simulated page scroll. Arrow keys (or page
//! up/down) stand in for the host page's scroll position; the camera follows
//! the authored per-section states, and the mouse still orbits freely between
//! scroll movements.

use bevy::prelude::*;
use bevy_tour_cam::prelude::*;
// Disambiguate from `bevy::prelude::ScrollPosition` (a `bevy_ui` component).
use bevy_tour_cam::prelude::ScrollPosition;

const SCROLL_SPEED: f32 = 600.0;
const TOTAL_HEIGHT: f32 = 1800.0;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, DefaultTourCamPlugins))
        .insert_resource(SectionLayout(vec![600.0, 600.0, 600.0]))
        .insert_resource(authored_states())
        .add_systems(Startup, (setup_camera, setup_scene))
        .add_systems(Update, (scroll_with_keys, update_readout))
        .run();
}

/// The kind of table a host app would ship alongside its scene manifest.
fn authored_states() -> TourStates {
    let json = r#"[
        { "position": [0.0, 2.0, 8.0], "target": [0.0, 0.5, 0.0] },
        { "position": [7.0, 3.0, 1.0], "target": [4.0, 0.5, 0.0] },
        {
            "position": [0.0, 9.0, 0.5],
            "target": [0.0, 0.0, 0.0],
            "constraints": { "pitch": { "min": -90.0, "max": -30.0 } }
        }
    ]"#;
    let states: Vec<CamState> = serde_json::from_str(json).expect("authored states are valid");
    TourStates::from_states(states.into_iter().enumerate())
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 2.0, 8.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
        TourCam::default(),
        ScrollDriven,
    ));
}

fn scroll_with_keys(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut scroll: ResMut<ScrollPosition>,
) {
    let mut delta = 0.0;
    if keys.any_pressed([KeyCode::ArrowDown, KeyCode::PageDown]) {
        delta += 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowUp, KeyCode::PageUp]) {
        delta -= 1.0;
    }
    if delta != 0.0 {
        scroll.0 = (scroll.0 + delta * SCROLL_SPEED * time.delta_secs()).clamp(0.0, TOTAL_HEIGHT);
    }
}

//
// --- The below code is not important for the example ---
//

#[derive(Component)]
struct ScrollReadout;

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // One landmark per section so each authored pose frames something.
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.7, 0.6))),
        Transform::from_xyz(0.0, 0.5, 0.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(0.6))),
        MeshMaterial3d(materials.add(Color::srgb(0.6, 0.6, 0.9))),
        Transform::from_xyz(4.0, 0.6, 0.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Torus::new(0.4, 1.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.9, 0.6, 0.5))),
        Transform::from_xyz(-4.0, 0.4, 0.0),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(30.0, 30.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 5_000.0,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(-1.0, -2.0, -0.5), Vec3::Y),
    ));

    commands.spawn((
        Text::new(readout_text(0.0, 0)),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        Node {
            margin: UiRect::all(Val::Px(20.0)),
            ..Default::default()
        },
        ScrollReadout,
    ));
}

fn update_readout(
    scroll: Res<ScrollPosition>,
    active: Res<ActiveSection>,
    mut readouts: Query<&mut Text, With<ScrollReadout>>,
) {
    if !(scroll.is_changed() || active.is_changed()) {
        return;
    }
    for mut text in readouts.iter_mut() {
        *text = Text::new(readout_text(scroll.0, active.0));
    }
}

fn readout_text(scroll: f32, section: usize) -> String {
    format!(
        "Up/Down - Scroll the tour\n\
         Left Mouse - Orbit, Scroll Wheel - Zoom\n\
         scroll: {scroll:.0}px, section: {section}"
    )
}
