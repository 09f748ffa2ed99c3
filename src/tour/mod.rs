//! Scroll-to-camera mapping: sections partition the scroll axis, authored
//! states or spline paths turn scroll progress into camera poses, and the
//! driver feeds those poses into the controller.

pub mod driver;
pub mod sections;
pub mod spline;
pub mod states;

use bevy_app::prelude::*;
use bevy_ecs::schedule::IntoScheduleConfigs;

/// Adds the scroll resources and the systems that map scroll position to
/// camera focus calls.
///
/// The host pushes values into [`driver::ScrollPosition`] and the measured
/// layout into [`sections::SectionLayout`]; authored content goes into
/// [`states::TourStates`] or a [`spline::CameraPath`] resource.
pub struct ScrollTourPlugin;

impl Plugin for ScrollTourPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<driver::ScrollPosition>()
            .init_resource::<driver::ActiveSection>()
            .init_resource::<sections::SectionLayout>()
            .add_systems(
                PreUpdate,
                (
                    driver::update_active_section,
                    driver::apply_section_states,
                    driver::drive_scroll,
                    driver::tick_pending_focus,
                )
                    .chain(),
            )
            .register_type::<driver::ScrollPosition>()
            .register_type::<driver::ActiveSection>()
            .register_type::<driver::ScrollDriven>()
            .register_type::<driver::PendingFocus>()
            .register_type::<sections::SectionLayout>();
    }
}
