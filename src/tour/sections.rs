//! Maps a scalar scroll position onto an ordered list of section heights.
//! Cumulative sums partition the scroll axis into contiguous ranges, one per
//! authored camera state.

use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;

/// The ordered section heights of the host page, in the same units as the
/// scroll position. Usually measured by the host layout and pushed here.
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut, Reflect)]
pub struct SectionLayout(pub Vec<f32>);

/// The index of the section containing `scroll`.
///
/// Returns 0 for an empty layout or a non-positive scroll position, and the
/// last index when the scroll position runs past the total height.
pub fn section_index(scroll: f32, heights: &[f32]) -> usize {
    if heights.is_empty() || scroll <= 0.0 {
        return 0;
    }
    let mut cumulative = 0.0;
    for (index, height) in heights.iter().enumerate() {
        cumulative += height;
        if cumulative >= scroll {
            return index;
        }
    }
    heights.len() - 1
}

/// The `[start, end]` scroll range of the section at `index`, or `(0, 0)` for
/// an out-of-bounds index.
pub fn section_range(index: usize, heights: &[f32]) -> (f32, f32) {
    if index >= heights.len() {
        return (0.0, 0.0);
    }
    let start: f32 = heights[..index].iter().sum();
    (start, start + heights[index])
}

/// How far `scroll` has progressed through the section at `index`, in
/// `[0, 1]`. A degenerate (zero-height) section reports 0.
pub fn section_progress(scroll: f32, index: usize, heights: &[f32]) -> f32 {
    let (start, end) = section_range(index, heights);
    if end <= start {
        return 0.0;
    }
    ((scroll - start) / (end - start)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHTS: [f32; 3] = [100.0, 100.0, 100.0];

    #[test]
    fn index_at_boundaries() {
        assert_eq!(section_index(0.0, &HEIGHTS), 0);
        assert_eq!(section_index(-50.0, &HEIGHTS), 0);
        assert_eq!(section_index(50.0, &HEIGHTS), 0);
        assert_eq!(section_index(100.0, &HEIGHTS), 0);
        assert_eq!(section_index(100.1, &HEIGHTS), 1);
        assert_eq!(section_index(250.0, &HEIGHTS), 2);
        // Past the total height, clamp to the last section.
        assert_eq!(section_index(1000.0, &HEIGHTS), 2);
    }

    #[test]
    fn empty_layout_maps_to_zero() {
        assert_eq!(section_index(123.0, &[]), 0);
        assert_eq!(section_range(0, &[]), (0.0, 0.0));
        assert_eq!(section_progress(123.0, 0, &[]), 0.0);
    }

    #[test]
    fn ranges_partition_the_scroll_axis() {
        assert_eq!(section_range(0, &HEIGHTS), (0.0, 100.0));
        assert_eq!(section_range(1, &HEIGHTS), (100.0, 200.0));
        assert_eq!(section_range(2, &HEIGHTS), (200.0, 300.0));
        assert_eq!(section_range(3, &HEIGHTS), (0.0, 0.0));
    }

    #[test]
    fn progress_is_normalized_and_clamped() {
        assert_eq!(section_progress(50.0, 0, &HEIGHTS), 0.5);
        assert_eq!(section_progress(150.0, 1, &HEIGHTS), 0.5);
        assert_eq!(section_progress(-10.0, 0, &HEIGHTS), 0.0);
        assert_eq!(section_progress(1000.0, 2, &HEIGHTS), 1.0);
    }

    #[test]
    fn degenerate_sections_report_zero_progress() {
        let heights = [100.0, 0.0, 100.0];
        assert_eq!(section_progress(100.0, 1, &heights), 0.0);
    }
}
