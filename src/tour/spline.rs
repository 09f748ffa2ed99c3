//! Builds per-chunk camera path curves from sparse waypoint records and
//! samples pose-at-time. Each chunk is an independent Catmull-Rom curve set
//! over position, forward direction, up, and an optional explicit target,
//! parameterized by a normalized `t` in `[0, 1]`.

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::{
    cubic_splines::{CubicCardinalSpline, CubicCurve, CubicGenerator},
    prelude::*,
};
use serde::Deserialize;
use thiserror::Error;

/// Estimated look distances are floored here so the target never collapses
/// onto the camera position.
const MIN_LOOK_DISTANCE: f32 = 0.001;

/// Waypoints are authored in the capture tool's coordinate system; every
/// ingested position and direction passes through this fixed remap.
pub fn remap_axes(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.z, v.y)
}

/// One record of an authored camera path chunk.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Waypoint {
    /// The camera position at this key.
    pub origin: Vec3,
    /// An explicit look-at point, if the authoring tool recorded one.
    #[serde(default)]
    pub target: Option<Vec3>,
    /// The view direction at this key. When absent, the direction to the next
    /// waypoint is used (or from the previous at the final waypoint).
    #[serde(default)]
    pub forward: Option<Vec3>,
}

impl Waypoint {
    /// A waypoint with only a position.
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            target: None,
            forward: None,
        }
    }
}

/// Why a camera path could not be built or sampled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraPathError {
    /// A chunk had fewer than the two waypoints a curve needs. The chunk is
    /// skipped; other chunks are unaffected.
    #[error("path chunk {chunk} has {len} waypoint(s), at least 2 are required")]
    ChunkTooShort {
        /// Index of the offending chunk in the input sequence.
        chunk: usize,
        /// Number of waypoints the chunk had.
        len: usize,
    },
    /// The path contains no usable chunks, so there is nothing to sample.
    #[error("camera path has no chunks")]
    EmptyPath,
}

/// A sampled point on the path: where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPose {
    /// The eye position.
    pub position: Vec3,
    /// The look-at point.
    pub target: Vec3,
}

/// The curves of one chunk. `key_count` sizes the epsilon used to estimate a
/// look distance from neighboring samples.
#[derive(Debug, Clone)]
struct CurveSet {
    positions: CubicCurve<Vec3>,
    forwards: CubicCurve<Vec3>,
    ups: CubicCurve<Vec3>,
    targets: CubicCurve<Vec3>,
    key_count: usize,
}

impl CurveSet {
    fn build(chunk: usize, records: &[Waypoint]) -> Option<Self> {
        if records.len() < 2 {
            error!(
                "skipping {}",
                CameraPathError::ChunkTooShort {
                    chunk,
                    len: records.len(),
                }
            );
            return None;
        }

        let positions: Vec<Vec3> = records.iter().map(|r| remap_axes(r.origin)).collect();

        let mut forwards = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let forward = match record.forward {
                Some(forward) => remap_axes(forward),
                None if i + 1 < positions.len() => positions[i + 1] - positions[i],
                None => positions[i] - positions[i - 1],
            };
            forwards.push(forward);
        }

        let ups = vec![Vec3::Y; records.len()];

        let targets: Vec<Vec3> = records
            .iter()
            .enumerate()
            .map(|(i, r)| r.target.map(remap_axes).unwrap_or(positions[i]))
            .collect();

        Some(Self {
            positions: CubicCardinalSpline::new_catmull_rom(positions)
                .to_curve()
                .ok()?,
            forwards: CubicCardinalSpline::new_catmull_rom(forwards)
                .to_curve()
                .ok()?,
            ups: CubicCardinalSpline::new_catmull_rom(ups).to_curve().ok()?,
            targets: CubicCardinalSpline::new_catmull_rom(targets)
                .to_curve()
                .ok()?,
            key_count: records.len(),
        })
    }

    /// Step used to probe the curve ahead of `t` when estimating a look
    /// distance; one key interval.
    fn epsilon(&self) -> f32 {
        if self.key_count > 1 {
            1.0 / (self.key_count - 1) as f32
        } else {
            0.01
        }
    }

    /// Evaluate a curve at normalized `t` in `[0, 1]`.
    fn sample(curve: &CubicCurve<Vec3>, t: f32) -> Vec3 {
        let segments = curve.segments().len() as f32;
        curve.position(t.clamp(0.0, 1.0) * segments)
    }
}

/// A multi-chunk camera path built from authored waypoint records. Immutable
/// after construction; insert as a resource to drive scroll-mapped cameras
/// along it.
#[derive(Resource, Debug, Clone)]
pub struct CameraPath {
    chunks: Vec<CurveSet>,
    /// Default look distance used by [`CameraPath::target`] when no explicit
    /// distance is passed. When this is also `None`, the look distance is
    /// estimated from the local sample spacing.
    pub default_look_distance: Option<f32>,
}

impl CameraPath {
    /// Build curves for each chunk of waypoint records. Chunks with fewer
    /// than two records are logged and skipped without affecting the rest.
    pub fn from_chunks(chunks: &[Vec<Waypoint>]) -> Self {
        let built = chunks
            .iter()
            .enumerate()
            .filter_map(|(index, records)| CurveSet::build(index, records))
            .collect();
        Self {
            chunks: built,
            default_look_distance: None,
        }
    }

    /// Set the default look distance used by [`CameraPath::target`].
    #[must_use = "with_look_distance returns a modified CameraPath"]
    pub fn with_look_distance(mut self, distance: f32) -> Self {
        self.default_look_distance = Some(distance);
        self
    }

    /// Number of usable chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Does this path have no usable chunks?
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn chunk(&self, index: usize) -> Result<&CurveSet, CameraPathError> {
        match self.chunks.len() {
            0 => Err(CameraPathError::EmptyPath),
            len => Ok(&self.chunks[index.min(len - 1)]),
        }
    }

    /// The camera position at `t` in `[0, 1]` along the chunk. The chunk
    /// index is clamped to the valid range.
    pub fn position(&self, chunk: usize, t: f32) -> Result<Vec3, CameraPathError> {
        let set = self.chunk(chunk)?;
        Ok(CurveSet::sample(&set.positions, t))
    }

    /// The camera up vector at `t` along the chunk.
    pub fn up(&self, chunk: usize, t: f32) -> Result<Vec3, CameraPathError> {
        let set = self.chunk(chunk)?;
        Ok(CurveSet::sample(&set.ups, t))
    }

    /// The authored explicit target at `t` along the chunk. Where no target
    /// was recorded this curve follows the position itself.
    pub fn explicit_target(&self, chunk: usize, t: f32) -> Result<Vec3, CameraPathError> {
        let set = self.chunk(chunk)?;
        Ok(CurveSet::sample(&set.targets, t))
    }

    /// The look-at point at `t` along the chunk: the position pushed along
    /// the normalized forward direction.
    ///
    /// The distance pushed is `look_distance` if given, else the path's
    /// default, else an estimate: the distance to the position one key
    /// interval ahead, floored at a small minimum. A degenerate forward
    /// direction falls back to +Z.
    pub fn target(
        &self,
        chunk: usize,
        t: f32,
        look_distance: Option<f32>,
    ) -> Result<Vec3, CameraPathError> {
        let set = self.chunk(chunk)?;
        let position = CurveSet::sample(&set.positions, t);
        let mut direction = CurveSet::sample(&set.forwards, t);
        if direction.length_squared() < 1e-12 {
            direction = Vec3::Z;
        }
        let direction = direction.normalize();
        let distance = match look_distance.or(self.default_look_distance) {
            Some(distance) => distance,
            None => {
                let ahead =
                    CurveSet::sample(&set.positions, (t + set.epsilon()).clamp(0.0, 1.0));
                ahead.distance(position).max(MIN_LOOK_DISTANCE)
            }
        };
        Ok(position + direction * distance)
    }

    /// Position and target at `t` along the chunk, with a look distance of
    /// one. Scroll drivers that want the estimated distance instead should
    /// call [`CameraPath::target`] with `None`.
    pub fn pose(&self, chunk: usize, t: f32) -> Result<PathPose, CameraPathError> {
        Ok(PathPose {
            position: self.position(chunk, t)?,
            target: self.target(chunk, t, Some(1.0))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_chunk() -> Vec<Waypoint> {
        vec![
            Waypoint::new(Vec3::ZERO),
            Waypoint::new(Vec3::new(10.0, 0.0, 0.0)),
        ]
    }

    #[test]
    fn axis_remap_is_fixed() {
        assert_eq!(remap_axes(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(-1.0, 3.0, 2.0));
    }

    #[test]
    fn endpoints_interpolate_through_the_remap() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        let start = path.position(0, 0.0).unwrap();
        let end = path.position(0, 1.0).unwrap();
        assert!(start.distance(remap_axes(Vec3::ZERO)) < 1e-4);
        assert!(end.distance(remap_axes(Vec3::new(10.0, 0.0, 0.0))) < 1e-4);
    }

    #[test]
    fn explicit_look_distance_offsets_along_the_forward_fallback() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        // No authored forward: the fallback is the direction to the next
        // waypoint, remapped to (-1, 0, 0).
        let target = path.target(0, 0.0, Some(1.0)).unwrap();
        assert!(target.distance(Vec3::new(-1.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn estimated_look_distance_uses_the_next_sample() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        // Two keys: epsilon is one key interval, so the estimate is the full
        // segment length.
        let target = path.target(0, 0.0, None).unwrap();
        assert!(target.distance(Vec3::new(-10.0, 0.0, 0.0)) < 1e-3);
    }

    #[test]
    fn default_look_distance_is_used_when_set() {
        let path = CameraPath::from_chunks(&[straight_chunk()]).with_look_distance(2.0);
        let target = path.target(0, 0.0, None).unwrap();
        assert!(target.distance(Vec3::new(-2.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn pose_uses_a_look_distance_of_one() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        let pose = path.pose(0, 0.0).unwrap();
        assert!(pose.position.distance(Vec3::ZERO) < 1e-4);
        assert!(pose.target.distance(Vec3::new(-1.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn up_defaults_to_world_up() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert!(path.up(0, t).unwrap().distance(Vec3::Y) < 1e-4);
        }
    }

    #[test]
    fn authored_forward_overrides_the_fallback() {
        let chunk = vec![
            Waypoint {
                origin: Vec3::ZERO,
                target: None,
                forward: Some(Vec3::new(0.0, 0.0, 1.0)),
            },
            Waypoint {
                origin: Vec3::new(10.0, 0.0, 0.0),
                target: None,
                forward: Some(Vec3::new(0.0, 0.0, 1.0)),
            },
        ];
        let path = CameraPath::from_chunks(&[chunk]);
        // Authored forward (0, 0, 1) remaps to (0, 1, 0).
        let target = path.target(0, 0.0, Some(1.0)).unwrap();
        assert!(target.distance(Vec3::new(0.0, 1.0, 0.0)) < 1e-4);
    }

    #[test]
    fn explicit_targets_default_to_the_position() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        let target = path.explicit_target(0, 1.0).unwrap();
        assert!(target.distance(Vec3::new(-10.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn short_chunks_are_skipped_not_fatal() {
        let path = CameraPath::from_chunks(&[
            vec![Waypoint::new(Vec3::ZERO)],
            straight_chunk(),
        ]);
        assert_eq!(path.chunk_count(), 1);
        assert!(path.position(0, 0.0).is_ok());
    }

    #[test]
    fn chunk_index_is_clamped() {
        let path = CameraPath::from_chunks(&[straight_chunk()]);
        let a = path.position(0, 0.5).unwrap();
        let b = path.position(99, 0.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sampling_an_empty_path_is_an_error() {
        let path = CameraPath::from_chunks(&[]);
        assert!(path.is_empty());
        assert_eq!(
            path.position(0, 0.0).unwrap_err(),
            CameraPathError::EmptyPath
        );
        assert_eq!(path.pose(0, 0.5).unwrap_err(), CameraPathError::EmptyPath);
    }

    #[test]
    fn waypoints_deserialize_from_authored_json() {
        let json = r#"[
            { "origin": [0, 0, 0] },
            { "origin": [5, 0, 0], "forward": [0, 0, 1] },
            { "origin": [10, 0, 0], "target": [10, 0, 5] }
        ]"#;
        let records: Vec<Waypoint> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].forward.is_none());
        assert_eq!(records[1].forward, Some(Vec3::Z));
        assert_eq!(records[2].target, Some(Vec3::new(10.0, 0.0, 5.0)));
    }
}
