//! Spatial probing.
//!
//! [`try_probe`] resolves the trace origin and direction for an agent from
//! its [`ScanConfig`], sweeps the configured volume through a
//! [`ShapeCaster`] backend and reports every hit the backend found, in the
//! backend's order. [`probe`] is the fail-soft wrapper used by the scan
//! system: configuration and environment errors are logged and reported as
//! "nothing detected".
//!
//! The built-in backend, [`ColliderCaster`], sweeps against
//! [`Collider`] components. Hosts with their own physics insert a
//! [`ShapeCastBackend`](crate::resources::shapecastbackend::ShapeCastBackend)
//! resource instead.

use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use log::warn;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use thiserror::Error;

use crate::components::collider::Collider;
use crate::components::scanconfig::{DebugTrace, ScanConfig, TraceDirection, TraceOrigin, TraceShape};
use crate::components::sensor::Sensor;
use crate::components::transform3d::Transform3d;
use crate::resources::debugdraw::{DebugColor, DebugDrawBuffer, DebugShape, ShapeLifetime};

/// One hit reported by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Entity that was hit; `None` when the backend reports world geometry.
    pub target: Option<Entity>,
    /// Position of the swept volume's center at contact.
    pub impact_point: Vec3,
    /// Distance travelled from the trace start.
    pub distance: f32,
    pub blocking: bool,
}

impl HitRecord {
    pub fn new(target: Option<Entity>, impact_point: Vec3, distance: f32, blocking: bool) -> Self {
        Self {
            target,
            impact_point,
            distance,
            blocking,
        }
    }

    pub fn blocking(target: Entity, distance: f32) -> Self {
        Self::new(Some(target), Vec3::ZERO, distance, true)
    }

    pub fn overlap(target: Entity, distance: f32) -> Self {
        Self::new(Some(target), Vec3::ZERO, distance, false)
    }
}

pub type HitList = SmallVec<[HitRecord; 8]>;

/// Outcome of one probe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub hits: HitList,
    /// True iff at least one hit blocks.
    pub blocking: bool,
}

impl ProbeResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_hits(hits: impl IntoIterator<Item = HitRecord>) -> Self {
        let hits: HitList = hits.into_iter().collect();
        let blocking = hits.iter().any(|h| h.blocking);
        Self { hits, blocking }
    }

    /// Nothing detected at all.
    pub fn is_miss(&self) -> bool {
        !self.blocking && self.hits.is_empty()
    }
}

/// Volume swept by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastShape {
    Line,
    Sphere { radius: f32 },
    /// Upright capsule.
    Capsule { radius: f32, half_height: f32 },
}

impl CastShape {
    /// Capsule half height is derived from the trace distance.
    pub fn from_config(shape: TraceShape, size: f32, distance: f32) -> Self {
        match shape {
            TraceShape::Line => CastShape::Line,
            TraceShape::Sphere => CastShape::Sphere { radius: size },
            TraceShape::Capsule => CastShape::Capsule {
                radius: size,
                half_height: distance * 0.5,
            },
        }
    }

    pub fn radius(&self) -> f32 {
        match *self {
            CastShape::Line => 0.0,
            CastShape::Sphere { radius } | CastShape::Capsule { radius, .. } => radius,
        }
    }
}

/// Parameters handed to a [`ShapeCaster`].
#[derive(Debug, Clone)]
pub struct CastRequest<'a> {
    pub start: Vec3,
    pub end: Vec3,
    pub shape: CastShape,
    pub channel: u32,
    pub ignore: &'a FxHashSet<Entity>,
}

/// Geometry backend performing the actual intersection test.
///
/// Implementations return every hit along the cast. Order is up to the
/// backend; callers must not assume nearest-first.
pub trait ShapeCaster {
    fn cast_shape(&self, request: &CastRequest<'_>) -> Vec<HitRecord>;
}

/// Built-in backend sweeping against [`Collider`] components.
///
/// Hits come back nearest-first. Every overlap hit up to and including the
/// first blocking hit is reported; anything behind that blocker is occluded.
pub struct ColliderCaster<'q, 'w, 's> {
    pub colliders: &'q Query<'w, 's, (Entity, &'static Transform3d, &'static Collider)>,
}

impl ShapeCaster for ColliderCaster<'_, '_, '_> {
    fn cast_shape(&self, request: &CastRequest<'_>) -> Vec<HitRecord> {
        let segment = request.end - request.start;
        let max_distance = segment.length();
        let Some(dir) = segment.try_normalize() else {
            return Vec::new();
        };
        let (radius, vertical) = match request.shape {
            CastShape::Line => (0.0, 0.0),
            CastShape::Sphere { radius } => (radius, 0.0),
            CastShape::Capsule {
                radius,
                half_height,
            } => (radius, half_height),
        };

        let mut hits: Vec<HitRecord> = self
            .colliders
            .iter()
            .filter(|(entity, _, collider)| {
                !request.ignore.contains(entity) && collider.responds_to(request.channel)
            })
            .filter_map(|(entity, transform, collider)| {
                let center = transform.transform_point(collider.offset);
                collider
                    .sweep(center, request.start, dir, max_distance, radius, vertical)
                    .map(|t| {
                        HitRecord::new(
                            Some(entity),
                            request.start + dir * t,
                            t,
                            collider.is_blocking(),
                        )
                    })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        if let Some(first_block) = hits.iter().position(|h| h.blocking) {
            hits.truncate(first_block + 1);
        }
        hits
    }
}

/// Environment and configuration failures of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("trace origin is the sensor but agent {0:?} has no Sensor attached")]
    NoSensorAttached(Entity),
    #[error("agent {0:?} has no Transform3d")]
    MissingAgent(Entity),
}

/// What a probe needs to know about the probing agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentView<'a> {
    pub entity: Entity,
    pub transform: Option<&'a Transform3d>,
    pub sensor: Option<&'a Sensor>,
}

/// Where the trace starts and which way it goes.
pub fn resolve_trace(
    agent: &AgentView<'_>,
    config: &ScanConfig,
) -> Result<(Vec3, Vec3), ProbeError> {
    let transform = agent
        .transform
        .ok_or(ProbeError::MissingAgent(agent.entity))?;
    let pose = match config.origin {
        TraceOrigin::AgentAnchor => *transform,
        TraceOrigin::Sensor => agent
            .sensor
            .ok_or(ProbeError::NoSensorAttached(agent.entity))?
            .world_pose(transform),
    };
    let direction = match config.direction {
        TraceDirection::Forward => pose.forward(),
        TraceDirection::Backward => -pose.forward(),
        TraceDirection::Right => pose.right(),
        TraceDirection::Left => -pose.right(),
        TraceDirection::Up => pose.up(),
        TraceDirection::Down => -pose.up(),
    };
    Ok((pose.position + config.offset, direction))
}

/// Probe the world for `agent` as described by `config`.
///
/// The agent itself is always part of the ignore set. When `debug` is given
/// with a mode other than [`DebugTrace::None`], the cast volume and hit
/// points are recorded; this never changes the returned data.
pub fn try_probe(
    agent: &AgentView<'_>,
    config: &ScanConfig,
    caster: &dyn ShapeCaster,
    debug: Option<(&mut DebugDrawBuffer, DebugTrace)>,
) -> Result<ProbeResult, ProbeError> {
    let (start, direction) = resolve_trace(agent, config)?;
    let end = start + direction * config.distance;
    let shape = CastShape::from_config(config.shape, config.size, config.distance);

    let mut ignore = config.ignore.clone();
    ignore.insert(agent.entity);

    let request = CastRequest {
        start,
        end,
        shape,
        channel: config.channel,
        ignore: &ignore,
    };
    let result = ProbeResult::from_hits(caster.cast_shape(&request));

    if let Some((buffer, mode)) = debug {
        record_debug_trace(buffer, &request, &result, mode);
    }
    Ok(result)
}

/// Fail-soft [`try_probe`]: errors are logged and reported as an empty result.
pub fn probe(
    agent: &AgentView<'_>,
    config: &ScanConfig,
    caster: &dyn ShapeCaster,
    debug: Option<(&mut DebugDrawBuffer, DebugTrace)>,
) -> ProbeResult {
    match try_probe(agent, config, caster, debug) {
        Ok(result) => result,
        Err(e) => {
            warn!("Focus probe skipped: {}", e);
            ProbeResult::empty()
        }
    }
}

fn record_debug_trace(
    buffer: &mut DebugDrawBuffer,
    request: &CastRequest<'_>,
    result: &ProbeResult,
    mode: DebugTrace,
) {
    let lifetime = match mode {
        DebugTrace::None => return,
        DebugTrace::ForOneFrame => ShapeLifetime::OneFrame,
        DebugTrace::ForDuration(secs) => ShapeLifetime::Seconds(secs),
        DebugTrace::Persistent => ShapeLifetime::Persistent,
    };
    let line_color = if result.hits.is_empty() {
        DebugColor::Green
    } else {
        DebugColor::Red
    };
    buffer.push(
        DebugShape::Line {
            start: request.start,
            end: request.end,
            color: line_color,
        },
        lifetime,
    );
    match request.shape {
        CastShape::Line => {}
        CastShape::Sphere { radius } => {
            for center in [request.start, request.end] {
                buffer.push(
                    DebugShape::Sphere {
                        center,
                        radius,
                        color: DebugColor::Blue,
                    },
                    lifetime,
                );
            }
        }
        CastShape::Capsule {
            radius,
            half_height,
        } => {
            for center in [request.start, request.end] {
                buffer.push(
                    DebugShape::Capsule {
                        center,
                        half_height,
                        radius,
                        color: DebugColor::Blue,
                    },
                    lifetime,
                );
            }
        }
    }
    let marker = (request.shape.radius() * 0.5).max(0.05);
    for hit in &result.hits {
        buffer.push(
            DebugShape::Sphere {
                center: hit.impact_point,
                radius: marker,
                color: DebugColor::Yellow,
            },
            lifetime,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Returns canned hits and remembers the last request.
    struct CannedCaster {
        hits: Vec<HitRecord>,
        seen: RefCell<Option<(Vec3, Vec3, CastShape, usize)>>,
    }

    impl CannedCaster {
        fn new(hits: Vec<HitRecord>) -> Self {
            Self {
                hits,
                seen: RefCell::new(None),
            }
        }
    }

    impl ShapeCaster for CannedCaster {
        fn cast_shape(&self, request: &CastRequest<'_>) -> Vec<HitRecord> {
            *self.seen.borrow_mut() =
                Some((request.start, request.end, request.shape, request.ignore.len()));
            self.hits.clone()
        }
    }

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn sensor_origin_without_sensor_fails() {
        let e = entities(10);
        let transform = Transform3d::default();
        let agent = AgentView {
            entity: e[1],
            transform: Some(&transform),
            sensor: None,
        };
        let caster = CannedCaster::new(vec![HitRecord::blocking(e[2], 1.0)]);
        let config = ScanConfig::new().with_origin(TraceOrigin::Sensor);

        assert_eq!(
            try_probe(&agent, &config, &caster, None),
            Err(ProbeError::NoSensorAttached(e[1]))
        );
        let result = probe(&agent, &config, &caster, None);
        assert!(result.is_miss());
        assert!(caster.seen.borrow().is_none());
    }

    #[test]
    fn missing_transform_fails() {
        let e = entities(10);
        let agent = AgentView {
            entity: e[1],
            transform: None,
            sensor: None,
        };
        let caster = CannedCaster::new(vec![]);
        let config = ScanConfig::new().with_origin(TraceOrigin::AgentAnchor);
        assert_eq!(
            try_probe(&agent, &config, &caster, None),
            Err(ProbeError::MissingAgent(e[1]))
        );
    }

    #[test]
    fn sensor_pose_and_offset_drive_the_trace() {
        let e = entities(10);
        let transform = Transform3d::new(0.0, 0.0, 0.0);
        let sensor = Sensor::new(Vec3::new(0.0, 2.0, 0.0));
        let agent = AgentView {
            entity: e[1],
            transform: Some(&transform),
            sensor: Some(&sensor),
        };
        let caster = CannedCaster::new(vec![]);
        let config = ScanConfig::new()
            .with_distance(50.0)
            .with_offset(Vec3::new(1.0, 0.0, 0.0))
            .with_shape(TraceShape::Capsule, 3.0)
            .ignoring(e[9]);

        try_probe(&agent, &config, &caster, None).unwrap();
        let (start, end, shape, ignored) = caster.seen.borrow().unwrap();
        assert!(start.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));
        assert!(end.abs_diff_eq(Vec3::new(1.0, 2.0, -50.0), 1e-5));
        assert_eq!(
            shape,
            CastShape::Capsule {
                radius: 3.0,
                half_height: 25.0
            }
        );
        // Configured entity plus the agent itself.
        assert_eq!(ignored, 2);
    }

    #[test]
    fn each_direction_uses_the_origin_basis() {
        let e = entities(10);
        let transform = Transform3d::default();
        let agent = AgentView {
            entity: e[1],
            transform: Some(&transform),
            sensor: None,
        };
        let expected = [
            (TraceDirection::Forward, Vec3::NEG_Z),
            (TraceDirection::Backward, Vec3::Z),
            (TraceDirection::Right, Vec3::X),
            (TraceDirection::Left, Vec3::NEG_X),
            (TraceDirection::Up, Vec3::Y),
            (TraceDirection::Down, Vec3::NEG_Y),
        ];
        for (direction, want) in expected {
            let config = ScanConfig::new()
                .with_origin(TraceOrigin::AgentAnchor)
                .with_direction(direction);
            let (_, got) = resolve_trace(&agent, &config).unwrap();
            assert!(got.abs_diff_eq(want, 1e-5), "{:?}", direction);
        }
    }

    #[test]
    fn blocking_flag_reflects_any_blocking_hit() {
        let e = entities(10);
        let overlap_only = ProbeResult::from_hits([HitRecord::overlap(e[3], 2.0)]);
        assert!(!overlap_only.blocking);
        assert!(!overlap_only.is_miss());

        let mixed = ProbeResult::from_hits([
            HitRecord::overlap(e[3], 2.0),
            HitRecord::blocking(e[4], 3.0),
        ]);
        assert!(mixed.blocking);
        assert_eq!(mixed.hits.len(), 2);
    }

    #[test]
    fn debug_trace_records_shapes_without_changing_hits() {
        let e = entities(10);
        let transform = Transform3d::default();
        let agent = AgentView {
            entity: e[1],
            transform: Some(&transform),
            sensor: None,
        };
        let hits = vec![HitRecord::blocking(e[2], 5.0)];
        let caster = CannedCaster::new(hits.clone());
        let config = ScanConfig::new()
            .with_origin(TraceOrigin::AgentAnchor)
            .with_debug_trace(DebugTrace::ForOneFrame);

        let mut buffer = DebugDrawBuffer::default();
        let with_debug =
            try_probe(&agent, &config, &caster, Some((&mut buffer, config.debug_trace))).unwrap();
        let without = try_probe(&agent, &config, &caster, None).unwrap();

        assert_eq!(with_debug, without);
        // Line, two end spheres, one hit point.
        assert_eq!(buffer.len(), 4);
        assert!(matches!(
            buffer.shapes()[0].shape,
            DebugShape::Line {
                color: DebugColor::Red,
                ..
            }
        ));
    }

    #[test]
    fn debug_trace_none_records_nothing() {
        let e = entities(10);
        let transform = Transform3d::default();
        let agent = AgentView {
            entity: e[1],
            transform: Some(&transform),
            sensor: None,
        };
        let caster = CannedCaster::new(vec![]);
        let config = ScanConfig::new().with_origin(TraceOrigin::AgentAnchor);
        let mut buffer = DebugDrawBuffer::default();
        try_probe(&agent, &config, &caster, Some((&mut buffer, config.debug_trace))).unwrap();
        assert!(buffer.is_empty());
    }
}
