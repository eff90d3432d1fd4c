//! Debug toggle resource.
//!
//! The mere presence of this resource forces every interactor to record its
//! probes into the [`DebugDrawBuffer`](crate::resources::debugdraw::DebugDrawBuffer)
//! and to log its transitions, regardless of per-interactor settings.
//! Remove it to fall back to those settings.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, probes record debug shapes and interactors log verbosely.
#[derive(Resource, Clone, Copy)]
pub struct DebugMode {}
