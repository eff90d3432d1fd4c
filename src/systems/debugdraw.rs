//! Debug shape housekeeping.
use bevy_ecs::prelude::*;

use crate::resources::debugdraw::DebugDrawBuffer;
use crate::resources::worldtime::WorldTime;

/// Expire debug shapes whose lifetime ran out. Runs before the scans so
/// one-frame shapes survive exactly until the next frame's probes.
pub fn age_debug_shapes(mut buffer: ResMut<DebugDrawBuffer>, time: Res<WorldTime>) {
    buffer.age(time.delta);
}
