//! World setup and the per-frame schedule.
//!
//! [`install`] prepares a `World` for focus detection: default resources
//! and the observers for trigger signals, detection toggles and the debug
//! switch. [`build_schedule`] returns the frame schedule and [`step`]
//! advances one frame.
//!
//! ```ignore
//! let mut world = World::new();
//! engine::install(&mut world);
//! world.resource_mut::<SimulationState>().set(SimulationStates::Running);
//! let mut schedule = engine::build_schedule();
//! loop {
//!     engine::step(&mut world, &mut schedule, 1.0 / 60.0);
//! }
//! ```
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;

use crate::events::switchdebug::switch_debug_observer;
use crate::resources::debugdraw::DebugDrawBuffer;
use crate::resources::input::InputState;
use crate::resources::simulation::SimulationState;
use crate::resources::worldtime::WorldTime;
use crate::systems::activation::{auto_activate_interactors, toggle_focus_detection_observer};
use crate::systems::debugdraw::age_debug_shapes;
use crate::systems::input::update_trigger_signals;
use crate::systems::interaction::trigger_signal_observer;
use crate::systems::scan::focus_scan_system;
use crate::systems::simulation::simulation_is_running;
use crate::systems::time::update_world_time;

/// Insert missing default resources and spawn the observers.
pub fn install(world: &mut World) {
    world.init_resource::<WorldTime>();
    world.init_resource::<InputState>();
    world.init_resource::<DebugDrawBuffer>();
    world.init_resource::<SimulationState>();

    world.spawn(Observer::new(trigger_signal_observer));
    world.spawn(Observer::new(toggle_focus_detection_observer));
    world.spawn(Observer::new(switch_debug_observer));
    world.flush();
}

/// Frame schedule: expire debug shapes, activate, scan, then emit trigger
/// signals so dispatch always sees this frame's focus.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            age_debug_shapes,
            auto_activate_interactors.run_if(simulation_is_running),
            focus_scan_system.run_if(simulation_is_running),
            update_trigger_signals,
        )
            .chain(),
    );
    update
}

/// Advance the world by `dt` unscaled seconds.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}
