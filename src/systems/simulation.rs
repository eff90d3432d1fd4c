//! Simulation run conditions.
use bevy_ecs::prelude::*;

use crate::resources::simulation::SimulationState;

/// Run condition: the simulation is running. A missing resource counts as
/// not running.
pub fn simulation_is_running(state: Option<Res<SimulationState>>) -> bool {
    state.is_some_and(|s| s.is_running())
}
