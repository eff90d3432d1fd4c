//! Simulation context resource.
//!
//! Scans, activation requests and trigger dispatch only act while the
//! simulation is [`SimulationStates::Running`]. Worlds built for editing or
//! tooling keep the default [`SimulationStates::Editor`] state, so component
//! setup performed there never starts timers or fires interactions.

use bevy_ecs::prelude::Resource;

/// Discrete states of the hosting simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimulationStates {
    #[default]
    Editor,
    Running,
    Paused,
}

/// Authoritative simulation state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulationState {
    current: SimulationStates,
}

impl SimulationState {
    pub fn new() -> Self {
        SimulationState {
            current: SimulationStates::Editor,
        }
    }

    pub fn running() -> Self {
        SimulationState {
            current: SimulationStates::Running,
        }
    }

    /// Read-only access to the current state.
    pub fn get(&self) -> SimulationStates {
        self.current
    }

    pub fn set(&mut self, state: SimulationStates) {
        self.current = state;
    }

    pub fn is_running(&self) -> bool {
        self.current == SimulationStates::Running
    }
}
