//! Input systems.
//!
//! [`update_trigger_signals`] turns the per-action edges stored in
//! [`InputState`] into [`TriggerSignal`] events:
//!
//! | input                        | phase       |
//! |------------------------------|-------------|
//! | press                        | `Started`   |
//! | still held                   | `Ongoing`   |
//! | release                      | `Completed` |
//! | cancel requested while held  | `Canceled`  |
//!
//! A canceled hold reports no `Completed` when it is finally released, even
//! when the cancel and the release land in the same frame.
use bevy_ecs::prelude::*;

use crate::events::trigger::{ActionId, TriggerPhase, TriggerSignal};
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Convert input edges into trigger signals and consume the edges.
pub fn update_trigger_signals(
    mut input: ResMut<InputState>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    let mut signals: Vec<(ActionId, TriggerPhase)> = Vec::new();

    for (action, state) in input.iter_mut() {
        if state.just_pressed {
            signals.push((action.clone(), TriggerPhase::Started));
        } else if state.active && !state.canceled {
            state.held_for += time.delta;
            if state.cancel_requested {
                state.canceled = true;
                signals.push((action.clone(), TriggerPhase::Canceled));
            } else {
                signals.push((action.clone(), TriggerPhase::Ongoing));
            }
        }

        if state.just_released {
            if state.cancel_requested && !state.canceled {
                signals.push((action.clone(), TriggerPhase::Canceled));
            } else if !state.canceled {
                signals.push((action.clone(), TriggerPhase::Completed));
            }
            state.canceled = false;
            state.cancel_requested = false;
            state.held_for = 0.0;
        }

        state.just_pressed = false;
        state.just_released = false;
    }

    // Deterministic order across actions; phases of one action keep theirs.
    signals.sort_by(|a, b| a.0.cmp(&b.0));
    for (action, phase) in signals {
        commands.trigger(TriggerSignal::new(action, phase));
    }
}
