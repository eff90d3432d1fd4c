//! Starting and stopping focus detection.
//!
//! Scanning is gated on the simulation: activation requests that arrive
//! while the world is being edited are dropped, and auto-activating
//! interactors wait for the first running frame.
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::interactor::Interactor;
use crate::events::detection::ToggleFocusDetectionEvent;
use crate::resources::debugmode::DebugMode;
use crate::resources::simulation::SimulationState;

/// Activate interactors flagged with `auto_activate`. Each is activated once;
/// afterwards only explicit requests change its state.
pub fn auto_activate_interactors(
    mut query: Query<(Entity, &mut Interactor)>,
    debug_mode: Option<Res<DebugMode>>,
) {
    for (entity, mut interactor) in query.iter_mut() {
        if !interactor.auto_activate {
            continue;
        }
        interactor.auto_activate = false;
        if interactor.scheduler.activate() && (interactor.verbose() || debug_mode.is_some()) {
            info!(
                "Focus detection auto-activated for {:?} (every {:.3}s)",
                entity,
                interactor.scheduler.interval()
            );
        }
    }
}

/// Apply a [`ToggleFocusDetectionEvent`].
///
/// Deactivating stops future scans only; the current focus is kept.
pub fn toggle_focus_detection_observer(
    trigger: On<ToggleFocusDetectionEvent>,
    mut query: Query<&mut Interactor>,
    state: Option<Res<SimulationState>>,
    debug_mode: Option<Res<DebugMode>>,
) {
    let event = trigger.event();
    if !state.is_some_and(|s| s.is_running()) {
        debug!(
            "Ignoring focus detection toggle for {:?}: simulation not running",
            event.interactor
        );
        return;
    }
    let Ok(mut interactor) = query.get_mut(event.interactor) else {
        warn!(
            "Focus detection toggle for {:?}: entity has no Interactor",
            event.interactor
        );
        return;
    };

    let changed = if event.activate {
        interactor.scheduler.activate()
    } else {
        interactor.scheduler.deactivate()
    };
    if changed && (interactor.verbose() || debug_mode.is_some()) {
        info!(
            "Focus detection {} for {:?}",
            if event.activate { "activated" } else { "deactivated" },
            event.interactor
        );
    }
}
