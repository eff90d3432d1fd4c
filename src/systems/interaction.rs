//! Trigger-driven interaction dispatch.
//!
//! [`trigger_signal_observer`] hands every [`TriggerSignal`] to each
//! interactor bound to its action. When the interactor's dispatcher decides
//! to interact, the focused target's handler runs once, its interaction
//! time is stamped and an [`InteractedEvent`] is triggered.
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::dispatcher::TargetView;
use crate::components::interactable::{Interactable, InteractionContext};
use crate::components::interactor::Interactor;
use crate::events::interaction::InteractedEvent;
use crate::events::trigger::TriggerSignal;
use crate::resources::debugmode::DebugMode;
use crate::resources::simulation::SimulationState;
use crate::resources::worldtime::WorldTime;

pub fn trigger_signal_observer(
    trigger: On<TriggerSignal>,
    mut interactors: Query<(Entity, &mut Interactor)>,
    mut interactables: Query<&mut Interactable>,
    time: Option<Res<WorldTime>>,
    state: Option<Res<SimulationState>>,
    debug_mode: Option<Res<DebugMode>>,
    mut commands: Commands,
) {
    let signal = trigger.event();
    if !state.is_some_and(|s| s.is_running()) {
        debug!("Ignoring {:?} of '{}': simulation not running", signal.phase, signal.action);
        return;
    }
    let now = time.map(|t| t.elapsed).unwrap_or_default();

    for (entity, mut interactor) in interactors.iter_mut() {
        if !interactor.is_bound(&signal.action) {
            continue;
        }
        let verbose = interactor.verbose() || debug_mode.is_some();

        let Interactor {
            tracker,
            dispatcher,
            ..
        } = &mut *interactor;
        let focus = tracker.state();
        let target = focus.focused().and_then(|t| interactables.get(t).ok());
        let view = TargetView {
            config: target.and_then(|t| t.config.as_ref()),
            last_interaction: target.and_then(|t| t.last_interaction()),
        };

        let Some(order) = dispatcher.on_trigger(signal, focus, view, now) else {
            continue;
        };

        let Ok(mut interactable) = interactables.get_mut(order.target) else {
            warn!(
                "{:?} tried to interact with {:?}, which is no longer interactable",
                entity, order.target
            );
            continue;
        };
        let ctx = InteractionContext {
            target: order.target,
            interactor: entity,
            action: order.action.clone(),
            hit: order.hit,
        };
        let succeeded = interactable.interact(&ctx, now).is_ok();
        if verbose {
            info!(
                "{:?} interacted with {:?} via '{}' at {:.2} units",
                entity, order.target, order.action, order.hit.distance
            );
        }
        commands.trigger(InteractedEvent {
            interactor: entity,
            target: order.target,
            action: order.action,
            hit: order.hit,
            succeeded,
        });
    }
}
