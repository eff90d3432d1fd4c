//! Periodic focus scans.
//!
//! [`focus_scan_system`] advances each active interactor's
//! [`ScanScheduler`](crate::components::scanscheduler::ScanScheduler) and,
//! when a scan is due, probes the world, feeds the result to the
//! interactor's focus tracker and delivers the resulting notifications:
//! first to the target that lost focus, then to the one that gained it.
//!
//! Probes go through the [`ShapeCastBackend`] resource when one is present,
//! otherwise through [`ColliderCaster`] over the world's colliders.
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::collider::Collider;
use crate::components::interactable::{FocusNotice, Interactable};
use crate::components::interactor::Interactor;
use crate::components::scanconfig::DebugTrace;
use crate::components::sensor::Sensor;
use crate::components::transform3d::Transform3d;
use crate::events::focus::FocusChangedEvent;
use crate::resources::debugdraw::DebugDrawBuffer;
use crate::resources::debugmode::DebugMode;
use crate::resources::shapecastbackend::ShapeCastBackend;
use crate::resources::worldtime::WorldTime;
use crate::systems::spatialquery::{AgentView, ColliderCaster, ShapeCaster, probe};

#[allow(clippy::too_many_arguments)]
pub fn focus_scan_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    debug_mode: Option<Res<DebugMode>>,
    mut debug_buffer: Option<ResMut<DebugDrawBuffer>>,
    backend: Option<Res<ShapeCastBackend>>,
    colliders: Query<(Entity, &'static Transform3d, &'static Collider)>,
    mut agents: Query<(Entity, &mut Interactor, Option<&Transform3d>, Option<&Sensor>)>,
    mut interactables: Query<&mut Interactable>,
) {
    let fallback = ColliderCaster {
        colliders: &colliders,
    };
    let caster: &dyn ShapeCaster = match backend.as_deref() {
        Some(backend) => backend,
        None => &fallback,
    };

    for (entity, mut interactor, transform, sensor) in agents.iter_mut() {
        if !interactor.scheduler.tick(time.delta) {
            continue;
        }
        let verbose = interactor.verbose() || debug_mode.is_some();

        let mode = match interactor.config.debug_trace {
            DebugTrace::None if debug_mode.is_some() => DebugTrace::ForOneFrame,
            mode => mode,
        };
        let debug = match debug_buffer.as_mut() {
            Some(buffer) if mode != DebugTrace::None => Some((&mut **buffer, mode)),
            _ => None,
        };

        let agent = AgentView {
            entity,
            transform,
            sensor,
        };
        let result = probe(&agent, &interactor.config, caster, debug);
        if verbose {
            debug!(
                "Scan by {:?}: {} hit(s), blocking: {}",
                entity,
                result.hits.len(),
                result.blocking
            );
        }

        let transition = interactor
            .tracker
            .update(&result, |target| interactables.contains(target));

        if let Some(lost) = transition.lost {
            notify(&mut commands, &mut interactables, entity, lost, false);
            if verbose {
                info!("{:?} lost focus on {:?}", entity, lost);
            }
        }
        if let Some(gained) = transition.gained {
            notify(&mut commands, &mut interactables, entity, gained, true);
            if verbose {
                info!("{:?} focused {:?}", entity, gained);
            }
        }
    }
}

fn notify(
    commands: &mut Commands,
    interactables: &mut Query<&mut Interactable>,
    interactor: Entity,
    target: Entity,
    focused: bool,
) {
    let notice = FocusNotice {
        target,
        interactor,
        focused,
    };
    // A target despawned since the last scan only misses its own callback.
    if let Ok(mut interactable) = interactables.get_mut(target) {
        interactable.set_focus(&notice);
    }
    commands.trigger(FocusChangedEvent {
        interactor,
        target,
        focused,
    });
}
