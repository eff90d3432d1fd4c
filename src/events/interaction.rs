//! Dispatched interaction notifications.
//!
//! Triggered once per dispatch, after the target's interaction handler
//! returned. `succeeded` mirrors the handler's result.

use bevy_ecs::prelude::*;

use crate::events::trigger::ActionId;
use crate::systems::spatialquery::HitRecord;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct InteractedEvent {
    pub interactor: Entity,
    pub target: Entity,
    pub action: ActionId,
    pub hit: HitRecord,
    pub succeeded: bool,
}
