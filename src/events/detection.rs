//! Focus detection on/off requests.
//!
//! Trigger a [`ToggleFocusDetectionEvent`] to start or stop an interactor's
//! periodic scans. Requests are only honoured while the simulation is
//! running; see
//! [`toggle_focus_detection_observer`](crate::systems::activation::toggle_focus_detection_observer).

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleFocusDetectionEvent {
    pub interactor: Entity,
    /// `true` starts scanning, `false` stops it.
    pub activate: bool,
}

impl ToggleFocusDetectionEvent {
    pub fn activate(interactor: Entity) -> Self {
        Self {
            interactor,
            activate: true,
        }
    }

    pub fn deactivate(interactor: Entity) -> Self {
        Self {
            interactor,
            activate: false,
        }
    }
}
