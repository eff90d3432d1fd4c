//! Focus transition notifications.
//!
//! Triggered by the scan system right after the target's own focus handler
//! ran. Presentation code (outline, prompt widgets) observes this event; the
//! engine itself never reads it back.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<FocusChangedEvent>| {
//!     let ev = trigger.event();
//!     if ev.focused { /* show prompt */ } else { /* hide prompt */ }
//! });
//! ```

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChangedEvent {
    /// The probing agent.
    pub interactor: Entity,
    /// The interactable that gained or lost focus.
    pub target: Entity,
    pub focused: bool,
}
