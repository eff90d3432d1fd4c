//! Per-target interaction settings.
//!
//! Owned by an [`Interactable`](crate::components::interactable::Interactable)
//! and only read by eligibility strategies such as
//! [`Eligibility::configured`](crate::components::dispatcher::Eligibility::configured).

use serde::{Deserialize, Serialize};

use crate::events::trigger::ActionId;

/// How the trigger must be performed to interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// A press is enough.
    #[default]
    Momentary,
    /// The action must be held for `hold_time` seconds.
    Held,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Only this action may interact. `None` accepts every bound action.
    pub required_action: Option<ActionId>,
    pub signal_kind: SignalKind,
    /// Seconds a [`SignalKind::Held`] trigger must be held.
    pub hold_time: f32,
    /// Seconds after an interaction during which the target refuses another.
    pub cooldown: f32,
    /// Maximum hit distance for this target, overriding the scan distance.
    pub detection_distance: Option<f32>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            required_action: None,
            signal_kind: SignalKind::Momentary,
            hold_time: 0.5,
            cooldown: 0.0,
            detection_distance: None,
        }
    }
}

impl InteractionConfig {
    pub fn momentary() -> Self {
        Self::default()
    }

    pub fn held(hold_time: f32) -> Self {
        Self {
            signal_kind: SignalKind::Held,
            hold_time: hold_time.max(0.0),
            ..Self::default()
        }
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown.max(0.0);
        self
    }

    pub fn with_detection_distance(mut self, distance: f32) -> Self {
        self.detection_distance = Some(distance.max(0.0));
        self
    }

    pub fn with_required_action(mut self, action: impl Into<ActionId>) -> Self {
        self.required_action = Some(action.into());
        self
    }

    /// Whether the cooldown started at `last_interaction` is over at `now`.
    pub fn cooled_down(&self, last_interaction: Option<f32>, now: f32) -> bool {
        match last_interaction {
            Some(at) => now - at >= self.cooldown,
            None => true,
        }
    }

    pub fn within_range(&self, distance: f32) -> bool {
        self.detection_distance.is_none_or(|max| distance <= max)
    }

    pub fn accepts_action(&self, action: &ActionId) -> bool {
        self.required_action.as_ref().is_none_or(|a| a == action)
    }
}
