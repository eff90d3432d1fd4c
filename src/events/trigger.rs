//! Abstract trigger signals.
//!
//! The input layer turns device state into [`TriggerSignal`] events carrying
//! an [`ActionId`] and a [`TriggerPhase`]. Interactors bound to the action
//! receive the signal through
//! [`trigger_signal_observer`](crate::systems::interaction::trigger_signal_observer);
//! raw device state never reaches the dispatcher.

use std::fmt;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity of an abstract input action, e.g. `"interact"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(name: impl Into<String>) -> Self {
        ActionId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(name: &str) -> Self {
        ActionId(name.to_string())
    }
}

/// Lifecycle phase of a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerPhase {
    /// The action was just pressed.
    Started,
    /// The action is still held.
    Ongoing,
    /// The action was aborted before completing.
    Canceled,
    /// The action was released normally.
    Completed,
}

impl TriggerPhase {
    /// `Canceled` and `Completed` end a trigger.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TriggerPhase::Canceled | TriggerPhase::Completed)
    }
}

/// Event emitted by the input layer for a bound action.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TriggerSignal {
    pub action: ActionId,
    pub phase: TriggerPhase,
}

impl TriggerSignal {
    pub fn new(action: impl Into<ActionId>, phase: TriggerPhase) -> Self {
        Self {
            action: action.into(),
            phase,
        }
    }

    pub fn started(action: impl Into<ActionId>) -> Self {
        Self::new(action, TriggerPhase::Started)
    }
}
