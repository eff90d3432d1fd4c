//! Per-frame action input resource.
//!
//! The host writes raw pressed state per [`ActionId`] with
//! [`InputState::set_pressed`] (or requests a cancel); the
//! [`update_trigger_signals`](crate::systems::input::update_trigger_signals)
//! system turns the resulting edges into trigger signals.
use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use crate::events::trigger::ActionId;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Boolean action state.
pub struct BoolState {
    /// Whether the action is currently held.
    pub active: bool,
    /// Whether the action was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the action was just released this frame.
    pub just_released: bool,
    /// Seconds the action has been held.
    pub held_for: f32,
    /// The host asked to abort the current hold.
    pub cancel_requested: bool,
    /// The current hold already reported `Canceled`.
    pub canceled: bool,
}

/// Resource capturing the per-frame state of every known action.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    actions: FxHashMap<ActionId, BoolState>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raw pressed state for `action` this frame.
    pub fn set_pressed(&mut self, action: impl Into<ActionId>, pressed: bool) {
        let state = self.actions.entry(action.into()).or_default();
        if pressed && !state.active {
            state.just_pressed = true;
            state.held_for = 0.0;
            state.cancel_requested = false;
            state.canceled = false;
        }
        if !pressed && state.active {
            state.just_released = true;
        }
        state.active = pressed;
    }

    /// Abort the current hold of `action`, if any. The action reports
    /// `Canceled` instead of `Completed` when it ends.
    pub fn cancel(&mut self, action: impl Into<ActionId>) {
        if let Some(state) = self.actions.get_mut(&action.into())
            && state.active
        {
            state.cancel_requested = true;
        }
    }

    pub fn get(&self, action: &ActionId) -> Option<&BoolState> {
        self.actions.get(action)
    }

    pub fn is_active(&self, action: &ActionId) -> bool {
        self.actions.get(action).is_some_and(|s| s.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActionId, &BoolState)> {
        self.actions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ActionId, &mut BoolState)> {
        self.actions.iter_mut()
    }
}
