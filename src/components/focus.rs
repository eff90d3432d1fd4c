//! Single-target focus state machine.
//!
//! [`FocusTracker`] owns the one slot that says which interactable an agent
//! is looking at. Each scan feeds it a [`ProbeResult`]; it answers with a
//! [`FocusTransition`] naming the target that lost focus and the one that
//! gained it. Notifying those targets is left to the caller, which must
//! deliver `lost` before `gained`.
//!
//! Rules applied by [`FocusTracker::update`]:
//! - no blocking hit at all: the focus is cleared
//! - hits are walked in the order received; hits without a target or whose
//!   target is not interactable are skipped
//! - the first interactable hit whose target differs from the current focus
//!   takes over; the current target is skipped wherever it appears
//! - if the only interactable hits belong to the current target, its stored
//!   hit is refreshed silently
//! - blocking hits without any interactable target follow the configured
//!   [`BlockerPolicy`]

use bevy_ecs::prelude::Entity;

use crate::components::scanconfig::BlockerPolicy;
use crate::systems::spatialquery::{HitRecord, ProbeResult};

/// Currently focused target and the hit that selected it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusState {
    focused: Option<Entity>,
    last_hit: Option<HitRecord>,
}

impl FocusState {
    pub fn focused(&self) -> Option<Entity> {
        self.focused
    }

    pub fn last_hit(&self) -> Option<&HitRecord> {
        self.last_hit.as_ref()
    }

    /// True iff the stored hit is a blocking hit.
    pub fn is_focusing(&self) -> bool {
        self.last_hit.is_some_and(|h| h.blocking)
    }
}

/// Notifications owed after an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTransition {
    pub lost: Option<Entity>,
    pub gained: Option<Entity>,
}

impl FocusTransition {
    pub fn is_empty(&self) -> bool {
        self.lost.is_none() && self.gained.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    state: FocusState,
    blockers: BlockerPolicy,
}

impl FocusTracker {
    pub fn new(blockers: BlockerPolicy) -> Self {
        Self {
            state: FocusState::default(),
            blockers,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn focused(&self) -> Option<Entity> {
        self.state.focused
    }

    pub fn is_focusing(&self) -> bool {
        self.state.is_focusing()
    }

    pub fn blockers(&self) -> BlockerPolicy {
        self.blockers
    }

    pub fn set_blockers(&mut self, blockers: BlockerPolicy) {
        self.blockers = blockers;
    }

    /// Apply one scan. `is_interactable` answers the capability query for a target.
    pub fn update(
        &mut self,
        result: &ProbeResult,
        is_interactable: impl Fn(Entity) -> bool,
    ) -> FocusTransition {
        if !result.blocking {
            return self.clear();
        }

        let focused = self.state.focused;
        let mut current = None;
        let next = result.hits.iter().find_map(|hit| {
            let target = hit.target.filter(|target| is_interactable(*target))?;
            if Some(target) == focused {
                current.get_or_insert(*hit);
                None
            } else {
                Some((target, *hit))
            }
        });

        if let Some((target, hit)) = next {
            let lost = self.state.focused.replace(target);
            self.state.last_hit = Some(hit);
            return FocusTransition {
                lost,
                gained: Some(target),
            };
        }

        if let Some(hit) = current {
            self.state.last_hit = Some(hit);
            return FocusTransition::default();
        }

        match self.blockers {
            BlockerPolicy::KeepFocus => FocusTransition::default(),
            BlockerPolicy::ClearFocus => self.clear(),
        }
    }

    /// Drop the focus. Returns the target that must be told it lost focus.
    pub fn clear(&mut self) -> FocusTransition {
        self.state.last_hit = None;
        FocusTransition {
            lost: self.state.focused.take(),
            gained: None,
        }
    }
}
