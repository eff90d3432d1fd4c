//! Agent side of the focus-and-interact protocol.
//!
//! [`Interactor`] bundles the per-agent pieces: the [`ScanConfig`] that
//! shapes each probe, the [`FocusTracker`] holding the focused target, the
//! [`ScanScheduler`] pacing the probes and the [`InteractionDispatcher`]
//! turning trigger signals into interactions. The agent entity also needs a
//! [`Transform3d`](crate::components::transform3d::Transform3d) and, when
//! tracing from the sensor, a [`Sensor`](crate::components::sensor::Sensor).

use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

use crate::components::dispatcher::{Eligibility, InteractionDispatcher};
use crate::components::focus::FocusTracker;
use crate::components::scanconfig::ScanConfig;
use crate::components::scanscheduler::ScanScheduler;
use crate::events::trigger::ActionId;

#[derive(Component, Debug, Clone)]
pub struct Interactor {
    pub config: ScanConfig,
    pub tracker: FocusTracker,
    pub scheduler: ScanScheduler,
    pub dispatcher: InteractionDispatcher,
    actions: FxHashSet<ActionId>,
    /// Start scanning on the first running frame after spawn.
    pub auto_activate: bool,
}

impl Default for Interactor {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl Interactor {
    /// Builds an inactive interactor. Out-of-range config values are clamped.
    pub fn new(config: ScanConfig) -> Self {
        let config = config.clamped();
        Self {
            tracker: FocusTracker::new(config.blockers),
            scheduler: ScanScheduler::new(config.interval),
            dispatcher: InteractionDispatcher::default(),
            actions: FxHashSet::default(),
            auto_activate: false,
            config,
        }
    }

    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.dispatcher.set_eligibility(eligibility);
        self
    }

    pub fn with_auto_activate(mut self, auto_activate: bool) -> Self {
        self.auto_activate = auto_activate;
        self
    }

    /// Listen for trigger signals of `action`.
    pub fn bind_action(mut self, action: impl Into<ActionId>) -> Self {
        self.actions.insert(action.into());
        self
    }

    pub fn unbind_action(&mut self, action: &ActionId) -> bool {
        self.actions.remove(action)
    }

    pub fn is_bound(&self, action: &ActionId) -> bool {
        self.actions.contains(action)
    }

    pub fn bound_actions(&self) -> impl Iterator<Item = &ActionId> {
        self.actions.iter()
    }

    pub fn verbose(&self) -> bool {
        self.config.verbose
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }

    /// Replace the scan config; the scheduler keeps its running state.
    pub fn set_config(&mut self, config: ScanConfig) {
        let config = config.clamped();
        let active = self.scheduler.is_active();
        self.scheduler = ScanScheduler::new(config.interval);
        if active {
            self.scheduler.activate();
        }
        self.tracker.set_blockers(config.blockers);
        self.config = config;
    }
}
