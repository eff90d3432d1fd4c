//! Trigger-to-interaction dispatch.
//!
//! [`InteractionDispatcher`] decides, for one [`TriggerSignal`], whether the
//! currently focused target should be interacted with. The decision itself
//! is an [`Eligibility`] strategy injected at construction:
//!
//! - [`Eligibility::focus_only`] (default): the agent is focusing and the
//!   signal just started.
//! - [`Eligibility::configured`]: additionally honours the focused target's
//!   [`InteractionConfig`] (cooldown, range override, required action and
//!   momentary/held signal kind).
//!
//! The strategy is consulted for `Started` and `Ongoing` signals only.
//! `Canceled` and `Completed` end the current hold and never dispatch.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Entity;

use crate::components::focus::FocusState;
use crate::components::interactionconfig::{InteractionConfig, SignalKind};
use crate::events::trigger::{ActionId, TriggerPhase, TriggerSignal};
use crate::systems::spatialquery::HitRecord;

/// Everything an eligibility strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext<'a> {
    pub phase: TriggerPhase,
    pub action: &'a ActionId,
    pub focus: &'a FocusState,
    /// Config of the focused target, if it has one.
    pub config: Option<&'a InteractionConfig>,
    pub last_interaction: Option<f32>,
    /// Current world time in seconds.
    pub now: f32,
    /// Seconds the action has been held; zero on `Started`.
    pub held_for: f32,
    /// An interaction already fired during the current hold.
    pub fired_this_hold: bool,
}

impl EligibilityContext<'_> {
    pub fn is_focusing(&self) -> bool {
        self.focus.is_focusing()
    }

    pub fn hit(&self) -> Option<&HitRecord> {
        self.focus.last_hit()
    }
}

pub type EligibilityFn = dyn Fn(&EligibilityContext<'_>) -> bool + Send + Sync;

/// Interaction eligibility strategy.
#[derive(Clone)]
pub struct Eligibility(Arc<EligibilityFn>);

impl fmt::Debug for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Eligibility(..)")
    }
}

impl Default for Eligibility {
    fn default() -> Self {
        Self::focus_only()
    }
}

impl Eligibility {
    pub fn new(f: impl Fn(&EligibilityContext<'_>) -> bool + Send + Sync + 'static) -> Self {
        Eligibility(Arc::new(f))
    }

    /// Focusing, on the press edge.
    pub fn focus_only() -> Self {
        Self::new(|ctx| ctx.phase == TriggerPhase::Started && ctx.is_focusing())
    }

    /// Focusing plus the focused target's [`InteractionConfig`].
    ///
    /// Targets without a config behave as under [`Eligibility::focus_only`].
    pub fn configured() -> Self {
        Self::new(|ctx| {
            if !ctx.is_focusing() {
                return false;
            }
            let Some(config) = ctx.config else {
                return ctx.phase == TriggerPhase::Started;
            };
            if !config.accepts_action(ctx.action) {
                return false;
            }
            if !config.cooled_down(ctx.last_interaction, ctx.now) {
                return false;
            }
            if !ctx.hit().is_some_and(|h| config.within_range(h.distance)) {
                return false;
            }
            match config.signal_kind {
                SignalKind::Momentary => ctx.phase == TriggerPhase::Started,
                SignalKind::Held => {
                    ctx.phase == TriggerPhase::Ongoing
                        && !ctx.fired_this_hold
                        && ctx.held_for >= config.hold_time
                }
            }
        })
    }

    pub fn check(&self, ctx: &EligibilityContext<'_>) -> bool {
        (self.0)(ctx)
    }
}

/// Tracks the trigger currently held.
#[derive(Debug, Clone, PartialEq)]
struct Hold {
    action: ActionId,
    started_at: f32,
    fired: bool,
}

/// Focused target data the dispatcher needs from the target side.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetView<'a> {
    pub config: Option<&'a InteractionConfig>,
    pub last_interaction: Option<f32>,
}

/// A decided interaction, to be executed on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOrder {
    pub target: Entity,
    pub action: ActionId,
    pub hit: HitRecord,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionDispatcher {
    eligibility: Eligibility,
    hold: Option<Hold>,
}

impl InteractionDispatcher {
    pub fn new(eligibility: Eligibility) -> Self {
        Self {
            eligibility,
            hold: None,
        }
    }

    pub fn set_eligibility(&mut self, eligibility: Eligibility) {
        self.eligibility = eligibility;
    }

    /// Whether a hold is being tracked for `action`.
    pub fn is_holding(&self, action: &ActionId) -> bool {
        self.hold.as_ref().is_some_and(|h| &h.action == action)
    }

    /// Decide what `signal` does. Returns the interaction to run, if any.
    ///
    /// No focused target means no dispatch; this is not an error.
    pub fn on_trigger(
        &mut self,
        signal: &TriggerSignal,
        focus: &FocusState,
        target: TargetView<'_>,
        now: f32,
    ) -> Option<DispatchOrder> {
        match signal.phase {
            TriggerPhase::Started => {
                self.hold = Some(Hold {
                    action: signal.action.clone(),
                    started_at: now,
                    fired: false,
                });
            }
            TriggerPhase::Ongoing => {
                if !self.is_holding(&signal.action) {
                    // Ongoing without a tracked start (bound mid-hold).
                    self.hold = Some(Hold {
                        action: signal.action.clone(),
                        started_at: now,
                        fired: false,
                    });
                }
            }
            TriggerPhase::Canceled | TriggerPhase::Completed => {
                if self.is_holding(&signal.action) {
                    self.hold = None;
                }
                return None;
            }
        }

        let focused = focus.focused()?;
        let hit = *focus.last_hit()?;
        let (held_for, fired_this_hold) = self
            .hold
            .as_ref()
            .map(|h| ((now - h.started_at).max(0.0), h.fired))
            .unwrap_or((0.0, false));

        let ctx = EligibilityContext {
            phase: signal.phase,
            action: &signal.action,
            focus,
            config: target.config,
            last_interaction: target.last_interaction,
            now,
            held_for,
            fired_this_hold,
        };
        if !self.eligibility.check(&ctx) {
            return None;
        }

        if let Some(hold) = self.hold.as_mut() {
            hold.fired = true;
        }
        Some(DispatchOrder {
            target: focused,
            action: signal.action.clone(),
            hit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::focus::FocusTracker;
    use crate::systems::spatialquery::ProbeResult;
    use bevy_ecs::prelude::World;

    fn focused_on(blocking: bool) -> (FocusTracker, Entity) {
        let mut world = World::new();
        let target = world.spawn_empty().id();
        let mut tracker = FocusTracker::default();
        let mut hits = vec![HitRecord::new(Some(target), bevy_math::Vec3::ZERO, 2.0, blocking)];
        if !blocking {
            let wall = world.spawn_empty().id();
            hits.push(HitRecord::blocking(wall, 3.0));
        }
        tracker.update(&ProbeResult::from_hits(hits), |e| e == target);
        (tracker, target)
    }

    fn signal(phase: TriggerPhase) -> TriggerSignal {
        TriggerSignal::new("interact", phase)
    }

    #[test]
    fn started_while_focusing_dispatches_current_hit() {
        let (tracker, target) = focused_on(true);
        let mut d = InteractionDispatcher::default();
        let order = d
            .on_trigger(&signal(TriggerPhase::Started), tracker.state(), TargetView::default(), 0.0)
            .unwrap();
        assert_eq!(order.target, target);
        assert_eq!(order.hit.distance, 2.0);
        assert_eq!(order.action, ActionId::new("interact"));
    }

    #[test]
    fn repeated_starts_dispatch_independently() {
        let (tracker, _) = focused_on(true);
        let mut d = InteractionDispatcher::default();
        for t in 0..3 {
            assert!(
                d.on_trigger(&signal(TriggerPhase::Started), tracker.state(), TargetView::default(), t as f32)
                    .is_some()
            );
        }
    }

    #[test]
    fn other_phases_never_dispatch_with_default_strategy() {
        let (tracker, _) = focused_on(true);
        let mut d = InteractionDispatcher::default();
        for phase in [TriggerPhase::Ongoing, TriggerPhase::Canceled, TriggerPhase::Completed] {
            assert!(d.on_trigger(&signal(phase), tracker.state(), TargetView::default(), 1.0).is_none());
        }
    }

    #[test]
    fn no_focus_no_dispatch() {
        let tracker = FocusTracker::default();
        let mut d = InteractionDispatcher::default();
        assert!(
            d.on_trigger(&signal(TriggerPhase::Started), tracker.state(), TargetView::default(), 0.0)
                .is_none()
        );
    }

    #[test]
    fn focused_through_overlap_is_not_eligible() {
        let (tracker, _) = focused_on(false);
        let mut d = InteractionDispatcher::default();
        assert!(
            d.on_trigger(&signal(TriggerPhase::Started), tracker.state(), TargetView::default(), 0.0)
                .is_none()
        );
    }

    #[test]
    fn injected_strategy_can_refuse() {
        let (tracker, _) = focused_on(true);
        let mut d = InteractionDispatcher::new(Eligibility::new(|_| false));
        assert!(
            d.on_trigger(&signal(TriggerPhase::Started), tracker.state(), TargetView::default(), 0.0)
                .is_none()
        );
    }

    #[test]
    fn configured_respects_cooldown() {
        let (tracker, _) = focused_on(true);
        let config = InteractionConfig::momentary().with_cooldown(1.0);
        let mut d = InteractionDispatcher::new(Eligibility::configured());
        let view = |last| TargetView {
            config: Some(&config),
            last_interaction: last,
        };
        let start = signal(TriggerPhase::Started);
        assert!(d.on_trigger(&start, tracker.state(), view(None), 0.0).is_some());
        assert!(d.on_trigger(&start, tracker.state(), view(Some(0.0)), 0.5).is_none());
        assert!(d.on_trigger(&start, tracker.state(), view(Some(0.0)), 1.0).is_some());
    }

    #[test]
    fn configured_respects_range_override() {
        let (tracker, _) = focused_on(true);
        let near = InteractionConfig::momentary().with_detection_distance(1.0);
        let far = InteractionConfig::momentary().with_detection_distance(5.0);
        let mut d = InteractionDispatcher::new(Eligibility::configured());
        let start = signal(TriggerPhase::Started);
        let view = |config| TargetView {
            config: Some(config),
            last_interaction: None,
        };
        assert!(d.on_trigger(&start, tracker.state(), view(&near), 0.0).is_none());
        assert!(d.on_trigger(&start, tracker.state(), view(&far), 0.0).is_some());
    }

    #[test]
    fn configured_respects_required_action() {
        let (tracker, _) = focused_on(true);
        let config = InteractionConfig::momentary().with_required_action("open");
        let mut d = InteractionDispatcher::new(Eligibility::configured());
        let view = TargetView {
            config: Some(&config),
            last_interaction: None,
        };
        assert!(d.on_trigger(&signal(TriggerPhase::Started), tracker.state(), view, 0.0).is_none());
        let open = TriggerSignal::started("open");
        assert!(d.on_trigger(&open, tracker.state(), view, 0.0).is_some());
    }

    #[test]
    fn held_target_fires_once_after_hold_time() {
        let (tracker, _) = focused_on(true);
        let config = InteractionConfig::held(0.5);
        let mut d = InteractionDispatcher::new(Eligibility::configured());
        let view = TargetView {
            config: Some(&config),
            last_interaction: None,
        };
        let s = tracker.state();
        assert!(d.on_trigger(&signal(TriggerPhase::Started), s, view, 0.0).is_none());
        assert!(d.on_trigger(&signal(TriggerPhase::Ongoing), s, view, 0.25).is_none());
        assert!(d.on_trigger(&signal(TriggerPhase::Ongoing), s, view, 0.5).is_some());
        assert!(d.on_trigger(&signal(TriggerPhase::Ongoing), s, view, 0.75).is_none());
        assert!(d.on_trigger(&signal(TriggerPhase::Completed), s, view, 1.0).is_none());
        assert!(!d.is_holding(&ActionId::new("interact")));

        // A fresh hold may fire again.
        assert!(d.on_trigger(&signal(TriggerPhase::Started), s, view, 2.0).is_none());
        assert!(d.on_trigger(&signal(TriggerPhase::Ongoing), s, view, 2.5).is_some());
    }

    #[test]
    fn canceled_hold_never_fires() {
        let (tracker, _) = focused_on(true);
        let config = InteractionConfig::held(0.5);
        let mut d = InteractionDispatcher::new(Eligibility::configured());
        let view = TargetView {
            config: Some(&config),
            last_interaction: None,
        };
        let s = tracker.state();
        d.on_trigger(&signal(TriggerPhase::Started), s, view, 0.0);
        assert!(d.on_trigger(&signal(TriggerPhase::Canceled), s, view, 0.3).is_none());
        assert!(!d.is_holding(&ActionId::new("interact")));
    }
}
