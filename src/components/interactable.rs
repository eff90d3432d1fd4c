//! Target side of the focus-and-interact protocol.
//!
//! An entity becomes a focus candidate by carrying [`Interactable`]. The
//! component receives focus notifications and interaction invocations from
//! the engine and forwards each to a single handler closure owned by the
//! component.
//!
//! Handlers are fire-and-forget from the engine's point of view: focus
//! handlers return nothing, interaction handlers report failure as
//! `Err(String)`, which is logged and never rolled back.
//!
//! # Example
//!
//! ```ignore
//! commands.spawn((
//!     Transform3d::new(0.0, 1.0, -3.0),
//!     Collider::sphere(0.5),
//!     Interactable::new()
//!         .with_config(InteractionConfig::momentary().with_cooldown(1.0))
//!         .on_focus(|notice| println!("focused: {}", notice.focused))
//!         .on_interact(|ctx| {
//!             println!("{:?} used by {:?}", ctx.target, ctx.interactor);
//!             Ok(())
//!         }),
//! ));
//! ```

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::interactionconfig::InteractionConfig;
use crate::events::trigger::ActionId;
use crate::systems::spatialquery::HitRecord;

/// Delivered to the focus handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusNotice {
    pub target: Entity,
    pub interactor: Entity,
    pub focused: bool,
}

/// Delivered to the interaction handler.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionContext {
    pub target: Entity,
    pub interactor: Entity,
    pub action: ActionId,
    pub hit: HitRecord,
}

pub type FocusHandler = Arc<dyn Fn(&FocusNotice) + Send + Sync>;
pub type InteractHandler = Arc<dyn Fn(&InteractionContext) -> Result<(), String> + Send + Sync>;

#[derive(Component, Clone, Default)]
pub struct Interactable {
    pub config: Option<InteractionConfig>,
    /// Log focus changes and interactions at debug level.
    pub verbose: bool,
    focused: bool,
    last_interaction: Option<f32>,
    interactions: u32,
    on_focus: Option<FocusHandler>,
    on_interact: Option<InteractHandler>,
}

impl fmt::Debug for Interactable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interactable")
            .field("config", &self.config)
            .field("focused", &self.focused)
            .field("last_interaction", &self.last_interaction)
            .field("interactions", &self.interactions)
            .field("on_focus", &self.on_focus.is_some())
            .field("on_interact", &self.on_interact.is_some())
            .finish()
    }
}

impl Interactable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: InteractionConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn on_focus(mut self, handler: impl Fn(&FocusNotice) + Send + Sync + 'static) -> Self {
        self.on_focus = Some(Arc::new(handler));
        self
    }

    pub fn on_interact(
        mut self,
        handler: impl Fn(&InteractionContext) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.on_interact = Some(Arc::new(handler));
        self
    }

    /// Presentation state: whether an interactor currently focuses this target.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// World time of the last interaction, if any.
    pub fn last_interaction(&self) -> Option<f32> {
        self.last_interaction
    }

    pub fn interaction_count(&self) -> u32 {
        self.interactions
    }

    /// Record a focus change and forward it to the focus handler.
    pub fn set_focus(&mut self, notice: &FocusNotice) {
        self.focused = notice.focused;
        if self.verbose {
            if notice.focused {
                debug!("{:?} gained focus from {:?}", notice.target, notice.interactor);
            } else {
                debug!("{:?} lost focus from {:?}", notice.target, notice.interactor);
            }
        }
        if let Some(handler) = &self.on_focus {
            handler(notice);
        }
    }

    /// Run the interaction handler. The interaction is stamped at `now`
    /// whatever the handler returns.
    pub fn interact(&mut self, ctx: &InteractionContext, now: f32) -> Result<(), String> {
        self.last_interaction = Some(now);
        self.interactions += 1;
        if self.verbose {
            debug!(
                "{:?} interacted by {:?} with '{}'",
                ctx.target, ctx.interactor, ctx.action
            );
        }
        let Some(handler) = &self.on_interact else {
            return Ok(());
        };
        let outcome = handler(ctx);
        if let Err(e) = &outcome {
            warn!("Interaction handler on {:?} failed: {}", ctx.target, e);
        }
        outcome
    }
}
