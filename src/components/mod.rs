//! ECS components for entities.
//!
//! Submodules overview:
//! - [`collider`] – collision volume, channels and block/overlap response
//! - [`dispatcher`] – trigger signal to interaction decision, with pluggable eligibility
//! - [`focus`] – single-target focus state machine
//! - [`interactable`] – target side of the protocol with focus/interaction handlers
//! - [`interactionconfig`] – per-target cooldown, range and signal requirements
//! - [`interactor`] – agent side of the protocol bundling scan, focus and dispatch
//! - [`label`] – human readable name for diagnostics
//! - [`scanconfig`] – trace shape, origin, direction and scan pacing settings
//! - [`scanscheduler`] – repeating timer that paces the scans
//! - [`sensor`] – sensor pose mounted on an agent
//! - [`transform3d`] – world pose (position and rotation)

pub mod collider;
pub mod dispatcher;
pub mod focus;
pub mod interactable;
pub mod interactionconfig;
pub mod interactor;
pub mod label;
pub mod scanconfig;
pub mod scanscheduler;
pub mod sensor;
pub mod transform3d;
