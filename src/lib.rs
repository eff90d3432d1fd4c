//! Focus detection and interaction dispatch for 3D agents.
//!
//! An agent carrying an [`Interactor`](components::interactor::Interactor)
//! periodically probes the world along a configurable trace, keeps track of
//! the single interactable it is looking at and, when a bound input action
//! fires, interacts with that target.
//!
//! The crate exposes its ECS components, resources, systems and events for
//! use by a host application and in integration tests. [`engine`] wires them
//! into a `World`; [`scene`] loads the data-driven demo scenes.

pub mod components;
pub mod engine;
pub mod events;
pub mod resources;
pub mod scene;
pub mod systems;
