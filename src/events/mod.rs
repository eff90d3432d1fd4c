//! Event types and observers used by the engine.
//!
//! Submodules:
//! - [`detection`] – start or stop an interactor's periodic scans
//! - [`focus`] – a target gained or lost an interactor's focus
//! - [`interaction`] – an interaction was dispatched to a target
//! - [`switchdebug`] – toggle debug traces and diagnostics on/off
//! - [`trigger`] – input action phases driving the dispatch
pub mod detection;
pub mod focus;
pub mod interaction;
pub mod switchdebug;
pub mod trigger;
