//! Engine systems.
//!
//! Submodules overview
//! - [`activation`] – auto-activation and the detection toggle observer
//! - [`debugdraw`] – expire recorded debug shapes
//! - [`input`] – turn input edges into trigger signals
//! - [`interaction`] – dispatch trigger signals to focused targets
//! - [`scan`] – periodic probes feeding the focus trackers
//! - [`simulation`] – run conditions on the simulation state
//! - [`spatialquery`] – shape casts and the probe operation
//! - [`time`] – update simulation time and delta

pub mod activation;
pub mod debugdraw;
pub mod input;
pub mod interaction;
pub mod scan;
pub mod simulation;
pub mod spatialquery;
pub mod time;
