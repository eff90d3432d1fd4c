//! ECS resources made available to systems.
//!
//! Overview
//! - `debugdraw` – debug shapes recorded by probes, with lifetimes
//! - `debugmode` – presence forces debug traces and verbose logs
//! - `input` – per-frame state of the bound input actions
//! - `shapecastbackend` – optional replacement for the built-in shape caster
//! - `simulation` – editor/running/paused state gating scans and dispatch
//! - `worldtime` – simulation time and delta
pub mod debugdraw;
pub mod debugmode;
pub mod input;
pub mod shapecastbackend;
pub mod simulation;
pub mod worldtime;
