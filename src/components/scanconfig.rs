//! Focus scan configuration.
//!
//! Describes how an [`Interactor`](crate::components::interactor::Interactor)
//! probes the world: how often, how far, with which volume, from which
//! origin and along which direction. Values are plain data set up before the
//! simulation starts; the only validation is clamping to the minimums below.
//!
//! # Configuration File Format
//!
//! ```ini
//! [scan]
//! interval = 0.1
//! distance = 200.0
//! size = 20.0
//! shape = sphere
//!
//! [trace]
//! origin = sensor
//! direction = forward
//! offset_x = 0.0
//! offset_y = 0.0
//! offset_z = 0.0
//! channel = visibility
//! blockers = keep_focus
//!
//! [debug]
//! trace = none
//! verbose = false
//! ```
//!
//! `channel` also accepts combined masks such as `visibility|interaction` or
//! raw numbers (`0x10`).

use std::path::Path;
use std::str::FromStr;

use bevy_ecs::prelude::Entity;
use bevy_math::Vec3;
use configparser::ini::Ini;
use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::components::collider::CollisionChannel;

pub const MIN_INTERVAL: f32 = 0.01;
pub const MIN_DISTANCE: f32 = 10.0;
pub const MIN_SIZE: f32 = 1.0;

const DEFAULT_INTERVAL: f32 = 0.1;
const DEFAULT_DISTANCE: f32 = 200.0;
const DEFAULT_SIZE: f32 = 20.0;

/// Where a trace starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOrigin {
    /// The agent's own transform.
    AgentAnchor,
    /// The agent's [`Sensor`](crate::components::sensor::Sensor).
    #[default]
    Sensor,
}

/// Canonical trace direction relative to the origin's basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceDirection {
    #[default]
    Forward,
    Backward,
    Right,
    Left,
    Up,
    Down,
}

/// Volume swept along the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceShape {
    Line,
    #[default]
    Sphere,
    Capsule,
}

/// Lifetime of the debug shapes a probe records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DebugTrace {
    #[default]
    None,
    ForOneFrame,
    ForDuration(f32),
    Persistent,
}

/// What a scan does when it reports blocking hits but none of them carries
/// an interactable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerPolicy {
    /// Leave the current focus untouched.
    #[default]
    KeepFocus,
    /// Treat the scan like a miss and clear the focus.
    ClearFocus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Seconds between scans.
    pub interval: f32,
    /// Maximum trace distance.
    pub distance: f32,
    /// Sphere/capsule radius. Ignored for lines.
    pub size: f32,
    pub shape: TraceShape,
    pub origin: TraceOrigin,
    pub direction: TraceDirection,
    /// Added to the origin's world position before tracing.
    pub offset: Vec3,
    /// Channel bits; colliders that do not respond to any of them are invisible.
    pub channel: u32,
    /// Entities never reported. The probing agent is always excluded as well.
    pub ignore: FxHashSet<Entity>,
    pub blockers: BlockerPolicy,
    pub debug_trace: DebugTrace,
    /// Emit a diagnostic line per transition.
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            distance: DEFAULT_DISTANCE,
            size: DEFAULT_SIZE,
            shape: TraceShape::Sphere,
            origin: TraceOrigin::Sensor,
            direction: TraceDirection::Forward,
            offset: Vec3::ZERO,
            channel: CollisionChannel::VISIBILITY,
            ignore: FxHashSet::default(),
            blockers: BlockerPolicy::KeepFocus,
            debug_trace: DebugTrace::None,
            verbose: false,
        }
    }

    pub fn with_interval(mut self, interval: f32) -> Self {
        self.interval = interval;
        self.clamped()
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self.clamped()
    }

    pub fn with_shape(mut self, shape: TraceShape, size: f32) -> Self {
        self.shape = shape;
        self.size = size;
        self.clamped()
    }

    pub fn with_origin(mut self, origin: TraceOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_direction(mut self, direction: TraceDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_channel(mut self, channel: u32) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_blockers(mut self, blockers: BlockerPolicy) -> Self {
        self.blockers = blockers;
        self
    }

    pub fn with_debug_trace(mut self, debug_trace: DebugTrace) -> Self {
        self.debug_trace = debug_trace;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn ignoring(mut self, entity: Entity) -> Self {
        self.ignore.insert(entity);
        self
    }

    /// Clamp numeric fields to their minimums. NaN falls back to the minimum.
    pub fn clamped(mut self) -> Self {
        self.interval = clamp_min(self.interval, MIN_INTERVAL);
        self.distance = clamp_min(self.distance, MIN_DISTANCE);
        self.size = clamp_min(self.size, MIN_SIZE);
        self
    }

    /// Load values from an INI file. Missing keys keep their current values.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(path.as_ref())
            .map_err(|e| format!("Failed to load scan config file: {}", e))?;
        self.apply_ini(&ini)
    }

    /// Load values from INI text. Missing keys keep their current values.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| format!("Failed to parse scan config: {}", e))?;
        self.apply_ini(&ini)
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<(), String> {
        // [scan]
        if let Some(v) = ini.getfloat("scan", "interval")? {
            self.interval = v as f32;
        }
        if let Some(v) = ini.getfloat("scan", "distance")? {
            self.distance = v as f32;
        }
        if let Some(v) = ini.getfloat("scan", "size")? {
            self.size = v as f32;
        }
        if let Some(v) = ini.get("scan", "shape") {
            self.shape = v.parse()?;
        }

        // [trace]
        if let Some(v) = ini.get("trace", "origin") {
            self.origin = v.parse()?;
        }
        if let Some(v) = ini.get("trace", "direction") {
            self.direction = v.parse()?;
        }
        if let Some(v) = ini.getfloat("trace", "offset_x")? {
            self.offset.x = v as f32;
        }
        if let Some(v) = ini.getfloat("trace", "offset_y")? {
            self.offset.y = v as f32;
        }
        if let Some(v) = ini.getfloat("trace", "offset_z")? {
            self.offset.z = v as f32;
        }
        if let Some(v) = ini.get("trace", "channel") {
            self.channel = CollisionChannel::parse_mask(&v)
                .ok_or_else(|| format!("Unknown collision channel '{}'", v))?;
        }
        if let Some(v) = ini.get("trace", "blockers") {
            self.blockers = v.parse()?;
        }

        // [debug]
        if let Some(v) = ini.get("debug", "trace") {
            self.debug_trace = v.parse()?;
        }
        if let Some(v) = ini.getbool("debug", "verbose")? {
            self.verbose = v;
        }

        *self = self.clone().clamped();

        info!(
            "Loaded scan config: interval={}s distance={} shape={:?}({}) origin={:?} direction={:?}",
            self.interval, self.distance, self.shape, self.size, self.origin, self.direction
        );
        Ok(())
    }

    /// Save the persisted fields to an INI file. The ignore set is runtime-only.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let mut ini = Ini::new();

        // [scan]
        ini.set("scan", "interval", Some(self.interval.to_string()));
        ini.set("scan", "distance", Some(self.distance.to_string()));
        ini.set("scan", "size", Some(self.size.to_string()));
        ini.set("scan", "shape", Some(self.shape.name().to_string()));

        // [trace]
        ini.set("trace", "origin", Some(self.origin.name().to_string()));
        ini.set("trace", "direction", Some(self.direction.name().to_string()));
        ini.set("trace", "offset_x", Some(self.offset.x.to_string()));
        ini.set("trace", "offset_y", Some(self.offset.y.to_string()));
        ini.set("trace", "offset_z", Some(self.offset.z.to_string()));
        ini.set("trace", "channel", Some(CollisionChannel::mask_name(self.channel)));
        ini.set("trace", "blockers", Some(self.blockers.name().to_string()));

        // [debug]
        ini.set("debug", "trace", Some(self.debug_trace.to_string()));
        ini.set("debug", "verbose", Some(self.verbose.to_string()));

        ini.write(path.as_ref())
            .map_err(|e| format!("Failed to save scan config file: {}", e))?;

        info!("Saved scan config to {:?}", path.as_ref());
        Ok(())
    }
}

fn clamp_min(value: f32, min: f32) -> f32 {
    if value.is_nan() { min } else { value.max(min) }
}

impl TraceShape {
    pub fn name(&self) -> &'static str {
        match self {
            TraceShape::Line => "line",
            TraceShape::Sphere => "sphere",
            TraceShape::Capsule => "capsule",
        }
    }
}

impl FromStr for TraceShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "ray" => Ok(TraceShape::Line),
            "sphere" => Ok(TraceShape::Sphere),
            "capsule" => Ok(TraceShape::Capsule),
            other => Err(format!("Unknown trace shape '{}'", other)),
        }
    }
}

impl TraceOrigin {
    pub fn name(&self) -> &'static str {
        match self {
            TraceOrigin::AgentAnchor => "agent",
            TraceOrigin::Sensor => "sensor",
        }
    }
}

impl FromStr for TraceOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" | "agent_anchor" | "player_center" => Ok(TraceOrigin::AgentAnchor),
            "sensor" | "camera" => Ok(TraceOrigin::Sensor),
            other => Err(format!("Unknown trace origin '{}'", other)),
        }
    }
}

impl TraceDirection {
    pub fn name(&self) -> &'static str {
        match self {
            TraceDirection::Forward => "forward",
            TraceDirection::Backward => "backward",
            TraceDirection::Right => "right",
            TraceDirection::Left => "left",
            TraceDirection::Up => "up",
            TraceDirection::Down => "down",
        }
    }
}

impl FromStr for TraceDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(TraceDirection::Forward),
            "backward" => Ok(TraceDirection::Backward),
            "right" => Ok(TraceDirection::Right),
            "left" => Ok(TraceDirection::Left),
            "up" => Ok(TraceDirection::Up),
            "down" => Ok(TraceDirection::Down),
            other => Err(format!("Unknown trace direction '{}'", other)),
        }
    }
}

impl BlockerPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            BlockerPolicy::KeepFocus => "keep_focus",
            BlockerPolicy::ClearFocus => "clear_focus",
        }
    }
}

impl FromStr for BlockerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep_focus" | "keep" => Ok(BlockerPolicy::KeepFocus),
            "clear_focus" | "clear" => Ok(BlockerPolicy::ClearFocus),
            other => Err(format!("Unknown blocker policy '{}'", other)),
        }
    }
}

impl std::fmt::Display for DebugTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebugTrace::None => write!(f, "none"),
            DebugTrace::ForOneFrame => write!(f, "one_frame"),
            DebugTrace::ForDuration(secs) => write!(f, "duration:{}", secs),
            DebugTrace::Persistent => write!(f, "persistent"),
        }
    }
}

impl FromStr for DebugTrace {
    type Err = String;

    /// Accepts `none`, `one_frame`, `persistent` and `duration:<seconds>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(secs) = s.strip_prefix("duration:") {
            let secs: f32 = secs
                .trim()
                .parse()
                .map_err(|_| format!("Invalid debug trace duration '{}'", secs))?;
            return Ok(DebugTrace::ForDuration(secs.max(0.0)));
        }
        match s.as_str() {
            "none" => Ok(DebugTrace::None),
            "one_frame" => Ok(DebugTrace::ForOneFrame),
            "persistent" => Ok(DebugTrace::Persistent),
            other => Err(format!("Unknown debug trace mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_detection_setup() {
        let c = ScanConfig::default();
        assert_eq!(c.interval, 0.1);
        assert_eq!(c.distance, 200.0);
        assert_eq!(c.size, 20.0);
        assert_eq!(c.shape, TraceShape::Sphere);
        assert_eq!(c.origin, TraceOrigin::Sensor);
        assert_eq!(c.direction, TraceDirection::Forward);
        assert_eq!(c.channel, CollisionChannel::VISIBILITY);
        assert!(c.ignore.is_empty());
        assert_eq!(c.blockers, BlockerPolicy::KeepFocus);
    }

    #[test]
    fn builders_clamp_to_minimums() {
        let c = ScanConfig::new()
            .with_interval(0.0)
            .with_distance(-5.0)
            .with_shape(TraceShape::Capsule, f32::NAN);
        assert_eq!(c.interval, MIN_INTERVAL);
        assert_eq!(c.distance, MIN_DISTANCE);
        assert_eq!(c.size, MIN_SIZE);
    }

    #[test]
    fn load_from_str_overrides_present_keys_only() {
        let mut c = ScanConfig::new();
        c.load_from_str(
            "[scan]\ninterval = 0.25\nshape = line\n\n[trace]\norigin = agent\ndirection = down\noffset_y = 1.5\nchannel = interaction\nblockers = clear_focus\n\n[debug]\ntrace = duration:2.5\nverbose = true\n",
        )
        .unwrap();
        assert_eq!(c.interval, 0.25);
        assert_eq!(c.distance, 200.0);
        assert_eq!(c.shape, TraceShape::Line);
        assert_eq!(c.origin, TraceOrigin::AgentAnchor);
        assert_eq!(c.direction, TraceDirection::Down);
        assert_eq!(c.offset, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(c.channel, CollisionChannel::INTERACTION);
        assert_eq!(c.blockers, BlockerPolicy::ClearFocus);
        assert_eq!(c.debug_trace, DebugTrace::ForDuration(2.5));
        assert!(c.verbose);
    }

    #[test]
    fn load_from_str_clamps_values() {
        let mut c = ScanConfig::new();
        c.load_from_str("[scan]\ninterval = 0.001\ndistance = 1\n").unwrap();
        assert_eq!(c.interval, MIN_INTERVAL);
        assert_eq!(c.distance, MIN_DISTANCE);
    }

    #[test]
    fn load_from_str_rejects_unknown_names() {
        let mut c = ScanConfig::new();
        assert!(c.load_from_str("[scan]\nshape = cone\n").is_err());
        assert!(c.load_from_str("[trace]\nchannel = water\n").is_err());
    }

    #[test]
    fn save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.ini");
        let saved = ScanConfig::new()
            .with_interval(0.5)
            .with_shape(TraceShape::Capsule, 4.0)
            .with_origin(TraceOrigin::AgentAnchor)
            .with_debug_trace(DebugTrace::Persistent);
        saved.save_to_file(&path).unwrap();

        let mut loaded = ScanConfig::new();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn combined_channel_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.ini");
        let saved = ScanConfig::new()
            .with_channel(CollisionChannel::VISIBILITY | CollisionChannel::INTERACTION);
        saved.save_to_file(&path).unwrap();

        let mut loaded = ScanConfig::new();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(
            loaded.channel,
            CollisionChannel::VISIBILITY | CollisionChannel::INTERACTION
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut c = ScanConfig::new();
        assert!(c.load_from_file("./does-not-exist.ini").is_err());
    }
}
