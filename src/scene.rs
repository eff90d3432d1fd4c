//! Data-driven demo scenes.
//!
//! A scene file describes one interactor, the targets around it and a
//! timeline of scripted inputs. [`SceneDescription::spawn`] builds the
//! entities, [`SceneDescription::apply_frame`] plays the timeline entries of
//! one frame.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "agent": {
//!     "position": [0.0, 0.0, 0.0],
//!     "sensor": { "offset": [0.0, 160.0, 0.0] },
//!     "actions": ["interact"],
//!     "scan": { "interval": 0.1, "distance": 300.0, "shape": "sphere", "size": 10.0 }
//!   },
//!   "targets": [
//!     {
//!       "name": "door",
//!       "position": [0.0, 160.0, -250.0],
//!       "shape": { "cuboid": { "half_extents": [50.0, 100.0, 5.0] } },
//!       "interactable": { "cooldown": 1.0 }
//!     }
//!   ],
//!   "timeline": [
//!     { "frame": 0, "op": "set_simulation", "state": "running" },
//!     { "frame": 10, "op": "press", "action": "interact" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::collider::{Collider, ColliderShape, CollisionChannel, CollisionResponse};
use crate::components::dispatcher::Eligibility;
use crate::components::interactable::Interactable;
use crate::components::interactionconfig::InteractionConfig;
use crate::components::interactor::Interactor;
use crate::components::label::Label;
use crate::components::scanconfig::{
    BlockerPolicy, ScanConfig, TraceDirection, TraceOrigin, TraceShape,
};
use crate::components::sensor::Sensor;
use crate::components::transform3d::Transform3d;
use crate::events::detection::ToggleFocusDetectionEvent;
use crate::resources::input::InputState;
use crate::resources::simulation::{SimulationState, SimulationStates};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown collision channel '{0}'")]
    UnknownChannel(String),
    #[error("duplicate target name '{0}'")]
    DuplicateTarget(String),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SceneDescription {
    pub agent: AgentDesc,
    #[serde(default)]
    pub targets: Vec<TargetDesc>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AgentDesc {
    #[serde(default = "default_agent_name")]
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub sensor: Option<SensorDesc>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default = "default_true")]
    pub auto_activate: bool,
    #[serde(default)]
    pub scan: ScanDesc,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SensorDesc {
    pub offset: [f32; 3],
    #[serde(default)]
    pub pitch: f32,
}

/// Scan overrides; absent fields keep [`ScanConfig`] defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScanDesc {
    pub interval: Option<f32>,
    pub distance: Option<f32>,
    pub shape: Option<TraceShape>,
    pub size: Option<f32>,
    pub origin: Option<TraceOrigin>,
    pub direction: Option<TraceDirection>,
    pub channel: Option<String>,
    pub blockers: Option<BlockerPolicy>,
    pub eligibility: EligibilityKind,
    pub verbose: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityKind {
    #[default]
    FocusOnly,
    Configured,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TargetDesc {
    pub name: String,
    pub position: [f32; 3],
    pub shape: ColliderShape,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub response: CollisionResponse,
    /// Present for interactable targets; plain blockers omit it.
    #[serde(default)]
    pub interactable: Option<InteractionConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub frame: u64,
    #[serde(flatten)]
    pub op: TimelineOp,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TimelineOp {
    Turn { yaw: f32, #[serde(default)] pitch: f32 },
    MoveTo { position: [f32; 3] },
    Press { action: String },
    Release { action: String },
    Cancel { action: String },
    Detection { active: bool },
    SetSimulation { state: SimulationStateDesc },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStateDesc {
    Editor,
    Running,
    Paused,
}

impl From<SimulationStateDesc> for SimulationStates {
    fn from(value: SimulationStateDesc) -> Self {
        match value {
            SimulationStateDesc::Editor => SimulationStates::Editor,
            SimulationStateDesc::Running => SimulationStates::Running,
            SimulationStateDesc::Paused => SimulationStates::Paused,
        }
    }
}

/// Entities created by [`SceneDescription::spawn`].
#[derive(Debug, Clone)]
pub struct SpawnedScene {
    pub agent: Entity,
    pub targets: FxHashMap<String, Entity>,
}

fn default_agent_name() -> String {
    "agent".to_string()
}

fn default_true() -> bool {
    true
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

fn parse_channels(names: &[String]) -> Result<u32, SceneError> {
    names.iter().try_fold(0, |mask, name| {
        CollisionChannel::from_name(name)
            .map(|bits| mask | bits)
            .ok_or_else(|| SceneError::UnknownChannel(name.clone()))
    })
}

impl SceneDescription {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The interactor's scan config with the scene overrides applied.
    pub fn scan_config(&self) -> Result<ScanConfig, SceneError> {
        let scan = &self.agent.scan;
        let mut config = ScanConfig::new().with_verbose(scan.verbose);
        if let Some(v) = scan.interval {
            config = config.with_interval(v);
        }
        if let Some(v) = scan.distance {
            config = config.with_distance(v);
        }
        if scan.shape.is_some() || scan.size.is_some() {
            let shape = scan.shape.unwrap_or(config.shape);
            let size = scan.size.unwrap_or(config.size);
            config = config.with_shape(shape, size);
        }
        if let Some(v) = scan.origin {
            config = config.with_origin(v);
        }
        if let Some(v) = scan.direction {
            config = config.with_direction(v);
        }
        if let Some(name) = &scan.channel {
            let channel = CollisionChannel::parse_mask(name)
                .ok_or_else(|| SceneError::UnknownChannel(name.clone()))?;
            config = config.with_channel(channel);
        }
        if let Some(v) = scan.blockers {
            config = config.with_blockers(v);
        }
        Ok(config)
    }

    /// Spawn the agent and targets. Targets get logging handlers.
    pub fn spawn(&self, world: &mut World, base: ScanConfig) -> Result<SpawnedScene, SceneError> {
        let config = self.merge_scan(base)?;
        let eligibility = match self.agent.scan.eligibility {
            EligibilityKind::FocusOnly => Eligibility::focus_only(),
            EligibilityKind::Configured => Eligibility::configured(),
        };
        let mut interactor = Interactor::new(config)
            .with_eligibility(eligibility)
            .with_auto_activate(self.agent.auto_activate);
        for action in &self.agent.actions {
            interactor = interactor.bind_action(action.as_str());
        }

        let agent_desc = &self.agent;
        let transform = Transform3d::from_position(vec3(agent_desc.position))
            .with_yaw_pitch(agent_desc.yaw, agent_desc.pitch);
        let mut agent = world.spawn((Label::new(agent_desc.name.clone()), transform, interactor));
        if let Some(sensor) = &agent_desc.sensor {
            agent.insert(Sensor::new(vec3(sensor.offset)).with_pitch(sensor.pitch));
        }
        let agent = agent.id();

        let mut targets = FxHashMap::default();
        for desc in &self.targets {
            if targets.contains_key(&desc.name) {
                return Err(SceneError::DuplicateTarget(desc.name.clone()));
            }
            let channels = if desc.channels.is_empty() {
                CollisionChannel::ALL
            } else {
                parse_channels(&desc.channels)?
            };
            let collider = Collider {
                shape: desc.shape,
                offset: Vec3::ZERO,
                channels,
                response: desc.response,
            };
            let mut target = world.spawn((
                Label::new(desc.name.clone()),
                Transform3d::from_position(vec3(desc.position)),
                collider,
            ));
            if let Some(config) = &desc.interactable {
                target.insert(logging_interactable(&desc.name, config.clone()));
            }
            targets.insert(desc.name.clone(), target.id());
        }

        info!(
            "Spawned scene: agent {:?}, {} target(s), {} timeline entries",
            agent,
            targets.len(),
            self.timeline.len()
        );
        Ok(SpawnedScene { agent, targets })
    }

    /// Scene overrides on top of `base` (for example a config file).
    fn merge_scan(&self, base: ScanConfig) -> Result<ScanConfig, SceneError> {
        let overrides = self.scan_config()?;
        let scan = &self.agent.scan;
        let mut config = base;
        if scan.interval.is_some() {
            config.interval = overrides.interval;
        }
        if scan.distance.is_some() {
            config.distance = overrides.distance;
        }
        if scan.shape.is_some() {
            config.shape = overrides.shape;
        }
        if scan.size.is_some() {
            config.size = overrides.size;
        }
        if scan.origin.is_some() {
            config.origin = overrides.origin;
        }
        if scan.direction.is_some() {
            config.direction = overrides.direction;
        }
        if scan.channel.is_some() {
            config.channel = overrides.channel;
        }
        if scan.blockers.is_some() {
            config.blockers = overrides.blockers;
        }
        config.verbose |= overrides.verbose;
        Ok(config.clamped())
    }

    /// Apply the timeline entries scheduled for `frame`.
    pub fn apply_frame(&self, world: &mut World, scene: &SpawnedScene, frame: u64) {
        for entry in self.timeline.iter().filter(|e| e.frame == frame) {
            apply_op(world, scene.agent, &entry.op);
        }
    }

    /// Last frame with a timeline entry.
    pub fn last_frame(&self) -> u64 {
        self.timeline.iter().map(|e| e.frame).max().unwrap_or(0)
    }
}

fn apply_op(world: &mut World, agent: Entity, op: &TimelineOp) {
    match op {
        TimelineOp::Turn { yaw, pitch } => {
            if let Some(mut t) = world.get_mut::<Transform3d>(agent) {
                *t = Transform3d::from_position(t.position).with_yaw_pitch(*yaw, *pitch);
            }
        }
        TimelineOp::MoveTo { position } => {
            if let Some(mut t) = world.get_mut::<Transform3d>(agent) {
                t.position = vec3(*position);
            }
        }
        TimelineOp::Press { action } => {
            world.resource_mut::<InputState>().set_pressed(action.as_str(), true);
        }
        TimelineOp::Release { action } => {
            world.resource_mut::<InputState>().set_pressed(action.as_str(), false);
        }
        TimelineOp::Cancel { action } => {
            world.resource_mut::<InputState>().cancel(action.as_str());
        }
        TimelineOp::Detection { active } => {
            world.trigger(ToggleFocusDetectionEvent {
                interactor: agent,
                activate: *active,
            });
        }
        TimelineOp::SetSimulation { state } => {
            world
                .get_resource_or_insert_with(SimulationState::new)
                .set((*state).into());
            info!("Simulation state: {:?}", state);
        }
    }
}

fn logging_interactable(name: &str, config: InteractionConfig) -> Interactable {
    let focus_name = name.to_string();
    let interact_name = name.to_string();
    Interactable::new()
        .with_config(config)
        .on_focus(move |notice| {
            if notice.focused {
                info!("[{}] highlighted", focus_name);
            } else {
                info!("[{}] highlight removed", focus_name);
            }
        })
        .on_interact(move |ctx| {
            if ctx.action.as_str().is_empty() {
                warn!("[{}] interaction without action", interact_name);
                return Err("empty action".to_string());
            }
            info!(
                "[{}] used with '{}' at distance {:.1}",
                interact_name, ctx.action, ctx.hit.distance
            );
            Ok(())
        })
}
