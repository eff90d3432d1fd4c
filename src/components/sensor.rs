//! Designated sensor (e.g. a first-person camera) mounted on an agent.
//!
//! The pose is local to the owning entity's
//! [`Transform3d`](crate::components::transform3d::Transform3d); traces that
//! start from [`TraceOrigin::Sensor`](crate::components::scanconfig::TraceOrigin)
//! use the composed world pose.
use bevy_ecs::prelude::Component;
use bevy_math::{Quat, Vec3};

use crate::components::transform3d::Transform3d;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Sensor {
    pub local: Transform3d,
}

impl Sensor {
    pub fn new(offset: Vec3) -> Self {
        Self {
            local: Transform3d::from_position(offset),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.local.rotation = rotation;
        self
    }

    /// Pitch the sensor up (positive) or down (negative), in degrees.
    pub fn with_pitch(mut self, pitch_degrees: f32) -> Self {
        self.local.rotation = Quat::from_rotation_x(pitch_degrees.to_radians());
        self
    }

    pub fn world_pose(&self, owner: &Transform3d) -> Transform3d {
        owner.mul_transform(&self.local)
    }
}
