//! World-space pose of an entity.
//!
//! Basis convention follows `bevy_math`: forward is `-Z`, right is `+X` and
//! up is `+Y`, all rotated by [`Transform3d::rotation`].
use bevy_ecs::prelude::Component;
use bevy_math::{Quat, Vec3};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform3d {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform3d {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotation built from yaw (around `+Y`) then pitch (around local `+X`), in degrees.
    pub fn with_yaw_pitch(mut self, yaw_degrees: f32, pitch_degrees: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw_degrees.to_radians())
            * Quat::from_rotation_x(pitch_degrees.to_radians());
        self
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a point given in this pose's local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Compose a child pose expressed relative to this one.
    pub fn mul_transform(&self, child: &Transform3d) -> Transform3d {
        Transform3d {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
        }
    }
}
