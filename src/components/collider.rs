//! Collision volume used by the built-in shape caster.
//!
//! Volumes are axis-aligned in world space: a [`ColliderShape::Cuboid`] ignores
//! the owner's rotation, only the local `offset` is rotated. Each collider
//! responds to a set of [`CollisionChannel`] bits and either blocks a cast or
//! lets it pass through while still being reported (overlap).
use bevy_ecs::prelude::Component;
use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

/// Named collision channel masks.
pub struct CollisionChannel;

impl CollisionChannel {
    pub const VISIBILITY: u32 = 1 << 0;
    pub const CAMERA: u32 = 1 << 1;
    pub const INTERACTION: u32 = 1 << 2;
    pub const ALL: u32 = u32::MAX;

    /// Parse a channel name as used by config and scene files.
    pub fn from_name(name: &str) -> Option<u32> {
        match name.trim().to_ascii_lowercase().as_str() {
            "visibility" => Some(Self::VISIBILITY),
            "camera" => Some(Self::CAMERA),
            "interaction" => Some(Self::INTERACTION),
            "all" => Some(Self::ALL),
            _ => None,
        }
    }

    /// Parse a mask written as `name|name|0x10`. Parts may be channel names,
    /// decimal or `0x` hex numbers.
    pub fn parse_mask(text: &str) -> Option<u32> {
        text.split('|').try_fold(0u32, |mask, part| {
            let part = part.trim();
            let bits = Self::from_name(part).or_else(|| match part.strip_prefix("0x") {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => part.parse().ok(),
            })?;
            Some(mask | bits)
        })
    }

    /// Inverse of [`CollisionChannel::parse_mask`]. Unnamed bits are kept as hex.
    pub fn mask_name(mask: u32) -> String {
        if mask == Self::ALL {
            return "all".into();
        }
        let mut parts = Vec::new();
        let mut rest = mask;
        for (bits, name) in [
            (Self::VISIBILITY, "visibility"),
            (Self::CAMERA, "camera"),
            (Self::INTERACTION, "interaction"),
        ] {
            if rest & bits != 0 {
                parts.push(name.to_string());
                rest &= !bits;
            }
        }
        if rest != 0 || parts.is_empty() {
            parts.push(format!("0x{:x}", rest));
        }
        parts.join("|")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    #[default]
    Block,
    Overlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: [f32; 3] },
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub offset: Vec3,
    pub channels: u32,
    pub response: CollisionResponse,
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere {
                radius: radius.abs(),
            },
            offset: Vec3::ZERO,
            channels: CollisionChannel::ALL,
            response: CollisionResponse::Block,
        }
    }

    pub fn cuboid(half_x: f32, half_y: f32, half_z: f32) -> Self {
        Self {
            shape: ColliderShape::Cuboid {
                half_extents: [half_x.abs(), half_y.abs(), half_z.abs()],
            },
            offset: Vec3::ZERO,
            channels: CollisionChannel::ALL,
            response: CollisionResponse::Block,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_response(mut self, response: CollisionResponse) -> Self {
        self.response = response;
        self
    }

    pub fn responds_to(&self, channel: u32) -> bool {
        self.channels & channel != 0
    }

    pub fn is_blocking(&self) -> bool {
        self.response == CollisionResponse::Block
    }

    /// Half extents of the world AABB enclosing the volume.
    pub fn half_extents(&self) -> Vec3 {
        match self.shape {
            ColliderShape::Sphere { radius } => Vec3::splat(radius),
            ColliderShape::Cuboid { half_extents } => Vec3::from_array(half_extents),
        }
    }

    /// Distance along `dir` (unit length) from `start` at which a volume of
    /// `radius` moving along the segment first touches this collider, or
    /// `None` if it never does within `max_distance`.
    ///
    /// `vertical_extent` grows the test volume along world up only and is
    /// used for upright capsules; with it the collider is treated as its
    /// enclosing AABB.
    pub fn sweep(
        &self,
        center: Vec3,
        start: Vec3,
        dir: Vec3,
        max_distance: f32,
        radius: f32,
        vertical_extent: f32,
    ) -> Option<f32> {
        match self.shape {
            ColliderShape::Sphere { radius: own } if vertical_extent <= 0.0 => {
                ray_sphere(start, dir, max_distance, center, own + radius)
            }
            _ => {
                let inflate = Vec3::new(radius, radius + vertical_extent, radius);
                let half = self.half_extents() + inflate;
                ray_aabb(start, dir, max_distance, center - half, center + half)
            }
        }
    }
}

fn ray_sphere(start: Vec3, dir: Vec3, max_distance: f32, center: Vec3, radius: f32) -> Option<f32> {
    let m = start - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        // Starts inside.
        return Some(0.0);
    }
    let b = m.dot(dir);
    if b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t <= max_distance).then_some(t.max(0.0))
}

fn ray_aabb(start: Vec3, dir: Vec3, max_distance: f32, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = max_distance;
    for axis in 0..3 {
        let origin = start[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}
