//! Collected debug shapes.
//!
//! Spatial probes push the volumes they cast and the hit points they found
//! into [`DebugDrawBuffer`]. Nothing here draws; a renderer can read the
//! buffer every frame. Shapes expire according to their [`ShapeLifetime`]
//! in [`age_debug_shapes`](crate::systems::debugdraw::age_debug_shapes).

use bevy_ecs::prelude::Resource;
use bevy_math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    Red,
    Green,
    Blue,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    Line {
        start: Vec3,
        end: Vec3,
        color: DebugColor,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        color: DebugColor,
    },
    Capsule {
        center: Vec3,
        half_height: f32,
        radius: f32,
        color: DebugColor,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeLifetime {
    /// Removed by the next aging pass.
    OneFrame,
    /// Seconds left.
    Seconds(f32),
    Persistent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedShape {
    pub shape: DebugShape,
    pub lifetime: ShapeLifetime,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct DebugDrawBuffer {
    shapes: Vec<TimedShape>,
}

impl DebugDrawBuffer {
    pub fn push(&mut self, shape: DebugShape, lifetime: ShapeLifetime) {
        self.shapes.push(TimedShape { shape, lifetime });
    }

    pub fn shapes(&self) -> &[TimedShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Advance lifetimes by `delta` seconds and drop the expired shapes.
    pub fn age(&mut self, delta: f32) {
        self.shapes.retain_mut(|s| match &mut s.lifetime {
            ShapeLifetime::OneFrame => false,
            ShapeLifetime::Seconds(left) => {
                *left -= delta;
                *left > 0.0
            }
            ShapeLifetime::Persistent => true,
        });
    }
}
