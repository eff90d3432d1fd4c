//! Replaceable geometry backend.
//!
//! When present, the scan system casts through this resource instead of the
//! built-in [`ColliderCaster`](crate::systems::spatialquery::ColliderCaster).

use bevy_ecs::prelude::Resource;

use crate::systems::spatialquery::{CastRequest, HitRecord, ShapeCaster};

#[derive(Resource)]
pub struct ShapeCastBackend(pub Box<dyn ShapeCaster + Send + Sync>);

impl ShapeCastBackend {
    pub fn new(caster: impl ShapeCaster + Send + Sync + 'static) -> Self {
        ShapeCastBackend(Box::new(caster))
    }
}

impl ShapeCaster for ShapeCastBackend {
    fn cast_shape(&self, request: &CastRequest<'_>) -> Vec<HitRecord> {
        self.0.cast_shape(request)
    }
}
