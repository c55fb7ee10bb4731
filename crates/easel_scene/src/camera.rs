//! Camera matrix recompute.
//!
//! Visits every entity carrying Projection + View. A dirty Transform or View
//! regenerates the view matrix from the transform's position and the view's
//! target; a dirty Projection regenerates the projection matrix. Consumed
//! flags are cleared, and a pass over clean components does nothing.

use easel_core::{
    Capability, CapabilityFilter, Component, Controller, EcsError, EntityManager, TickContext,
};
use tracing::trace;

use crate::projection::Projection;
use crate::transform::Transform;
use crate::view::View;

pub struct CameraController {
    filter: CapabilityFilter,
}

impl CameraController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: CapabilityFilter::new(&[Capability::Projection, Capability::View]),
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for CameraController {
    fn name(&self) -> &str {
        "camera"
    }

    fn filter(&self) -> &CapabilityFilter {
        &self.filter
    }

    fn update(&mut self, manager: &mut EntityManager, _ctx: &TickContext) -> Result<(), EcsError> {
        for id in manager.entities_matching(&self.filter) {
            let Some(entity) = manager.entity_mut(id) else {
                continue;
            };

            // A camera without a Transform peer is a half-assembled bundle.
            let transform = entity
                .component::<Transform>()
                .ok_or(EcsError::MissingComponent {
                    entity: id,
                    capability: Capability::Transform,
                })?;
            let transform_dirty = transform.is_dirty();
            let eye = transform.local_position;

            let view = entity.component::<View>().ok_or(EcsError::MissingComponent {
                entity: id,
                capability: Capability::View,
            })?;

            if transform_dirty || view.is_dirty() {
                if let Some(view) = entity.component_mut::<View>() {
                    view.recompute(eye);
                    view.set_dirty(false);
                }
                if let Some(transform) = entity.component_mut::<Transform>() {
                    transform.set_dirty(false);
                }
                trace!(entity = %id, "view matrix recomputed");
            }

            let projection =
                entity
                    .component_mut::<Projection>()
                    .ok_or(EcsError::MissingComponent {
                        entity: id,
                        capability: Capability::Projection,
                    })?;
            if projection.is_dirty() {
                projection.recompute();
                projection.set_dirty(false);
                trace!(entity = %id, "projection matrix recomputed");
            }
        }
        Ok(())
    }
}
