//! The viewport cascade: view panes and their dependent cameras.
//!
//! A view pane is GuiElement + View. On the first pass over an
//! uninitialised pane the controller creates and registers the pane's two
//! dependent cameras, a scene-space perspective camera and an orthographic
//! GUI-layer camera, each subscribed to a render group named after the
//! pane's uuid. Afterwards, whenever the pane's View or GuiElement is dirty,
//! both cameras take the pane rectangle's width/height and are marked dirty
//! themselves, handing the cascade on to the camera controller; the
//! triggering flags are cleared.

use easel_core::{
    Capability, CapabilityFilter, Component, Controller, EcsError, EntityId, EntityManager,
    TickContext,
};
use tracing::{debug, info};

use crate::gui::GuiElement;
use crate::projection::Projection;
use crate::templates;
use crate::view::View;

pub struct ViewController {
    filter: CapabilityFilter,
}

impl ViewController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: CapabilityFilter::new(&[Capability::GuiElement, Capability::View]),
        }
    }

    /// Create and register the pane's two dependent cameras and flip the
    /// pane's View to initialised.
    fn init_view(&self, manager: &mut EntityManager, pane: EntityId) -> Result<(), EcsError> {
        let (rect, uuid) = {
            let entity = manager
                .entity(pane)
                .ok_or(EcsError::EntityNotFound(pane))?;
            let gui = entity
                .component::<GuiElement>()
                .ok_or(EcsError::MissingComponent {
                    entity: pane,
                    capability: Capability::GuiElement,
                })?;
            (gui.bounding_rect, entity.uuid())
        };
        let group_scene = format!("scene-{uuid}");
        let group_gui = format!("gui-{uuid}");

        let scene_camera = templates::view_camera(manager, rect, &group_scene);
        let scene_id = manager.add_entity(scene_camera);

        let layer_camera = templates::layer_camera(manager, rect, &group_gui);
        let layer_id = manager.add_entity(layer_camera);

        let entity = manager
            .entity_mut(pane)
            .ok_or(EcsError::EntityNotFound(pane))?;
        let view = entity
            .component_mut::<View>()
            .ok_or(EcsError::MissingComponent {
                entity: pane,
                capability: Capability::View,
            })?;
        view.scene_camera = Some(scene_id);
        view.layer_camera = Some(layer_id);
        view.group_scene = group_scene;
        view.group_gui = group_gui;
        view.initialised = true;

        info!(entity = %pane, scene_camera = %scene_id, layer_camera = %layer_id, "view initialised");
        Ok(())
    }

    /// Push the pane rectangle's size into both dependent cameras and clear
    /// the triggering flags.
    fn resize_cameras(&self, manager: &mut EntityManager, pane: EntityId) -> Result<(), EcsError> {
        let (rect, cameras) = {
            let entity = manager
                .entity(pane)
                .ok_or(EcsError::EntityNotFound(pane))?;
            let gui = entity
                .component::<GuiElement>()
                .ok_or(EcsError::MissingComponent {
                    entity: pane,
                    capability: Capability::GuiElement,
                })?;
            let view = entity
                .component::<View>()
                .ok_or(EcsError::MissingComponent {
                    entity: pane,
                    capability: Capability::View,
                })?;
            (gui.bounding_rect, [view.scene_camera, view.layer_camera])
        };

        for camera in cameras.into_iter().flatten() {
            let entity = manager
                .entity_mut(camera)
                .ok_or(EcsError::EntityNotFound(camera))?;
            let projection =
                entity
                    .component_mut::<Projection>()
                    .ok_or(EcsError::MissingComponent {
                        entity: camera,
                        capability: Capability::Projection,
                    })?;
            projection.width = rect.width;
            projection.height = rect.height;
            projection.set_dirty(true);
        }

        let entity = manager
            .entity_mut(pane)
            .ok_or(EcsError::EntityNotFound(pane))?;
        if let Some(view) = entity.component_mut::<View>() {
            view.set_dirty(false);
        }
        if let Some(gui) = entity.component_mut::<GuiElement>() {
            gui.set_dirty(false);
        }

        debug!(entity = %pane, width = rect.width, height = rect.height, "view cameras resized");
        Ok(())
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ViewController {
    fn name(&self) -> &str {
        "view"
    }

    fn filter(&self) -> &CapabilityFilter {
        &self.filter
    }

    fn update(&mut self, manager: &mut EntityManager, _ctx: &TickContext) -> Result<(), EcsError> {
        for id in manager.entities_matching(&self.filter) {
            let (needs_init, needs_resize) = {
                let Some(entity) = manager.entity(id) else {
                    continue;
                };
                let view = entity
                    .component::<View>()
                    .ok_or(EcsError::MissingComponent {
                        entity: id,
                        capability: Capability::View,
                    })?;
                let gui = entity
                    .component::<GuiElement>()
                    .ok_or(EcsError::MissingComponent {
                        entity: id,
                        capability: Capability::GuiElement,
                    })?;
                (!view.initialised, view.is_dirty() || gui.is_dirty())
            };

            if needs_init {
                self.init_view(manager, id)?;
            }
            if needs_resize {
                self.resize_cameras(manager, id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use easel_math::Rectangle;

    use super::*;
    use crate::projection::ProjectionKind;

    fn tick(n: u64) -> TickContext {
        TickContext::new(n, n as f64 / 60.0, 1.0 / 60.0)
    }

    fn pane_with_rect(manager: &mut EntityManager, rect: Rectangle) -> EntityId {
        let pane = templates::view_pane(manager, rect);
        manager.add_entity(pane)
    }

    #[test]
    fn test_first_pass_creates_exactly_two_cameras() {
        let mut manager = EntityManager::new();
        let pane = pane_with_rect(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0));

        let mut controller = ViewController::new();
        controller.update(&mut manager, &tick(1)).unwrap();

        // Pane plus its two dependent cameras.
        assert_eq!(manager.entity_count(), 3);

        let view = manager
            .entity(pane)
            .unwrap()
            .component::<View>()
            .unwrap()
            .clone();
        assert!(view.initialised);
        let scene_id = view.scene_camera.unwrap();
        let layer_id = view.layer_camera.unwrap();

        let scene = manager.entity(scene_id).unwrap();
        let scene_projection = scene.component::<Projection>().unwrap();
        assert!(matches!(
            scene_projection.kind,
            ProjectionKind::Perspective { .. }
        ));
        assert_eq!(scene_projection.width, 200.0);
        assert!(scene.component::<View>().unwrap().in_group(&view.group_scene));

        let layer = manager.entity(layer_id).unwrap();
        assert_eq!(
            layer.component::<Projection>().unwrap().kind,
            ProjectionKind::Orthographic
        );
        assert!(layer.component::<View>().unwrap().in_group(&view.group_gui));
    }

    #[test]
    fn test_second_pass_creates_nothing_further() {
        let mut manager = EntityManager::new();
        pane_with_rect(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0));

        let mut controller = ViewController::new();
        controller.update(&mut manager, &tick(1)).unwrap();
        assert_eq!(manager.entity_count(), 3);

        controller.update(&mut manager, &tick(2)).unwrap();
        assert_eq!(manager.entity_count(), 3);
    }

    #[test]
    fn test_resize_updates_both_cameras_and_clears_triggers() {
        let mut manager = EntityManager::new();
        let pane = pane_with_rect(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0));

        let mut controller = ViewController::new();
        controller.update(&mut manager, &tick(1)).unwrap();

        {
            let entity = manager.entity_mut(pane).unwrap();
            let gui = entity.component_mut::<GuiElement>().unwrap();
            gui.bounding_rect = Rectangle::new(0.0, 0.0, 400.0, 100.0);
            gui.set_dirty(true);
        }
        controller.update(&mut manager, &tick(2)).unwrap();

        let view = manager
            .entity(pane)
            .unwrap()
            .component::<View>()
            .unwrap()
            .clone();
        for camera in [view.scene_camera.unwrap(), view.layer_camera.unwrap()] {
            let projection = manager
                .entity(camera)
                .unwrap()
                .component::<Projection>()
                .unwrap();
            assert_eq!(projection.width, 400.0);
            assert_eq!(projection.height, 100.0);
            // Marked dirty for the camera controller to consume.
            assert!(projection.is_dirty());
        }

        let entity = manager.entity(pane).unwrap();
        assert!(!entity.component::<GuiElement>().unwrap().is_dirty());
        assert!(!entity.component::<View>().unwrap().is_dirty());
    }

    #[test]
    fn test_clean_pane_passes_do_not_touch_cameras() {
        let mut manager = EntityManager::new();
        let pane = pane_with_rect(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0));

        let mut controller = ViewController::new();
        controller.update(&mut manager, &tick(1)).unwrap();

        let scene_id = manager
            .entity(pane)
            .unwrap()
            .component::<View>()
            .unwrap()
            .scene_camera
            .unwrap();
        {
            let entity = manager.entity_mut(scene_id).unwrap();
            entity
                .component_mut::<Projection>()
                .unwrap()
                .set_dirty(false);
        }

        controller.update(&mut manager, &tick(2)).unwrap();

        let projection = manager
            .entity(scene_id)
            .unwrap()
            .component::<Projection>()
            .unwrap();
        assert!(!projection.is_dirty());
    }

    #[test]
    fn test_group_names_derive_from_pane_uuid() {
        let mut manager = EntityManager::new();
        let pane = pane_with_rect(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0));

        let mut controller = ViewController::new();
        controller.update(&mut manager, &tick(1)).unwrap();

        let entity = manager.entity(pane).unwrap();
        let uuid = entity.uuid();
        let view = entity.component::<View>().unwrap();
        assert_eq!(view.group_scene, format!("scene-{uuid}"));
        assert_eq!(view.group_gui, format!("gui-{uuid}"));
    }
}
