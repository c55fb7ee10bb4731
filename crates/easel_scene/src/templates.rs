//! Composite entity templates.
//!
//! Each template assembles a full component bundle on a freshly minted
//! entity before anything can observe it, so queries never see one of these
//! entities partially assembled. Templates return the detached entity; the
//! caller registers it with [`EntityManager::add_entity`].
//!
//! [`EntityManager::add_entity`]: easel_core::EntityManager::add_entity

use easel_core::{Entity, EntityManager};
use easel_math::Rectangle;

use crate::gui::{GuiElement, GuiText};
use crate::projection::Projection;
use crate::transform::Transform;
use crate::view::View;

/// Vertical field of view used by cameras that don't specify their own.
pub const DEFAULT_FOV_DEGREES: f32 = 75.0;

const VIEW_CAMERA_NEAR: f32 = 0.1;
const VIEW_CAMERA_FAR: f32 = 100.0;

/// A free-standing perspective camera: Transform + Projection + View.
#[must_use]
pub fn camera(
    manager: &mut EntityManager,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
    fov_degrees: f32,
) -> Entity {
    let mut entity = manager.create_named("camera");
    entity.add_component(Transform::new());
    entity.add_component(Projection::perspective(width, height, near, far, fov_degrees));
    entity.add_component(View::new());
    entity
}

/// The scene-space camera a view pane depends on, subscribed to the pane's
/// scene render group.
#[must_use]
pub fn view_camera(
    manager: &mut EntityManager,
    rect: Rectangle,
    render_group: impl Into<String>,
) -> Entity {
    let mut entity = manager.create_named("view camera");
    entity.add_component(Transform::new());
    entity.add_component(Projection::perspective(
        rect.width,
        rect.height,
        VIEW_CAMERA_NEAR,
        VIEW_CAMERA_FAR,
        DEFAULT_FOV_DEGREES,
    ));
    let mut view = View::new();
    view.add_render_group(render_group);
    entity.add_component(view);
    entity
}

/// The GUI-layer camera a view pane depends on: orthographic over the pane's
/// rectangle, subscribed to the pane's GUI render group.
#[must_use]
pub fn layer_camera(
    manager: &mut EntityManager,
    rect: Rectangle,
    render_group: impl Into<String>,
) -> Entity {
    let mut entity = manager.create_named("gui layer camera");
    entity.add_component(Transform::new());
    entity.add_component(Projection::orthographic(
        rect.width,
        rect.height,
        0.0,
        VIEW_CAMERA_FAR,
    ));
    let mut view = View::new();
    view.add_render_group(render_group);
    entity.add_component(view);
    entity
}

/// A GUI view pane: GuiElement + an uninitialised View. The view controller
/// creates the pane's two dependent cameras on its first pass.
#[must_use]
pub fn view_pane(manager: &mut EntityManager, rect: Rectangle) -> Entity {
    let mut entity = manager.create_named("view pane");
    entity.add_component(GuiElement::new(rect));
    entity.add_component(View::new());
    entity
}

/// A text block: GuiElement bounds plus the text to lay out inside them.
#[must_use]
pub fn gui_text(
    manager: &mut EntityManager,
    rect: Rectangle,
    content: impl Into<String>,
) -> Entity {
    let mut entity = manager.create_named("gui text");
    entity.add_component(GuiElement::new(rect));
    entity.add_component(GuiText::new(content));
    entity
}
