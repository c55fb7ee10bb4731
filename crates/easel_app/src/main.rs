//! # easel
//!
//! Headless demo binary. Assembles the stock scene and drives it through
//! the fixed-timestep loop against the no-op graphics device.
//!
//! ## Scene
//!
//! 1. A perspective camera orbiting the origin.
//! 2. A scaled quad hanging in front of it.
//! 3. An editor-style view pane plus a text caption.

mod app;
mod config;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use easel_core::{
    Capability, CapabilityFilter, Component, Controller, EcsError, Entity, EntityId,
    EntityManager, TickContext,
};
use easel_gfx::{
    BatchVertex, FixedFontProvider, GraphicsDevice, Mesh, MeshBuilder, MeshData, NullDevice,
    PrimitiveTopology,
};
use easel_math::{Rectangle, Vec2, Vec3};
use easel_scene::{
    CameraController, GuiTextController, MeshFilter, MeshRenderer, RenderController, Transform,
    View, ViewController, templates,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::Application;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("easel=info".parse()?))
        .init();

    info!("easel demo starting");

    let config = AppConfig::default().with_max_ticks(300);
    let device: Rc<RefCell<dyn GraphicsDevice>> =
        Rc::new(RefCell::new(NullDevice::new(config.width, config.height)));
    let mut app = Application::new(config, Rc::clone(&device));

    build_scene(&mut app, &device);
    app.run()?;

    info!(
        ticks = app.tick_id(),
        entities = app.manager().entity_count(),
        "easel demo complete"
    );
    Ok(())
}

/// Populates the manager with the demo entities and registers the
/// controllers in their tick order.
fn build_scene(app: &mut Application, device: &Rc<RefCell<dyn GraphicsDevice>>) {
    let clear_color = app.config().clear_color;
    let (width, height) = (app.config().width, app.config().height);

    let camera = templates::camera(
        app.manager_mut(),
        width,
        height,
        0.1,
        100.0,
        templates::DEFAULT_FOV_DEGREES,
    );
    let camera_id = app.manager_mut().add_entity(camera);

    let quad = quad_entity(app.manager_mut());
    app.manager_mut().add_entity(quad);

    // Editor chrome: a view pane with a caption under it.
    let pane = templates::view_pane(app.manager_mut(), Rectangle::new(0.0, 0.0, 240.0, 135.0));
    app.manager_mut().add_entity(pane);
    let caption = templates::gui_text(
        app.manager_mut(),
        Rectangle::new(0.0, 135.0, 240.0, 40.0),
        "scene view",
    );
    app.manager_mut().add_entity(caption);

    app.add_controller(OrbitController::new(camera_id));
    app.add_controller(CameraController::new());
    app.add_controller(GuiTextController::new(
        Rc::clone(device),
        Box::new(FixedFontProvider),
    ));
    app.add_controller(ViewController::new());
    app.add_controller(RenderController::new(Rc::clone(device), clear_color));
    app.add_controller(BatchQuadController::new(Rc::clone(device)));
}

/// The demo prop: a unit quad scaled up and pushed away from the origin.
fn quad_entity(manager: &mut EntityManager) -> Entity {
    let mut mesh_filter = MeshFilter::new();
    mesh_filter.mesh = Some(Mesh::new(unit_quad()));

    let mut entity = manager.create_named("quad");
    entity.add_component(
        Transform::new()
            .with_position(Vec3::new(0.0, 5.0, -10.0))
            .with_scale(Vec3::splat(5.0)),
    );
    entity.add_component(mesh_filter);
    entity.add_component(MeshRenderer::new());
    entity
}

fn unit_quad() -> MeshData {
    let corners = [
        (Vec3::new(-1.0, -1.0, 1.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(1.0, -1.0, 1.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(1.0, 1.0, 1.0), Vec2::new(1.0, 1.0)),
        (Vec3::new(-1.0, 1.0, 1.0), Vec2::new(0.0, 1.0)),
    ];
    let mut builder = MeshBuilder::new();
    for (position, uv) in corners {
        builder.add_vertex(position);
        builder.add_normal(Vec3::Z);
        builder.add_uv(uv);
    }
    builder.add_triangle(0, 1, 2);
    builder.add_triangle(0, 2, 3);
    builder.build()
}

/// Demo controller: swings the main camera around the origin, keeping it
/// aimed at the centre of the scene.
struct OrbitController {
    filter: CapabilityFilter,
    camera: EntityId,
}

impl OrbitController {
    fn new(camera: EntityId) -> Self {
        Self {
            filter: CapabilityFilter::new(&[Capability::Transform, Capability::View]),
            camera,
        }
    }
}

impl Controller for OrbitController {
    fn name(&self) -> &str {
        "orbit"
    }

    fn filter(&self) -> &CapabilityFilter {
        &self.filter
    }

    fn update(&mut self, manager: &mut EntityManager, ctx: &TickContext) -> Result<(), EcsError> {
        let Some(entity) = manager.entity_mut(self.camera) else {
            return Ok(());
        };
        if let Some(transform) = entity.component_mut::<Transform>() {
            transform.local_position = Vec3::new(
                (ctx.time.cos() * 20.0) as f32,
                5.0,
                (ctx.time.sin() * 20.0) as f32,
            );
            transform.set_dirty(true);
        }
        if let Some(view) = entity.component_mut::<View>() {
            view.target = Vec3::ZERO;
            view.set_dirty(true);
        }
        Ok(())
    }
}

/// Demo controller: pushes one immediate-mode quad through the batch API
/// every tick.
struct BatchQuadController {
    filter: CapabilityFilter,
    device: Rc<RefCell<dyn GraphicsDevice>>,
}

impl BatchQuadController {
    fn new(device: Rc<RefCell<dyn GraphicsDevice>>) -> Self {
        Self {
            filter: CapabilityFilter::new(&[]),
            device,
        }
    }
}

impl Controller for BatchQuadController {
    fn name(&self) -> &str {
        "batch quad"
    }

    fn filter(&self) -> &CapabilityFilter {
        &self.filter
    }

    fn update(&mut self, _manager: &mut EntityManager, _ctx: &TickContext) -> Result<(), EcsError> {
        // Two triangles covering the front face of the unit cube.
        let vertices = [
            (Vec3::new(-1.0, -1.0, 1.0), Vec2::new(0.0, 0.0)),
            (Vec3::new(1.0, -1.0, 1.0), Vec2::new(1.0, 0.0)),
            (Vec3::new(1.0, 1.0, 1.0), Vec2::new(1.0, 1.0)),
            (Vec3::new(-1.0, -1.0, 1.0), Vec2::new(0.0, 0.0)),
            (Vec3::new(1.0, 1.0, 1.0), Vec2::new(1.0, 1.0)),
            (Vec3::new(-1.0, 1.0, 1.0), Vec2::new(0.0, 1.0)),
        ];
        let mut device = self.device.borrow_mut();
        device.begin_batch(PrimitiveTopology::Triangles, 8);
        for (position, uv) in vertices {
            device.add_vertex(BatchVertex::new(position, Vec3::Z, uv));
        }
        device.end_batch();
        Ok(())
    }
}
