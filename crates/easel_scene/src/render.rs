//! The render stage, last in the controller order.
//!
//! Clears the target, binds the engine shader, then walks every enabled
//! camera in id order: uploads its view/projection matrices and draws each
//! enabled mesh entity whose render-group membership matches the camera
//! (a camera with no groups draws ungrouped meshes). Model matrices come
//! from the entity's Transform, identity when it has none; device meshes
//! are created lazily on first draw.

use std::cell::RefCell;
use std::rc::Rc;

use easel_core::{
    Capability, CapabilityFilter, Component, Controller, EcsError, EntityManager, TickContext,
};
use easel_gfx::{GraphicsDevice, ShaderHandle, Uniform};
use easel_math::{Mat4, Vec4};
use tracing::trace;

use crate::mesh::{MeshFilter, MeshRenderer};
use crate::projection::Projection;
use crate::transform::Transform;
use crate::view::View;

const VERTEX_SHADER_SOURCE: &str = "\
attribute vec3 aVertexPosition;
attribute vec3 aVertexNormal;
attribute vec2 aTextureCoord;

uniform mat4 uMMatrix;
uniform mat4 uVMatrix;
uniform mat4 uPMatrix;
uniform mat4 uNMatrix;

varying vec2 vTextureCoord;
varying vec3 vNormal;

void main(void) {
    gl_Position = uPMatrix * uVMatrix * uMMatrix * vec4(aVertexPosition, 1.0);
    vNormal = (uNMatrix * vec4(aVertexNormal, 0.0)).xyz;
    vTextureCoord = aTextureCoord;
}
";

const FRAGMENT_SHADER_SOURCE: &str = "\
precision mediump float;

uniform sampler2D uSampler;

varying vec2 vTextureCoord;
varying vec3 vNormal;

void main(void) {
    gl_FragColor = texture2D(uSampler, vTextureCoord);
}
";

pub struct RenderController {
    filter: CapabilityFilter,
    camera_filter: CapabilityFilter,
    device: Rc<RefCell<dyn GraphicsDevice>>,
    shader: ShaderHandle,
    clear_color: Vec4,
}

impl RenderController {
    #[must_use]
    pub fn new(device: Rc<RefCell<dyn GraphicsDevice>>, clear_color: Vec4) -> Self {
        let shader = device
            .borrow_mut()
            .create_shader(VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE);
        Self {
            filter: CapabilityFilter::new(&[Capability::MeshFilter, Capability::MeshRenderer]),
            camera_filter: CapabilityFilter::new(&[Capability::Projection, Capability::View]),
            device,
            shader,
            clear_color,
        }
    }
}

impl Controller for RenderController {
    fn name(&self) -> &str {
        "render"
    }

    fn filter(&self) -> &CapabilityFilter {
        &self.filter
    }

    fn update(&mut self, manager: &mut EntityManager, _ctx: &TickContext) -> Result<(), EcsError> {
        let cameras = manager.entities_matching(&self.camera_filter);
        let meshes = manager.entities_matching(&self.filter);

        let mut device = self.device.borrow_mut();
        device.clear(self.clear_color);
        device.bind_shader(self.shader);

        let mut drawn = 0_usize;
        for camera_id in cameras {
            let (view_matrix, projection_matrix, groups) = {
                let Some(camera) = manager.entity(camera_id) else {
                    continue;
                };
                let view = camera
                    .component::<View>()
                    .ok_or(EcsError::MissingComponent {
                        entity: camera_id,
                        capability: Capability::View,
                    })?;
                if !view.is_enabled() {
                    continue;
                }
                let projection =
                    camera
                        .component::<Projection>()
                        .ok_or(EcsError::MissingComponent {
                            entity: camera_id,
                            capability: Capability::Projection,
                        })?;
                (
                    view.matrix(),
                    projection.matrix(),
                    view.render_groups().to_vec(),
                )
            };

            device.set_uniform_mat4(Uniform::View, view_matrix);
            device.set_uniform_mat4(Uniform::Projection, projection_matrix);
            device.set_uniform_mat4(Uniform::Normal, Mat4::IDENTITY);

            for mesh_id in &meshes {
                let Some(entity) = manager.entity_mut(*mesh_id) else {
                    continue;
                };

                let (enabled, texture, group_matches) = {
                    let renderer =
                        entity
                            .component::<MeshRenderer>()
                            .ok_or(EcsError::MissingComponent {
                                entity: *mesh_id,
                                capability: Capability::MeshRenderer,
                            })?;
                    let matches = match &renderer.render_group {
                        Some(group) => groups.iter().any(|g| g == group),
                        None => groups.is_empty(),
                    };
                    (renderer.is_enabled(), renderer.material.diffuse_map, matches)
                };
                if !enabled || !group_matches {
                    continue;
                }

                let model = entity
                    .component::<Transform>()
                    .map_or(Mat4::IDENTITY, Transform::to_matrix);

                if let Some(texture) = texture {
                    device.set_uniform_texture(Uniform::Sampler, texture);
                }
                device.set_uniform_mat4(Uniform::Model, model);

                let mesh_filter =
                    entity
                        .component_mut::<MeshFilter>()
                        .ok_or(EcsError::MissingComponent {
                            entity: *mesh_id,
                            capability: Capability::MeshFilter,
                        })?;
                let Some(mesh) = mesh_filter.mesh.as_mut() else {
                    continue;
                };
                let handle = mesh.ensure_uploaded(&mut *device);
                device.draw_mesh(handle);
                drawn += 1;

                if let Some(renderer) = entity.component_mut::<MeshRenderer>() {
                    renderer.material.dirty = false;
                }
            }
        }

        trace!(drawn, "render pass complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use easel_core::EntityId;
    use easel_gfx::{DeviceOp, Mesh, MeshBuilder, MeshData, RecordingDevice};
    use easel_math::{Vec2, Vec3};

    use super::*;
    use crate::templates;

    fn tick(n: u64) -> TickContext {
        TickContext::new(n, n as f64 / 60.0, 1.0 / 60.0)
    }

    fn unit_quad() -> MeshData {
        let mut builder = MeshBuilder::new();
        for (position, uv) in [
            (Vec3::new(-1.0, -1.0, 1.0), Vec2::new(0.0, 0.0)),
            (Vec3::new(1.0, -1.0, 1.0), Vec2::new(1.0, 0.0)),
            (Vec3::new(1.0, 1.0, 1.0), Vec2::new(1.0, 1.0)),
            (Vec3::new(-1.0, 1.0, 1.0), Vec2::new(0.0, 1.0)),
        ] {
            builder.add_vertex(position);
            builder.add_normal(Vec3::Z);
            builder.add_uv(uv);
        }
        builder.add_triangle(0, 1, 2);
        builder.add_triangle(0, 2, 3);
        builder.build()
    }

    fn spawn_mesh_entity(
        manager: &mut EntityManager,
        group: Option<&str>,
        transform: Option<Transform>,
    ) -> EntityId {
        let mut entity = manager.create_named("quad");
        let mut filter = MeshFilter::new();
        filter.mesh = Some(Mesh::new(unit_quad()));
        entity.add_component(filter);
        let mut renderer = MeshRenderer::new();
        renderer.render_group = group.map(str::to_string);
        entity.add_component(renderer);
        if let Some(transform) = transform {
            entity.add_component(transform);
        }
        manager.add_entity(entity)
    }

    #[test]
    fn test_pass_emits_clear_bind_uniforms_draw_in_order() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let clear = Vec4::new(0.5, 0.5, 0.5, 1.0);
        let mut controller = RenderController::new(device.clone(), clear);

        let shader = match device.borrow().ops() {
            [DeviceOp::CreateShader { shader }] => *shader,
            ops => panic!("expected one shader compile, got {ops:?}"),
        };
        device.borrow_mut().take_ops();

        let mut manager = EntityManager::new();
        let camera = templates::camera(&mut manager, 720.0, 480.0, 0.1, 100.0, 75.0);
        manager.add_entity(camera);
        let model = Transform::new()
            .with_position(Vec3::new(0.0, 5.0, -10.0))
            .with_scale(Vec3::splat(5.0));
        let expected_model = model.to_matrix();
        spawn_mesh_entity(&mut manager, None, Some(model));

        controller.update(&mut manager, &tick(1)).unwrap();

        let ops = device.borrow_mut().take_ops();
        let mesh = ops
            .iter()
            .find_map(|op| match op {
                DeviceOp::CreateMesh { mesh, .. } => Some(*mesh),
                _ => None,
            })
            .expect("mesh should have been uploaded");
        assert_eq!(
            ops,
            vec![
                DeviceOp::Clear { color: clear },
                DeviceOp::BindShader { shader },
                DeviceOp::SetUniformMat4 {
                    uniform: Uniform::View,
                    matrix: Mat4::IDENTITY,
                },
                DeviceOp::SetUniformMat4 {
                    uniform: Uniform::Projection,
                    matrix: Mat4::IDENTITY,
                },
                DeviceOp::SetUniformMat4 {
                    uniform: Uniform::Normal,
                    matrix: Mat4::IDENTITY,
                },
                DeviceOp::SetUniformMat4 {
                    uniform: Uniform::Model,
                    matrix: expected_model,
                },
                DeviceOp::CreateMesh {
                    mesh,
                    vertices: 4,
                    triangles: 2,
                },
                DeviceOp::DrawMesh { mesh },
            ]
        );
    }

    #[test]
    fn test_meshes_upload_once_across_passes() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut controller = RenderController::new(device.clone(), Vec4::ONE);

        let mut manager = EntityManager::new();
        let camera = templates::camera(&mut manager, 720.0, 480.0, 0.1, 100.0, 75.0);
        manager.add_entity(camera);
        spawn_mesh_entity(&mut manager, None, None);

        controller.update(&mut manager, &tick(1)).unwrap();
        controller.update(&mut manager, &tick(2)).unwrap();

        let creates = device
            .borrow()
            .ops()
            .iter()
            .filter(|op| matches!(op, DeviceOp::CreateMesh { .. }))
            .count();
        let draws = device
            .borrow()
            .ops()
            .iter()
            .filter(|op| matches!(op, DeviceOp::DrawMesh { .. }))
            .count();
        assert_eq!(creates, 1);
        assert_eq!(draws, 2);
    }

    #[test]
    fn test_render_groups_partition_the_draws() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut controller = RenderController::new(device.clone(), Vec4::ONE);

        let mut manager = EntityManager::new();
        // Ungrouped camera, then a camera subscribed to "gui-1".
        let scene_camera = templates::camera(&mut manager, 720.0, 480.0, 0.1, 100.0, 75.0);
        manager.add_entity(scene_camera);
        let mut gui_camera = templates::camera(&mut manager, 720.0, 480.0, 0.1, 100.0, 75.0);
        if let Some(view) = gui_camera.component_mut::<View>() {
            view.add_render_group("gui-1");
        }
        manager.add_entity(gui_camera);

        spawn_mesh_entity(&mut manager, None, None);
        spawn_mesh_entity(&mut manager, Some("gui-1"), None);

        controller.update(&mut manager, &tick(1)).unwrap();

        // Each camera draws exactly one of the two meshes.
        let draws = device
            .borrow()
            .ops()
            .iter()
            .filter(|op| matches!(op, DeviceOp::DrawMesh { .. }))
            .count();
        assert_eq!(draws, 2);
        assert_eq!(device.borrow().live_mesh_count(), 2);
    }

    #[test]
    fn test_disabled_camera_is_skipped() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut controller = RenderController::new(device.clone(), Vec4::ONE);

        let mut manager = EntityManager::new();
        let mut camera = templates::camera(&mut manager, 720.0, 480.0, 0.1, 100.0, 75.0);
        if let Some(view) = camera.component_mut::<View>() {
            view.set_enabled(false);
        }
        manager.add_entity(camera);
        spawn_mesh_entity(&mut manager, None, None);

        device.borrow_mut().take_ops();
        controller.update(&mut manager, &tick(1)).unwrap();

        let ops = device.borrow_mut().take_ops();
        assert!(ops.iter().all(|op| !matches!(op, DeviceOp::DrawMesh { .. })));
        // The frame is still cleared and the shader still bound.
        assert!(matches!(ops[0], DeviceOp::Clear { .. }));
    }

    #[test]
    fn test_disabled_renderer_is_skipped_and_material_flag_consumed() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut controller = RenderController::new(device.clone(), Vec4::ONE);

        let mut manager = EntityManager::new();
        let camera = templates::camera(&mut manager, 720.0, 480.0, 0.1, 100.0, 75.0);
        manager.add_entity(camera);
        let drawn_id = spawn_mesh_entity(&mut manager, None, None);
        let skipped_id = spawn_mesh_entity(&mut manager, None, None);
        manager
            .entity_mut(skipped_id)
            .unwrap()
            .component_mut::<MeshRenderer>()
            .unwrap()
            .set_enabled(false);

        controller.update(&mut manager, &tick(1)).unwrap();

        let draws = device
            .borrow()
            .ops()
            .iter()
            .filter(|op| matches!(op, DeviceOp::DrawMesh { .. }))
            .count();
        assert_eq!(draws, 1);

        let drawn = manager.entity(drawn_id).unwrap();
        assert!(!drawn.component::<MeshRenderer>().unwrap().material.dirty);
        let skipped = manager.entity(skipped_id).unwrap();
        assert!(skipped.component::<MeshRenderer>().unwrap().material.dirty);
    }
}
