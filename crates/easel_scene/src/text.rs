//! The GUI text cascade: dirty text content into a fresh glyph-quad mesh.
//!
//! Visits GUI elements that also carry GuiText. Mesh components are attached
//! on first sight. When the text is dirty the controller releases the old
//! device mesh, resolves a sprite font through a style-keyed cache, points
//! the material's diffuse map at the font atlas, lays the content out as one
//! textured quad per character, and clears the text flag. Layout wraps when
//! the pen passes the element's width; `'\n'` starts a new line.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use easel_core::{
    Capability, CapabilityFilter, Component, Controller, EcsError, EntityId, EntityManager,
    TickContext,
};
use easel_gfx::{FontProvider, GraphicsDevice, Mesh, MeshBuilder, MeshData, SpriteFont};
use easel_math::{Vec2, Vec3};
use tracing::debug;

use crate::gui::{GuiElement, GuiText};
use crate::mesh::{MeshFilter, MeshRenderer};

pub struct GuiTextController {
    filter: CapabilityFilter,
    device: Rc<RefCell<dyn GraphicsDevice>>,
    provider: Box<dyn FontProvider>,
    fonts: HashMap<String, Rc<dyn SpriteFont>>,
}

impl GuiTextController {
    #[must_use]
    pub fn new(device: Rc<RefCell<dyn GraphicsDevice>>, provider: Box<dyn FontProvider>) -> Self {
        Self {
            filter: CapabilityFilter::new(&[Capability::GuiElement]),
            device,
            provider,
            fonts: HashMap::new(),
        }
    }

    fn font_for(&mut self, style: &str, family: &str, size: f32) -> Rc<dyn SpriteFont> {
        if let Some(font) = self.fonts.get(style) {
            return Rc::clone(font);
        }
        let font = self
            .provider
            .create_font(&mut *self.device.borrow_mut(), family, size);
        self.fonts.insert(style.to_string(), Rc::clone(&font));
        debug!(style, "sprite font created");
        font
    }

    fn update_text(&mut self, manager: &mut EntityManager, id: EntityId) -> Result<(), EcsError> {
        // Attaching components changes the capability set, so it goes
        // through the manager.
        let (needs_filter, needs_renderer) = {
            let entity = manager.entity(id).ok_or(EcsError::EntityNotFound(id))?;
            (
                !entity.has_component(Capability::MeshFilter),
                !entity.has_component(Capability::MeshRenderer),
            )
        };
        if needs_filter {
            manager.add_component(id, MeshFilter::new())?;
        }
        if needs_renderer {
            manager.add_component(id, MeshRenderer::new())?;
        }

        let entity = manager.entity_mut(id).ok_or(EcsError::EntityNotFound(id))?;

        let (content, style, family, size, line_height) = {
            let text = entity
                .component::<GuiText>()
                .ok_or(EcsError::MissingComponent {
                    entity: id,
                    capability: Capability::GuiText,
                })?;
            if !text.is_dirty() {
                return Ok(());
            }
            (
                text.content.clone(),
                text.font_style(),
                text.font_family.clone(),
                text.font_size,
                text.line_height,
            )
        };
        let wrap_width = entity
            .component::<GuiElement>()
            .ok_or(EcsError::MissingComponent {
                entity: id,
                capability: Capability::GuiElement,
            })?
            .bounding_rect
            .width;

        // Release the previous mesh's device copy before replacing it.
        {
            let mut device = self.device.borrow_mut();
            if let Some(mesh_filter) = entity.component_mut::<MeshFilter>()
                && let Some(mesh) = mesh_filter.mesh.as_mut()
            {
                mesh.destroy(&mut *device);
            }
        }

        let font = self.font_for(&style, &family, size);

        let renderer = entity
            .component_mut::<MeshRenderer>()
            .ok_or(EcsError::MissingComponent {
                entity: id,
                capability: Capability::MeshRenderer,
            })?;
        renderer.material.diffuse_map = Some(font.texture());
        renderer.material.dirty = true;

        let data = build_text_mesh(&content, wrap_width, line_height, font.as_ref());
        let quads = data.triangle_count() / 2;
        let mesh_filter = entity
            .component_mut::<MeshFilter>()
            .ok_or(EcsError::MissingComponent {
                entity: id,
                capability: Capability::MeshFilter,
            })?;
        mesh_filter.mesh = Some(Mesh::new(data));
        mesh_filter.set_dirty(true);

        if let Some(text) = entity.component_mut::<GuiText>() {
            text.set_dirty(false);
        }

        debug!(entity = %id, quads, "text mesh regenerated");
        Ok(())
    }
}

impl Controller for GuiTextController {
    fn name(&self) -> &str {
        "gui_text"
    }

    fn filter(&self) -> &CapabilityFilter {
        &self.filter
    }

    fn update(&mut self, manager: &mut EntityManager, _ctx: &TickContext) -> Result<(), EcsError> {
        for id in manager.entities_matching(&self.filter) {
            let has_text = manager
                .entity(id)
                .is_some_and(|entity| entity.has_component(Capability::GuiText));
            if has_text {
                self.update_text(manager, id)?;
            }
        }
        Ok(())
    }
}

/// Lay `content` out as one textured quad per character.
///
/// The pen advances right by each glyph's width, wrapping to a new line when
/// it would pass `wrap_width`; `'\n'` forces a line break. Quads grow
/// downwards (y-down GUI space), each anchored so its bottom-right corner
/// sits at the pen.
fn build_text_mesh(
    content: &str,
    wrap_width: f32,
    line_height: f32,
    font: &dyn SpriteFont,
) -> MeshData {
    let mut builder = MeshBuilder::new();
    let mut pen_x = 0.0_f32;
    let mut pen_y = 0.0_f32;

    for character in content.chars() {
        if character == '\n' {
            pen_x = 0.0;
            pen_y += line_height;
            continue;
        }

        let glyph = font.glyph(character);
        if pen_x + glyph.width > wrap_width {
            pen_x = 0.0;
            pen_y += line_height;
        }
        pen_x += glyph.width;

        let u = glyph.u;
        let v = 1.0 - glyph.v;
        let w = glyph.uv_width;
        let h = -glyph.uv_height;

        let left = pen_x - glyph.width;
        let right = pen_x;
        let top = pen_y - glyph.height;
        let bottom = pen_y;

        let base = builder.vertex_count();
        builder.add_vertex(Vec3::new(left, top, 0.0));
        builder.add_vertex(Vec3::new(right, top, 0.0));
        builder.add_vertex(Vec3::new(right, bottom, 0.0));
        builder.add_vertex(Vec3::new(left, bottom, 0.0));

        builder.add_uv(Vec2::new(u, v));
        builder.add_uv(Vec2::new(u + w, v));
        builder.add_uv(Vec2::new(u + w, v + h));
        builder.add_uv(Vec2::new(u, v + h));

        builder.add_triangle(base, base + 2, base + 1);
        builder.add_triangle(base, base + 3, base + 2);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use easel_gfx::{DeviceOp, FixedFont, FixedFontProvider, NullDevice, RecordingDevice};
    use easel_math::Rectangle;

    use super::*;
    use crate::templates;

    fn tick(n: u64) -> TickContext {
        TickContext::new(n, n as f64 / 60.0, 1.0 / 60.0)
    }

    // FixedFont with size 16: every glyph is 8 wide, 16 tall.
    fn test_font() -> FixedFont {
        let mut device = NullDevice::new(1.0, 1.0);
        FixedFont::new(&mut device, 16.0)
    }

    #[test]
    fn test_single_character_quad_placement() {
        let font = test_font();
        let data = build_text_mesh("A", 100.0, 20.0, &font);

        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.uvs.len(), 4);
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(
            data.positions,
            vec![
                Vec3::new(0.0, -16.0, 0.0),
                Vec3::new(8.0, -16.0, 0.0),
                Vec3::new(8.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
            ]
        );
        assert_eq!(data.indices, vec![0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_quad_uvs_flip_vertically() {
        let font = test_font();
        let glyph = font.glyph('A');
        let data = build_text_mesh("A", 100.0, 20.0, &font);

        let v = 1.0 - glyph.v;
        assert_eq!(data.uvs[0], Vec2::new(glyph.u, v));
        assert_eq!(data.uvs[1], Vec2::new(glyph.u + glyph.uv_width, v));
        assert_eq!(
            data.uvs[2],
            Vec2::new(glyph.u + glyph.uv_width, v - glyph.uv_height)
        );
        assert_eq!(data.uvs[3], Vec2::new(glyph.u, v - glyph.uv_height));
    }

    #[test]
    fn test_newline_resets_pen_and_drops_a_line() {
        let font = test_font();
        let data = build_text_mesh("a\nb", 100.0, 20.0, &font);

        // Two quads, no geometry for the newline itself.
        assert_eq!(data.vertex_count(), 8);
        // Second quad starts back at x 0, one line height down.
        assert_eq!(data.positions[4], Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(data.positions[6], Vec3::new(8.0, 20.0, 0.0));
    }

    #[test]
    fn test_wraps_when_pen_passes_element_width() {
        let font = test_font();
        // Two 8-wide glyphs fit in 20; the third wraps.
        let data = build_text_mesh("abc", 20.0, 20.0, &font);

        assert_eq!(data.vertex_count(), 12);
        assert_eq!(data.positions[0].x, 0.0);
        assert_eq!(data.positions[4].x, 8.0);
        // Wrapped glyph: back to the left edge, next line.
        assert_eq!(data.positions[8], Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_empty_content_builds_empty_mesh() {
        let font = test_font();
        let data = build_text_mesh("", 100.0, 20.0, &font);
        assert!(data.is_empty());
        assert_eq!(data.triangle_count(), 0);
    }

    #[test]
    fn test_attaches_mesh_components_on_first_sight() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut manager = EntityManager::new();
        let text = templates::gui_text(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0), "hi");
        let id = manager.add_entity(text);

        let mut controller = GuiTextController::new(device, Box::new(FixedFontProvider));
        controller.update(&mut manager, &tick(1)).unwrap();

        let entity = manager.entity(id).unwrap();
        assert!(entity.has_component(Capability::MeshFilter));
        assert!(entity.has_component(Capability::MeshRenderer));
        assert!(entity.component::<MeshFilter>().unwrap().mesh.is_some());
        assert!(!entity.component::<GuiText>().unwrap().is_dirty());
    }

    #[test]
    fn test_material_points_at_the_font_atlas() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut manager = EntityManager::new();
        let text = templates::gui_text(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0), "hi");
        let id = manager.add_entity(text);

        let mut controller = GuiTextController::new(device.clone(), Box::new(FixedFontProvider));
        controller.update(&mut manager, &tick(1)).unwrap();

        let atlas = device
            .borrow()
            .ops()
            .iter()
            .find_map(|op| match op {
                DeviceOp::CreateTexture { texture, .. } => Some(*texture),
                _ => None,
            })
            .unwrap();
        let entity = manager.entity(id).unwrap();
        let renderer = entity.component::<MeshRenderer>().unwrap();
        assert_eq!(renderer.material.diffuse_map, Some(atlas));
        assert!(renderer.material.dirty);
    }

    #[test]
    fn test_fonts_are_cached_per_style() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut manager = EntityManager::new();
        let rect = Rectangle::new(0.0, 0.0, 200.0, 100.0);
        let a = templates::gui_text(&mut manager, rect, "one");
        manager.add_entity(a);
        let b = templates::gui_text(&mut manager, rect, "two");
        manager.add_entity(b);

        let mut controller = GuiTextController::new(device.clone(), Box::new(FixedFontProvider));
        controller.update(&mut manager, &tick(1)).unwrap();

        let textures = device
            .borrow()
            .ops()
            .iter()
            .filter(|op| matches!(op, DeviceOp::CreateTexture { .. }))
            .count();
        assert_eq!(textures, 1);
    }

    #[test]
    fn test_regeneration_destroys_the_old_device_mesh_once() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut manager = EntityManager::new();
        let text = templates::gui_text(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0), "hi");
        let id = manager.add_entity(text);

        let mut controller = GuiTextController::new(device.clone(), Box::new(FixedFontProvider));
        controller.update(&mut manager, &tick(1)).unwrap();

        // Upload the generated mesh the way the render pass would.
        let handle = {
            let entity = manager.entity_mut(id).unwrap();
            let mesh_filter = entity.component_mut::<MeshFilter>().unwrap();
            let mesh = mesh_filter.mesh.as_mut().unwrap();
            mesh.ensure_uploaded(&mut *device.borrow_mut())
        };
        device.borrow_mut().take_ops();

        {
            let entity = manager.entity_mut(id).unwrap();
            let text = entity.component_mut::<GuiText>().unwrap();
            text.content = "rewritten".to_string();
            text.set_dirty(true);
        }
        controller.update(&mut manager, &tick(2)).unwrap();

        let destroys: Vec<_> = device
            .borrow()
            .ops()
            .iter()
            .filter(|op| matches!(op, DeviceOp::DestroyMesh { .. }))
            .cloned()
            .collect();
        assert_eq!(destroys, vec![DeviceOp::DestroyMesh { mesh: handle }]);
    }

    #[test]
    fn test_clean_text_is_left_alone() {
        let device = Rc::new(RefCell::new(RecordingDevice::new()));
        let mut manager = EntityManager::new();
        let text = templates::gui_text(&mut manager, Rectangle::new(0.0, 0.0, 200.0, 100.0), "hi");
        let id = manager.add_entity(text);

        let mut controller = GuiTextController::new(device.clone(), Box::new(FixedFontProvider));
        controller.update(&mut manager, &tick(1)).unwrap();
        device.borrow_mut().take_ops();

        controller.update(&mut manager, &tick(2)).unwrap();
        assert!(device.borrow().ops().is_empty());

        let entity = manager.entity(id).unwrap();
        assert!(!entity.component::<GuiText>().unwrap().is_dirty());
    }
}
