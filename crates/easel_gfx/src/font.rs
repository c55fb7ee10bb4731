//! Sprite fonts: per-character quad metrics over a glyph atlas texture.
//!
//! Rasterisation is a backend concern. The engine only needs each
//! character's pixel footprint and atlas coordinates, which is what
//! [`SpriteFont`] exposes; [`FixedFont`] provides them headless from fixed
//! monospace metrics.

use std::rc::Rc;

use easel_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::device::{GraphicsDevice, TextureHandle};

/// One character's footprint: pixel size plus atlas placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Advance and quad width in pixels.
    pub width: f32,
    /// Quad height in pixels.
    pub height: f32,
    /// Atlas coordinate of the glyph's top-left corner.
    pub u: f32,
    pub v: f32,
    /// Atlas extent of the glyph.
    pub uv_width: f32,
    pub uv_height: f32,
}

impl Glyph {
    #[must_use]
    pub fn uv_origin(&self) -> Vec2 {
        Vec2::new(self.u, self.v)
    }
}

/// A glyph atlas: metrics per character plus the texture they live on.
pub trait SpriteFont {
    /// Metrics for one character. Unknown characters map to a fallback
    /// glyph rather than failing.
    fn glyph(&self, character: char) -> Glyph;

    /// The atlas texture to sample glyphs from.
    fn texture(&self) -> TextureHandle;
}

/// Builds sprite fonts on demand for a family/size pair.
///
/// Callers cache the result keyed by font style, so a provider only sees
/// each distinct style once.
pub trait FontProvider {
    fn create_font(
        &mut self,
        device: &mut dyn GraphicsDevice,
        family: &str,
        size: f32,
    ) -> Rc<dyn SpriteFont>;
}

// ── Headless implementation ─────────────────────────────────────────────────

const ATLAS_COLUMNS: u32 = 16;
const ATLAS_ROWS: u32 = 8;
const FALLBACK_CHARACTER: char = '?';

/// Fixed-metrics monospace font over a 16x8 ASCII atlas.
///
/// Every glyph is half the font size wide and the full font size tall;
/// atlas cells are laid out in code-point order. Good enough to drive text
/// layout and mesh generation without rasterising anything.
#[derive(Debug)]
pub struct FixedFont {
    cell_width: f32,
    cell_height: f32,
    texture: TextureHandle,
}

impl FixedFont {
    #[must_use]
    pub fn new(device: &mut dyn GraphicsDevice, size: f32) -> Self {
        let cell_width = size * 0.5;
        let cell_height = size;
        let texture = device.create_texture(
            (cell_width * ATLAS_COLUMNS as f32).ceil() as u32,
            (cell_height * ATLAS_ROWS as f32).ceil() as u32,
        );
        Self {
            cell_width,
            cell_height,
            texture,
        }
    }
}

impl SpriteFont for FixedFont {
    fn glyph(&self, character: char) -> Glyph {
        let code = if character.is_ascii() {
            character as u32
        } else {
            FALLBACK_CHARACTER as u32
        };
        let column = code % ATLAS_COLUMNS;
        let row = code / ATLAS_COLUMNS;
        Glyph {
            width: self.cell_width,
            height: self.cell_height,
            u: column as f32 / ATLAS_COLUMNS as f32,
            v: row as f32 / ATLAS_ROWS as f32,
            uv_width: 1.0 / ATLAS_COLUMNS as f32,
            uv_height: 1.0 / ATLAS_ROWS as f32,
        }
    }

    fn texture(&self) -> TextureHandle {
        self.texture
    }
}

/// Provider handing out [`FixedFont`]s. The font family is irrelevant to
/// fixed metrics and is ignored.
#[derive(Debug, Default)]
pub struct FixedFontProvider;

impl FontProvider for FixedFontProvider {
    fn create_font(
        &mut self,
        device: &mut dyn GraphicsDevice,
        _family: &str,
        size: f32,
    ) -> Rc<dyn SpriteFont> {
        Rc::new(FixedFont::new(device, size))
    }
}
