//! # easel_gfx
//!
//! The rendering seam of the easel engine:
//!
//! - [`GraphicsDevice`]: the backend contract for the surface, shaders,
//!   uniforms, textures, meshes, and immediate-mode batches, all behind
//!   opaque handles.
//! - [`MeshData`] / [`MeshBuilder`] / [`Mesh`]: CPU-side geometry and lazy
//!   device upload.
//! - [`SpriteFont`] / [`FontProvider`]: glyph metrics over an atlas
//!   texture, with [`FixedFont`] as the headless implementation.
//! - [`NullDevice`] and [`RecordingDevice`]: headless backends for demos
//!   and tests.

pub mod device;
pub mod font;
pub mod mesh;
pub mod recording;

pub use device::{
    BatchVertex, GraphicsDevice, MeshHandle, NullDevice, PrimitiveTopology, ShaderHandle,
    TextureHandle, Uniform,
};
pub use font::{FixedFont, FixedFontProvider, FontProvider, Glyph, SpriteFont};
pub use mesh::{Mesh, MeshBuilder, MeshData};
pub use recording::{DeviceOp, RecordingDevice};
