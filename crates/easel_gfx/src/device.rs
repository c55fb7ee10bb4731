//! The graphics device contract and its silent headless implementation.
//!
//! Controllers talk to the device exclusively through [`GraphicsDevice`];
//! everything behind the trait is opaque. Resources are referred to by
//! opaque handles minted by the device, and the engine only ever hands the
//! device already-computed matrices and assembled mesh data.

use easel_math::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

use crate::mesh::MeshData;

// ── Resource handles ────────────────────────────────────────────────────────

/// Opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShaderHandle(u64);

/// Opaque handle to a device texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextureHandle(u64);

/// Opaque handle to an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeshHandle(u64);

macro_rules! handle_impl {
    ($name:ident) => {
        impl $name {
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn id(self) -> u64 {
                self.0
            }
        }
    };
}

handle_impl!(ShaderHandle);
handle_impl!(TextureHandle);
handle_impl!(MeshHandle);

// ── Draw-state vocabulary ───────────────────────────────────────────────────

/// The shader uniforms the engine uploads each draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Uniform {
    /// Model matrix of the entity being drawn.
    Model,
    /// View matrix of the active camera.
    View,
    /// Projection matrix of the active camera.
    Projection,
    /// Normal matrix (identity until lighting lands).
    Normal,
    /// Diffuse texture sampler.
    Sampler,
}

/// How batched vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    Triangles,
}

/// One interleaved vertex for immediate-mode batching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchVertex {
    pub position: easel_math::Vec3,
    pub normal: easel_math::Vec3,
    pub uv: easel_math::Vec2,
}

impl BatchVertex {
    #[must_use]
    pub const fn new(
        position: easel_math::Vec3,
        normal: easel_math::Vec3,
        uv: easel_math::Vec2,
    ) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

// ── The device contract ─────────────────────────────────────────────────────

/// Everything the engine asks of a rendering backend.
///
/// Implementations own all GPU state. The engine calls these in a strict
/// per-frame order (clear, bind, uniforms, draws) and never reads anything
/// back, so a backend is free to be a real GPU, a software rasteriser, or
/// nothing at all.
pub trait GraphicsDevice {
    /// Resize the output surface.
    fn set_size(&mut self, width: f32, height: f32);

    /// Clear the colour buffer.
    fn clear(&mut self, color: Vec4);

    /// Compile and link a shader program from source.
    fn create_shader(&mut self, vertex_source: &str, fragment_source: &str) -> ShaderHandle;

    /// Make a shader program current for subsequent uniforms and draws.
    fn bind_shader(&mut self, shader: ShaderHandle);

    /// Upload a matrix uniform to the bound shader.
    fn set_uniform_mat4(&mut self, uniform: Uniform, matrix: Mat4);

    /// Point a sampler uniform of the bound shader at a texture.
    fn set_uniform_texture(&mut self, uniform: Uniform, texture: TextureHandle);

    /// Allocate an empty texture of the given pixel dimensions.
    fn create_texture(&mut self, width: u32, height: u32) -> TextureHandle;

    /// Upload mesh data, returning the handle to draw it by.
    fn create_mesh(&mut self, data: &MeshData) -> MeshHandle;

    /// Release an uploaded mesh. The handle is dead afterwards.
    fn destroy_mesh(&mut self, mesh: MeshHandle);

    /// Draw an uploaded mesh with the current shader and uniforms.
    fn draw_mesh(&mut self, mesh: MeshHandle);

    /// Start an immediate-mode primitive batch.
    fn begin_batch(&mut self, topology: PrimitiveTopology, estimated_primitives: usize);

    /// Append one vertex to the open batch.
    fn add_vertex(&mut self, vertex: BatchVertex);

    /// Flush and close the open batch.
    fn end_batch(&mut self);
}

// ── Headless implementation ─────────────────────────────────────────────────

/// A device that accepts every call and renders nothing.
///
/// Handles are minted monotonically so resource identity still behaves like
/// a real backend. Used by the demo binary to run the full engine headless.
#[derive(Debug, Default)]
pub struct NullDevice {
    width: f32,
    height: f32,
    next_handle: u64,
}

impl NullDevice {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            next_handle: 1,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    fn mint(&mut self) -> u64 {
        let raw = self.next_handle;
        self.next_handle += 1;
        raw
    }
}

impl GraphicsDevice for NullDevice {
    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self, _color: Vec4) {}

    fn create_shader(&mut self, _vertex_source: &str, _fragment_source: &str) -> ShaderHandle {
        ShaderHandle::from_raw(self.mint())
    }

    fn bind_shader(&mut self, _shader: ShaderHandle) {}

    fn set_uniform_mat4(&mut self, _uniform: Uniform, _matrix: Mat4) {}

    fn set_uniform_texture(&mut self, _uniform: Uniform, _texture: TextureHandle) {}

    fn create_texture(&mut self, _width: u32, _height: u32) -> TextureHandle {
        TextureHandle::from_raw(self.mint())
    }

    fn create_mesh(&mut self, _data: &MeshData) -> MeshHandle {
        MeshHandle::from_raw(self.mint())
    }

    fn destroy_mesh(&mut self, _mesh: MeshHandle) {}

    fn draw_mesh(&mut self, _mesh: MeshHandle) {}

    fn begin_batch(&mut self, _topology: PrimitiveTopology, _estimated_primitives: usize) {}

    fn add_vertex(&mut self, _vertex: BatchVertex) {}

    fn end_batch(&mut self) {}
}
