//! A device that records every call it receives.
//!
//! [`RecordingDevice`] is the assertion target for controller and render
//! tests: run a pass, then inspect the op log for exactly the clears,
//! uploads, and draws the pass should have issued.

use std::collections::BTreeSet;

use easel_math::{Mat4, Vec4};

use crate::device::{
    BatchVertex, GraphicsDevice, MeshHandle, PrimitiveTopology, ShaderHandle, TextureHandle,
    Uniform,
};
use crate::mesh::MeshData;

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOp {
    SetSize { width: f32, height: f32 },
    Clear { color: Vec4 },
    CreateShader { shader: ShaderHandle },
    BindShader { shader: ShaderHandle },
    SetUniformMat4 { uniform: Uniform, matrix: Mat4 },
    SetUniformTexture { uniform: Uniform, texture: TextureHandle },
    CreateTexture { texture: TextureHandle, width: u32, height: u32 },
    CreateMesh { mesh: MeshHandle, vertices: u32, triangles: u32 },
    DestroyMesh { mesh: MeshHandle },
    DrawMesh { mesh: MeshHandle },
    BeginBatch { topology: PrimitiveTopology, estimated_primitives: usize },
    AddVertex { vertex: BatchVertex },
    EndBatch,
}

/// Headless device keeping a full op log plus the set of live meshes.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    ops: Vec<DeviceOp>,
    next_handle: u64,
    live_meshes: BTreeSet<MeshHandle>,
}

impl RecordingDevice {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            next_handle: 1,
            live_meshes: BTreeSet::new(),
        }
    }

    /// Every call recorded so far, in order.
    #[must_use]
    pub fn ops(&self) -> &[DeviceOp] {
        &self.ops
    }

    /// Drain the log, leaving resource state intact. Lets a test discard
    /// setup traffic and assert on one pass in isolation.
    pub fn take_ops(&mut self) -> Vec<DeviceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Meshes created and not yet destroyed.
    #[must_use]
    pub fn live_mesh_count(&self) -> usize {
        self.live_meshes.len()
    }

    fn mint(&mut self) -> u64 {
        let raw = self.next_handle;
        self.next_handle += 1;
        raw
    }
}

impl GraphicsDevice for RecordingDevice {
    fn set_size(&mut self, width: f32, height: f32) {
        self.ops.push(DeviceOp::SetSize { width, height });
    }

    fn clear(&mut self, color: Vec4) {
        self.ops.push(DeviceOp::Clear { color });
    }

    fn create_shader(&mut self, _vertex_source: &str, _fragment_source: &str) -> ShaderHandle {
        let shader = ShaderHandle::from_raw(self.mint());
        self.ops.push(DeviceOp::CreateShader { shader });
        shader
    }

    fn bind_shader(&mut self, shader: ShaderHandle) {
        self.ops.push(DeviceOp::BindShader { shader });
    }

    fn set_uniform_mat4(&mut self, uniform: Uniform, matrix: Mat4) {
        self.ops.push(DeviceOp::SetUniformMat4 { uniform, matrix });
    }

    fn set_uniform_texture(&mut self, uniform: Uniform, texture: TextureHandle) {
        self.ops.push(DeviceOp::SetUniformTexture { uniform, texture });
    }

    fn create_texture(&mut self, width: u32, height: u32) -> TextureHandle {
        let texture = TextureHandle::from_raw(self.mint());
        self.ops.push(DeviceOp::CreateTexture {
            texture,
            width,
            height,
        });
        texture
    }

    fn create_mesh(&mut self, data: &MeshData) -> MeshHandle {
        let mesh = MeshHandle::from_raw(self.mint());
        self.live_meshes.insert(mesh);
        self.ops.push(DeviceOp::CreateMesh {
            mesh,
            vertices: data.vertex_count(),
            triangles: data.triangle_count(),
        });
        mesh
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        self.live_meshes.remove(&mesh);
        self.ops.push(DeviceOp::DestroyMesh { mesh });
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        self.ops.push(DeviceOp::DrawMesh { mesh });
    }

    fn begin_batch(&mut self, topology: PrimitiveTopology, estimated_primitives: usize) {
        self.ops.push(DeviceOp::BeginBatch {
            topology,
            estimated_primitives,
        });
    }

    fn add_vertex(&mut self, vertex: BatchVertex) {
        self.ops.push(DeviceOp::AddVertex { vertex });
    }

    fn end_batch(&mut self) {
        self.ops.push(DeviceOp::EndBatch);
    }
}
