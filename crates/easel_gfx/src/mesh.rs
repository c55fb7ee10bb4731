//! CPU-side mesh data, assembly, and the lazily-uploaded mesh wrapper.

use easel_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::device::{GraphicsDevice, MeshHandle};

/// Raw indexed geometry as the device consumes it.
///
/// `normals` and `uvs` are either empty or one entry per position; generated
/// GUI meshes carry uvs only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    #[must_use]
    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Incremental mesh assembly.
///
/// Callers interleave vertex, uv, and triangle appends; [`vertex_count`]
/// gives the base index for the quad being emitted.
///
/// [`vertex_count`]: Self::vertex_count
#[derive(Debug, Default)]
pub struct MeshBuilder {
    data: MeshData,
}

impl MeshBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions appended so far.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.data.vertex_count()
    }

    pub fn add_vertex(&mut self, position: Vec3) {
        self.data.positions.push(position);
    }

    pub fn add_normal(&mut self, normal: Vec3) {
        self.data.normals.push(normal);
    }

    pub fn add_uv(&mut self, uv: Vec2) {
        self.data.uvs.push(uv);
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.data.indices.extend_from_slice(&[a, b, c]);
    }

    /// Finish assembly and hand over the accumulated data.
    #[must_use]
    pub fn build(self) -> MeshData {
        self.data
    }
}

/// A mesh owned by a component: CPU data plus the device handle once
/// uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    data: MeshData,
    handle: Option<MeshHandle>,
}

impl Mesh {
    #[must_use]
    pub fn new(data: MeshData) -> Self {
        Self { data, handle: None }
    }

    #[must_use]
    pub fn data(&self) -> &MeshData {
        &self.data
    }

    #[must_use]
    pub fn handle(&self) -> Option<MeshHandle> {
        self.handle
    }

    /// Upload on first use; later calls return the existing handle.
    pub fn ensure_uploaded(&mut self, device: &mut dyn GraphicsDevice) -> MeshHandle {
        match self.handle {
            Some(handle) => handle,
            None => {
                let handle = device.create_mesh(&self.data);
                self.handle = Some(handle);
                handle
            }
        }
    }

    /// Release the device copy. The CPU data stays intact, so the mesh can
    /// be uploaded again later.
    pub fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(handle) = self.handle.take() {
            device.destroy_mesh(handle);
        }
    }
}
