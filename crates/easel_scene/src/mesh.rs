//! Mesh slot and material components.

use easel_core::{Capability, Component, ComponentState};
use easel_gfx::{Mesh, TextureHandle};

/// Surface state for drawing a mesh: the diffuse texture plus a change flag
/// a backend can use to avoid redundant rebinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub diffuse_map: Option<TextureHandle>,
    pub dirty: bool,
}

impl Material {
    #[must_use]
    pub fn new() -> Self {
        Self {
            diffuse_map: None,
            dirty: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the mesh an entity renders with.
///
/// The mesh owns a device handle once uploaded; whoever replaces the mesh
/// destroys the old one through the device first.
#[derive(Debug, Default)]
pub struct MeshFilter {
    state: ComponentState,
    pub mesh: Option<Mesh>,
}

impl MeshFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for MeshFilter {
    fn kind() -> Capability {
        Capability::MeshFilter
    }

    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Material plus render-group membership.
///
/// An ungrouped mesh (`render_group == None`) is drawn by cameras that have
/// no render groups of their own; a grouped mesh only by cameras subscribed
/// to its group.
#[derive(Debug, Default)]
pub struct MeshRenderer {
    state: ComponentState,
    pub material: Material,
    pub render_group: Option<String>,
}

impl MeshRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_render_group(mut self, group: impl Into<String>) -> Self {
        self.render_group = Some(group.into());
        self
    }
}

impl Component for MeshRenderer {
    fn kind() -> Capability {
        Capability::MeshRenderer
    }

    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
