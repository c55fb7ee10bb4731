//! The view component: look-at state on cameras, viewport state on panes.

use easel_core::{Capability, Component, ComponentState, EntityId};
use easel_math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Look-at target, cached view matrix, and viewport wiring.
///
/// On a camera entity the interesting parts are `target`, the matrix, and
/// `render_groups` (which grouped meshes this camera draws; a camera with no
/// groups draws ungrouped meshes). On a view pane the component doubles as
/// the viewport state machine: `initialised` flips once the pane's two
/// dependent cameras exist, and `scene_camera`/`layer_camera` point at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    state: ComponentState,
    pub target: Vec3,
    matrix: Mat4,
    pub initialised: bool,
    pub scene_camera: Option<EntityId>,
    pub layer_camera: Option<EntityId>,
    pub group_scene: String,
    pub group_gui: String,
    render_groups: Vec<String>,
}

impl View {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ComponentState::new(),
            target: Vec3::ZERO,
            matrix: Mat4::IDENTITY,
            initialised: false,
            scene_camera: None,
            layer_camera: None,
            group_scene: String::new(),
            group_gui: String::new(),
            render_groups: Vec::new(),
        }
    }

    /// The cached view matrix. Identity until the first recompute.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Rebuild the view matrix for a camera at `eye` looking at the target.
    /// Does not touch the dirty flag; the calling controller clears it once
    /// consumed.
    pub fn recompute(&mut self, eye: Vec3) {
        self.matrix = Mat4::look_at_rh(eye, self.target, Vec3::Y);
    }

    /// Groups this camera draws.
    #[must_use]
    pub fn render_groups(&self) -> &[String] {
        &self.render_groups
    }

    /// Add a render group, ignoring duplicates.
    pub fn add_render_group(&mut self, group: impl Into<String>) {
        let group = group.into();
        if !self.render_groups.contains(&group) {
            self.render_groups.push(group);
        }
    }

    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.render_groups.iter().any(|g| g == group)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for View {
    fn kind() -> Capability {
        Capability::View
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
