//! Projection parameters and the cached projection matrix.

use easel_core::{Capability, Component, ComponentState};
use easel_math::Mat4;
use serde::{Deserialize, Serialize};

/// Which projection a camera applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Perspective projection with a vertical field of view in degrees.
    Perspective { fov_degrees: f32 },
    /// Screen-space orthographic projection, y-down with the origin at the
    /// top-left corner.
    Orthographic,
}

/// Camera projection state.
///
/// Width/height track the viewport the camera renders into; whoever changes
/// them marks the component dirty, and the camera controller recomputes the
/// matrix on its next pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    state: ComponentState,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
    pub kind: ProjectionKind,
    matrix: Mat4,
}

impl Projection {
    #[must_use]
    pub fn perspective(width: f32, height: f32, near: f32, far: f32, fov_degrees: f32) -> Self {
        Self {
            state: ComponentState::new(),
            width,
            height,
            near,
            far,
            kind: ProjectionKind::Perspective { fov_degrees },
            matrix: Mat4::IDENTITY,
        }
    }

    #[must_use]
    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        Self {
            state: ComponentState::new(),
            width,
            height,
            near,
            far,
            kind: ProjectionKind::Orthographic,
            matrix: Mat4::IDENTITY,
        }
    }

    /// The cached projection matrix. Identity until the first recompute.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Rebuild the matrix from the current parameters. Does not touch the
    /// dirty flag; the calling controller clears it once consumed.
    pub fn recompute(&mut self) {
        self.matrix = match self.kind {
            ProjectionKind::Perspective { fov_degrees } => Mat4::perspective_rh(
                fov_degrees.to_radians(),
                self.width / self.height,
                self.near,
                self.far,
            ),
            ProjectionKind::Orthographic => {
                Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, self.near, self.far)
            }
        };
    }
}

impl Component for Projection {
    fn kind() -> Capability {
        Capability::Projection
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
