//! # easel_scene
//!
//! Scene-level building blocks on top of the `easel_core` kernel:
//!
//! - Components: [`Transform`], [`Projection`], [`View`], [`GuiElement`],
//!   [`GuiText`], [`MeshFilter`], [`MeshRenderer`].
//! - [`templates`]: composite entity recipes (cameras, view panes, text
//!   blocks) assembled atomically before registration.
//! - Controllers, in their intended tick order: [`CameraController`]
//!   (matrix recompute), [`GuiTextController`] (text meshes),
//!   [`ViewController`] (viewport cascade), [`RenderController`] (draw
//!   pass).

pub mod camera;
pub mod gui;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod templates;
pub mod text;
pub mod transform;
pub mod view;
pub mod viewport;

pub use camera::CameraController;
pub use gui::{GuiElement, GuiText};
pub use mesh::{Material, MeshFilter, MeshRenderer};
pub use projection::{Projection, ProjectionKind};
pub use render::RenderController;
pub use text::GuiTextController;
pub use transform::Transform;
pub use view::View;
pub use viewport::ViewController;
