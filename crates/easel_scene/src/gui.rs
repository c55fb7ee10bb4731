//! GUI components: element bounds and text content.

use easel_core::{Capability, Component, ComponentState};
use easel_math::Rectangle;
use serde::{Deserialize, Serialize};

/// A GUI element's placement on screen.
///
/// Resizing the rectangle and marking the component dirty kicks off the
/// viewport cascade on the next view-controller pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiElement {
    state: ComponentState,
    pub bounding_rect: Rectangle,
}

impl GuiElement {
    #[must_use]
    pub fn new(bounding_rect: Rectangle) -> Self {
        Self {
            state: ComponentState::new(),
            bounding_rect,
        }
    }
}

impl Component for GuiElement {
    fn kind() -> Capability {
        Capability::GuiElement
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

/// Text rendered inside a GUI element's bounding rectangle.
///
/// Any change to the content or font fields must be followed by
/// `set_dirty(true)` so the text controller regenerates the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiText {
    state: ComponentState,
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
}

impl GuiText {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            state: ComponentState::new(),
            content: content.into(),
            font_family: "monospace".to_string(),
            font_size: 16.0,
            line_height: 20.0,
        }
    }

    #[must_use]
    pub fn with_font(mut self, family: impl Into<String>, size: f32) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// The style key fonts are cached under.
    #[must_use]
    pub fn font_style(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }
}

impl Component for GuiText {
    fn kind() -> Capability {
        Capability::GuiText
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
