//! # easel_math
//!
//! Math types for the easel engine. Re-exports [`glam`] for linear algebra
//! and defines the engine-specific spatial types the GUI layer works in.

pub mod rect;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use rect::Rectangle;
