//! # easel_core
//!
//! The entity-component kernel of the easel engine:
//!
//! - [`Entity`] / [`EntityId`]: identity, component map, hierarchy links,
//!   and per-entity observers.
//! - [`Component`]: the capability contract every component implements,
//!   with shared dirty/enabled/owner state.
//! - [`Capability`]: the closed set of capability tags.
//! - [`EntityManager`]: the owning arena, covering id minting,
//!   registration, hierarchy edits, and cached capability-filtered queries.
//! - [`CapabilityFilter`] / [`FilterKey`]: order-independent query filters.
//! - [`Controller`] / [`TickContext`]: per-tick processors driven by the
//!   application loop.
//!
//! Rendering, scene components, and the application shell live in the
//! `easel_gfx`, `easel_scene`, and `easel_app` crates.

pub mod component;
pub mod controller;
pub mod entity;
pub mod error;
pub mod events;
pub mod filter;
pub mod manager;

pub use component::{Capability, Component, ComponentState};
pub use controller::{Controller, TickContext};
pub use entity::{Entity, EntityId};
pub use error::EcsError;
pub use events::{ComponentEvent, ObserverId, ObserverList};
pub use filter::{CapabilityFilter, FilterKey};
pub use manager::{EntityManager, RemovePolicy};
