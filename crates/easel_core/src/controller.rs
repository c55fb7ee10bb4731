//! Per-tick processors bound to a capability filter.

use crate::error::EcsError;
use crate::filter::CapabilityFilter;
use crate::manager::EntityManager;

/// Timing information handed to every controller each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Monotonically increasing tick counter, starting at 1.
    pub tick_id: u64,
    /// Seconds elapsed since the application started.
    pub time: f64,
    /// Seconds covered by this tick.
    pub dt: f64,
}

impl TickContext {
    #[must_use]
    pub fn new(tick_id: u64, time: f64, dt: f64) -> Self {
        Self { tick_id, time, dt }
    }
}

/// A unit of per-tick behaviour over entities selected by capability.
///
/// Controllers snapshot their matching entities from the manager and then
/// work through the snapshot, so they are free to create or remove entities
/// mid-pass. Flags a controller raises are consumed by whoever reads them
/// next, whether later the same tick or on the following one.
pub trait Controller {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// The capability filter selecting the entities this controller visits.
    fn filter(&self) -> &CapabilityFilter;

    /// Run one tick over the matching entities.
    fn update(&mut self, manager: &mut EntityManager, ctx: &TickContext) -> Result<(), EcsError>;
}
