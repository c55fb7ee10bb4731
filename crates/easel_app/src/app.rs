//! Application shell.
//!
//! Owns the entity manager, the shared graphics device handle and the
//! registered controllers, and drives them with a fixed-timestep loop:
//!
//! - every tick advances the clock by exactly `1 / tick_rate` seconds,
//! - controllers run in registration order and abort the tick on error,
//! - ticks that finish early sleep off the remainder of their budget.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use easel_core::{Controller, EcsError, EntityManager, TickContext};
use easel_gfx::GraphicsDevice;
use tracing::{debug, info, warn};

use crate::config::AppConfig;

pub struct Application {
    config: AppConfig,
    manager: EntityManager,
    device: Rc<RefCell<dyn GraphicsDevice>>,
    controllers: Vec<Box<dyn Controller>>,
    tick_id: u64,
    time: f64,
}

impl Application {
    /// Creates an application around `device`, sized per `config`.
    pub fn new(config: AppConfig, device: Rc<RefCell<dyn GraphicsDevice>>) -> Self {
        device.borrow_mut().set_size(config.width, config.height);
        info!(
            width = config.width,
            height = config.height,
            tick_rate = config.tick_rate,
            "application initialised"
        );
        Self {
            config,
            manager: EntityManager::new(),
            device,
            controllers: Vec::new(),
            tick_id: 0,
            time: 0.0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn manager(&self) -> &EntityManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut EntityManager {
        &mut self.manager
    }

    pub fn device(&self) -> Rc<RefCell<dyn GraphicsDevice>> {
        Rc::clone(&self.device)
    }

    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Seconds of simulated time accumulated across all ticks.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Appends `controller` to the update order.
    pub fn add_controller(&mut self, controller: impl Controller + 'static) {
        info!(controller = controller.name(), "controller registered");
        self.controllers.push(Box::new(controller));
    }

    /// Runs a single tick, advancing the clock by `dt` seconds.
    ///
    /// Controllers execute in registration order; the first error aborts
    /// the tick and is returned to the caller.
    pub fn tick(&mut self, dt: f64) -> Result<(), EcsError> {
        self.tick_id += 1;
        self.time += dt;
        debug!(tick_id = self.tick_id, "tick start");
        let ctx = TickContext::new(self.tick_id, self.time, dt);
        for controller in &mut self.controllers {
            controller.update(&mut self.manager, &ctx)?;
        }
        Ok(())
    }

    /// Resizes the backbuffer and remembers the new dimensions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        self.device.borrow_mut().set_size(width, height);
        debug!(width, height, "backbuffer resized");
    }

    /// Blocks the current thread, ticking at the configured rate until
    /// `max_ticks` is reached (or forever when it is zero).
    pub fn run(&mut self) -> Result<(), EcsError> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let dt = tick_duration.as_secs_f64();
        let mut ticks: u64 = 0;
        info!(tick_rate = self.config.tick_rate, "tick loop starting");
        loop {
            let started = Instant::now();
            self.tick(dt)?;
            ticks += 1;
            if self.config.max_ticks > 0 && ticks >= self.config.max_ticks {
                info!(ticks, "tick loop complete");
                return Ok(());
            }
            let elapsed = started.elapsed();
            if elapsed < tick_duration {
                thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
