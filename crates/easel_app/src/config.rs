//! Application configuration.

use easel_math::Vec4;

/// Startup settings for an [`Application`](crate::app::Application).
///
/// The defaults describe the stock demo window: 720x480 with a mid-grey
/// clear colour, ticking at 60 Hz until stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backbuffer width in pixels.
    pub width: f32,
    /// Backbuffer height in pixels.
    pub height: f32,
    /// Colour the render pass clears to each tick.
    pub clear_color: Vec4,
    /// Ticks per second for the fixed-timestep loop.
    pub tick_rate: f64,
    /// Stop after this many ticks. `0` means run until interrupted.
    pub max_ticks: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 480.0,
            clear_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_clear_color(mut self, clear_color: Vec4) -> Self {
        self.clear_color = clear_color;
        self
    }

    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}
