//! Millisecond clock on the embassy time driver

use embassy_time::{Delay, Instant};
use embedded_hal::delay::DelayNs;
use serialcmd_hal::Clock;

/// Clock backed by the embassy time driver
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

impl EmbassyClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for EmbassyClock {
    fn millis(&self) -> u32 {
        // Truncation wraps after ~49.7 days, as the host expects
        Instant::now().as_millis() as u32
    }

    fn delay_ms(&mut self, ms: u32) {
        Delay.delay_ms(ms);
    }
}
