//! RP2040 board support for serialcmd peripherals
//!
//! This crate implements the `serialcmd-hal` device traits on top of
//! embassy-rp:
//!
//! - Numbered GPIO backed by `Flex` pins
//! - Millisecond clock backed by the embassy time driver
//! - UART pin mapping and line configuration

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod uart;

pub use clock::EmbassyClock;
pub use gpio::{FlexGpio, GPIO_COUNT};
pub use uart::{uart_config, UartId};

use serialcmd_hal::{Clock, Gpio, GpioError, Level, PinMode};

/// Everything the standard command set needs from an RP2040
pub struct Rp2040Board {
    gpio: FlexGpio,
    clock: EmbassyClock,
}

impl Rp2040Board {
    /// Combine attached pins with the embassy clock
    pub fn new(gpio: FlexGpio) -> Self {
        Self {
            gpio,
            clock: EmbassyClock::new(),
        }
    }

    pub fn gpio(&self) -> &FlexGpio {
        &self.gpio
    }
}

impl Gpio for Rp2040Board {
    fn pin_count(&self) -> u8 {
        self.gpio.pin_count()
    }

    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), GpioError> {
        self.gpio.set_mode(pin, mode)
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), GpioError> {
        self.gpio.write(pin, level)
    }

    fn read(&mut self, pin: u8) -> Result<Level, GpioError> {
        self.gpio.read(pin)
    }
}

impl Clock for Rp2040Board {
    fn millis(&self) -> u32 {
        self.clock.millis()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms)
    }
}
