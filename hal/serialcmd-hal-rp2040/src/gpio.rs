//! Numbered GPIO over embassy `Flex` pins
//!
//! Pins are attached at startup by number. Numbers without an attached pin
//! (e.g. the UART pair) answer [`GpioError::Unsupported`].

use embassy_rp::gpio::{Flex, Pull};
use serialcmd_hal::{Gpio, GpioError, Level, PinMode};

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Pin slots indexed by GPIO number
pub struct FlexGpio {
    slots: [Option<Flex<'static>>; GPIO_COUNT],
}

impl Default for FlexGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexGpio {
    /// Create a bank with no pins attached
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Attach a pin under its GPIO number
    ///
    /// Returns `Err(GpioError::Unsupported)` if the number is already taken.
    pub fn attach(&mut self, pin: u8, flex: Flex<'static>) -> Result<(), GpioError> {
        let slot = self
            .slots
            .get_mut(usize::from(pin))
            .ok_or(GpioError::InvalidPin)?;
        if slot.is_some() {
            return Err(GpioError::Unsupported);
        }
        *slot = Some(flex);
        Ok(())
    }

    /// Detach a pin, handing it back
    pub fn detach(&mut self, pin: u8) -> Option<Flex<'static>> {
        self.slots.get_mut(usize::from(pin))?.take()
    }

    /// Check if a pin is attached
    pub fn is_attached(&self, pin: u8) -> bool {
        matches!(self.slots.get(usize::from(pin)), Some(Some(_)))
    }

    /// Number of attached pins
    pub fn attached_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn slot(&mut self, pin: u8) -> Result<&mut Flex<'static>, GpioError> {
        self.slots
            .get_mut(usize::from(pin))
            .ok_or(GpioError::InvalidPin)?
            .as_mut()
            .ok_or(GpioError::Unsupported)
    }
}

impl Gpio for FlexGpio {
    fn pin_count(&self) -> u8 {
        GPIO_COUNT as u8
    }

    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), GpioError> {
        let flex = self.slot(pin)?;
        match mode {
            PinMode::Input => {
                flex.set_pull(Pull::None);
                flex.set_as_input();
            }
            PinMode::InputPullup => {
                flex.set_pull(Pull::Up);
                flex.set_as_input();
            }
            PinMode::Output => flex.set_as_output(),
        }
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), GpioError> {
        let flex = self.slot(pin)?;
        if level.is_high() {
            flex.set_high();
        } else {
            flex.set_low();
        }
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<Level, GpioError> {
        let flex = self.slot(pin)?;
        Ok(Level::from(flex.is_high()))
    }
}
