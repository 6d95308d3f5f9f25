//! GPIO pin abstractions
//!
//! Pins are addressed by number, the way the host names them on the wire.
//! Implementations map numbers to the chip's actual pins.

/// Pin direction and pull configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input
    Input,
    /// Push-pull output
    Output,
    /// Input with the internal pull-up enabled
    InputPullup,
}

impl PinMode {
    /// Decode a mode from its wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(PinMode::Input),
            0x01 => Some(PinMode::Output),
            0x02 => Some(PinMode::InputPullup),
            _ => None,
        }
    }

    /// Wire value of this mode
    pub fn to_byte(self) -> u8 {
        match self {
            PinMode::Input => 0x00,
            PinMode::Output => 0x01,
            PinMode::InputPullup => 0x02,
        }
    }
}

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    /// Any non-zero byte is high
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    /// `0x00` for low, `0x01` for high
    pub fn to_byte(self) -> u8 {
        match self {
            Level::Low => 0x00,
            Level::High => 0x01,
        }
    }

    /// Check if the level is high
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Errors that can occur with pin operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// No pin with this number exists on the board
    InvalidPin,
    /// The pin cannot be used this way (e.g. reserved for the serial link)
    Unsupported,
    /// The hardware reported a fault
    Fault,
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GpioError::InvalidPin => f.write_str("invalid pin"),
            GpioError::Unsupported => f.write_str("pin operation not supported"),
            GpioError::Fault => f.write_str("pin hardware fault"),
        }
    }
}

/// Numbered digital I/O
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait Gpio {
    /// Number of addressable pins; valid pin numbers are `0..pin_count()`
    fn pin_count(&self) -> u8;

    /// Configure a pin's direction and pull
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), GpioError>;

    /// Drive an output pin
    fn write(&mut self, pin: u8, level: Level) -> Result<(), GpioError>;

    /// Sample a pin
    fn read(&mut self, pin: u8) -> Result<Level, GpioError>;

    /// Check if a pin number is in range
    fn is_valid_pin(&self, pin: u8) -> bool {
        pin < self.pin_count()
    }
}
