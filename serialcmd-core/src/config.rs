//! Device configuration
//!
//! Compile-time or boot-time settings of a peripheral. Nothing here is
//! exchanged on the wire except the version byte announced at startup.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of reserved pins
pub const MAX_RESERVED_PINS: usize = 8;

/// Protocol version announced by the reference device
pub const DEFAULT_VERSION: u8 = 0x01;

/// Pin count of the reference device
pub const DEFAULT_PIN_COUNT: u8 = 20;

/// Serial speed of the reference device
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A device without pins cannot serve pin commands
    NoPins,
    /// Baudrate of zero
    InvalidBaudrate,
    /// A reserved pin lies outside `0..pin_count`
    ReservedPinOutOfRange(u8),
    /// The same pin is reserved twice
    DuplicateReservedPin(u8),
    /// More than [`MAX_RESERVED_PINS`] reserved pins
    TooManyReservedPins,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NoPins => f.write_str("pin count must be non-zero"),
            ConfigError::InvalidBaudrate => f.write_str("baudrate must be non-zero"),
            ConfigError::ReservedPinOutOfRange(pin) => {
                write!(f, "reserved pin {} is out of range", pin)
            }
            ConfigError::DuplicateReservedPin(pin) => {
                write!(f, "pin {} is reserved twice", pin)
            }
            ConfigError::TooManyReservedPins => {
                write!(f, "at most {} pins can be reserved", MAX_RESERVED_PINS)
            }
        }
    }
}

/// Peripheral settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Version byte announced once at startup
    pub version: u8,
    /// Pins addressable by commands; valid numbers are `0..pin_count`
    pub pin_count: u8,
    /// Pins commands may not touch (e.g. the serial link)
    pub reserved_pins: Vec<u8, MAX_RESERVED_PINS>,
    /// Serial speed of the command channel
    pub baudrate: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            pin_count: DEFAULT_PIN_COUNT,
            reserved_pins: Vec::new(),
            baudrate: DEFAULT_BAUDRATE,
        }
    }
}

impl DeviceConfig {
    /// Set the announced version
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Set the number of addressable pins
    pub fn with_pin_count(mut self, pin_count: u8) -> Self {
        self.pin_count = pin_count;
        self
    }

    /// Set the serial speed
    pub fn with_baudrate(mut self, baudrate: u32) -> Self {
        self.baudrate = baudrate;
        self
    }

    /// Reserve a pin so commands cannot reconfigure it
    pub fn with_reserved_pin(mut self, pin: u8) -> Result<Self, ConfigError> {
        self.reserved_pins
            .push(pin)
            .map_err(|_| ConfigError::TooManyReservedPins)?;
        Ok(self)
    }

    /// Check if a pin is reserved
    pub fn is_reserved(&self, pin: u8) -> bool {
        self.reserved_pins.contains(&pin)
    }

    /// Check if commands may address a pin
    pub fn is_usable(&self, pin: u8) -> bool {
        pin < self.pin_count && !self.is_reserved(pin)
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pin_count == 0 {
            return Err(ConfigError::NoPins);
        }
        if self.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        for (i, &pin) in self.reserved_pins.iter().enumerate() {
            if pin >= self.pin_count {
                return Err(ConfigError::ReservedPinOutOfRange(pin));
            }
            if self.reserved_pins[..i].contains(&pin) {
                return Err(ConfigError::DuplicateReservedPin(pin));
            }
        }
        Ok(())
    }
}
