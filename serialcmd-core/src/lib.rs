//! Board-agnostic command set for serialcmd peripherals
//!
//! This crate contains everything between the protocol engine and a
//! concrete board:
//!
//! - Device configuration (version byte, pin budget, reserved pins)
//! - The device context handlers run against
//! - The standard pin and timing commands and their wire records

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod config;
pub mod device;

pub use commands::{standard_commands, COMMAND_COUNT};
pub use config::{ConfigError, DeviceConfig};
pub use device::Device;
