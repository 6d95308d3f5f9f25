//! serialcmd Hardware Abstraction Layer
//!
//! This crate defines the collaborators the protocol engine talks to: the
//! byte channel carrying the wire traffic and the device capabilities the
//! command handlers act on. Chip-specific crates implement them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  serialcmd-protocol / serialcmd-core    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  serialcmd-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ serialcmd-hal-│       │  MockChannel  │
//! │    rp2040     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`channel::ByteChannel`] - Blocking duplex byte stream
//! - [`gpio::Gpio`] - Numbered digital I/O pins
//! - [`clock::Clock`] - Elapsed time and busy delays
//! - [`Board`] - Everything a command handler may touch

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod clock;
pub mod gpio;
pub mod io;
pub mod mock;

// Re-export key traits at crate root for convenience
pub use channel::{ByteChannel, ChannelConfig, DataBits, Parity, StopBits};
pub use clock::Clock;
pub use gpio::{Gpio, GpioError, Level, PinMode};
pub use io::IoChannel;
pub use mock::{MockChannel, MockError};

/// Device capabilities available to command handlers
///
/// A board offers numbered GPIO pins and a millisecond clock.
pub trait Board: Gpio + Clock {}

// Blanket implementation
impl<T: Gpio + Clock> Board for T {}
