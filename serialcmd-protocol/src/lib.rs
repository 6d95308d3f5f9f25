//! serialcmd Protocol Engine
//!
//! This crate implements the peripheral side of a one-request-at-a-time
//! binary command protocol running over a single byte channel.
//!
//! # Protocol Overview
//!
//! On startup the peripheral announces itself once:
//! ```text
//! ┌─────────┐
//! │ VERSION │
//! │ 1B      │
//! └─────────┘
//! ```
//!
//! Every request and its response then look like:
//! ```text
//! Host → Peripheral   ┌────────────┬──────────────────────────┐
//!                     │ COMMAND ID │ ARGUMENTS                │
//!                     │ 1B         │ fixed width per command  │
//!                     └────────────┴──────────────────────────┘
//! Peripheral → Host   ┌────────────┬──────────────────────────┐
//!                     │ STATUS     │ RESPONSE                 │
//!                     │ 1B         │ only if STATUS == 0x00   │
//!                     └────────────┴──────────────────────────┘
//! ```
//!
//! All multi-byte scalars are little-endian and records carry no padding,
//! so both peers must agree on each command's argument and response layout.
//!
//! # Components
//!
//! - [`Serializer`] - typed reads and writes over a [`ByteChannel`]
//! - [`Command`] / [`Handler`] - one device action with typed arguments
//! - [`CommandTable`] - dense id → handler mapping
//! - [`Protocol`] - handshake and serve loop
//!
//! [`ByteChannel`]: serialcmd_hal::ByteChannel

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod engine;
pub mod handler;
pub mod serializer;
pub mod status;
pub mod table;
pub mod wire;

pub use serialcmd_hal as hal;

pub use engine::{EngineState, Protocol, Served, Stats};
pub use handler::{Command, Handler};
pub use serializer::Serializer;
pub use status::{ErrorCode, Status};
pub use table::{CommandInfo, CommandTable, Commands, TableError, UnknownCommand, MAX_COMMANDS};
pub use wire::Wire;
