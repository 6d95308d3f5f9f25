//! Device context
//!
//! The value command handlers act on: the board's capabilities plus the
//! configuration that restricts which pins commands may touch.

use serialcmd_hal::{Board, GpioError};
use serialcmd_protocol::ErrorCode;

use crate::config::DeviceConfig;

/// A board together with its configuration
#[derive(Debug)]
pub struct Device<B> {
    board: B,
    config: DeviceConfig,
}

impl<B: Board> Device<B> {
    /// Pair a board with its configuration
    pub fn new(board: B, config: DeviceConfig) -> Self {
        Self { board, config }
    }

    /// Pins commands may address
    ///
    /// The smaller of the configured count and what the board offers.
    pub fn pin_count(&self) -> u8 {
        self.config.pin_count.min(self.board.pin_count())
    }

    /// Reject pins that are out of range or reserved
    pub fn check_pin(&self, pin: u8) -> Result<(), ErrorCode> {
        if pin >= self.pin_count() || self.config.is_reserved(pin) {
            return Err(ErrorCode::FAILURE);
        }
        Ok(())
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Tear the device down into its board and configuration
    pub fn into_parts(self) -> (B, DeviceConfig) {
        (self.board, self.config)
    }
}

/// Every hardware fault maps to the generic failure status
pub(crate) fn gpio_failure(_err: GpioError) -> ErrorCode {
    ErrorCode::FAILURE
}
