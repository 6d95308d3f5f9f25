//! Standard command set
//!
//! | id     | command        | arguments             | response |
//! |--------|----------------|-----------------------|----------|
//! | `0x00` | `pinMode`      | `pin: u8, mode: u8`   | -        |
//! | `0x01` | `digitalWrite` | `pin: u8, state: u8`  | -        |
//! | `0x02` | `digitalRead`  | `pin: u8`             | `u8`     |
//! | `0x03` | `millis`       | -                     | `u32`    |
//! | `0x04` | `delay`        | `duration_ms: u32`    | -        |
//!
//! A rejected pin or mode answers `0x01` and leaves the hardware untouched.

use serialcmd_hal::{Board, ByteChannel, Level, PinMode};
use serialcmd_protocol::{wire_record, Command, ErrorCode, Handler};

use crate::device::{gpio_failure, Device};

pub const PIN_MODE: u8 = 0x00;
pub const DIGITAL_WRITE: u8 = 0x01;
pub const DIGITAL_READ: u8 = 0x02;
pub const MILLIS: u8 = 0x03;
pub const DELAY: u8 = 0x04;

/// Number of standard commands
pub const COMMAND_COUNT: usize = 5;

wire_record! {
    /// Arguments of `pinMode`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PinModeArgs {
        pub pin: u8,
        /// `0x00` input, `0x01` output, `0x02` input with pull-up
        pub mode: u8,
    }
}

wire_record! {
    /// Arguments of `digitalWrite`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct DigitalWriteArgs {
        pub pin: u8,
        /// Zero drives low, anything else drives high
        pub state: u8,
    }
}

wire_record! {
    /// Arguments of `digitalRead`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct DigitalReadArgs {
        pub pin: u8,
    }
}

wire_record! {
    /// Arguments of `delay`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct DelayArgs {
        pub duration_ms: u32,
    }
}

/// Configure a pin's direction and pull
pub struct PinModeCmd;

impl<B: Board> Command<Device<B>> for PinModeCmd {
    const NAME: &'static str = "pinMode";
    type Args = PinModeArgs;
    type Response = ();

    fn execute(&self, device: &mut Device<B>, args: PinModeArgs) -> Result<(), ErrorCode> {
        device.check_pin(args.pin)?;
        let mode = PinMode::from_byte(args.mode).ok_or(ErrorCode::FAILURE)?;
        device
            .board_mut()
            .set_mode(args.pin, mode)
            .map_err(gpio_failure)
    }
}

/// Drive a pin high or low
pub struct DigitalWriteCmd;

impl<B: Board> Command<Device<B>> for DigitalWriteCmd {
    const NAME: &'static str = "digitalWrite";
    type Args = DigitalWriteArgs;
    type Response = ();

    fn execute(&self, device: &mut Device<B>, args: DigitalWriteArgs) -> Result<(), ErrorCode> {
        device.check_pin(args.pin)?;
        device
            .board_mut()
            .write(args.pin, Level::from_byte(args.state))
            .map_err(gpio_failure)
    }
}

/// Sample a pin, answering `0x00` or `0x01`
pub struct DigitalReadCmd;

impl<B: Board> Command<Device<B>> for DigitalReadCmd {
    const NAME: &'static str = "digitalRead";
    type Args = DigitalReadArgs;
    type Response = u8;

    fn execute(&self, device: &mut Device<B>, args: DigitalReadArgs) -> Result<u8, ErrorCode> {
        device.check_pin(args.pin)?;
        let level = device.board_mut().read(args.pin).map_err(gpio_failure)?;
        Ok(level.to_byte())
    }
}

/// Milliseconds since boot
pub struct MillisCmd;

impl<B: Board> Command<Device<B>> for MillisCmd {
    const NAME: &'static str = "millis";
    type Args = ();
    type Response = u32;

    fn execute(&self, device: &mut Device<B>, _args: ()) -> Result<u32, ErrorCode> {
        Ok(device.board().millis())
    }
}

/// Block the serve loop; the status is sent once the delay has elapsed
pub struct DelayCmd;

impl<B: Board> Command<Device<B>> for DelayCmd {
    const NAME: &'static str = "delay";
    type Args = DelayArgs;
    type Response = ();

    fn execute(&self, device: &mut Device<B>, args: DelayArgs) -> Result<(), ErrorCode> {
        device.board_mut().delay_ms(args.duration_ms);
        Ok(())
    }
}

/// Handlers for the standard command set, indexed by command id
pub fn standard_commands<'a, C, B>() -> [&'a dyn Handler<C, Device<B>>; COMMAND_COUNT]
where
    C: ByteChannel + 'a,
    B: Board + 'a,
{
    [
        &PinModeCmd,
        &DigitalWriteCmd,
        &DigitalReadCmd,
        &MillisCmd,
        &DelayCmd,
    ]
}
