//! Command handlers
//!
//! A command is written as a typed [`Command`]: it names its argument and
//! response records and implements one device action over already-decoded
//! arguments. The engine stores commands through the object-safe
//! [`Handler`] trait, which is implemented only by the adapter in this
//! module. That adapter always reads the complete argument record before the
//! command sees it, so a command that rejects its arguments cannot leave
//! bytes behind and desynchronize the stream.

use serialcmd_hal::ByteChannel;

use crate::serializer::Serializer;
use crate::status::{ErrorCode, Status};
use crate::wire::Wire;

/// One device action with typed arguments and response
///
/// `D` is the device context the action runs against.
pub trait Command<D> {
    /// Name used in diagnostics
    const NAME: &'static str;

    /// Argument record sent by the host after the command id
    type Args: Wire;

    /// Response record sent after a success status
    type Response: Wire;

    /// Validate the arguments and perform the action
    ///
    /// Returning `Err` writes the code as the status byte and no response.
    /// Implementations must not perform the action when they return `Err`
    /// for a validation failure.
    fn execute(&self, device: &mut D, args: Self::Args) -> Result<Self::Response, ErrorCode>;
}

mod sealed {
    pub trait Sealed<D> {}

    impl<D, T: super::Command<D>> Sealed<D> for T {}
}

/// Type-erased command as stored in a [`CommandTable`]
///
/// Implemented for every [`Command`]; cannot be implemented directly.
///
/// [`CommandTable`]: crate::table::CommandTable
pub trait Handler<C: ByteChannel, D>: sealed::Sealed<D> {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Argument record size in bytes
    fn args_size(&self) -> usize;

    /// Response record size in bytes
    fn response_size(&self) -> usize;

    /// Consume the arguments, act, and write the status and response
    ///
    /// Returns the status written. Only channel failures are errors.
    fn handle(&self, io: &mut Serializer<C>, device: &mut D) -> Result<Status, C::Error>;
}

impl<C, D, T> Handler<C, D> for T
where
    C: ByteChannel,
    T: Command<D>,
{
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn args_size(&self) -> usize {
        T::Args::SIZE
    }

    fn response_size(&self) -> usize {
        T::Response::SIZE
    }

    fn handle(&self, io: &mut Serializer<C>, device: &mut D) -> Result<Status, C::Error> {
        let args = io.read::<T::Args>()?;

        match self.execute(device, args) {
            Ok(response) => {
                io.write_status(Status::Ok)?;
                io.write(&response)?;
                Ok(Status::Ok)
            }
            Err(code) => {
                let status = Status::Error(code);
                io.write_status(status)?;
                Ok(status)
            }
        }
    }
}
