//! Typed reads and writes over a byte channel
//!
//! The serializer never returns a partially decoded value: a read either
//! collects every byte the type needs or reports the channel's error.

use serialcmd_hal::ByteChannel;

use crate::status::Status;
use crate::wire::Wire;

/// Binary serializer bound to one channel
#[derive(Debug)]
pub struct Serializer<C> {
    channel: C,
}

impl<C> Serializer<C> {
    /// Wrap a channel
    pub const fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Access the underlying channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Mutably access the underlying channel
    ///
    /// Reading or writing through it bypasses framing; the next command id
    /// will be taken from wherever the stream is left.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Release the channel
    pub fn into_inner(self) -> C {
        self.channel
    }
}

impl<C: ByteChannel> Serializer<C> {
    /// Fill `buf` completely, blocking across as many channel reads as needed
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), C::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            filled += self.channel.read_blocking(&mut buf[filled..])?;
        }
        Ok(())
    }

    /// Transmit `data` verbatim
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), C::Error> {
        if data.is_empty() {
            return Ok(());
        }
        self.channel.write_blocking(data)
    }

    /// Decode one value
    pub fn read<T: Wire>(&mut self) -> Result<T, C::Error> {
        T::read_from(self)
    }

    /// Encode one value
    pub fn write<T: Wire>(&mut self, value: &T) -> Result<(), C::Error> {
        value.write_to(self)
    }

    /// Write a status byte
    pub fn write_status(&mut self, status: Status) -> Result<(), C::Error> {
        self.write_bytes(&[status.to_byte()])
    }

    /// Bytes readable without blocking
    pub fn available(&mut self) -> Result<usize, C::Error> {
        self.channel.available()
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> Result<(), C::Error> {
        self.channel.flush()
    }
}
