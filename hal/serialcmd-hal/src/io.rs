//! `embedded-io` adapter
//!
//! Any transport implementing the blocking `embedded-io` traits (buffered
//! UARTs, USB CDC classes, host serial ports) can carry the protocol.
//! A stream that ends is reported as [`ReadExactError::UnexpectedEof`].

use embedded_io::{Read, ReadExactError, ReadReady, Write};

use crate::channel::ByteChannel;

/// Byte channel over an `embedded-io` stream
#[derive(Debug)]
pub struct IoChannel<T> {
    inner: T,
}

impl<T> IoChannel<T> {
    /// Wrap a stream
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped stream
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Mutably access the wrapped stream
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the stream
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write + ReadReady> ByteChannel for IoChannel<T> {
    type Error = ReadExactError<T::Error>;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.inner.read(buf).map_err(ReadExactError::Other)? {
            // embedded-io only returns 0 for a non-empty buffer at end of stream
            0 if !buf.is_empty() => Err(ReadExactError::UnexpectedEof),
            n => Ok(n),
        }
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data).map_err(ReadExactError::Other)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        // ReadReady cannot count, only tell whether a read would block
        let ready = self.inner.read_ready().map_err(ReadExactError::Other)?;
        Ok(usize::from(ready))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(ReadExactError::Other)
    }
}
