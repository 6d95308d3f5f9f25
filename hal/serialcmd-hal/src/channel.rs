//! Byte channel abstraction
//!
//! The protocol runs over a single duplex stream of octets. Implementations
//! wrap a UART, a USB CDC endpoint, or an in-memory buffer.

/// Blocking duplex byte stream
pub trait ByteChannel {
    /// Error type for channel operations
    type Error;

    /// Read bytes into `buf`
    ///
    /// Blocks until at least one byte has arrived. Returns the number of
    /// bytes stored, which may be less than `buf.len()` but is zero only
    /// when `buf` is empty. A stream that has ended reports an error.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write all of `data`
    ///
    /// Blocks until every byte has been handed to the transport.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Number of bytes that can be read without blocking
    ///
    /// Transports that cannot count their receive buffer report `1` when
    /// at least one byte is ready.
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Flush any buffered output
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Read a single byte
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        while self.read_blocking(&mut buf)? == 0 {}
        Ok(buf[0])
    }
}

impl<T: ByteChannel + ?Sized> ByteChannel for &mut T {
    type Error = T::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_blocking(self, buf)
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_blocking(self, data)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        T::available(self)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

/// Serial line configuration
///
/// Applied by the bootstrap code when the physical channel is brought up.
/// The protocol itself never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits per character
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl ChannelConfig {
    /// 8N1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockChannel;

    #[test]
    fn test_default_config_is_8n1_115200() {
        let config = ChannelConfig::default();
        assert_eq!(config, ChannelConfig::with_baudrate(115200));
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }

    #[test]
    fn test_read_byte_default() {
        let mut channel = MockChannel::<8>::new();
        channel.feed(&[0x42, 0x43]).unwrap();

        assert_eq!(channel.read_byte(), Ok(0x42));
        assert_eq!(channel.read_byte(), Ok(0x43));
    }

    fn echo_first<C: ByteChannel>(mut channel: C) -> Result<usize, C::Error> {
        let byte = channel.read_byte()?;
        channel.write_blocking(&[byte])?;
        channel.available()
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut channel = MockChannel::<8>::new();
        channel.feed(&[1, 2, 3]).unwrap();

        assert_eq!(echo_first(&mut channel), Ok(2));
        assert_eq!(channel.written(), &[1]);
    }
}
