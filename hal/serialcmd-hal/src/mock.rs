//! In-memory byte channel for host tests
//!
//! Bytes fed with [`MockChannel::feed`] are what the peer "sent"; bytes
//! written by the code under test are collected in a transmit log. An empty
//! receive queue reports [`MockError::WouldBlock`] instead of blocking, so a
//! stalled read is observable.

use heapless::{Deque, Vec};

use crate::channel::ByteChannel;

/// Errors reported by the mock channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// A read found no pending bytes (a real channel would block here)
    WouldBlock,
    /// The receive queue or the transmit log is full
    Overflow,
}

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MockError::WouldBlock => f.write_str("read would block"),
            MockError::Overflow => f.write_str("mock channel buffer full"),
        }
    }
}

/// In-memory channel with `N` bytes of capacity each way
#[derive(Debug, Clone)]
pub struct MockChannel<const N: usize> {
    rx: Deque<u8, N>,
    tx: Vec<u8, N>,
    consumed: usize,
    flushes: usize,
}

impl<const N: usize> Default for MockChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MockChannel<N> {
    /// Create an empty channel
    pub const fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            consumed: 0,
            flushes: 0,
        }
    }

    /// Queue bytes as if the peer had sent them
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        for &byte in bytes {
            self.rx.push_back(byte).map_err(|_| MockError::Overflow)?;
        }
        Ok(())
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Discard the transmit log
    pub fn clear_written(&mut self) {
        self.tx.clear();
    }

    /// Total number of bytes read since creation
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes fed but not yet read
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Number of flush calls
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl<const N: usize> ByteChannel for MockChannel<N> {
    type Error = MockError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.rx.is_empty() && !buf.is_empty() {
            return Err(MockError::WouldBlock);
        }

        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        self.consumed += count;
        Ok(count)
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx
            .extend_from_slice(data)
            .map_err(|_| MockError::Overflow)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        Ok(self.rx.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}
