//! Response status codes
//!
//! The status byte is the first byte of every response. `0x00` means the
//! declared response record follows; any other value means nothing follows.

use core::num::NonZeroU8;

/// Non-zero failure code
///
/// [`ErrorCode::FAILURE`] (`0x01`) is the canonical failure. Deployments may
/// define further codes; zero can never be one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(NonZeroU8);

impl ErrorCode {
    /// Generic failure (`0x01`)
    pub const FAILURE: Self = Self(NonZeroU8::MIN);

    /// Create a code, rejecting zero
    pub const fn new(code: u8) -> Option<Self> {
        match NonZeroU8::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    /// Wire value
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "error code {:#04x}", self.get())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ErrorCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ErrorCode({=u8:#x})", self.get());
    }
}

/// Outcome of a request as written on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// `0x00`, the response record follows
    Ok,
    /// Non-zero, no response record follows
    Error(ErrorCode),
}

impl Status {
    /// Generic failure (`0x01`)
    pub const FAILURE: Self = Status::Error(ErrorCode::FAILURE);

    /// Decode a status byte
    pub fn from_byte(byte: u8) -> Self {
        match ErrorCode::new(byte) {
            Some(code) => Status::Error(code),
            None => Status::Ok,
        }
    }

    /// Wire value
    pub fn to_byte(self) -> u8 {
        match self {
            Status::Ok => 0x00,
            Status::Error(code) => code.get(),
        }
    }

    /// Check if a response record follows
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl From<ErrorCode> for Status {
    fn from(code: ErrorCode) -> Self {
        Status::Error(code)
    }
}

impl<T> From<Result<T, ErrorCode>> for Status {
    fn from(result: Result<T, ErrorCode>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(code) => Status::Error(code),
        }
    }
}
