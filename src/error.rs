//! Unified error type for the registry.
//!
//! No `alloc` - every variant carries only fixed-size data so the enum
//! stays `Copy`. Malformed addresses or persisted values are never
//! errors; they are treated as absent by the parsers.

use core::fmt;

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Durable commit or flash read/write failed.
    Storage,

    /// Value does not fit in a settings slot.
    ValueTooLong,

    /// The settings store does not manage this key.
    UnknownKey,

    /// The settings store has no room for another key.
    SettingsFull,

    // Requests
    /// Role name is not one of `keyboard`, `mouse`, `gamepad`.
    InvalidRole,

    // Bluetooth stack
    /// A command issued to the Bluetooth stack failed.
    Stack(StackError),
}

/// Failures reported by the Bluetooth stack for outbound commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackError {
    /// No key or bond exists for the requested address.
    NotFound,
    /// The stack could not service the command right now.
    Busy,
    /// Raw status code from the stack.
    Raw(u32),
}

impl From<StackError> for Error {
    fn from(e: StackError) -> Self {
        Error::Stack(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage => f.write_str("settings storage failure"),
            Error::ValueTooLong => f.write_str("settings value too long"),
            Error::UnknownKey => f.write_str("unknown settings key"),
            Error::SettingsFull => f.write_str("settings store full"),
            Error::InvalidRole => f.write_str("invalid device type"),
            Error::Stack(e) => write!(f, "bluetooth stack: {}", e),
        }
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::NotFound => f.write_str("not found"),
            StackError::Busy => f.write_str("busy"),
            StackError::Raw(code) => write!(f, "status {:#x}", code),
        }
    }
}
