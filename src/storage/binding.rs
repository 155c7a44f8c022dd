//! Persisted role binding: `"<address>#<name>"`.
//!
//! The address is written as `AA:BB:CC:DD:EE:FF`. Parsing is a single
//! split on the first `#` and fails closed: anything that is not a
//! well-formed address followed by `#` reads as unbound.

use core::fmt::Write;

use crate::ble::{device_name, BdAddr, DeviceName};
use crate::config::BINDING_SEPARATOR;
use crate::storage::SettingValue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedBinding {
    pub address: BdAddr,
    pub name: DeviceName,
}

impl PersistedBinding {
    pub fn new(address: BdAddr, name: Option<&str>) -> Self {
        Self {
            address,
            name: device_name(name),
        }
    }

    /// Parse a stored value. Empty or malformed values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let (address, name) = value.split_once(BINDING_SEPARATOR)?;
        let address = BdAddr::parse(address)?;
        Some(Self::new(address, Some(name)))
    }

    /// Stored form. Names that would overflow the value are truncated on
    /// a character boundary.
    pub fn encode(&self) -> SettingValue {
        let mut out = SettingValue::new();
        // Address and separator (18 bytes) always fit.
        let _ = write!(out, "{}{}", self.address, BINDING_SEPARATOR);
        for c in self.name.chars() {
            if out.push(c).is_err() {
                break;
            }
        }
        out
    }
}

/// Address part of a stored value, ignoring the name.
pub fn address_of(value: &str) -> Option<BdAddr> {
    PersistedBinding::parse(value).map(|b| b.address)
}

/// Address whose stack bonds belong to a stored value.
///
/// Wider than [`address_of`]: a bare address without `#` (not written
/// by this crate, but accepted when found) still names a
/// bonded device, so unbinding it must delete that bond too.
pub fn bonded_address_of(value: &str) -> Option<BdAddr> {
    if value.contains(BINDING_SEPARATOR) {
        address_of(value)
    } else {
        BdAddr::parse(value)
    }
}
