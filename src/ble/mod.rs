//! Bluetooth-facing types.
//!
//! The Bluetooth stack itself (scanning, connecting, bonding) is an
//! external collaborator. This module defines the boundary with it:
//!
//! 1. **Events** - [`HidEvents`] is the handler the stack calls for each
//!    discovery / connection / ready event.
//! 2. **Commands** - [`stack::BtStack`] is what the registry asks of the
//!    stack (allowlist, scanning, bond deletion).
//! 3. **Classification** - [`cod`] turns a Class of Device into a [`Role`].
//!
//! Everything here is synchronous; the stack delivers events from inside
//! its own `poll`, on the caller's thread.

pub mod address;
pub mod adv_parser;
pub mod cod;
pub mod stack;

use core::fmt;
use core::str::FromStr;

use crate::config::{
    DEVICE_NAME_CAPACITY, KEY_BT_GAMEPAD, KEY_BT_KEYBOARD, KEY_BT_MOUSE, UNKNOWN_DEVICE_NAME,
};
use crate::error::Error;
use crate::hid::Capability;
use heapless::String;

pub use address::BdAddr;

/// Display name of a device, truncated to [`DEVICE_NAME_CAPACITY`].
pub type DeviceName = String<DEVICE_NAME_CAPACITY>;

/// Build a display name, falling back to `"Unknown"` for absent or
/// empty names. Truncates on a character boundary.
pub fn device_name(name: Option<&str>) -> DeviceName {
    let src = match name {
        Some(n) if !n.is_empty() => n,
        _ => UNKNOWN_DEVICE_NAME,
    };
    let mut out = DeviceName::new();
    for c in src.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Semantic peripheral category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Keyboard,
    Mouse,
    Gamepad,
    /// Keyboard with an integrated pointing device.
    KeyboardMouse,
    Unknown,
}

impl Role {
    pub const fn label(&self) -> &'static str {
        match self {
            Role::Keyboard => "Keyboard",
            Role::Mouse => "Mouse",
            Role::Gamepad => "Gamepad",
            Role::KeyboardMouse => "Keyboard/Mouse",
            Role::Unknown => "Unknown",
        }
    }

    /// Persisted slots a device of this role is bound into.
    ///
    /// A combo device occupies both the keyboard and the mouse slot;
    /// unknown devices are never bound.
    pub const fn bound_slots(&self) -> &'static [BoundRole] {
        match self {
            Role::Keyboard => &[BoundRole::Keyboard],
            Role::Mouse => &[BoundRole::Mouse],
            Role::Gamepad => &[BoundRole::Gamepad],
            Role::KeyboardMouse => &[BoundRole::Keyboard, BoundRole::Mouse],
            Role::Unknown => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Capability> for Role {
    fn from(c: Capability) -> Self {
        match c {
            Capability::Keyboard => Role::Keyboard,
            Capability::Mouse => Role::Mouse,
            Capability::Gamepad => Role::Gamepad,
        }
    }
}

/// A role that owns a persisted binding slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoundRole {
    Keyboard,
    Mouse,
    Gamepad,
}

impl BoundRole {
    pub const ALL: [BoundRole; 3] = [BoundRole::Keyboard, BoundRole::Mouse, BoundRole::Gamepad];

    /// Settings key holding this role's binding.
    pub const fn key(&self) -> &'static str {
        match self {
            BoundRole::Keyboard => KEY_BT_KEYBOARD,
            BoundRole::Mouse => KEY_BT_MOUSE,
            BoundRole::Gamepad => KEY_BT_GAMEPAD,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            BoundRole::Keyboard => "Keyboard",
            BoundRole::Mouse => "Mouse",
            BoundRole::Gamepad => "Gamepad",
        }
    }

    /// Slot index, stable across builds.
    pub const fn index(&self) -> usize {
        match self {
            BoundRole::Keyboard => 0,
            BoundRole::Mouse => 1,
            BoundRole::Gamepad => 2,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }
}

impl fmt::Display for BoundRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the lowercase request form: `keyboard`, `mouse`, `gamepad`.
impl FromStr for BoundRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyboard" => Ok(BoundRole::Keyboard),
            "mouse" => Ok(BoundRole::Mouse),
            "gamepad" => Ok(BoundRole::Gamepad),
            _ => Err(Error::InvalidRole),
        }
    }
}

impl From<BoundRole> for Role {
    fn from(r: BoundRole) -> Self {
        match r {
            BoundRole::Keyboard => Role::Keyboard,
            BoundRole::Mouse => Role::Mouse,
            BoundRole::Gamepad => Role::Gamepad,
        }
    }
}

/// A device seen during inquiry / advertising scan.
#[derive(Clone, Copy, Debug)]
pub struct Discovery<'a> {
    pub address: BdAddr,
    /// Remote name, if the stack resolved one.
    pub name: Option<&'a str>,
    /// Class of Device bitmask (synthesized from the appearance for LE).
    pub cod: u32,
    /// Received Signal Strength Indicator (dBm).
    pub rssi: i8,
}

/// A device that finished pairing and whose HID service is usable.
#[derive(Clone, Copy, Debug)]
pub struct ReadyDevice<'a> {
    pub address: BdAddr,
    pub name: Option<&'a str>,
    pub cod: u32,
    /// Capability confirmed from the negotiated HID descriptor, when the
    /// stack could introspect it.
    pub capability: Option<Capability>,
}

/// Answer to a discovery event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Admission {
    /// Let the stack connect to the device.
    Admit,
    /// Do not connect.
    Ignore,
}

impl Admission {
    pub const fn label(&self) -> &'static str {
        match self {
            Admission::Admit => "admit",
            Admission::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Answer to a ready event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Readiness {
    Success,
    /// Drop the device.
    IgnoreDevice,
}

/// Handlers the Bluetooth stack invokes while it is polled.
///
/// Calls are never nested: the stack finishes one callback before the
/// next, and only from inside [`stack::BtStack::poll`].
pub trait HidEvents {
    /// Must answer synchronously; `Admit` is the only way the stack
    /// proceeds to connect.
    fn on_discovered(&mut self, device: &Discovery<'_>) -> Admission;

    fn on_connected(&mut self, address: BdAddr);

    fn on_disconnected(&mut self, address: BdAddr);

    fn on_ready(&mut self, device: &ReadyDevice<'_>) -> Readiness;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_name_defaults_to_unknown() {
        assert_eq!(device_name(None).as_str(), "Unknown");
        assert_eq!(device_name(Some("")).as_str(), "Unknown");
        assert_eq!(device_name(Some("Magic Mouse")).as_str(), "Magic Mouse");
    }

    #[test]
    fn device_name_truncates_on_char_boundary() {
        let long: std::string::String = core::iter::repeat('é').take(40).collect();
        let name = device_name(Some(&long));
        assert_eq!(name.chars().count(), DEVICE_NAME_CAPACITY / 2);
    }

    #[test]
    fn combo_binds_keyboard_and_mouse_slots() {
        assert_eq!(
            Role::KeyboardMouse.bound_slots(),
            &[BoundRole::Keyboard, BoundRole::Mouse]
        );
        assert!(Role::Unknown.bound_slots().is_empty());
        assert_eq!(Role::Gamepad.bound_slots(), &[BoundRole::Gamepad]);
    }

    #[test]
    fn bound_role_parses_request_names() {
        assert_eq!("keyboard".parse::<BoundRole>(), Ok(BoundRole::Keyboard));
        assert_eq!("mouse".parse::<BoundRole>(), Ok(BoundRole::Mouse));
        assert_eq!("gamepad".parse::<BoundRole>(), Ok(BoundRole::Gamepad));
        assert_eq!("Mouse".parse::<BoundRole>(), Err(Error::InvalidRole));
        assert_eq!("".parse::<BoundRole>(), Err(Error::InvalidRole));
    }

    #[test]
    fn bound_role_keys_round_trip() {
        for role in BoundRole::ALL {
            assert_eq!(BoundRole::from_key(role.key()), Some(role));
        }
        assert_eq!(BoundRole::from_key("WIFI_SSID"), None);
    }

    #[test]
    fn admission_displays_decision() {
        assert_eq!(Admission::Admit.to_string(), "admit");
        assert_eq!(Admission::Ignore.to_string(), "ignore");
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::KeyboardMouse.label(), "Keyboard/Mouse");
        assert_eq!(Role::from(Capability::Gamepad), Role::Gamepad);
        assert_eq!(Role::from(BoundRole::Mouse), Role::Mouse);
    }
}
