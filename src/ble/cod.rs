//! Class of Device (CoD) decoding and role classification.
//!
//! Only the major/minor device class fields matter here. Bit layout
//! (Bluetooth Assigned Numbers, "Class of Device"):
//!
//! ```text
//!  23..13 service classes | 12..8 major class | 7..2 minor class | 1..0 format
//! ```
//!
//! For the Peripheral major class the two top minor bits say keyboard
//! and/or pointing device, and the low minor bits carry the device
//! subtype (joystick, gamepad, ...).

use crate::ble::Role;
use crate::hid::Capability;

/// Major device class field.
pub const COD_MAJOR_MASK: u32 = 0x1F00;
/// Minor device class field.
pub const COD_MINOR_MASK: u32 = 0x00FC;

/// Major class: Peripheral (mouse, joystick, keyboard, ...).
pub const COD_MAJOR_PERIPHERAL: u32 = 0x0500;
/// Major class: Computer.
pub const COD_MAJOR_COMPUTER: u32 = 0x0100;

/// Minor (peripheral): keyboard.
pub const COD_MINOR_KEYBOARD: u32 = 0x40;
/// Minor (peripheral): pointing device.
pub const COD_MINOR_MICE: u32 = 0x80;
/// Minor (peripheral): combo keyboard/pointing device.
pub const COD_MINOR_KEYBOARD_AND_MICE: u32 = COD_MINOR_KEYBOARD | COD_MINOR_MICE;
/// Minor (peripheral): joystick.
pub const COD_MINOR_JOYSTICK: u32 = 0x04;
/// Minor (peripheral): gamepad.
pub const COD_MINOR_GAMEPAD: u32 = 0x08;

/// Minor bits that make a peripheral eligible for admission.
pub const COD_MINOR_ALLOWED: u32 = COD_MINOR_KEYBOARD_AND_MICE
    | COD_MINOR_KEYBOARD
    | COD_MINOR_MICE
    | COD_MINOR_GAMEPAD
    | COD_MINOR_JOYSTICK;

/// Major device class of `cod`.
pub const fn major(cod: u32) -> u32 {
    cod & COD_MAJOR_MASK
}

/// Minor device class of `cod`.
pub const fn minor(cod: u32) -> u32 {
    cod & COD_MINOR_MASK
}

pub const fn is_peripheral(cod: u32) -> bool {
    major(cod) == COD_MAJOR_PERIPHERAL
}

/// Role advertised by the class bits alone.
///
/// First match wins: combo, keyboard, mouse, gamepad/joystick.
pub fn role_from_cod(cod: u32) -> Role {
    let minor = minor(cod);
    if minor & COD_MINOR_KEYBOARD_AND_MICE == COD_MINOR_KEYBOARD_AND_MICE {
        Role::KeyboardMouse
    } else if minor & COD_MINOR_KEYBOARD != 0 {
        Role::Keyboard
    } else if minor & COD_MINOR_MICE != 0 {
        Role::Mouse
    } else if minor & (COD_MINOR_GAMEPAD | COD_MINOR_JOYSTICK) != 0 {
        Role::Gamepad
    } else {
        Role::Unknown
    }
}

/// Authoritative role: a confirmed HID capability always beats the CoD.
pub fn classify(cod: u32, confirmed: Option<Capability>) -> Role {
    match confirmed {
        Some(capability) => Role::from(capability),
        None => role_from_cod(cod),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
