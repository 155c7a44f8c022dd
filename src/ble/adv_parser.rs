//! LE advertisement parsing.
//!
//! LE peripherals carry no Class of Device. Their GAP Appearance is
//! mapped onto an equivalent Peripheral CoD so LE and classic
//! discoveries go through the same admission filter.

use crate::ble::cod::{
    COD_MAJOR_PERIPHERAL, COD_MINOR_GAMEPAD, COD_MINOR_JOYSTICK, COD_MINOR_KEYBOARD,
    COD_MINOR_MICE,
};
use crate::ble::{BdAddr, Discovery};

const AD_TYPE_UUID16_INCOMPLETE: u8 = 0x02;
const AD_TYPE_UUID16_COMPLETE: u8 = 0x03;
const AD_TYPE_SHORT_NAME: u8 = 0x08;
const AD_TYPE_COMPLETE_NAME: u8 = 0x09;
const AD_TYPE_APPEARANCE: u8 = 0x19;

/// HID Service UUID 0x1812, little-endian.
const HID_SERVICE_UUID_LE: [u8; 2] = [0x12, 0x18];

/// GAP appearance values in the HID category.
pub const APPEARANCE_HID_GENERIC: u16 = 0x03C0;
pub const APPEARANCE_HID_KEYBOARD: u16 = 0x03C1;
pub const APPEARANCE_HID_MOUSE: u16 = 0x03C2;
pub const APPEARANCE_HID_JOYSTICK: u16 = 0x03C3;
pub const APPEARANCE_HID_GAMEPAD: u16 = 0x03C4;

/// Iterator over `(ad_type, payload)` pairs. Stops at the first
/// zero-length or truncated structure.
struct AdStructures<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.data.get(self.pos)? as usize;
        if len == 0 || self.pos + len >= self.data.len() {
            return None;
        }
        let ad_type = self.data[self.pos + 1];
        let payload = &self.data[self.pos + 2..self.pos + 1 + len];
        self.pos += len + 1;
        Some((ad_type, payload))
    }
}

fn ad_structures(data: &[u8]) -> AdStructures<'_> {
    AdStructures { data, pos: 0 }
}

/// Check if raw advertisement data lists the HID Service UUID (0x1812).
pub fn contains_hid_service_uuid(data: &[u8]) -> bool {
    ad_structures(data)
        .filter(|(t, _)| *t == AD_TYPE_UUID16_INCOMPLETE || *t == AD_TYPE_UUID16_COMPLETE)
        .any(|(_, uuids)| uuids.chunks_exact(2).any(|c| c == HID_SERVICE_UUID_LE))
}

/// Complete or shortened local name, if present and valid UTF-8.
pub fn extract_device_name(data: &[u8]) -> Option<&str> {
    ad_structures(data)
        .find(|(t, _)| *t == AD_TYPE_COMPLETE_NAME || *t == AD_TYPE_SHORT_NAME)
        .and_then(|(_, name)| core::str::from_utf8(name).ok())
}

/// GAP Appearance value, if advertised.
pub fn appearance(data: &[u8]) -> Option<u16> {
    ad_structures(data)
        .find(|(t, p)| *t == AD_TYPE_APPEARANCE && p.len() >= 2)
        .map(|(_, p)| u16::from_le_bytes([p[0], p[1]]))
}

/// Class of Device equivalent of an LE appearance. Non-HID appearances
/// map to 0 (no class).
pub fn appearance_to_cod(appearance: u16) -> u32 {
    match appearance {
        APPEARANCE_HID_KEYBOARD => COD_MAJOR_PERIPHERAL | COD_MINOR_KEYBOARD,
        APPEARANCE_HID_MOUSE => COD_MAJOR_PERIPHERAL | COD_MINOR_MICE,
        APPEARANCE_HID_JOYSTICK => COD_MAJOR_PERIPHERAL | COD_MINOR_JOYSTICK,
        APPEARANCE_HID_GAMEPAD => COD_MAJOR_PERIPHERAL | COD_MINOR_GAMEPAD,
        APPEARANCE_HID_GENERIC => COD_MAJOR_PERIPHERAL,
        _ => 0,
    }
}

/// Build a discovery event from an LE advertising report.
pub fn le_discovery(address: BdAddr, data: &[u8], rssi: i8) -> Discovery<'_> {
    Discovery {
        address,
        name: extract_device_name(data),
        cod: appearance(data).map(appearance_to_cod).unwrap_or(0),
        rssi,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::cod::role_from_cod;
    use crate::ble::Role;

    #[test]
    fn detect_hid_uuid_in_advertisement() {
        let ad_data = [0x03, 0x03, 0x12, 0x18];
        assert!(contains_hid_service_uuid(&ad_data));
    }

    #[test]
    fn hid_uuid_among_multiple_uuids() {
        let ad_data = [
            0x07, 0x03, // len=7, complete 16-bit UUIDs
            0x0F, 0x18, // Battery
            0x12, 0x18, // HID
            0x01, 0x18, // GATT
        ];
        assert!(contains_hid_service_uuid(&ad_data));
    }

    #[test]
    fn no_hid_uuid_in_advertisement() {
        assert!(!contains_hid_service_uuid(&[0x03, 0x03, 0x0F, 0x18]));
        assert!(!contains_hid_service_uuid(&[]));
        assert!(!contains_hid_service_uuid(&[0x00]));
        assert!(!contains_hid_service_uuid(&[0x05, 0x03, 0x12]));
    }

    #[test]
    fn extract_complete_local_name() {
        let ad_data = [
            0x02, 0x01, 0x06, // flags
            0x09, 0x09, b'K', b'e', b'y', b'b', b'o', b'a', b'r', b'd',
        ];
        assert_eq!(extract_device_name(&ad_data), Some("Keyboard"));
    }

    #[test]
    fn extract_shortened_local_name() {
        let ad_data = [0x05, 0x08, b'B', b'T', b' ', b'K'];
        assert_eq!(extract_device_name(&ad_data), Some("BT K"));
    }

    #[test]
    fn no_name_or_invalid_utf8() {
        assert_eq!(extract_device_name(&[0x02, 0x01, 0x06]), None);
        assert_eq!(extract_device_name(&[0x03, 0x09, 0xFF, 0xFE]), None);
    }

    #[test]
    fn appearance_is_little_endian() {
        let ad_data = [0x03, 0x19, 0xC2, 0x03];
        assert_eq!(appearance(&ad_data), Some(APPEARANCE_HID_MOUSE));
        assert_eq!(appearance(&[0x02, 0x19, 0xC2]), None);
    }

    #[test]
    fn hid_appearances_map_to_peripheral_roles() {
        assert_eq!(
            role_from_cod(appearance_to_cod(APPEARANCE_HID_KEYBOARD)),
            Role::Keyboard
        );
        assert_eq!(
            role_from_cod(appearance_to_cod(APPEARANCE_HID_MOUSE)),
            Role::Mouse
        );
        assert_eq!(
            role_from_cod(appearance_to_cod(APPEARANCE_HID_JOYSTICK)),
            Role::Gamepad
        );
        assert_eq!(
            role_from_cod(appearance_to_cod(APPEARANCE_HID_GAMEPAD)),
            Role::Gamepad
        );
        assert_eq!(appearance_to_cod(APPEARANCE_HID_GENERIC), COD_MAJOR_PERIPHERAL);
        // Generic watch.
        assert_eq!(appearance_to_cod(0x00C0), 0);
    }

    #[test]
    fn le_discovery_collects_name_and_class() {
        let addr = BdAddr::new([0xC0, 0xFF, 0xEE, 0x00, 0x00, 0x01]);
        let ad_data = [
            0x02, 0x01, 0x06, // flags
            0x03, 0x19, 0xC1, 0x03, // appearance: keyboard
            0x03, 0x03, 0x12, 0x18, // HID service
            0x04, 0x09, b'K', b'B', b'D',
        ];
        let d = le_discovery(addr, &ad_data, -60);
        assert_eq!(d.address, addr);
        assert_eq!(d.name, Some("KBD"));
        assert_eq!(d.cod, COD_MAJOR_PERIPHERAL | COD_MINOR_KEYBOARD);
        assert_eq!(d.rssi, -60);
    }

    #[test]
    fn le_discovery_without_appearance_has_no_class() {
        let addr = BdAddr::new([1, 2, 3, 4, 5, 6]);
        let d = le_discovery(addr, &[0x02, 0x01, 0x06], -80);
        assert_eq!(d.cod, 0);
        assert_eq!(d.name, None);
    }
}
