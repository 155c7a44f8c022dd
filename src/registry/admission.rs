//! Discovery admission filter.
//!
//! Class of Device is advisory, so admission is coarse: any Peripheral
//! advertising a keyboard, mouse, gamepad or joystick minor class may
//! connect. The real role is confirmed after pairing.

use crate::ble::cod::{is_peripheral, minor, role_from_cod, COD_MINOR_ALLOWED};
use crate::ble::{Admission, Discovery};
use crate::registry::device_table::DeviceTable;

/// Admission rule on the class bits alone.
pub fn admits(cod: u32) -> bool {
    is_peripheral(cod) && minor(cod) & COD_MINOR_ALLOWED != 0
}

/// Record the device (whatever the outcome, so every nearby device is
/// visible) and decide whether the stack may connect to it.
pub fn filter(table: &mut DeviceTable, device: &Discovery<'_>) -> Admission {
    let role = role_from_cod(device.cod);
    table.upsert(device.address, device.name, role);

    let decision = if admits(device.cod) {
        Admission::Admit
    } else {
        Admission::Ignore
    };

    debug!(
        "Discovered {} name='{}' cod={:#x} rssi={} -> {} ({})",
        device.address,
        device.name.unwrap_or("<none>"),
        device.cod,
        device.rssi,
        decision,
        role
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::cod::*;
    use crate::ble::{BdAddr, Role};

    fn discovery(cod: u32) -> Discovery<'static> {
        Discovery {
            address: BdAddr::new([0, 0x11, 0x22, 0x33, 0x44, 0x55]),
            name: None,
            cod,
            rssi: -40,
        }
    }

    #[test]
    fn peripheral_with_hid_minor_is_admitted() {
        for minor in [
            COD_MINOR_KEYBOARD,
            COD_MINOR_MICE,
            COD_MINOR_KEYBOARD_AND_MICE,
            COD_MINOR_GAMEPAD,
            COD_MINOR_JOYSTICK,
        ] {
            assert!(admits(COD_MAJOR_PERIPHERAL | minor), "minor {:#x}", minor);
        }
    }

    #[test]
    fn everything_else_is_ignored() {
        // Peripheral without HID minor bits (e.g. remote control 0x0C).
        assert!(!admits(COD_MAJOR_PERIPHERAL));
        assert!(!admits(COD_MAJOR_PERIPHERAL | 0x10));
        // Keyboard minor bits on a non-peripheral major class.
        assert!(!admits(COD_MAJOR_COMPUTER | COD_MINOR_KEYBOARD));
        assert!(!admits(0));
    }

    #[test]
    fn exhaustive_minor_and_major_sweep() {
        for major in 0..0x20u32 {
            for minor in 0..0x40u32 {
                let cod = (major << 8) | (minor << 2);
                let expected = major << 8 == COD_MAJOR_PERIPHERAL
                    && (minor << 2) & COD_MINOR_ALLOWED != 0;
                assert_eq!(admits(cod), expected, "cod {:#x}", cod);
            }
        }
    }

    #[test]
    fn ignored_devices_are_still_recorded() {
        let mut table = DeviceTable::new();
        let decision = filter(&mut table, &discovery(COD_MAJOR_COMPUTER));
        assert_eq!(decision, Admission::Ignore);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].role, Role::Unknown);
        assert_eq!(table.records()[0].name.as_str(), "Unknown");
    }

    #[test]
    fn admitted_device_recorded_with_cod_role() {
        let mut table = DeviceTable::new();
        let d = Discovery {
            name: Some("Magic Mouse"),
            ..discovery(COD_MAJOR_PERIPHERAL | COD_MINOR_MICE)
        };
        assert_eq!(filter(&mut table, &d), Admission::Admit);
        let rec = &table.records()[0];
        assert_eq!(rec.role, Role::Mouse);
        assert_eq!(rec.name.as_str(), "Magic Mouse");
    }
}
