//! HID capability detection.
//!
//! After pairing, the stack can read the device's Report Map. What the
//! descriptor actually declares (a keyboard collection, a mouse, a
//! gamepad) is more trustworthy than the advertised Class of Device.

pub mod descriptor;

/// Capability confirmed from a paired device's HID descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    Keyboard,
    Mouse,
    Gamepad,
}

/// Confirmed capability of a raw Report Map, if any is recognised.
pub fn capability_from_report_map(report_map: &[u8]) -> Option<Capability> {
    descriptor::HidDescriptor::parse(report_map).and_then(|d| d.capability())
}
