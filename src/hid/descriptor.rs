//! HID Report Descriptor scanner.
//!
//! Walks the item stream of a Report Map and records which kinds of
//! top-level (Application) collections the device declares:
//! - Keyboard / Keypad
//! - Mouse / Pointer
//! - Joystick / Gamepad
//!
//! Keyboard-page input items outside any recognised collection also
//! count as a keyboard. The first Report ID seen inside each kind of
//! collection is kept for diagnostics.
//!
//! ## Limitations
//!
//! - Push/Pop of the global state is not supported
//! - Delimiter tags are ignored
//! - Long items are skipped

use crate::hid::Capability;

/// Usage page codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsagePage {
    /// Generic Desktop (mouse, keyboard, joystick).
    GenericDesktop,
    /// Keyboard/Keypad.
    Keyboard,
    /// Button.
    Button,
    /// Consumer Control.
    Consumer,
    /// Unknown/unsupported.
    Unknown(u16),
}

impl From<u16> for UsagePage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => UsagePage::GenericDesktop,
            0x07 => UsagePage::Keyboard,
            0x09 => UsagePage::Button,
            0x0C => UsagePage::Consumer,
            other => UsagePage::Unknown(other),
        }
    }
}

/// Generic Desktop usage codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesktopUsage {
    Pointer,
    Mouse,
    Joystick,
    Gamepad,
    Keyboard,
    Keypad,
    Unknown(u16),
}

impl From<u16> for DesktopUsage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => DesktopUsage::Pointer,
            0x02 => DesktopUsage::Mouse,
            0x04 => DesktopUsage::Joystick,
            0x05 => DesktopUsage::Gamepad,
            0x06 => DesktopUsage::Keyboard,
            0x07 => DesktopUsage::Keypad,
            other => DesktopUsage::Unknown(other),
        }
    }
}

impl DesktopUsage {
    fn capability(self) -> Option<Capability> {
        match self {
            DesktopUsage::Keyboard | DesktopUsage::Keypad => Some(Capability::Keyboard),
            DesktopUsage::Mouse | DesktopUsage::Pointer => Some(Capability::Mouse),
            DesktopUsage::Joystick | DesktopUsage::Gamepad => Some(Capability::Gamepad),
            DesktopUsage::Unknown(_) => None,
        }
    }
}

// Item types.
const ITEM_MAIN: u8 = 0;
const ITEM_GLOBAL: u8 = 1;
const ITEM_LOCAL: u8 = 2;

// Main item tags.
const TAG_INPUT: u8 = 0x08;
const TAG_COLLECTION: u8 = 0x0A;
const TAG_END_COLLECTION: u8 = 0x0C;

// Global item tags.
const TAG_USAGE_PAGE: u8 = 0x00;
const TAG_REPORT_ID: u8 = 0x08;

// Local item tags.
const TAG_USAGE: u8 = 0x00;

const COLLECTION_APPLICATION: u32 = 0x01;
const LONG_ITEM_PREFIX: u8 = 0xFE;

/// What a Report Map declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HidDescriptor {
    pub has_keyboard: bool,
    pub has_mouse: bool,
    pub has_gamepad: bool,
    /// Report ID for keyboard input, when present.
    pub keyboard_report_id: Option<u8>,
    /// Report ID for mouse input, when present.
    pub mouse_report_id: Option<u8>,
    /// Report ID for gamepad input, when present.
    pub gamepad_report_id: Option<u8>,
}

impl HidDescriptor {
    /// Single capability for role binding. Keyboard wins over mouse,
    /// mouse over gamepad.
    pub fn capability(&self) -> Option<Capability> {
        if self.has_keyboard {
            Some(Capability::Keyboard)
        } else if self.has_mouse {
            Some(Capability::Mouse)
        } else if self.has_gamepad {
            Some(Capability::Gamepad)
        } else {
            None
        }
    }

    fn mark(&mut self, capability: Capability, report_id: u8) {
        let (flag, id) = match capability {
            Capability::Keyboard => (&mut self.has_keyboard, &mut self.keyboard_report_id),
            Capability::Mouse => (&mut self.has_mouse, &mut self.mouse_report_id),
            Capability::Gamepad => (&mut self.has_gamepad, &mut self.gamepad_report_id),
        };
        *flag = true;
        if report_id != 0 && id.is_none() {
            *id = Some(report_id);
        }
    }

    /// Parse a HID Report Descriptor. `None` when no keyboard, mouse or
    /// gamepad collection is declared.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut desc = HidDescriptor::default();

        // Parser state.
        let mut usage_page = UsagePage::Unknown(0);
        let mut usage: Option<(UsagePage, u16)> = None;
        let mut report_id: u8 = 0;
        let mut depth: usize = 0;
        // Capability of the enclosing application collection and the
        // depth it was opened at.
        let mut application: Option<(Capability, usize)> = None;

        let mut i = 0;
        while i < data.len() {
            let prefix = data[i];

            if prefix == LONG_ITEM_PREFIX {
                let Some(&len) = data.get(i + 1) else { break };
                i += 3 + len as usize;
                continue;
            }

            let tag = (prefix >> 4) & 0x0F;
            let item_type = (prefix >> 2) & 0x03;
            let size = match prefix & 0x03 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 4,
            };

            if i + 1 + size > data.len() {
                break;
            }

            let value: u32 = match size {
                0 => 0,
                1 => data[i + 1] as u32,
                2 => u16::from_le_bytes([data[i + 1], data[i + 2]]) as u32,
                _ => u32::from_le_bytes([data[i + 1], data[i + 2], data[i + 3], data[i + 4]]),
            };

            match (item_type, tag) {
                (ITEM_GLOBAL, TAG_USAGE_PAGE) => usage_page = UsagePage::from(value as u16),
                (ITEM_GLOBAL, TAG_REPORT_ID) => report_id = value as u8,
                (ITEM_LOCAL, TAG_USAGE) => {
                    // A 4-byte usage carries its own page in the high half.
                    let page = if size == 4 {
                        UsagePage::from((value >> 16) as u16)
                    } else {
                        usage_page
                    };
                    if usage.is_none() {
                        usage = Some((page, value as u16));
                    }
                }
                (ITEM_MAIN, TAG_COLLECTION) => {
                    depth += 1;
                    if application.is_none() && value == COLLECTION_APPLICATION {
                        if let Some((UsagePage::GenericDesktop, code)) = usage {
                            application = DesktopUsage::from(code)
                                .capability()
                                .map(|c| (c, depth));
                        }
                    }
                    usage = None;
                }
                (ITEM_MAIN, TAG_END_COLLECTION) => {
                    if matches!(application, Some((_, d)) if d == depth) {
                        application = None;
                    }
                    depth = depth.saturating_sub(1);
                    usage = None;
                }
                (ITEM_MAIN, TAG_INPUT) => {
                    if usage_page == UsagePage::Keyboard {
                        desc.mark(Capability::Keyboard, report_id);
                    }
                    if let Some((capability, _)) = application {
                        desc.mark(capability, report_id);
                    }
                    usage = None;
                }
                (ITEM_MAIN, _) => usage = None,
                _ => {}
            }

            i += 1 + size;
        }

        if desc.has_keyboard || desc.has_mouse || desc.has_gamepad {
            Some(desc)
        } else {
            None
        }
    }
}
