//! Bluetooth HID admission and pairing registry.
//!
//! Sits between a Bluetooth host stack and the rest of the firmware:
//!
//! - decides which discovered peripherals the stack may connect to
//!   (keyboards, mice, gamepads and joysticks by Class of Device)
//! - keeps a table of every device seen this session
//! - remembers one bound device per role (keyboard, mouse, gamepad) in
//!   persistent settings, and uses that list to pre-approve reconnects
//! - clears pairings, fully or per role, in both the stack's bonding
//!   databases and the persisted settings
//!
//! The stack is abstracted by [`ble::stack::BtStack`] and talks back
//! through [`ble::HidEvents`]; settings by [`storage::SettingsStore`]
//! (RAM via [`storage::MemorySettings`], NOR flash via
//! `storage::flash::FlashSettings` with the `flash` feature).
//!
//! Logging goes through `defmt` or `log` depending on the enabled
//! feature, or is compiled out.
//!
//! Usage: `cargo test` runs everything on the host.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible everywhere.
#[macro_use]
mod fmt;

pub mod ble;
pub mod config;
pub mod error;
pub mod hid;
pub mod registry;
pub mod storage;

pub use ble::stack::{BtStack, LeAddressType};
pub use ble::{
    Admission, BdAddr, BoundRole, Discovery, HidEvents, ReadyDevice, Readiness, Role,
};
pub use error::{Error, StackError};
pub use hid::Capability;
pub use registry::device_table::DeviceRecord;
pub use registry::{Bindings, Registry};
pub use storage::{MemorySettings, PersistedBinding, SettingsStore};
