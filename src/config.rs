//! Application-wide constants and compile-time configuration.
//!
//! Capacities, settings keys and the flash partition used for the
//! role bindings live here so they can be tuned in one place.

// Device table

/// Maximum number of distinct devices remembered per session.
/// Addresses seen after the table is full are dropped, never evicted.
pub const DEVICE_TABLE_CAPACITY: usize = 16;

/// Capacity (bytes) of a device display name. Longer names are truncated.
pub const DEVICE_NAME_CAPACITY: usize = 64;

/// Name reported for devices that did not advertise one.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown";

// Persisted settings

/// Capacity (bytes) of one persisted settings value (`"<address>#<name>"`).
pub const SETTING_VALUE_CAPACITY: usize = 96;

/// Capacity (bytes) of a settings key.
pub const SETTING_KEY_CAPACITY: usize = 32;

/// Maximum number of distinct keys held by the RAM settings store.
/// Must be a power of two (`heapless::FnvIndexMap`).
pub const MEMORY_SETTINGS_CAPACITY: usize = 16;

/// Settings key holding the bound keyboard.
pub const KEY_BT_KEYBOARD: &str = "BT_KEYBOARD";

/// Settings key holding the bound mouse.
pub const KEY_BT_MOUSE: &str = "BT_MOUSE";

/// Settings key holding the bound gamepad.
pub const KEY_BT_GAMEPAD: &str = "BT_GAMEPAD";

/// Separator between address and name in a persisted binding.
pub const BINDING_SEPARATOR: char = '#';

// Flash partition for the role bindings

/// Flash page size (4 KB on nRF52840 / RP2040).
pub const FLASH_PAGE_SIZE: u32 = 4096;

/// Flash page index where the bindings partition starts.
pub const SETTINGS_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for the bindings partition.
pub const SETTINGS_FLASH_PAGE_COUNT: u32 = 4;

/// Scratch buffer for a single serialized flash item (key + value).
pub const SETTINGS_ITEM_BUFFER: usize = 128;
