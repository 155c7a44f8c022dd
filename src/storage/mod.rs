//! Persistent settings for the role bindings.
//!
//! The registry only needs a small key/value interface with an explicit
//! commit: values are staged with [`SettingsStore::put`] and made
//! durable by [`SettingsStore::save`]. Two stores are provided:
//!
//!   - [`MemorySettings`] - RAM only, for hosts and tests.
//!   - [`flash::FlashSettings`] - NOR flash via `sequential-storage`
//!     (feature `flash`).
//!
//! Each role binding is stored under its own key as
//! `"<address>#<name>"`; an empty value means unbound (see [`binding`]).

pub mod binding;
#[cfg(feature = "flash")]
pub mod flash;

use crate::config::{MEMORY_SETTINGS_CAPACITY, SETTING_KEY_CAPACITY, SETTING_VALUE_CAPACITY};
use crate::error::Error;
use heapless::{FnvIndexMap, String};

pub use binding::PersistedBinding;

/// A settings value as stored.
pub type SettingValue = String<SETTING_VALUE_CAPACITY>;

/// Key/value settings with an explicit durable commit.
pub trait SettingsStore {
    /// Current (possibly uncommitted) value for `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Stage `value` under `key`.
    fn put(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// Make every staged value durable.
    fn save(&mut self) -> Result<(), Error>;
}

/// RAM-backed settings store.
///
/// `save` is a no-op apart from counting commits, which lets callers
/// check that a commit actually happened.
#[derive(Default)]
pub struct MemorySettings {
    values: FnvIndexMap<String<SETTING_KEY_CAPACITY>, SettingValue, MEMORY_SETTINGS_CAPACITY>,
    saves: usize,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<&str> {
        let key: String<SETTING_KEY_CAPACITY> = key.try_into().ok()?;
        self.values.get(&key).map(|v| v.as_str())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let key: String<SETTING_KEY_CAPACITY> = key.try_into().map_err(|_| Error::UnknownKey)?;
        let value: SettingValue = value.try_into().map_err(|_| Error::ValueTooLong)?;
        self.values
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| Error::SettingsFull)
    }

    fn save(&mut self) -> Result<(), Error> {
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_and_overwrite() {
        let mut store = MemorySettings::new();
        assert_eq!(store.get("BT_MOUSE"), None);

        store.put("BT_MOUSE", "00:11:22:33:44:55#Mouse").unwrap();
        assert_eq!(store.get("BT_MOUSE"), Some("00:11:22:33:44:55#Mouse"));

        store.put("BT_MOUSE", "").unwrap();
        assert_eq!(store.get("BT_MOUSE"), Some(""));
    }

    #[test]
    fn oversized_value_is_rejected() {
        let mut store = MemorySettings::new();
        let long = "x".repeat(SETTING_VALUE_CAPACITY + 1);
        assert_eq!(store.put("BT_MOUSE", &long), Err(Error::ValueTooLong));
        assert_eq!(store.get("BT_MOUSE"), None);
    }

    #[test]
    fn keys_are_independent() {
        let mut store = MemorySettings::new();
        store.put("BT_KEYBOARD", "kb").unwrap();
        store.put("BT_MOUSE", "m").unwrap();
        assert_eq!(store.get("BT_KEYBOARD"), Some("kb"));
        assert_eq!(store.get("BT_MOUSE"), Some("m"));
        assert_eq!(store.get("BT_GAMEPAD"), None);
        // Longer than any storable key.
        assert_eq!(store.get(&"K".repeat(SETTING_KEY_CAPACITY + 1)), None);
    }

    #[test]
    fn save_counts_commits() {
        let mut store = MemorySettings::new();
        store.save().unwrap();
        store.save().unwrap();
        assert_eq!(store.save_count(), 2);
    }
}
