//! Per-role allowlist loaded from the persisted bindings.
//!
//! Read once when the registry is first enabled and pushed into the
//! stack's own admission path. It is a snapshot: later unbinds do not
//! update it.

use crate::ble::{BdAddr, BoundRole};
use crate::storage::binding::address_of;
use crate::storage::SettingsStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllowlistEntry {
    pub role: BoundRole,
    /// Bound address; `None` when unbound or unreadable.
    pub address: Option<BdAddr>,
}

impl AllowlistEntry {
    pub const fn empty(role: BoundRole) -> Self {
        Self {
            role,
            address: None,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.address.is_some()
    }
}

pub struct Allowlist {
    entries: [AllowlistEntry; 3],
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Allowlist {
    pub const fn new() -> Self {
        Self {
            entries: [
                AllowlistEntry::empty(BoundRole::Keyboard),
                AllowlistEntry::empty(BoundRole::Mouse),
                AllowlistEntry::empty(BoundRole::Gamepad),
            ],
        }
    }

    /// Reload every entry from `settings`. Absent or malformed values
    /// leave the entry invalid. Returns the number of valid entries.
    pub fn load(&mut self, settings: &impl SettingsStore) -> usize {
        for entry in self.entries.iter_mut() {
            entry.address = None;
            let value = match settings.get(entry.role.key()) {
                Some(v) if !v.is_empty() => v,
                _ => continue,
            };
            match address_of(value) {
                Some(address) => {
                    info!("Loaded BD_ADDR for {}: {}", entry.role, address);
                    entry.address = Some(address);
                }
                None => warn!("Invalid BD_ADDR for {}: '{}'", entry.role, value),
            }
        }
        self.valid().count()
    }

    pub fn entry(&self, role: BoundRole) -> &AllowlistEntry {
        &self.entries[role.index()]
    }

    pub fn entries(&self) -> &[AllowlistEntry] {
        &self.entries
    }

    /// Entries that carry an address.
    pub fn valid(&self) -> impl Iterator<Item = &AllowlistEntry> + '_ {
        self.entries.iter().filter(|e| e.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySettings;

    #[test]
    fn loads_valid_bindings_and_skips_the_rest() {
        let mut settings = MemorySettings::new();
        settings.put("BT_KEYBOARD", "AA:11:22:33:44:55#Foo").unwrap();
        settings.put("BT_MOUSE", "not an address#Bar").unwrap();
        settings.put("BT_GAMEPAD", "").unwrap();

        let mut list = Allowlist::new();
        assert_eq!(list.load(&settings), 1);

        let kb = list.entry(BoundRole::Keyboard);
        assert!(kb.is_valid());
        assert_eq!(
            kb.address,
            Some(BdAddr::new([0xAA, 0x11, 0x22, 0x33, 0x44, 0x55]))
        );
        assert!(!list.entry(BoundRole::Mouse).is_valid());
        assert!(!list.entry(BoundRole::Gamepad).is_valid());
    }

    #[test]
    fn missing_keys_are_invalid() {
        let list = {
            let mut l = Allowlist::new();
            l.load(&MemorySettings::new());
            l
        };
        assert_eq!(list.valid().count(), 0);
        assert_eq!(list.entries().len(), 3);
    }

    #[test]
    fn reload_forgets_previous_addresses() {
        let mut settings = MemorySettings::new();
        settings.put("BT_MOUSE", "00:11:22:33:44:55#M").unwrap();
        let mut list = Allowlist::new();
        assert_eq!(list.load(&settings), 1);

        settings.put("BT_MOUSE", "").unwrap();
        assert_eq!(list.load(&settings), 0);
    }
}
