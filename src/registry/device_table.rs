//! Session table of every device seen since the last reset.
//!
//! Bounded and address-keyed. Entries are updated in place; once the
//! table is full, new addresses are dropped and nothing is evicted.

use crate::ble::{device_name, BdAddr, DeviceName, Role};
use crate::config::DEVICE_TABLE_CAPACITY;
use heapless::Vec;

/// One device seen this session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRecord {
    pub address: BdAddr,
    pub name: DeviceName,
    pub role: Role,
}

/// Outcome of [`DeviceTable::upsert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Upsert {
    Inserted,
    Updated,
    /// Table full; the new address was not recorded.
    Dropped,
}

#[derive(Default)]
pub struct DeviceTable {
    records: Vec<DeviceRecord, DEVICE_TABLE_CAPACITY>,
}

impl DeviceTable {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Insert or refresh the record for `address`.
    pub fn upsert(&mut self, address: BdAddr, name: Option<&str>, role: Role) -> Upsert {
        if let Some(existing) = self.records.iter_mut().find(|r| r.address == address) {
            existing.name = device_name(name);
            existing.role = role;
            return Upsert::Updated;
        }

        let record = DeviceRecord {
            address,
            name: device_name(name),
            role,
        };
        match self.records.push(record) {
            Ok(()) => Upsert::Inserted,
            Err(_) => {
                warn!("Device table full - dropping {}", address);
                Upsert::Dropped
            }
        }
    }

    pub fn get(&self, address: &BdAddr) -> Option<&DeviceRecord> {
        self.records.iter().find(|r| &r.address == address)
    }

    /// Records in first-seen order.
    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.is_full()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> BdAddr {
        BdAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, last])
    }

    #[test]
    fn insert_then_update_in_place() {
        let mut table = DeviceTable::new();
        assert_eq!(table.upsert(addr(1), None, Role::Unknown), Upsert::Inserted);
        assert_eq!(
            table.upsert(addr(1), Some("Pad"), Role::Gamepad),
            Upsert::Updated
        );
        assert_eq!(table.len(), 1);

        let rec = table.get(&addr(1)).unwrap();
        assert_eq!(rec.name.as_str(), "Pad");
        assert_eq!(rec.role, Role::Gamepad);
    }

    #[test]
    fn missing_name_is_unknown() {
        let mut table = DeviceTable::new();
        table.upsert(addr(2), None, Role::Mouse);
        assert_eq!(table.get(&addr(2)).unwrap().name.as_str(), "Unknown");
    }

    #[test]
    fn repeated_upserts_never_grow_the_table() {
        let mut table = DeviceTable::new();
        for _ in 0..50 {
            table.upsert(addr(7), Some("Kb"), Role::Keyboard);
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn overflow_is_dropped_not_evicted() {
        let mut table = DeviceTable::new();
        for i in 0..DEVICE_TABLE_CAPACITY as u8 {
            assert_eq!(table.upsert(addr(i), None, Role::Unknown), Upsert::Inserted);
        }
        assert!(table.is_full());

        assert_eq!(table.upsert(addr(0xEE), None, Role::Mouse), Upsert::Dropped);
        assert_eq!(table.len(), DEVICE_TABLE_CAPACITY);
        assert!(table.get(&addr(0xEE)).is_none());
        assert_eq!(table.records()[0].address, addr(0));

        // Existing entries still update when full.
        assert_eq!(
            table.upsert(addr(3), Some("Late"), Role::Keyboard),
            Upsert::Updated
        );
        assert_eq!(table.get(&addr(3)).unwrap().role, Role::Keyboard);
    }

    #[test]
    fn clear_empties_table() {
        let mut table = DeviceTable::new();
        table.upsert(addr(1), None, Role::Unknown);
        table.clear();
        assert!(table.is_empty());
    }
}
