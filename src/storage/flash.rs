//! Flash-backed settings store for the role bindings.
//!
//! Uses the `sequential-storage` map API on a reserved NOR-flash
//! partition, one map item per role:
//!
//!   - key: role slot id (`u8`, 1 = keyboard, 2 = mouse, 3 = gamepad)
//!   - value: the raw `"<address>#<name>"` bytes (empty = unbound)
//!
//! Values are cached in RAM; `put` only touches the cache and `save`
//! writes the changed slots. `sequential-storage` handles wear
//! levelling and garbage collection of the partition.
//!
//! The registry runs synchronously, so flash futures are driven with
//! `embassy_futures::block_on`. The flash driver must complete without
//! needing another task to run (a blocking NOR driver behind an async
//! adapter, or a RAM mock).

use core::ops::Range;

use crate::ble::BoundRole;
use crate::config::{
    FLASH_PAGE_SIZE, SETTINGS_FLASH_PAGE_COUNT, SETTINGS_FLASH_PAGE_START, SETTINGS_ITEM_BUFFER,
};
use crate::error::Error;
use crate::storage::{SettingValue, SettingsStore};
use embassy_futures::block_on;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

/// Default partition: pages `SETTINGS_FLASH_PAGE_START..+COUNT`.
pub const SETTINGS_FLASH_RANGE: Range<u32> = (SETTINGS_FLASH_PAGE_START * FLASH_PAGE_SIZE)
    ..((SETTINGS_FLASH_PAGE_START + SETTINGS_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE);

const fn item_key(role: BoundRole) -> u8 {
    role.index() as u8 + 1
}

/// One cached role slot.
#[derive(Default)]
struct Slot {
    value: SettingValue,
    /// True if the cache differs from flash.
    dirty: bool,
}

pub struct FlashSettings<F> {
    flash: F,
    range: Range<u32>,
    slots: [Slot; 3],
}

impl<F: NorFlash> FlashSettings<F> {
    /// Store over the default partition.
    pub fn new(flash: F) -> Self {
        Self::with_range(flash, SETTINGS_FLASH_RANGE)
    }

    /// Store over a custom partition (page aligned, at least two pages).
    pub fn with_range(flash: F, range: Range<u32>) -> Self {
        Self {
            flash,
            range,
            slots: Default::default(),
        }
    }

    /// Fill the cache from flash.
    ///
    /// Missing items read as unbound. On a read error the failing slot is
    /// cleared, the remaining slots are still loaded and the error is
    /// returned.
    pub fn load(&mut self) -> Result<(), Error> {
        let mut result = Ok(());
        for role in BoundRole::ALL {
            let mut buf = [0u8; SETTINGS_ITEM_BUFFER];
            let fetched = block_on(fetch_item::<u8, &[u8], _>(
                &mut self.flash,
                self.range.clone(),
                &mut NoCache::new(),
                &mut buf,
                &item_key(role),
            ));

            let slot = &mut self.slots[role.index()];
            slot.value.clear();
            slot.dirty = false;

            match fetched {
                Ok(Some(data)) => match core::str::from_utf8(data) {
                    Ok(s) if s.len() <= slot.value.capacity() => {
                        let _ = slot.value.push_str(s);
                        debug!("Loaded {} binding from flash", role);
                    }
                    _ => warn!("Ignoring unreadable {} binding in flash", role),
                },
                Ok(None) => debug!("No {} binding in flash", role),
                Err(_) => {
                    error!("Flash read error for {} binding", role);
                    result = Err(Error::Storage);
                }
            }
        }
        result
    }

    /// Give the flash driver back.
    pub fn release(self) -> F {
        self.flash
    }
}

impl<F: NorFlash> SettingsStore for FlashSettings<F> {
    fn get(&self, key: &str) -> Option<&str> {
        let role = BoundRole::from_key(key)?;
        Some(self.slots[role.index()].value.as_str())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let role = BoundRole::from_key(key).ok_or(Error::UnknownKey)?;
        let slot = &mut self.slots[role.index()];
        let value: SettingValue = value.try_into().map_err(|_| Error::ValueTooLong)?;
        if slot.value != value {
            slot.value = value;
            slot.dirty = true;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), Error> {
        for role in BoundRole::ALL {
            let slot = &self.slots[role.index()];
            if !slot.dirty {
                continue;
            }

            let mut buf = [0u8; SETTINGS_ITEM_BUFFER];
            let item: &[u8] = slot.value.as_bytes();
            let stored = block_on(store_item::<u8, &[u8], _>(
                &mut self.flash,
                self.range.clone(),
                &mut NoCache::new(),
                &mut buf,
                &item_key(role),
                &item,
            ));

            match stored {
                Ok(()) => {
                    info!("Saved {} binding to flash", role);
                    self.slots[role.index()].dirty = false;
                }
                Err(_) => {
                    // Stays dirty so a later save retries it.
                    error!("Flash write error for {} binding", role);
                    return Err(Error::Storage);
                }
            }
        }
        Ok(())
    }
}
