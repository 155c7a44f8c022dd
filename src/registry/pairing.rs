//! Pairing finalizer - runs once per "device ready" event.
//!
//! 1. Resolve the role (confirmed HID capability beats Class of Device).
//! 2. Upsert the device table.
//! 3. Write `"<address>#<name>"` into every slot the role binds to.
//! 4. Commit, only if something was written.
//!
//! Pairing a second device of the same role overwrites the slot.

use crate::ble::cod::classify;
use crate::ble::{ReadyDevice, Role};
use crate::error::Error;
use crate::registry::device_table::DeviceTable;
use crate::storage::{PersistedBinding, SettingsStore};

/// What the finalizer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finalized {
    pub role: Role,
    /// A binding was written and committed.
    pub persisted: bool,
}

/// Finalize a successful pairing.
///
/// The table update is kept even if writing or committing the binding
/// fails.
pub fn finalize(
    table: &mut DeviceTable,
    settings: &mut impl SettingsStore,
    device: &ReadyDevice<'_>,
) -> Result<Finalized, Error> {
    let role = classify(device.cod, device.capability);
    info!("Device ready {} -> {}", device.address, role);

    table.upsert(device.address, device.name, role);

    let slots = role.bound_slots();
    if slots.is_empty() {
        debug!("No binding slot for {}", device.address);
        return Ok(Finalized {
            role,
            persisted: false,
        });
    }

    let value = PersistedBinding::new(device.address, device.name).encode();
    for slot in slots {
        settings.put(slot.key(), &value)?;
        info!("Bound {} to {}", slot, device.address);
    }
    settings.save()?;

    Ok(Finalized {
        role,
        persisted: true,
    })
}
