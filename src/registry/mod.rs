//! Admission and pairing registry.
//!
//! Decides which discovered HID peripherals may connect, tracks every
//! device seen this session, and remembers one bound device per role
//! (keyboard, mouse, gamepad) across reboots.
//!
//! ## Lifecycle
//!
//! ```text
//!   Disabled --enable--> Enabled --disable--> Disabled
//! ```
//!
//! The first `enable` also loads the allowlist, brings the Bluetooth
//! stack up and starts scanning; that happens once per process.
//!
//! ## Threading
//!
//! Single cooperative thread. The stack delivers events only from inside
//! [`Registry::poll`], one at a time, so nothing here is locked.

pub mod admission;
pub mod allowlist;
pub mod device_table;
pub mod pairing;

use crate::ble::stack::{BtStack, LeAddressType};
use crate::ble::{Admission, BdAddr, BoundRole, Discovery, HidEvents, ReadyDevice, Readiness};
use crate::error::{Error, StackError};
use crate::storage::binding::bonded_address_of;
use crate::storage::{PersistedBinding, SettingsStore};
use allowlist::Allowlist;
use device_table::{DeviceRecord, DeviceTable};

/// Persisted binding of every role, as currently stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings([Option<PersistedBinding>; 3]);

impl Bindings {
    pub fn get(&self, role: BoundRole) -> Option<&PersistedBinding> {
        self.0[role.index()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoundRole, Option<&PersistedBinding>)> + '_ {
        BoundRole::ALL.into_iter().map(move |r| (r, self.get(r)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// State touched by stack events. Kept apart from the stack itself so
/// the stack can be polled with this as its event handler.
struct Session<S> {
    settings: S,
    devices: DeviceTable,
    active: bool,
    connected: usize,
    last_error: Option<Error>,
}

impl<S: SettingsStore> HidEvents for Session<S> {
    fn on_discovered(&mut self, device: &Discovery<'_>) -> Admission {
        if !self.active {
            return Admission::Ignore;
        }
        admission::filter(&mut self.devices, device)
    }

    fn on_connected(&mut self, address: BdAddr) {
        self.connected += 1;
        info!("Device connected: {} ({} active)", address, self.connected);
    }

    fn on_disconnected(&mut self, address: BdAddr) {
        self.connected = self.connected.saturating_sub(1);
        info!("Device disconnected: {} ({} active)", address, self.connected);
    }

    fn on_ready(&mut self, device: &ReadyDevice<'_>) -> Readiness {
        if !self.active {
            debug!("Registry inactive - ignoring ready {}", device.address);
            return Readiness::IgnoreDevice;
        }
        // The device is paired either way; a failed commit is kept for
        // the management interface to report.
        if let Err(e) = pairing::finalize(&mut self.devices, &mut self.settings, device) {
            error!("Failed to persist pairing for {}: {}", device.address, e);
            self.last_error = Some(e);
        }
        Readiness::Success
    }
}

/// The registry: lifecycle control, event handling and queries.
pub struct Registry<S, B> {
    stack: B,
    session: Session<S>,
    allowlist: Allowlist,
    initialized: bool,
}

impl<S: SettingsStore, B: BtStack> Registry<S, B> {
    /// A disabled, uninitialized registry.
    pub fn new(settings: S, stack: B) -> Self {
        Self {
            stack,
            session: Session {
                settings,
                devices: DeviceTable::new(),
                active: false,
                connected: 0,
                last_error: None,
            },
            allowlist: Allowlist::new(),
            initialized: false,
        }
    }

    /// Start (or restart) the registry.
    ///
    /// First call: load the allowlist, bring the stack up, register the
    /// bound addresses with it and start scanning. Every call: empty the
    /// device table and mark the registry active.
    ///
    /// Fails only if the stack cannot be initialised; the registry then
    /// stays disabled and the next call retries.
    pub fn enable(&mut self) -> Result<(), Error> {
        if !self.initialized {
            let bound = self.allowlist.load(&self.session.settings);
            info!("Allowlist loaded: {} bound device(s)", bound);

            self.stack.init().map_err(|e| {
                error!("Bluetooth stack init failed: {}", e);
                Error::from(e)
            })?;

            for entry in self.allowlist.valid() {
                if let Some(address) = entry.address {
                    if let Err(e) = self.stack.allowlist_add(address) {
                        warn!("Could not allowlist {} {}: {}", entry.role, address, e);
                    }
                }
            }
            if let Err(e) = self.stack.start_scanning() {
                error!("Could not start scanning: {}", e);
            }
            self.initialized = true;
        }

        self.session.devices.clear();
        self.session.active = true;
        info!("Bluetooth registry enabled");
        Ok(())
    }

    /// Stop reacting to stack events. In-flight stack work is untouched.
    pub fn disable(&mut self) {
        self.session.active = false;
        info!("Bluetooth registry disabled");
    }

    /// Let the stack run its event sources once. No-op while disabled or
    /// before the first enable.
    pub fn poll(&mut self) {
        if !self.session.active || !self.initialized {
            return;
        }
        self.stack.poll(&mut self.session);
    }

    /// Forget every device seen this session. Bindings and bonds stay.
    pub fn reset_devices(&mut self) {
        self.session.devices.clear();
    }

    /// Full wipe: stack link keys and LE bonds, the device table and all
    /// three persisted bindings, then commit.
    ///
    /// Stack failures are logged and do not stop the wipe. Only the
    /// settings write/commit can fail.
    pub fn clear_pairings(&mut self) -> Result<(), Error> {
        if let Err(e) = self.stack.delete_all_classic_keys() {
            warn!("Deleting classic link keys failed: {}", e);
        }
        if let Err(e) = self.stack.delete_all_le_bonds() {
            warn!("Deleting LE bonds failed: {}", e);
        }
        self.session.devices.clear();

        for role in BoundRole::ALL {
            self.session.settings.put(role.key(), "")?;
        }
        self.session.settings.save()?;
        info!("Bluetooth pairings cleared");
        Ok(())
    }

    /// Unbind one role: delete the stack's bonding material for the bound
    /// address, then erase the persisted value and commit.
    ///
    /// An already empty slot is left alone. A bare address without a
    /// name still has its bonds deleted. A value whose address cannot be
    /// parsed is erased without touching the stack.
    pub fn unbind(&mut self, role: BoundRole) -> Result<(), Error> {
        let address = match self.session.settings.get(role.key()) {
            None | Some("") => {
                debug!("{} not bound - nothing to unbind", role);
                return Ok(());
            }
            Some(value) => bonded_address_of(value),
        };

        match address {
            Some(address) => self.forget_bonds(address),
            None => warn!("{} binding is malformed - erasing it", role),
        }

        self.session.settings.put(role.key(), "")?;
        self.session.settings.save()?;
        info!("{} pairing cleared", role);
        Ok(())
    }

    /// Classic and LE bond deletion are independent; a missing bond of
    /// one kind does not stop the other.
    fn forget_bonds(&mut self, address: BdAddr) {
        log_bond_result("classic link key", address, self.stack.drop_link_key(address));
        for address_type in [LeAddressType::Public, LeAddressType::Random] {
            log_bond_result(
                "LE bond",
                address,
                self.stack.delete_bonding(address, address_type),
            );
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════

    /// Devices seen this session, in first-seen order.
    pub fn devices(&self) -> &[DeviceRecord] {
        self.session.devices.records()
    }

    /// Persisted binding of one role. Malformed values read as unbound.
    pub fn binding(&self, role: BoundRole) -> Option<PersistedBinding> {
        self.session
            .settings
            .get(role.key())
            .and_then(PersistedBinding::parse)
    }

    /// Persisted bindings of all roles.
    pub fn bindings(&self) -> Bindings {
        Bindings(BoundRole::ALL.map(|r| self.binding(r)))
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Links the stack reported as connected and not yet disconnected.
    pub fn connected_count(&self) -> usize {
        self.session.connected
    }

    /// Most recent persistence failure from a ready event.
    pub fn last_error(&self) -> Option<Error> {
        self.session.last_error
    }

    pub fn take_last_error(&mut self) -> Option<Error> {
        self.session.last_error.take()
    }

    pub fn settings(&self) -> &S {
        &self.session.settings
    }

    pub fn stack(&self) -> &B {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut B {
        &mut self.stack
    }

    pub fn into_parts(self) -> (S, B) {
        (self.session.settings, self.stack)
    }
}

/// Events can also be fed straight to the registry, for stacks that
/// deliver them outside [`Registry::poll`].
impl<S: SettingsStore, B: BtStack> HidEvents for Registry<S, B> {
    fn on_discovered(&mut self, device: &Discovery<'_>) -> Admission {
        self.session.on_discovered(device)
    }

    fn on_connected(&mut self, address: BdAddr) {
        self.session.on_connected(address)
    }

    fn on_disconnected(&mut self, address: BdAddr) {
        self.session.on_disconnected(address)
    }

    fn on_ready(&mut self, device: &ReadyDevice<'_>) -> Readiness {
        self.session.on_ready(device)
    }
}

fn log_bond_result(kind: &str, address: BdAddr, result: Result<(), StackError>) {
    match result {
        Ok(()) => debug!("Deleted {} for {}", kind, address),
        Err(StackError::NotFound) => debug!("No {} for {}", kind, address),
        Err(e) => warn!("Deleting {} for {} failed: {}", kind, address, e),
    }
}
