//! Commands the registry issues to the Bluetooth stack.
//!
//! The stack owns scanning, connections and the bonding databases; the
//! registry only tells it which addresses are pre-approved, when to
//! start, and which keys to forget.

use crate::ble::{BdAddr, HidEvents};
use crate::error::StackError;

/// Address type used when deleting an LE bond.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LeAddressType {
    Public,
    Random,
}

/// Outbound interface to the Bluetooth host stack.
pub trait BtStack {
    /// Bring the stack up. Called once, on the first enable.
    fn init(&mut self) -> Result<(), StackError>;

    /// Pre-approve `address` in the stack's own admission path.
    fn allowlist_add(&mut self, address: BdAddr) -> Result<(), StackError>;

    /// Start scanning and auto-connect admitted devices.
    fn start_scanning(&mut self) -> Result<(), StackError>;

    /// Delete every classic (BR/EDR) link key.
    fn delete_all_classic_keys(&mut self) -> Result<(), StackError>;

    /// Delete every LE bond.
    fn delete_all_le_bonds(&mut self) -> Result<(), StackError>;

    /// Delete the LE bond stored for `address`.
    fn delete_bonding(
        &mut self,
        address: BdAddr,
        address_type: LeAddressType,
    ) -> Result<(), StackError>;

    /// Drop the classic link key stored for `address`.
    fn drop_link_key(&mut self, address: BdAddr) -> Result<(), StackError>;

    /// Run the stack's event sources once. Any events are delivered to
    /// `events` before this returns.
    fn poll(&mut self, events: &mut dyn HidEvents);
}
