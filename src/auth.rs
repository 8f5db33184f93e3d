//! Authorization predicates shared by both sub-ledgers.
//!
//! Each predicate reads current state at the moment it is called; results
//! are never cached, so a guard evaluated at the top of an operation cannot
//! drift from the state the operation then mutates.

use crate::{
    error::{Error, Result},
    state::LedgerState,
    AccountId, LeaseId, PropertyId,
};

#[must_use]
pub fn is_admin(state: &LedgerState, caller: AccountId) -> bool {
    state.admin == caller
}

#[must_use]
pub fn property_exists(state: &LedgerState, id: PropertyId) -> bool {
    state.properties.get(&id).is_some_and(|p| p.exists)
}

/// Current ownership lives on the record itself, never in the owner index.
#[must_use]
pub fn is_current_owner(state: &LedgerState, id: PropertyId, caller: AccountId) -> bool {
    state
        .properties
        .get(&id)
        .is_some_and(|p| p.exists && p.owner == caller)
}

#[must_use]
pub fn lease_is_active(state: &LedgerState, id: LeaseId) -> bool {
    state.leases.get(&id).is_some_and(|l| l.active)
}

pub(crate) fn ensure_property_exists(state: &LedgerState, id: PropertyId) -> Result<()> {
    if property_exists(state, id) {
        Ok(())
    } else {
        Err(Error::property_not_found(id))
    }
}

pub(crate) fn ensure_current_owner(
    state: &LedgerState,
    id: PropertyId,
    caller: AccountId,
    action: &'static str,
) -> Result<()> {
    if is_current_owner(state, id, caller) {
        Ok(())
    } else {
        Err(Error::Unauthorized { caller, action })
    }
}

/// `NotFound` for an unknown lease, `InvalidState` for a terminated one.
pub(crate) fn ensure_lease_active(state: &LedgerState, id: LeaseId) -> Result<()> {
    state.lease(id)?;
    if lease_is_active(state, id) {
        Ok(())
    } else {
        Err(Error::InvalidState("lease is no longer active"))
    }
}
