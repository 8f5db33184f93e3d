use crate::{
    error::{Error, Result},
    lease::LeaseAgreement,
    property::Property,
    AccountId, LeaseId, PropertyId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single shared state store: property and lease records, append-only
/// lookup indices, id counters and the pooled escrow balance.
///
/// Exclusively owned by [`crate::Ledger`]; the only writer path is the
/// operation set defined there. `BTreeMap` keeps iteration and snapshots
/// deterministic. Durability of snapshots is the substrate's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub(crate) properties: BTreeMap<PropertyId, Property>,
    pub(crate) leases: BTreeMap<LeaseId, LeaseAgreement>,
    pub(crate) owner_index: BTreeMap<AccountId, Vec<PropertyId>>,
    pub(crate) tenant_index: BTreeMap<AccountId, Vec<LeaseId>>,
    pub(crate) next_property_id: u64,
    pub(crate) next_lease_id: u64,
    pub(crate) escrow_balance: u64,
    pub(crate) admin: AccountId,
}

impl LedgerState {
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self {
            properties: BTreeMap::new(),
            leases: BTreeMap::new(),
            owner_index: BTreeMap::new(),
            tenant_index: BTreeMap::new(),
            next_property_id: 1,
            next_lease_id: 1,
            escrow_balance: 0,
            admin,
        }
    }

    pub(crate) fn assign_property_id(&mut self) -> PropertyId {
        let id = PropertyId(self.next_property_id);
        self.next_property_id += 1;
        id
    }

    pub(crate) fn assign_lease_id(&mut self) -> LeaseId {
        let id = LeaseId(self.next_lease_id);
        self.next_lease_id += 1;
        id
    }

    /// Fetch a property record; `NotFound` if it was never registered.
    pub fn property(&self, id: PropertyId) -> Result<&Property> {
        self.properties
            .get(&id)
            .filter(|p| p.exists)
            .ok_or_else(|| Error::property_not_found(id))
    }

    pub(crate) fn property_mut(&mut self, id: PropertyId) -> Result<&mut Property> {
        self.properties
            .get_mut(&id)
            .filter(|p| p.exists)
            .ok_or_else(|| Error::property_not_found(id))
    }

    /// Fetch a lease record; inactive leases remain readable forever.
    pub fn lease(&self, id: LeaseId) -> Result<&LeaseAgreement> {
        self.leases.get(&id).ok_or_else(|| Error::lease_not_found(id))
    }

    pub(crate) fn lease_mut(&mut self, id: LeaseId) -> Result<&mut LeaseAgreement> {
        self.leases
            .get_mut(&id)
            .ok_or_else(|| Error::lease_not_found(id))
    }

    /// Every property id this account has ever owned, in acquisition order.
    /// Lookup-only back-reference; never consult it for authorization.
    #[must_use]
    pub fn properties_by_owner(&self, owner: AccountId) -> &[PropertyId] {
        self.owner_index.get(&owner).map_or(&[], Vec::as_slice)
    }

    /// Every lease id this account has ever held as tenant, in order.
    #[must_use]
    pub fn leases_by_tenant(&self, tenant: AccountId) -> &[LeaseId] {
        self.tenant_index.get(&tenant).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn escrow_balance(&self) -> u64 {
        self.escrow_balance
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.admin
    }

    /// Sum of every unreturned security deposit, whether or not the tenant
    /// ever paid it in. Deposits are pooled, not tracked per lease, so this
    /// is the upper bound the escrow balance should cover.
    #[must_use]
    pub fn outstanding_deposit_liability(&self) -> u64 {
        self.leases
            .values()
            .filter(|l| !l.deposit_returned)
            .fold(0u64, |acc, l| acc.saturating_add(l.security_deposit))
    }

    /// Structural invariants that must hold after every operation:
    /// a listed property has a positive price, a returned deposit implies a
    /// terminated lease, and no record carries an unassigned id.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let listings_priced = self.properties.values().all(|p| !p.for_sale || p.price > 0);
        let returns_follow_termination =
            self.leases.values().all(|l| !l.deposit_returned || !l.active);
        let ids_assigned = self.properties.keys().all(|id| id.0 < self.next_property_id)
            && self.leases.keys().all(|id| id.0 < self.next_lease_id);
        listings_priced && returns_follow_termination && ids_assigned
    }

    /// Serialize the full state for the durable substrate.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn restore(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Content digest of the current state. Two states with equal
    /// checkpoints hold identical records, indices, counters and escrow.
    pub fn checkpoint(&self) -> Result<[u8; 32]> {
        Ok(*blake3::hash(&self.snapshot()?).as_bytes())
    }
}
