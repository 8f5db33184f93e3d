//! The single-writer facade over the shared state store.
//!
//! Every operation follows the same commit discipline: validate all
//! preconditions against current state, invoke the external transfer
//! primitive (the last fallible step), then apply the infallible state
//! mutation and record the notification. Nothing is written before the
//! last fallible step, so any failure leaves state untouched.

use crate::{
    auth,
    error::{Error, Result},
    events::Event,
    lease::{self, LeaseAgreement},
    property::{self, Property},
    state::LedgerState,
    time::Clock,
    transfer::Transfer,
    AccountId, LeaseId, PropertyId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of the admin-only escrow audit: whether the pooled balance still
/// covers every unreturned deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowAudit {
    pub escrow_balance: u64,
    pub outstanding_liability: u64,
    pub covered: bool,
}

#[derive(Debug)]
pub struct Ledger {
    state: LedgerState,
    clock: Arc<dyn Clock>,
    bank: Arc<dyn Transfer>,
    events: Vec<Event>,
}

impl Ledger {
    #[must_use]
    pub fn new(admin: AccountId, clock: Arc<dyn Clock>, bank: Arc<dyn Transfer>) -> Self {
        Self::with_state(LedgerState::new(admin), clock, bank)
    }

    /// Resume from a restored snapshot.
    #[must_use]
    pub fn with_state(state: LedgerState, clock: Arc<dyn Clock>, bank: Arc<dyn Transfer>) -> Self {
        Self {
            state,
            clock,
            bank,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Notifications emitted since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn commit(&mut self, event: Event) {
        debug_assert!(self.state.invariants_hold());
        self.events.push(event);
    }

    // ---- property registry ----

    pub fn register_property(
        &mut self,
        caller: AccountId,
        address: impl Into<String>,
        price: u64,
    ) -> PropertyId {
        let now = self.clock.now();
        let (id, event) = property::register(&mut self.state, now, caller, address.into(), price);
        info!("property {id} registered to {caller}");
        self.commit(event);
        id
    }

    pub fn list_for_sale(&mut self, caller: AccountId, id: PropertyId, price: u64) -> Result<()> {
        let event = property::list_for_sale(&mut self.state, caller, id, price)?;
        info!("property {id} listed for sale at {price}");
        self.commit(event);
        Ok(())
    }

    pub fn unlist(&mut self, caller: AccountId, id: PropertyId) -> Result<()> {
        let event = property::unlist(&mut self.state, caller, id)?;
        info!("property {id} unlisted");
        self.commit(event);
        Ok(())
    }

    pub fn purchase(&mut self, caller: AccountId, id: PropertyId, paid: u64) -> Result<()> {
        let event = property::purchase(&mut self.state, self.bank.as_ref(), caller, id, paid)?;
        info!("property {id} sold to {caller} for {paid}");
        self.commit(event);
        Ok(())
    }

    pub fn property(&self, id: PropertyId) -> Result<&Property> {
        self.state.property(id)
    }

    #[must_use]
    pub fn properties_by_owner(&self, owner: AccountId) -> &[PropertyId] {
        self.state.properties_by_owner(owner)
    }

    /// Boolean equality check against the record's current owner; `false`
    /// for properties that were never registered.
    #[must_use]
    pub fn verify_ownership(&self, id: PropertyId, who: AccountId) -> bool {
        auth::is_current_owner(&self.state, id, who)
    }

    // ---- lease ledger ----

    #[allow(clippy::too_many_arguments)]
    pub fn create_lease(
        &mut self,
        caller: AccountId,
        property_id: PropertyId,
        tenant: AccountId,
        monthly_rent: u64,
        security_deposit: u64,
        duration_months: u32,
    ) -> Result<LeaseId> {
        let now = self.clock.now();
        let (id, event) = lease::create(
            &mut self.state,
            now,
            caller,
            property_id,
            tenant,
            monthly_rent,
            security_deposit,
            duration_months,
        )?;
        info!("lease {id} created on property {property_id} for tenant {tenant}");
        self.commit(event);
        Ok(id)
    }

    pub fn pay_rent(&mut self, caller: AccountId, id: LeaseId, paid: u64) -> Result<()> {
        let now = self.clock.now();
        let event = lease::pay_rent(&mut self.state, self.bank.as_ref(), now, caller, id, paid)?;
        info!("rent of {paid} paid on lease {id}");
        self.commit(event);
        Ok(())
    }

    /// Hold a security deposit in escrow. Emits no notification.
    pub fn pay_deposit(&mut self, caller: AccountId, id: LeaseId, paid: u64) -> Result<()> {
        lease::pay_deposit(&mut self.state, caller, id, paid)?;
        debug!("deposit of {paid} for lease {id} held in escrow");
        debug_assert!(self.state.invariants_hold());
        Ok(())
    }

    pub fn terminate_lease(&mut self, caller: AccountId, id: LeaseId) -> Result<()> {
        let event = lease::terminate(&mut self.state, caller, id)?;
        info!("lease {id} terminated by {caller}");
        self.commit(event);
        Ok(())
    }

    pub fn return_deposit(&mut self, caller: AccountId, id: LeaseId) -> Result<()> {
        let event = lease::return_deposit(&mut self.state, self.bank.as_ref(), caller, id)?;
        info!("deposit returned on lease {id}");
        self.commit(event);
        Ok(())
    }

    pub fn lease(&self, id: LeaseId) -> Result<&LeaseAgreement> {
        self.state.lease(id)
    }

    #[must_use]
    pub fn leases_by_tenant(&self, tenant: AccountId) -> &[LeaseId] {
        self.state.leases_by_tenant(tenant)
    }

    #[must_use]
    pub fn escrow_balance(&self) -> u64 {
        self.state.escrow_balance()
    }

    /// Admin-only: compare the escrow pool against the sum of unreturned
    /// deposits. Commingling means the pool can fall short if deposits for
    /// several open leases interleave with withdrawals.
    pub fn audit_escrow(&self, caller: AccountId) -> Result<EscrowAudit> {
        if !auth::is_admin(&self.state, caller) {
            return Err(Error::Unauthorized {
                caller,
                action: "audit the escrow pool",
            });
        }
        let escrow_balance = self.state.escrow_balance();
        let outstanding_liability = self.state.outstanding_deposit_liability();
        Ok(EscrowAudit {
            escrow_balance,
            outstanding_liability,
            covered: escrow_balance >= outstanding_liability,
        })
    }
}
