//! Lease ledger: agreements, rent and deposit escrow, lifecycle.
//!
//! Per-lease state machine: created (active) -> terminated -> deposit
//! returned. Terminal once the deposit is returned; a lease whose deposit
//! is withheld stays terminated indefinitely. Records are never deleted
//! and serve as the historical record once inactive.

use crate::{
    auth,
    error::{Error, Result},
    events::Event,
    state::LedgerState,
    time::Timestamp,
    transfer::Transfer,
    AccountId, LeaseId, PropertyId,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Lease terms use a fixed 30-day month, not calendar months.
pub const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseAgreement {
    pub id: LeaseId,
    pub property_id: PropertyId,
    pub landlord: AccountId,
    pub tenant: AccountId,
    pub monthly_rent: u64,
    pub security_deposit: u64,
    pub lease_start: Timestamp,
    pub lease_end: Timestamp,
    /// `None` until the first rent payment lands.
    pub last_payment: Option<Timestamp>,
    pub active: bool,
    pub deposit_returned: bool,
}

impl LeaseAgreement {
    #[must_use]
    pub fn is_within_term(&self, now: Timestamp) -> bool {
        now <= self.lease_end
    }
}

pub(crate) fn create(
    state: &mut LedgerState,
    now: Timestamp,
    caller: AccountId,
    property_id: PropertyId,
    tenant: AccountId,
    monthly_rent: u64,
    security_deposit: u64,
    duration_months: u32,
) -> Result<(LeaseId, Event)> {
    auth::ensure_property_exists(state, property_id)?;
    auth::ensure_current_owner(
        state,
        property_id,
        caller,
        "lease out a property they do not own",
    )?;
    if tenant.is_zero() {
        return Err(Error::InvalidArgument("tenant must be a real identity"));
    }
    if monthly_rent == 0 {
        return Err(Error::InvalidArgument("monthly rent must be positive"));
    }
    if duration_months == 0 {
        return Err(Error::InvalidArgument(
            "lease duration must be at least one month",
        ));
    }
    // A property under sale negotiation cannot be leased out from under it.
    if state.property(property_id)?.for_sale {
        return Err(Error::InvalidState("property is listed for sale"));
    }

    // Both the duration and the end timestamp can exceed chrono's
    // representable range for absurd month counts; reject, never panic.
    let lease_end = Duration::try_days(DAYS_PER_MONTH * i64::from(duration_months))
        .and_then(|term| now.checked_add_signed(term))
        .ok_or(Error::InvalidArgument("lease duration out of range"))?;
    let id = state.assign_lease_id();
    let lease = LeaseAgreement {
        id,
        property_id,
        landlord: caller,
        tenant,
        monthly_rent,
        security_deposit,
        lease_start: now,
        lease_end,
        last_payment: None,
        active: true,
        deposit_returned: false,
    };
    state.leases.insert(id, lease);
    state.tenant_index.entry(tenant).or_default().push(id);
    Ok((
        id,
        Event::LeaseCreated {
            id,
            property_id,
            tenant,
            monthly_rent,
        },
    ))
}

/// Forward one exact rent payment to the landlord. No partial payments,
/// no grace period; a missed payment has no contractual effect here.
pub(crate) fn pay_rent(
    state: &mut LedgerState,
    bank: &dyn Transfer,
    now: Timestamp,
    caller: AccountId,
    id: LeaseId,
    paid: u64,
) -> Result<Event> {
    auth::ensure_lease_active(state, id)?;
    let landlord = {
        let lease = state.lease(id)?;
        if lease.tenant != caller {
            return Err(Error::Unauthorized {
                caller,
                action: "pay rent on a lease they do not hold",
            });
        }
        if !lease.is_within_term(now) {
            return Err(Error::InvalidState("lease term has ended"));
        }
        if paid != lease.monthly_rent {
            return Err(Error::InsufficientFunds {
                needed: lease.monthly_rent,
                available: paid,
            });
        }
        lease.landlord
    };

    bank.credit(landlord, paid)?;

    state.lease_mut(id)?.last_payment = Some(now);
    Ok(Event::RentPaid {
        id,
        tenant: caller,
        amount: paid,
        at: now,
    })
}

/// Hold an exact deposit payment in the pooled escrow balance. Deposits are
/// commingled; no per-lease escrow record exists and the lease itself is
/// not marked as funded.
pub(crate) fn pay_deposit(
    state: &mut LedgerState,
    caller: AccountId,
    id: LeaseId,
    paid: u64,
) -> Result<()> {
    auth::ensure_lease_active(state, id)?;
    let lease = state.lease(id)?;
    if lease.tenant != caller {
        return Err(Error::Unauthorized {
            caller,
            action: "pay a deposit on a lease they do not hold",
        });
    }
    if paid != lease.security_deposit {
        return Err(Error::InvalidArgument(
            "deposit must equal the agreed amount exactly",
        ));
    }
    state.escrow_balance = state
        .escrow_balance
        .checked_add(paid)
        .ok_or(Error::InvalidArgument("escrow balance overflow"))?;
    Ok(())
}

/// Either party may terminate. Outstanding rent is not settled.
pub(crate) fn terminate(
    state: &mut LedgerState,
    caller: AccountId,
    id: LeaseId,
) -> Result<Event> {
    auth::ensure_lease_active(state, id)?;
    let lease = state.lease(id)?;
    if caller != lease.landlord && caller != lease.tenant {
        return Err(Error::Unauthorized {
            caller,
            action: "terminate a lease they are not party to",
        });
    }
    state.lease_mut(id)?.active = false;
    Ok(Event::LeaseTerminated { id })
}

/// Release the deposit back to the tenant out of the escrow pool. An
/// escrow shortfall here means a bookkeeping fault or commingled deposits
/// withdrawn elsewhere, never a normal outcome.
pub(crate) fn return_deposit(
    state: &mut LedgerState,
    bank: &dyn Transfer,
    caller: AccountId,
    id: LeaseId,
) -> Result<Event> {
    let (tenant, amount) = {
        let lease = state.lease(id)?;
        if lease.landlord != caller {
            return Err(Error::Unauthorized {
                caller,
                action: "return a deposit they do not hold",
            });
        }
        if lease.active {
            return Err(Error::InvalidState("lease is still active"));
        }
        if lease.deposit_returned {
            return Err(Error::InvalidState("deposit already returned"));
        }
        (lease.tenant, lease.security_deposit)
    };
    if state.escrow_balance < amount {
        return Err(Error::InsufficientFunds {
            needed: amount,
            available: state.escrow_balance,
        });
    }

    bank.credit(tenant, amount)?;

    state.escrow_balance -= amount;
    state.lease_mut(id)?.deposit_returned = true;
    Ok(Event::DepositReturned { id, tenant, amount })
}
