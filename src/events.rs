use crate::{time::Timestamp, AccountId, LeaseId, PropertyId};
use serde::{Deserialize, Serialize};

/// Notification emitted by a successful mutating operation. The embedding
/// environment drains these for public auditability; the ledger itself
/// never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PropertyRegistered {
        id: PropertyId,
        owner: AccountId,
        address: String,
    },
    PropertyListed {
        id: PropertyId,
        price: u64,
    },
    PropertyUnlisted {
        id: PropertyId,
    },
    PropertySold {
        id: PropertyId,
        from: AccountId,
        to: AccountId,
        price: u64,
    },
    LeaseCreated {
        id: LeaseId,
        property_id: PropertyId,
        tenant: AccountId,
        monthly_rent: u64,
    },
    RentPaid {
        id: LeaseId,
        tenant: AccountId,
        amount: u64,
        at: Timestamp,
    },
    LeaseTerminated {
        id: LeaseId,
    },
    DepositReturned {
        id: LeaseId,
        tenant: AccountId,
        amount: u64,
    },
}
