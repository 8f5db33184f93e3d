//! Property registry: records, sale listings and ownership transfer.

use crate::{
    auth,
    error::{Error, Result},
    events::Event,
    state::LedgerState,
    time::Timestamp,
    transfer::Transfer,
    AccountId, PropertyId,
};
use serde::{Deserialize, Serialize};

/// A registered property. Tombstone-free: once `exists` is set it is never
/// unset, and records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub address: String,
    pub owner: AccountId,
    pub price: u64,
    pub for_sale: bool,
    pub exists: bool,
    pub registered_at: Timestamp,
}

/// Infallible: any well-formed registration succeeds and the caller becomes
/// the first owner.
pub(crate) fn register(
    state: &mut LedgerState,
    now: Timestamp,
    caller: AccountId,
    address: String,
    price: u64,
) -> (PropertyId, Event) {
    let id = state.assign_property_id();
    let property = Property {
        id,
        address: address.clone(),
        owner: caller,
        price,
        for_sale: false,
        exists: true,
        registered_at: now,
    };
    state.properties.insert(id, property);
    state.owner_index.entry(caller).or_default().push(id);
    (
        id,
        Event::PropertyRegistered {
            id,
            owner: caller,
            address,
        },
    )
}

pub(crate) fn list_for_sale(
    state: &mut LedgerState,
    caller: AccountId,
    id: PropertyId,
    price: u64,
) -> Result<Event> {
    auth::ensure_property_exists(state, id)?;
    auth::ensure_current_owner(state, id, caller, "list a property they do not own")?;
    if price == 0 {
        return Err(Error::InvalidArgument("sale price must be positive"));
    }
    let property = state.property_mut(id)?;
    property.price = price;
    property.for_sale = true;
    Ok(Event::PropertyListed { id, price })
}

pub(crate) fn unlist(state: &mut LedgerState, caller: AccountId, id: PropertyId) -> Result<Event> {
    auth::ensure_property_exists(state, id)?;
    auth::ensure_current_owner(state, id, caller, "unlist a property they do not own")?;
    state.property_mut(id)?.for_sale = false;
    Ok(Event::PropertyUnlisted { id })
}

/// Transfer ownership against exact payment. The seller is credited before
/// any record is touched, so a failed transfer leaves the registry as-is.
pub(crate) fn purchase(
    state: &mut LedgerState,
    bank: &dyn Transfer,
    caller: AccountId,
    id: PropertyId,
    paid: u64,
) -> Result<Event> {
    let (seller, price) = {
        let property = state.property(id)?;
        if !property.for_sale {
            return Err(Error::InvalidState("property is not for sale"));
        }
        if paid != property.price {
            return Err(Error::InvalidArgument(
                "payment must equal the sale price exactly",
            ));
        }
        if property.owner == caller {
            return Err(Error::InvalidState("buyer already owns this property"));
        }
        (property.owner, property.price)
    };

    bank.credit(seller, paid)?;

    let property = state.property_mut(id)?;
    property.owner = caller;
    property.for_sale = false;
    state.owner_index.entry(caller).or_default().push(id);
    Ok(Event::PropertySold {
        id,
        from: seller,
        to: caller,
        price,
    })
}
