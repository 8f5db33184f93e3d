use crate::{AccountId, LeaseId, PropertyId};
use thiserror::Error;

/// Failure kinds observable by callers. Every error is synchronous and
/// leaves ledger state exactly as it was before the operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("caller {caller} may not {action}")]
    Unauthorized {
        caller: AccountId,
        action: &'static str,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("transfer to {account} failed: {reason}")]
    Transfer { account: AccountId, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

impl Error {
    pub(crate) fn property_not_found(id: PropertyId) -> Self {
        Error::NotFound {
            entity: "property",
            id: id.0,
        }
    }

    pub(crate) fn lease_not_found(id: LeaseId) -> Self {
        Error::NotFound {
            entity: "lease",
            id: id.0,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
