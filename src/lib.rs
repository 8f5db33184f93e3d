//! Ownership and lease ledger for a real-estate registry.
//!
//! Two sub-ledgers (property registry, lease ledger) share one state store
//! and are mutated only through the transactional operations on [`Ledger`].
//! The execution model is strictly serial; ordering, authentication, value
//! transfer and durability belong to the embedding environment.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod error;
pub mod events;
pub mod lease;
pub mod ledger;
pub mod property;
pub mod state;
pub mod time;
pub mod transfer;

pub use error::{Error, Result};
pub use events::Event;
pub use lease::LeaseAgreement;
pub use ledger::{EscrowAudit, Ledger};
pub use property::Property;
pub use state::LedgerState;

use std::fmt;

/// An already-authenticated principal (owner, landlord, tenant or admin).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct AccountId(pub uuid::Uuid);

impl AccountId {
    /// The zero identity. Never a valid counterparty.
    pub const ZERO: Self = Self(uuid::Uuid::nil());

    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monotonically assigned property identifier, starting at 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monotonically assigned lease identifier, starting at 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct LeaseId(pub u64);

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
