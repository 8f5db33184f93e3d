use crate::{
    error::{Error, Result},
    AccountId,
};
use dashmap::DashMap;

/// The external value-transfer primitive: atomically credit an account.
///
/// A credit either completes or returns an error with no funds moved; the
/// ledger orders it before any state mutation so a failed transfer aborts
/// the whole operation.
pub trait Transfer: Send + Sync + std::fmt::Debug {
    fn credit(&self, account: AccountId, amount: u64) -> Result<()>;
}

/// In-memory account book implementing [`Transfer`], for tests and
/// single-process embeddings. Accounts can be primed to reject credits to
/// exercise the abort path.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: DashMap<AccountId, u64>,
    rejecting: DashMap<AccountId, ()>,
}

impl InMemoryBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn balance(&self, account: AccountId) -> u64 {
        self.balances.get(&account).map_or(0, |b| *b)
    }

    /// Make every subsequent credit to `account` fail.
    pub fn reject_credits_to(&self, account: AccountId) {
        self.rejecting.insert(account, ());
    }

    pub fn accept_credits_to(&self, account: AccountId) {
        self.rejecting.remove(&account);
    }
}

impl Transfer for InMemoryBank {
    fn credit(&self, account: AccountId, amount: u64) -> Result<()> {
        if self.rejecting.contains_key(&account) {
            return Err(Error::Transfer {
                account,
                reason: "recipient rejects credits".to_string(),
            });
        }
        let mut balance = self.balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
