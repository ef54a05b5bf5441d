//! Trait defining the contract the collectors consume.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{Account, Portfolio};

/// Trait for fetching account state from the brokerage API.
///
/// Implementations must be safe to share between concurrently running
/// collectors; the collectors only ever read through it.
#[async_trait]
pub trait InvestApiClient: Send + Sync {
    /// Fetch all broker accounts of the token holder
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Fetch positions and free currency balances of one account
    async fn get_portfolio(&self, account_id: &str) -> Result<Portfolio>;
}
