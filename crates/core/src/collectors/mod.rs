//! Collectors turning brokerage account state into gauge samples.

mod cash_collector;
mod collectors_traits;
mod portfolio_collector;

#[cfg(test)]
pub(crate) mod test_support;

pub use cash_collector::{CashCollector, CURRENCY_BALANCE};
pub use collectors_traits::Collector;
pub use portfolio_collector::{
    market_price, PortfolioCollector, POSITION_EXPECTED_YIELD, POSITION_ITEMS_COUNT,
    POSITION_MARKET_PRICE, POSITION_SPEND_AVG,
};

use log::{error, warn};
use tcsi_invest_api::{Account, InvestApiClient, Portfolio};

/// Fetch the portfolio of every account, one account at a time.
///
/// A failed account listing yields nothing; a failed portfolio fetch drops
/// only that account.
pub(crate) async fn account_portfolios(
    client: &dyn InvestApiClient,
    collector: &str,
) -> Vec<(Account, Portfolio)> {
    let accounts = match client.list_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            error!("[{}] Failed to list accounts: {}", collector, e);
            return Vec::new();
        }
    };

    let mut portfolios = Vec::with_capacity(accounts.len());
    for account in accounts {
        match client.get_portfolio(&account.id).await {
            Ok(portfolio) => portfolios.push((account, portfolio)),
            Err(e) => warn!(
                "[{}] Skipping account {} ({}): {}",
                collector, account.id, account.account_type, e
            ),
        }
    }
    portfolios
}
