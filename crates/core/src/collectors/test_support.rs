use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tcsi_invest_api::{
    Account, CurrencyBalance, InvestApiClient, InvestApiError, MoneyAmount, Portfolio, Position,
    Result as ApiResult,
};

/// Mock API client serving canned accounts and portfolios.
#[derive(Default)]
pub struct MockInvestApiClient {
    pub accounts: Vec<Account>,
    pub portfolios: HashMap<String, Portfolio>,
    pub fail_listing: bool,
    pub failing_accounts: HashSet<String>,
    pub calls: AtomicUsize,
}

impl MockInvestApiClient {
    pub fn with_account(mut self, account: Account, portfolio: Portfolio) -> Self {
        self.portfolios.insert(account.id.clone(), portfolio);
        self.accounts.push(account);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_portfolio(mut self, account_id: &str) -> Self {
        self.failing_accounts.insert(account_id.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvestApiClient for MockInvestApiClient {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(InvestApiError::Request("connection refused".to_string()));
        }
        Ok(self.accounts.clone())
    }

    async fn get_portfolio(&self, account_id: &str) -> ApiResult<Portfolio> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_accounts.contains(account_id) {
            return Err(InvestApiError::Api {
                message: "Broker account not found".to_string(),
                code: Some("NOT_FOUND".to_string()),
                tracking_id: None,
            });
        }
        Ok(self.portfolios.get(account_id).cloned().unwrap_or_default())
    }
}

pub fn position(figi: &str, balance: f64, avg_price: f64, expected_yield: f64, currency: &str) -> Position {
    Position {
        instrument_type: "Stock".to_string(),
        figi: figi.to_string(),
        isin: format!("ISIN{}", figi),
        ticker: format!("T{}", figi),
        name: format!("Instrument {}", figi),
        average_position_price: MoneyAmount::new(currency, avg_price),
        expected_yield: MoneyAmount::new(currency, expected_yield),
        balance,
        ..Default::default()
    }
}

pub fn positions_portfolio(positions: Vec<Position>) -> Portfolio {
    Portfolio {
        positions,
        currencies: Vec::new(),
    }
}

pub fn cash_portfolio(balances: &[(&str, f64)]) -> Portfolio {
    Portfolio {
        positions: Vec::new(),
        currencies: balances
            .iter()
            .map(|(currency, balance)| CurrencyBalance::new(*currency, *balance))
            .collect(),
    }
}
