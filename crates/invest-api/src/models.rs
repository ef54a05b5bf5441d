//! Models representing account and portfolio data from the Invest OpenAPI.
//! Field names mirror the REST v1 payloads.

use serde::{Deserialize, Serialize};

/// A broker account owned by the token holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Broker account id, used to query the portfolio
    #[serde(rename = "brokerAccountId")]
    pub id: String,

    /// Account classification as reported by the API (e.g. "Tinkoff", "TinkoffIis")
    #[serde(rename = "brokerAccountType")]
    pub account_type: String,
}

impl Account {
    pub fn new(id: impl Into<String>, account_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account_type: account_type.into(),
        }
    }
}

/// A monetary value in a given currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MoneyAmount {
    /// Currency code (e.g., "RUB", "USD")
    pub currency: String,
    pub value: f64,
}

impl MoneyAmount {
    pub fn new(currency: impl Into<String>, value: f64) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }
}

/// A held instrument within a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Instrument type (e.g., "Stock", "Bond", "Etf", "Currency")
    pub instrument_type: String,
    pub figi: String,
    /// Not every instrument has an ISIN (currencies don't)
    #[serde(default)]
    pub isin: String,
    #[serde(default)]
    pub ticker: String,
    /// Human readable instrument name
    #[serde(default)]
    pub name: String,
    /// Average purchase price per item
    #[serde(default)]
    pub average_position_price: MoneyAmount,
    /// Unrealized yield of the whole position
    #[serde(default)]
    pub expected_yield: MoneyAmount,
    /// Quantity held
    pub balance: f64,
    #[serde(default)]
    pub blocked: f64,
    #[serde(default)]
    pub lots: i64,
}

/// Free (uninvested) money in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    pub currency: String,
    pub balance: f64,
    #[serde(default)]
    pub blocked: f64,
}

impl CurrencyBalance {
    pub fn new(currency: impl Into<String>, balance: f64) -> Self {
        Self {
            currency: currency.into(),
            balance,
            blocked: 0.0,
        }
    }
}

/// Positions and currency balances of one account.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Portfolio {
    pub positions: Vec<Position>,
    pub currencies: Vec<CurrencyBalance>,
}
