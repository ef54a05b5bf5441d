//! tcsi Invest API - account and portfolio access for the exporter.
//!
//! This crate provides the [`InvestApiClient`] contract the metric
//! collectors consume, the data model it returns, and a reqwest based
//! [`RestClient`] for the Tinkoff Invest OpenAPI.

pub mod client;
pub mod errors;
pub mod models;
mod traits;

// Re-export commonly used types
pub use client::{ClientSettings, RestClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use errors::{InvestApiError, Result};
pub use models::{Account, CurrencyBalance, MoneyAmount, Portfolio, Position};
pub use traits::InvestApiClient;
