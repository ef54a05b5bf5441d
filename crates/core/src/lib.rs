//! tcsi Core - collectors, metric schema and registry.
//!
//! On every scrape the [`CollectorRegistry`] asks each registered
//! [`Collector`] for fresh samples. The portfolio and cash collectors read
//! account state through the `InvestApiClient` trait from
//! `tcsi-invest-api` and map it onto a fixed set of gauges.

pub mod collectors;
pub mod errors;
pub mod metrics;
pub mod registry;

pub use collectors::{CashCollector, Collector, PortfolioCollector};
pub use metrics::{MetricDescriptor, MetricSample};
pub use registry::{CollectorRegistry, TEXT_CONTENT_TYPE};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
