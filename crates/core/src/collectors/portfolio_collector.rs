use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};
use tcsi_invest_api::{Account, InvestApiClient, Position};

use super::{account_portfolios, Collector};
use crate::errors::Result;
use crate::metrics::{MetricDescriptor, MetricSample};

pub const POSITION_SPEND_AVG: &str = "tcsi_position_spend_avg";
pub const POSITION_EXPECTED_YIELD: &str = "tcsi_position_excepted_yield_total";
pub const POSITION_ITEMS_COUNT: &str = "tcsi_position_items_count";
pub const POSITION_MARKET_PRICE: &str = "tcsi_position_market_price_avg";

const POSITION_LABELS: [&str; 7] = [
    "account_type",
    "instrument_type",
    "figi",
    "isin",
    "ticker",
    "human_name",
    "currency",
];

/// Current unit price reconstructed from cost basis and unrealized yield.
///
/// `None` for an empty position, where the yield cannot be spread per item.
pub fn market_price(position: &Position) -> Option<f64> {
    if position.balance == 0.0 {
        return None;
    }
    Some(position.average_position_price.value + position.expected_yield.value / position.balance)
}

struct PortfolioDescriptors {
    average_spend: MetricDescriptor,
    expected_yield: MetricDescriptor,
    items_count: MetricDescriptor,
    market_price: MetricDescriptor,
}

/// Emits four gauges per held position across all accounts.
pub struct PortfolioCollector {
    client: Arc<dyn InvestApiClient>,
    descriptors: PortfolioDescriptors,
}

impl PortfolioCollector {
    pub fn new(client: Arc<dyn InvestApiClient>) -> Result<Self> {
        let descriptors = PortfolioDescriptors {
            average_spend: MetricDescriptor::new(
                POSITION_SPEND_AVG,
                "Average spend on position in instrument currency",
                &POSITION_LABELS,
            )?,
            expected_yield: MetricDescriptor::new(
                POSITION_EXPECTED_YIELD,
                "Expected total yield of position at portfolio in instrument currency",
                &POSITION_LABELS,
            )?,
            items_count: MetricDescriptor::new(
                POSITION_ITEMS_COUNT,
                "Total items in position",
                &POSITION_LABELS,
            )?,
            market_price: MetricDescriptor::new(
                POSITION_MARKET_PRICE,
                "Market price of instrument",
                &POSITION_LABELS,
            )?,
        };

        info!("Created portfolio collector");
        Ok(Self {
            client,
            descriptors,
        })
    }

    fn position_samples(&self, account: &Account, position: &Position) -> Result<Vec<MetricSample>> {
        // Same order as POSITION_LABELS
        let labels = vec![
            account.account_type.clone(),
            position.instrument_type.clone(),
            position.figi.clone(),
            position.isin.clone(),
            position.ticker.clone(),
            position.name.clone(),
            position.average_position_price.currency.clone(),
        ];

        let d = &self.descriptors;
        let mut samples = vec![
            MetricSample::gauge(
                &d.average_spend,
                position.average_position_price.value,
                labels.clone(),
            )?,
            MetricSample::gauge(&d.expected_yield, position.expected_yield.value, labels.clone())?,
            MetricSample::gauge(&d.items_count, position.balance, labels.clone())?,
        ];

        match market_price(position) {
            Some(price) => samples.push(MetricSample::gauge(&d.market_price, price, labels)?),
            None => debug!(
                "[{}] No market price for {} in account {}: zero balance",
                self.name(),
                position.figi,
                account.id
            ),
        }

        Ok(samples)
    }
}

#[async_trait]
impl Collector for PortfolioCollector {
    fn name(&self) -> &'static str {
        "PortfolioCollector"
    }

    fn describe(&self) -> Vec<MetricDescriptor> {
        vec![
            self.descriptors.average_spend.clone(),
            self.descriptors.expected_yield.clone(),
            self.descriptors.items_count.clone(),
            self.descriptors.market_price.clone(),
        ]
    }

    async fn collect(&self) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        for (account, portfolio) in account_portfolios(self.client.as_ref(), self.name()).await {
            for position in &portfolio.positions {
                match self.position_samples(&account, position) {
                    Ok(mut position_samples) => samples.append(&mut position_samples),
                    Err(e) => error!("[{}] {}", self.name(), e),
                }
            }
        }
        samples
    }
}
