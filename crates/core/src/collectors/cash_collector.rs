use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use tcsi_invest_api::InvestApiClient;

use super::{account_portfolios, Collector};
use crate::errors::Result;
use crate::metrics::{MetricDescriptor, MetricSample};

pub const CURRENCY_BALANCE: &str = "tcsi_currency_balance";

/// Emits the free balance of every currency in every account.
pub struct CashCollector {
    client: Arc<dyn InvestApiClient>,
    description: MetricDescriptor,
}

impl CashCollector {
    pub fn new(client: Arc<dyn InvestApiClient>) -> Result<Self> {
        let description = MetricDescriptor::new(
            CURRENCY_BALANCE,
            "Free currency at portfolio",
            &["account_type", "currency"],
        )?;

        info!("Created cash collector");
        Ok(Self {
            client,
            description,
        })
    }
}

#[async_trait]
impl Collector for CashCollector {
    fn name(&self) -> &'static str {
        "CashCollector"
    }

    fn describe(&self) -> Vec<MetricDescriptor> {
        vec![self.description.clone()]
    }

    async fn collect(&self) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        for (account, portfolio) in account_portfolios(self.client.as_ref(), self.name()).await {
            for currency in &portfolio.currencies {
                let labels = vec![account.account_type.clone(), currency.currency.clone()];
                match MetricSample::gauge(&self.description, currency.balance, labels) {
                    Ok(sample) => samples.push(sample),
                    Err(e) => error!("[{}] {}", self.name(), e),
                }
            }
        }
        samples
    }
}
