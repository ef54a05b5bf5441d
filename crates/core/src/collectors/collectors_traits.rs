use async_trait::async_trait;

use crate::metrics::{MetricDescriptor, MetricSample};

/// A source of metrics queried on every scrape.
///
/// `describe` is static and must not touch the upstream API. `collect`
/// fetches fresh state each time and never fails: problems are logged and
/// result in fewer samples.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &'static str;

    /// Every descriptor this collector can emit samples for.
    fn describe(&self) -> Vec<MetricDescriptor>;

    /// Fetch current state and turn it into samples.
    async fn collect(&self) -> Vec<MetricSample>;
}
