//! Registry running collectors on demand and rendering the text format.
//!
//! Unlike a process-wide default registry, a [`CollectorRegistry`] is
//! constructed explicitly and handed to the HTTP layer.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

use crate::collectors::Collector;
use crate::errors::{Error, Result};
use crate::metrics::MetricDescriptor;

/// Content type of the text exposition format.
pub const TEXT_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

struct Registration {
    collector: Arc<dyn Collector>,
    descriptors: Vec<MetricDescriptor>,
}

impl Registration {
    fn declares(&self, descriptor: &MetricDescriptor) -> bool {
        self.descriptors.iter().any(|d| d == descriptor)
    }
}

#[derive(Default)]
pub struct CollectorRegistry {
    registrations: Vec<Registration>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector after checking its descriptors.
    ///
    /// Fails with [`Error::AlreadyRegistered`] if any descriptor name is
    /// already taken, by another collector or by the collector itself.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<()> {
        let descriptors = collector.describe();

        let mut names: HashSet<&str> = self
            .registrations
            .iter()
            .flat_map(|r| r.descriptors.iter().map(|d| d.name()))
            .collect();
        for descriptor in &descriptors {
            if !names.insert(descriptor.name()) {
                return Err(Error::AlreadyRegistered(descriptor.name().to_string()));
            }
        }

        debug!(
            "Registered {} with {} descriptor(s)",
            collector.name(),
            descriptors.len()
        );
        self.registrations.push(Registration {
            collector,
            descriptors,
        });
        Ok(())
    }

    /// Descriptors of every registered collector, in registration order.
    pub fn describe(&self) -> Vec<MetricDescriptor> {
        self.registrations
            .iter()
            .flat_map(|r| r.descriptors.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run every collector and group the samples into metric families.
    ///
    /// Collectors run concurrently with each other. Families come back
    /// sorted by name; a family only appears when it has at least one
    /// sample. Samples for undeclared descriptors and repeated series
    /// (same name and label values) are dropped with a warning.
    pub async fn gather(&self) -> Vec<MetricFamily> {
        let batches = join_all(
            self.registrations
                .iter()
                .map(|r| async move { (r, r.collector.collect().await) }),
        )
        .await;

        let mut families: BTreeMap<String, MetricFamily> = BTreeMap::new();
        let mut series: HashSet<(String, Vec<String>)> = HashSet::new();

        for (registration, samples) in batches {
            debug!(
                "{} produced {} sample(s)",
                registration.collector.name(),
                samples.len()
            );
            for sample in samples {
                let descriptor = sample.descriptor();
                if !registration.declares(descriptor) {
                    warn!(
                        "{} emitted undeclared metric {}, dropping it",
                        registration.collector.name(),
                        descriptor.name()
                    );
                    continue;
                }
                let key = (descriptor.name().to_string(), sample.label_values().to_vec());
                if !series.insert(key) {
                    warn!(
                        "Duplicate series {}{:?}, keeping the first one",
                        descriptor.name(),
                        sample.label_values()
                    );
                    continue;
                }
                families
                    .entry(descriptor.name().to_string())
                    .or_insert_with(|| descriptor.gauge_family())
                    .mut_metric()
                    .push(sample.to_metric());
            }
        }

        families.into_values().collect()
    }

    /// Gather and render in the text exposition format.
    pub async fn gather_text(&self) -> Result<String> {
        let families = self.gather().await;
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Encode(e.to_string()))
    }
}
