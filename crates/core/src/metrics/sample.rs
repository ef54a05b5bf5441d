use prometheus::proto::{Gauge, LabelPair, Metric};

use super::MetricDescriptor;
use crate::errors::{Error, Result};

/// One gauge value with its label values, emitted during a single collect.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    descriptor: MetricDescriptor,
    value: f64,
    label_values: Vec<String>,
}

impl MetricSample {
    /// Build a gauge sample.
    ///
    /// `label_values` must line up one-to-one with
    /// [`MetricDescriptor::label_names`].
    pub fn gauge(descriptor: &MetricDescriptor, value: f64, label_values: Vec<String>) -> Result<Self> {
        let expected = descriptor.label_names().len();
        if label_values.len() != expected {
            return Err(Error::InconsistentCardinality {
                name: descriptor.name().to_string(),
                expected,
                actual: label_values.len(),
            });
        }

        Ok(Self {
            descriptor: descriptor.clone(),
            value,
            label_values,
        })
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.descriptor
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    /// Value of the label called `name`, if the descriptor declares it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.descriptor
            .label_names()
            .iter()
            .position(|l| l == name)
            .map(|i| self.label_values[i].as_str())
    }

    pub(crate) fn to_metric(&self) -> Metric {
        let mut metric = Metric::default();
        for (name, value) in self.descriptor.label_names().iter().zip(&self.label_values) {
            let mut pair = LabelPair::default();
            pair.set_name(name.clone());
            pair.set_value(value.clone());
            metric.mut_label().push(pair);
        }
        let mut gauge = Gauge::default();
        gauge.set_value(self.value);
        metric.set_gauge(gauge);
        metric
    }
}
