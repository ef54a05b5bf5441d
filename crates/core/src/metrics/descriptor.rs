use std::collections::HashMap;
use std::sync::Arc;

use prometheus::core::Desc;
use prometheus::proto::{MetricFamily, MetricType};

use crate::errors::{Error, Result};

/// Static schema of one metric family: name, help text and ordered label names.
///
/// Built once when a collector is created and shared by every scrape;
/// clones point at the same validated [`Desc`].
#[derive(Debug, Clone)]
pub struct MetricDescriptor {
    desc: Arc<Desc>,
}

impl MetricDescriptor {
    /// Validate and build a descriptor.
    ///
    /// Fails when the name or a label name is not a valid Prometheus
    /// identifier, label names repeat, or the help text is empty.
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self> {
        let desc = Desc::new(
            name.to_string(),
            help.to_string(),
            label_names.iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )
        .map_err(|e| Error::InvalidDescriptor {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            desc: Arc::new(desc),
        })
    }

    pub fn name(&self) -> &str {
        &self.desc.fq_name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    pub fn label_names(&self) -> &[String] {
        &self.desc.variable_labels
    }

    /// An empty gauge family carrying this descriptor's name and help.
    pub(crate) fn gauge_family(&self) -> MetricFamily {
        let mut family = MetricFamily::default();
        family.set_name(self.name().to_string());
        family.set_help(self.help().to_string());
        family.set_field_type(MetricType::GAUGE);
        family
    }
}

impl PartialEq for MetricDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.help() == other.help()
            && self.label_names() == other.label_names()
    }
}

impl Eq for MetricDescriptor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_keeps_label_order() {
        let desc = MetricDescriptor::new(
            "tcsi_currency_balance",
            "Free currency at portfolio",
            &["account_type", "currency"],
        )
        .unwrap();
        assert_eq!(desc.name(), "tcsi_currency_balance");
        assert_eq!(desc.help(), "Free currency at portfolio");
        assert_eq!(desc.label_names(), ["account_type", "currency"]);
    }

    #[test]
    fn test_invalid_metric_name() {
        let err = MetricDescriptor::new("tcsi-balance", "help", &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_duplicate_label_name() {
        let err = MetricDescriptor::new("tcsi_balance", "help", &["currency", "currency"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_help() {
        assert!(MetricDescriptor::new("tcsi_balance", "", &[]).is_err());
    }

    #[test]
    fn test_clones_compare_equal() {
        let desc = MetricDescriptor::new("tcsi_balance", "help", &["currency"]).unwrap();
        let other = MetricDescriptor::new("tcsi_balance", "help", &["account_type"]).unwrap();
        assert_eq!(desc.clone(), desc);
        assert_ne!(desc, other);
    }
}
