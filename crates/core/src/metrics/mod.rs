//! Metric schema and per-scrape samples.

mod descriptor;
mod sample;

pub use descriptor::MetricDescriptor;
pub use sample::MetricSample;
