// Snapshot reader: gathers metric families from a registry and flattens them into samples.

use crate::error::Result;
use crate::models::{MetricKind, MetricSample, SampleValue};
use prometheus::Registry;
use prometheus::proto::{MetricFamily, MetricType};
use tracing::instrument;

/// Anything that can produce one sample set per call. Calls must not mutate the source.
pub trait MetricSource: Send + Sync {
    fn gather(&self) -> Result<Vec<MetricSample>>;
}

/// Reads a `prometheus::Registry` (typically holding a `NodeCollector`).
pub struct RegistrySource {
    registry: Registry,
}

impl RegistrySource {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl MetricSource for RegistrySource {
    #[instrument(skip(self), fields(source = "registry", operation = "gather"))]
    fn gather(&self) -> Result<Vec<MetricSample>> {
        let families = self.registry.gather();
        let samples = normalize(&families);
        tracing::debug!(
            families = families.len(),
            samples = samples.len(),
            "registry gathered"
        );
        Ok(samples)
    }
}

fn kind_of(family: &MetricFamily) -> MetricKind {
    match family.get_field_type() {
        MetricType::COUNTER => MetricKind::Counter,
        MetricType::GAUGE => MetricKind::Gauge,
        MetricType::SUMMARY => MetricKind::Summary,
        MetricType::HISTOGRAM => MetricKind::Histogram,
        MetricType::UNTYPED => MetricKind::Untyped,
    }
}

/// Flatten gathered families: one `MetricSample` per metric, labels as a map.
pub fn normalize(families: &[MetricFamily]) -> Vec<MetricSample> {
    let mut samples = Vec::new();
    for family in families {
        let kind = kind_of(family);
        for metric in family.get_metric() {
            let labels = metric
                .get_label()
                .iter()
                .map(|lp| (lp.get_name().to_string(), lp.get_value().to_string()))
                .collect();
            let value = match kind {
                MetricKind::Counter => SampleValue::Scalar(metric.get_counter().get_value()),
                MetricKind::Gauge => SampleValue::Scalar(metric.get_gauge().get_value()),
                MetricKind::Untyped => SampleValue::Scalar(metric.get_untyped().get_value()),
                MetricKind::Summary => {
                    let summary = metric.get_summary();
                    SampleValue::Summary {
                        count: summary.get_sample_count(),
                        sum: summary.get_sample_sum(),
                        quantiles: summary
                            .get_quantile()
                            .iter()
                            .map(|q| (q.get_quantile(), q.get_value()))
                            .collect(),
                    }
                }
                MetricKind::Histogram => {
                    let histogram = metric.get_histogram();
                    SampleValue::Histogram {
                        count: histogram.get_sample_count(),
                        sum: histogram.get_sample_sum(),
                        buckets: histogram
                            .get_bucket()
                            .iter()
                            .map(|b| (b.get_upper_bound(), b.get_cumulative_count()))
                            .collect(),
                    }
                }
            };
            samples.push(MetricSample {
                name: family.get_name().to_string(),
                labels,
                kind,
                value,
            });
        }
    }
    samples
}
