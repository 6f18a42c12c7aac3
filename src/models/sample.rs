// Normalized metric samples: one entry per metric inside a gathered family

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Summary,
    Histogram,
    Untyped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    /// Gauge, counter and untyped metrics.
    Scalar(f64),
    Summary {
        count: u64,
        sum: f64,
        /// (quantile, value) pairs in source order.
        quantiles: Vec<(f64, f64)>,
    },
    Histogram {
        count: u64,
        sum: f64,
        /// (upper bound, cumulative count) pairs in source order.
        buckets: Vec<(f64, u64)>,
    },
}

/// One metric of a family, flattened with its family name and kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub kind: MetricKind,
    pub value: SampleValue,
}

impl MetricSample {
    /// Build a scalar sample (gauge/counter/untyped) from borrowed label pairs.
    pub fn scalar(name: &str, kind: MetricKind, labels: &[(&str, &str)], value: f64) -> Self {
        Self {
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            kind,
            value: SampleValue::Scalar(value),
        }
    }

    pub fn counter(name: &str, labels: &[(&str, &str)], value: f64) -> Self {
        Self::scalar(name, MetricKind::Counter, labels, value)
    }

    pub fn gauge(name: &str, labels: &[(&str, &str)], value: f64) -> Self {
        Self::scalar(name, MetricKind::Gauge, labels, value)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Scalar value; `None` for summaries and histograms.
    pub fn value(&self) -> Option<f64> {
        match self.value {
            SampleValue::Scalar(v) => Some(v),
            SampleValue::Summary { .. } | SampleValue::Histogram { .. } => None,
        }
    }
}
