pub mod buckets;
pub mod bundle;
pub mod engine;
pub mod funnel;
pub mod series;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use buckets::{PriceBucket, PriceBucketCount, HISTOGRAM_BINS, PRICE_BUCKETS};
pub use bundle::{BundleState, ConfirmedOrders, EventMetric, ResultBundle, Summary};
pub use engine::AggregationEngine;
pub use funnel::{FunnelMetrics, FunnelStage, ParetoStage};
pub use series::{DateSeries, EventValue, StateCount};

/// Per-event value shown in the selectable bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueMetric {
    /// Mean confirmed amount.
    #[default]
    AverageSpend,
    /// Confirmed revenue per unique funnel user.
    UserValue,
    /// Summed confirmed amount.
    TotalRevenue,
}

impl ValueMetric {
    pub fn label(self) -> &'static str {
        match self {
            ValueMetric::AverageSpend => "Average spend",
            ValueMetric::UserValue => "User value",
            ValueMetric::TotalRevenue => "Total revenue",
        }
    }
}

impl fmt::Display for ValueMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueMetric::AverageSpend => "average-spend",
            ValueMetric::UserValue => "user-value",
            ValueMetric::TotalRevenue => "total-revenue",
        };
        f.write_str(name)
    }
}

impl FromStr for ValueMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average-spend" | "avg" => Ok(ValueMetric::AverageSpend),
            "user-value" => Ok(ValueMetric::UserValue),
            "total-revenue" | "revenue" => Ok(ValueMetric::TotalRevenue),
            other => Err(format!(
                "unknown metric '{}' (expected average-spend, user-value or total-revenue)",
                other
            )),
        }
    }
}

/// Current filter state of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Event names to keep; empty keeps everything.
    pub events: BTreeSet<String>,
    pub metric: ValueMetric,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn events<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: events.into_iter().map(Into::into).collect(),
            metric: ValueMetric::default(),
        }
    }

    pub fn with_metric(mut self, metric: ValueMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn includes(&self, event_name: &str) -> bool {
        self.events.is_empty() || self.events.contains(event_name)
    }
}
