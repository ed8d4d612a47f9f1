use serde::Serialize;

use super::buckets::{HistogramBin, PriceBucketCount};
use super::funnel::FunnelMetrics;
use super::series::{DateSeries, EventValue, StateCount};
use super::ValueMetric;
use crate::config::ConfirmationPolicy;
use crate::ingest::RawTable;
use crate::normalizer::orders::render_orders;
use crate::normalizer::Order;

/// Whether there is anything to show. Empty states are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleState {
    Ready,
    /// The event filter matched no orders.
    NoMatchingOrders,
    /// Orders matched, none of them confirmed.
    NoConfirmedOrders,
}

/// Headline numbers over the confirmed orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub filtered_orders: usize,
    pub total_orders: usize,
    pub total_amount: f64,
    pub avg_amount: f64,
    /// Confirmed orders as a share of the filtered orders.
    pub confirmed_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetric {
    pub metric: ValueMetric,
    pub values: Vec<EventValue>,
}

/// Confirmed orders for the detail table, hidden columns removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedOrders {
    pub extra_columns: Vec<String>,
    pub rows: Vec<Order>,
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBundle {
    pub policy: ConfirmationPolicy,
    pub selected_events: Vec<String>,
    pub state: BundleState,
    pub summary: Summary,
    pub state_distribution: Vec<StateCount>,
    pub amount_by_date: DateSeries,
    pub avg_amount_by_event: Vec<EventValue>,
    pub total_amount_by_event: Vec<EventValue>,
    pub price_distribution: Vec<PriceBucketCount>,
    pub amount_histogram: Vec<HistogramBin>,
    /// Present only when a funnel table was supplied.
    pub funnel: Option<FunnelMetrics>,
    pub event_metric: EventMetric,
    pub confirmed_orders: ConfirmedOrders,
}

impl ConfirmedOrders {
    /// Rows as they are exported, date columns always included.
    pub fn to_raw_table(&self) -> RawTable {
        render_orders(self.rows.iter(), &self.extra_columns, true)
    }
}

impl ResultBundle {
    pub fn is_ready(&self) -> bool {
        self.state == BundleState::Ready
    }
}
