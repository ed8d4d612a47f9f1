use std::collections::BTreeSet;

use tracing::debug;

use super::buckets::{amount_histogram, price_distribution, HISTOGRAM_BINS};
use super::bundle::{BundleState, ConfirmedOrders, EventMetric, ResultBundle, Summary};
use super::funnel::{funnel_metrics, matching_records, ratio_or_zero, unique_users_by_event};
use super::series::{
    amount_by_date, avg_amount_by_event, state_distribution, sum_and_mean, total_amount_by_event,
    EventValue,
};
use super::{Selection, ValueMetric};
use crate::config::{ConfirmationPolicy, EventCatalog};
use crate::normalizer::{FunnelRecord, FunnelTable, Order, OrdersTable, HIDDEN_DETAIL_COLUMNS};

/// Derives every dashboard figure from the normalized tables.
///
/// Stateless between calls: each `aggregate` is a pure function of its
/// inputs and never fails.
pub struct AggregationEngine {
    policy: ConfirmationPolicy,
    catalog: EventCatalog,
}

impl AggregationEngine {
    pub fn new(policy: ConfirmationPolicy, catalog: EventCatalog) -> Self {
        Self { policy, catalog }
    }

    pub fn policy(&self) -> ConfirmationPolicy {
        self.policy
    }

    /// Orders whose event is selected (all orders for an empty selection).
    pub fn filter<'a>(&self, orders: &'a OrdersTable, selection: &Selection) -> Vec<&'a Order> {
        orders
            .orders
            .iter()
            .filter(|o| selection.includes(&o.event_name))
            .collect()
    }

    /// Splits orders into (confirmed, not confirmed) under the active policy.
    pub fn partition<'a>(&self, orders: &[&'a Order]) -> (Vec<&'a Order>, Vec<&'a Order>) {
        orders
            .iter()
            .copied()
            .partition(|o| self.policy.is_confirmed(o.state_id))
    }

    pub fn aggregate(
        &self,
        orders: &OrdersTable,
        funnel: Option<&FunnelTable>,
        selection: &Selection,
    ) -> ResultBundle {
        let filtered = self.filter(orders, selection);
        let (confirmed, _) = self.partition(&filtered);
        let events_in_view: BTreeSet<&str> =
            filtered.iter().map(|o| o.event_name.as_str()).collect();

        let state = if filtered.is_empty() {
            BundleState::NoMatchingOrders
        } else if confirmed.is_empty() {
            BundleState::NoConfirmedOrders
        } else {
            BundleState::Ready
        };

        let (total_amount, avg_amount) = sum_and_mean(&confirmed);
        let summary = Summary {
            filtered_orders: filtered.len(),
            total_orders: confirmed.len(),
            total_amount,
            avg_amount,
            confirmed_pct: ratio_or_zero(confirmed.len() as f64, filtered.len() as f64) * 100.0,
        };

        let funnel_records: Option<Vec<&FunnelRecord>> = funnel.map(|table| {
            let event_ids: BTreeSet<i64> = filtered.iter().filter_map(|o| o.event_id).collect();
            matching_records(&table.records, &event_ids)
        });

        let funnel_summary = funnel_records
            .as_deref()
            .map(|records| funnel_metrics(records, total_amount));

        let event_metric = EventMetric {
            metric: selection.metric,
            values: self.event_values(selection.metric, &confirmed, funnel_records.as_deref()),
        };

        debug!(
            filtered = filtered.len(),
            confirmed = confirmed.len(),
            selected = selection.events.len(),
            policy = self.policy.describe(),
            "Aggregated orders"
        );

        ResultBundle {
            policy: self.policy,
            selected_events: selection.events.iter().cloned().collect(),
            state,
            summary,
            state_distribution: state_distribution(&filtered),
            amount_by_date: amount_by_date(&confirmed, events_in_view.len() > 1),
            avg_amount_by_event: avg_amount_by_event(&confirmed),
            total_amount_by_event: total_amount_by_event(&confirmed),
            price_distribution: price_distribution(&confirmed),
            amount_histogram: amount_histogram(&confirmed, HISTOGRAM_BINS),
            funnel: funnel_summary,
            event_metric,
            confirmed_orders: confirmed_detail(orders, &confirmed),
        }
    }

    fn event_values(
        &self,
        metric: ValueMetric,
        confirmed: &[&Order],
        funnel_records: Option<&[&FunnelRecord]>,
    ) -> Vec<EventValue> {
        match metric {
            ValueMetric::AverageSpend => avg_amount_by_event(confirmed),
            ValueMetric::TotalRevenue => total_amount_by_event(confirmed),
            ValueMetric::UserValue => {
                let users = funnel_records
                    .map(|records| unique_users_by_event(records, &self.catalog))
                    .unwrap_or_default();
                total_amount_by_event(confirmed)
                    .into_iter()
                    .map(|revenue| {
                        let event_users = users.get(&revenue.event_name).copied().unwrap_or(0);
                        EventValue {
                            value: ratio_or_zero(revenue.value, event_users as f64),
                            event_name: revenue.event_name,
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Confirmed rows for display, without the hidden passthrough columns.
fn confirmed_detail(table: &OrdersTable, confirmed: &[&Order]) -> ConfirmedOrders {
    let visible: Vec<usize> = table
        .passthrough_columns
        .iter()
        .enumerate()
        .filter(|(_, name)| !HIDDEN_DETAIL_COLUMNS.contains(&name.as_str()))
        .map(|(i, _)| i)
        .collect();

    ConfirmedOrders {
        extra_columns: visible
            .iter()
            .map(|&i| table.passthrough_columns[i].clone())
            .collect(),
        rows: confirmed
            .iter()
            .map(|order| Order {
                passthrough: visible
                    .iter()
                    .map(|&i| order.passthrough.get(i).cloned().unwrap_or_default())
                    .collect(),
                ..(*order).clone()
            })
            .collect(),
    }
}
