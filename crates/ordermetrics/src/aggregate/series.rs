use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::normalizer::Order;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCount {
    /// `None` groups rows whose state could not be read.
    pub state_id: Option<i64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateAmount {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateAmount {
    pub date: NaiveDate,
    pub event_name: String,
    pub amount: f64,
}

/// Revenue over time: one line, or one line per event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum DateSeries {
    Single(Vec<DateAmount>),
    PerEvent(Vec<EventDateAmount>),
}

impl DateSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            DateSeries::Single(points) => points.is_empty(),
            DateSeries::PerEvent(points) => points.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventValue {
    pub event_name: String,
    pub value: f64,
}

/// Sum and mean of the non-null amounts; both zero when there are none.
pub fn sum_and_mean(orders: &[&Order]) -> (f64, f64) {
    let (sum, n) = orders
        .iter()
        .filter_map(|o| o.amount)
        .fold((0.0, 0usize), |(sum, n), a| (sum + a, n + 1));
    let mean = if n > 0 { sum / n as f64 } else { 0.0 };
    (sum, mean)
}

/// Rows per state, most frequent first; equal counts by state id, unknown
/// state last.
pub fn state_distribution(orders: &[&Order]) -> Vec<StateCount> {
    let mut counts: BTreeMap<Option<i64>, usize> = BTreeMap::new();
    for order in orders {
        *counts.entry(order.state_id).or_default() += 1;
    }

    let mut result: Vec<StateCount> = counts
        .into_iter()
        .map(|(state_id, count)| StateCount { state_id, count })
        .collect();
    result.sort_by(|a, b| {
        b.count.cmp(&a.count).then_with(|| match (a.state_id, b.state_id) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
    });
    result
}

/// Amount per date, rows without a date skipped. `per_event` adds the event
/// name to the grouping key.
pub fn amount_by_date(orders: &[&Order], per_event: bool) -> DateSeries {
    if per_event {
        let mut groups: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
        for order in orders {
            if let Some(date) = order.date {
                *groups.entry((date, order.event_name.as_str())).or_default() +=
                    order.amount.unwrap_or(0.0);
            }
        }
        DateSeries::PerEvent(
            groups
                .into_iter()
                .map(|((date, event_name), amount)| EventDateAmount {
                    date,
                    event_name: event_name.to_string(),
                    amount,
                })
                .collect(),
        )
    } else {
        let mut groups: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for order in orders {
            if let Some(date) = order.date {
                *groups.entry(date).or_default() += order.amount.unwrap_or(0.0);
            }
        }
        DateSeries::Single(
            groups
                .into_iter()
                .map(|(date, amount)| DateAmount { date, amount })
                .collect(),
        )
    }
}

/// Orders grouped by event name, in name order.
pub fn group_by_event<'a>(orders: &[&'a Order]) -> BTreeMap<&'a str, Vec<&'a Order>> {
    let mut groups: BTreeMap<&'a str, Vec<&'a Order>> = BTreeMap::new();
    for &order in orders {
        groups.entry(order.event_name.as_str()).or_default().push(order);
    }
    groups
}

pub fn total_amount_by_event(orders: &[&Order]) -> Vec<EventValue> {
    group_by_event(orders)
        .into_iter()
        .map(|(name, rows)| EventValue {
            event_name: name.to_string(),
            value: sum_and_mean(&rows).0,
        })
        .collect()
}

pub fn avg_amount_by_event(orders: &[&Order]) -> Vec<EventValue> {
    group_by_event(orders)
        .into_iter()
        .map(|(name, rows)| EventValue {
            event_name: name.to_string(),
            value: sum_and_mean(&rows).1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(event: &str, amount: Option<f64>, state: Option<i64>, date: Option<&str>) -> Order {
        Order {
            event_id: None,
            event_name: event.to_string(),
            amount,
            state_id: state,
            date_payment: date.map(str::to_string),
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            passthrough: vec![],
        }
    }

    #[test]
    fn test_sum_and_mean_skip_nulls() {
        let rows = [
            order("A", Some(10.0), Some(4), None),
            order("A", None, Some(4), None),
            order("A", Some(20.0), Some(4), None),
        ];
        let refs: Vec<&Order> = rows.iter().collect();
        assert_eq!(sum_and_mean(&refs), (30.0, 15.0));
        assert_eq!(sum_and_mean(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_state_distribution_order_and_total() {
        let rows = [
            order("A", None, Some(4), None),
            order("A", None, Some(1), None),
            order("A", None, None, None),
            order("A", None, Some(4), None),
            order("A", None, Some(2), None),
        ];
        let refs: Vec<&Order> = rows.iter().collect();
        let dist = state_distribution(&refs);
        let pairs: Vec<_> = dist.iter().map(|s| (s.state_id, s.count)).collect();
        assert_eq!(pairs, vec![(Some(4), 2), (Some(1), 1), (Some(2), 1), (None, 1)]);
        assert_eq!(dist.iter().map(|s| s.count).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_amount_by_date_single_series() {
        let rows = [
            order("A", Some(10.0), Some(4), Some("2024-05-02")),
            order("B", Some(5.0), Some(4), Some("2024-05-01")),
            order("A", Some(7.5), Some(4), Some("2024-05-02")),
            order("A", Some(99.0), Some(4), None),
        ];
        let refs: Vec<&Order> = rows.iter().collect();
        let DateSeries::Single(points) = amount_by_date(&refs, false) else {
            panic!("expected a single series");
        };
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].amount, 5.0);
        assert_eq!(points[1].amount, 17.5);
    }

    #[test]
    fn test_amount_by_date_per_event() {
        let rows = [
            order("B", Some(3.0), Some(4), Some("2024-05-01")),
            order("A", Some(10.0), Some(4), Some("2024-05-01")),
            order("A", Some(2.0), Some(4), Some("2024-05-01")),
        ];
        let refs: Vec<&Order> = rows.iter().collect();
        let DateSeries::PerEvent(points) = amount_by_date(&refs, true) else {
            panic!("expected one series per event");
        };
        let pairs: Vec<_> = points.iter().map(|p| (p.event_name.as_str(), p.amount)).collect();
        assert_eq!(pairs, vec![("A", 12.0), ("B", 3.0)]);
    }

    #[test]
    fn test_event_aggregates_sorted_by_name() {
        let rows = [
            order("Rimini Marathon", Some(10.0), Some(4), None),
            order("Champions Pulcini", Some(30.0), Some(4), None),
            order("Rimini Marathon", Some(20.0), Some(4), None),
        ];
        let refs: Vec<&Order> = rows.iter().collect();

        let totals = total_amount_by_event(&refs);
        assert_eq!(totals[0].event_name, "Champions Pulcini");
        assert_eq!(totals[0].value, 30.0);
        assert_eq!(totals[1].value, 30.0);

        let averages = avg_amount_by_event(&refs);
        assert_eq!(averages[1].event_name, "Rimini Marathon");
        assert_eq!(averages[1].value, 15.0);
    }
}
