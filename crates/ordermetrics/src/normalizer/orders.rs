use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ingest::RawTable;

pub const EVENT_ID: &str = "eventId";
pub const EVENT_NAME: &str = "eventName";
pub const AMOUNT: &str = "amount";
pub const STATE_ID: &str = "stateId";
pub const DATE_PAYMENT: &str = "datePayment";
pub const DATE: &str = "date";

pub const REQUIRED_ORDER_COLUMNS: &[&str] = &[EVENT_ID, AMOUNT, STATE_ID];

/// Columns recomputed by normalization; an input copy of them is ignored.
pub(crate) const DERIVED_COLUMNS: &[&str] = &[EVENT_NAME, DATE];

/// Passthrough columns never shown in the confirmed-orders detail table.
pub const HIDDEN_DETAIL_COLUMNS: &[&str] = &[
    "paymentResult",
    "dateSaveUrl",
    "userId",
    "hashId",
    "note",
    "paymentId",
];

/// One purchase attempt after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `None` when the export held something other than an integer.
    pub event_id: Option<i64>,
    pub event_name: String,
    /// `None` for blank or non-numeric amounts.
    pub amount: Option<f64>,
    pub state_id: Option<i64>,
    pub date_payment: Option<String>,
    pub date: Option<NaiveDate>,
    /// Values of `OrdersTable::passthrough_columns`, same order.
    pub passthrough: Vec<String>,
}

/// Normalized orders. Immutable once built; every view is a fresh projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersTable {
    pub orders: Vec<Order>,
    pub passthrough_columns: Vec<String>,
    /// Whether the source carried a `datePayment` column.
    pub has_payment_dates: bool,
}

impl OrdersTable {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Distinct event names ordered by event id; ids that failed to parse
    /// come last, by name.
    pub fn event_names(&self) -> Vec<String> {
        let mut pairs: Vec<(Option<i64>, &str)> = self
            .orders
            .iter()
            .map(|o| (o.event_id, o.event_name.as_str()))
            .collect();
        pairs.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(b.1)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.cmp(b.1),
        });

        // A name can sit under several ids; keep its first position.
        let mut seen = BTreeSet::new();
        pairs
            .into_iter()
            .filter(|(_, name)| seen.insert(*name))
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Renders the table back to string cells, derived columns included.
    pub fn to_raw_table(&self) -> RawTable {
        render_orders(
            self.orders.iter(),
            &self.passthrough_columns,
            self.has_payment_dates,
        )
    }
}

/// Renders orders as string cells: the order columns, then the derived
/// columns, then the passthrough columns.
pub(crate) fn render_orders<'a>(
    orders: impl Iterator<Item = &'a Order>,
    passthrough_columns: &[String],
    with_dates: bool,
) -> RawTable {
    let mut headers: Vec<String> = vec![
        EVENT_ID.to_string(),
        EVENT_NAME.to_string(),
        AMOUNT.to_string(),
        STATE_ID.to_string(),
    ];
    if with_dates {
        headers.push(DATE_PAYMENT.to_string());
        headers.push(DATE.to_string());
    }
    headers.extend(passthrough_columns.iter().cloned());

    let rows = orders
        .map(|order| {
            let mut row = vec![
                order
                    .event_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| order.event_name.clone()),
                order.event_name.clone(),
                order.amount.map(|a| a.to_string()).unwrap_or_default(),
                order.state_id.map(|s| s.to_string()).unwrap_or_default(),
            ];
            if with_dates {
                row.push(order.date_payment.clone().unwrap_or_default());
                row.push(
                    order
                        .date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                );
            }
            row.extend(order.passthrough.iter().cloned());
            row
        })
        .collect();

    RawTable::new(headers, rows)
}

/// Integer cell: `"2"` and `"2.0"` both read as 2.
pub(crate) fn parse_int(value: &str) -> Option<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|f| f.is_finite())
}
