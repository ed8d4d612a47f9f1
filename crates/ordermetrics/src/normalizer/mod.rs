//! Turns raw tables into typed orders and funnel records.
//!
//! Normalization never drops a row. Values that cannot be read become `None`
//! (or zero for funnel counts) and are dealt with by the aggregation views.

pub mod date;
pub mod funnel;
pub mod orders;

use tracing::debug;

use crate::config::EventCatalog;
use crate::error::SchemaError;
use crate::ingest::RawTable;

pub use date::DateParser;
pub use funnel::{FunnelRecord, FunnelTable, REQUIRED_FUNNEL_COLUMNS};
pub use orders::{Order, OrdersTable, HIDDEN_DETAIL_COLUMNS, REQUIRED_ORDER_COLUMNS};

use funnel::parse_count;
use orders::{parse_amount, parse_int, DERIVED_COLUMNS};

/// Label for an order whose event id cell was blank.
const BLANK_EVENT_NAME: &str = "unknown";

pub struct Normalizer {
    catalog: EventCatalog,
    dates: DateParser,
}

impl Normalizer {
    pub fn new(catalog: EventCatalog, dates: DateParser) -> Self {
        Self { catalog, dates }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn normalize_orders(&self, raw: &RawTable) -> Result<OrdersTable, SchemaError> {
        let missing = raw.missing_columns(REQUIRED_ORDER_COLUMNS);
        if !missing.is_empty() {
            return Err(SchemaError::new("orders", missing));
        }

        let col = |name: &str| {
            raw.column(name)
                .ok_or_else(|| SchemaError::new("orders", vec![name.to_string()]))
        };
        let event_col = col(orders::EVENT_ID)?;
        let amount_col = col(orders::AMOUNT)?;
        let state_col = col(orders::STATE_ID)?;
        let payment_col = raw.column(orders::DATE_PAYMENT);

        let passthrough: Vec<(usize, String)> = raw
            .headers
            .iter()
            .enumerate()
            .filter(|(i, name)| {
                ![event_col, amount_col, state_col].contains(i)
                    && Some(*i) != payment_col
                    && !DERIVED_COLUMNS.contains(&name.as_str())
            })
            .map(|(i, name)| (i, name.clone()))
            .collect();

        let mut unparsed_dates = 0usize;
        let orders: Vec<Order> = (0..raw.len())
            .map(|row| {
                let event_raw = raw.cell(row, event_col);
                let event_id = parse_int(event_raw);
                let event_name = match event_id {
                    Some(id) => self.catalog.name_for(id),
                    None if event_raw.is_empty() => BLANK_EVENT_NAME.to_string(),
                    None => event_raw.to_string(),
                };

                let date_payment = payment_col
                    .map(|c| raw.cell(row, c))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
                let date = date_payment.as_deref().and_then(|v| self.dates.parse_date(v));
                if payment_col.is_some() && date.is_none() {
                    unparsed_dates += 1;
                }

                Order {
                    event_id,
                    event_name,
                    amount: parse_amount(raw.cell(row, amount_col)),
                    state_id: parse_int(raw.cell(row, state_col)),
                    date_payment,
                    date,
                    passthrough: passthrough
                        .iter()
                        .map(|(c, _)| raw.cell(row, *c).to_string())
                        .collect(),
                }
            })
            .collect();

        debug!(
            rows = orders.len(),
            unparsed_dates,
            passthrough = passthrough.len(),
            "Normalized orders table"
        );

        Ok(OrdersTable {
            orders,
            passthrough_columns: passthrough.into_iter().map(|(_, name)| name).collect(),
            has_payment_dates: payment_col.is_some(),
        })
    }

    pub fn normalize_funnel(&self, raw: &RawTable) -> Result<FunnelTable, SchemaError> {
        let missing = raw.missing_columns(REQUIRED_FUNNEL_COLUMNS);
        if !missing.is_empty() {
            return Err(SchemaError::new("searches", missing));
        }

        let columns: Vec<usize> = REQUIRED_FUNNEL_COLUMNS
            .iter()
            .filter_map(|name| raw.column(name))
            .collect();
        let count = |row: usize, idx: usize| parse_count(raw.cell(row, columns[idx]));

        let records: Vec<FunnelRecord> = (0..raw.len())
            .map(|row| FunnelRecord {
                event_id: parse_int(raw.cell(row, columns[0])),
                total_users_count: count(row, 1),
                unique_users_count: count(row, 2),
                total_orders_users: count(row, 3),
                total_orders: count(row, 4),
                total_allphotos: count(row, 5),
            })
            .collect();

        debug!(rows = records.len(), "Normalized funnel table");
        Ok(FunnelTable { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn normalizer() -> Normalizer {
        let catalog = EventCatalog::new(BTreeMap::from([
            (2, "Rimini Marathon".to_string()),
            (5, "Champions Pulcini".to_string()),
        ]))
        .unwrap();
        Normalizer::new(catalog, DateParser::default())
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_missing_columns_are_named() {
        let raw = table(&["eventId", "note"], &[&["2", "x"]]);
        let err = normalizer().normalize_orders(&raw).unwrap_err();
        assert_eq!(err.table, "orders");
        assert_eq!(err.missing, vec!["amount", "stateId"]);
    }

    #[test]
    fn test_event_names_from_catalog_with_fallback() {
        let raw = table(
            &["eventId", "amount", "stateId"],
            &[&["2", "10", "4"], &["9", "5", "4"], &["", "5", "4"], &["x7", "5", "4"]],
        );
        let orders = normalizer().normalize_orders(&raw).unwrap();
        let names: Vec<_> = orders.orders.iter().map(|o| o.event_name.as_str()).collect();
        assert_eq!(names, vec!["Rimini Marathon", "9", "unknown", "x7"]);
    }

    #[test]
    fn test_row_count_preserved_and_bad_dates_are_null() {
        let raw = table(
            &["eventId", "amount", "stateId", "datePayment"],
            &[
                &["2", "10", "4", "2024-05-01 10:00:00"],
                &["2", "abc", "4", "yesterday"],
                &["5", "", "", ""],
            ],
        );
        let orders = normalizer().normalize_orders(&raw).unwrap();
        assert_eq!(orders.len(), 3);
        assert!(orders.has_payment_dates);
        assert_eq!(orders.orders[0].date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(orders.orders[1].date, None);
        assert_eq!(orders.orders[1].date_payment.as_deref(), Some("yesterday"));
        assert_eq!(orders.orders[1].amount, None);
        assert_eq!(orders.orders[2].state_id, None);
        assert_eq!(orders.orders[2].date_payment, None);
    }

    #[test]
    fn test_without_payment_column_dates_are_absent() {
        let raw = table(&["eventId", "amount", "stateId"], &[&["2", "10", "4"]]);
        let orders = normalizer().normalize_orders(&raw).unwrap();
        assert!(!orders.has_payment_dates);
        assert_eq!(orders.orders[0].date, None);
    }

    #[test]
    fn test_input_event_name_column_is_rederived() {
        let raw = table(
            &["eventName", "eventId", "amount", "stateId", "userId"],
            &[&["Stale Name", "5", "30", "4", "u1"]],
        );
        let orders = normalizer().normalize_orders(&raw).unwrap();
        assert_eq!(orders.orders[0].event_name, "Champions Pulcini");
        assert_eq!(orders.passthrough_columns, vec!["userId"]);
        assert_eq!(orders.orders[0].passthrough, vec!["u1"]);
    }

    #[test]
    fn test_funnel_requires_all_count_columns() {
        let raw = table(&["event_id", "total_users_count"], &[]);
        let err = normalizer().normalize_funnel(&raw).unwrap_err();
        assert_eq!(err.table, "searches");
        assert_eq!(
            err.missing,
            vec![
                "unique_users_count",
                "total_orders_users",
                "total_orders",
                "total_allphotos"
            ]
        );
    }

    #[test]
    fn test_funnel_counts_parsed_in_any_column_order() {
        let raw = table(
            &[
                "total_allphotos",
                "event_id",
                "total_orders",
                "unique_users_count",
                "total_orders_users",
                "total_users_count",
            ],
            &[&["3", "2", "12", "80", "20", "150"]],
        );
        let funnel = normalizer().normalize_funnel(&raw).unwrap();
        assert_eq!(
            funnel.records[0],
            FunnelRecord {
                event_id: Some(2),
                total_users_count: 150,
                unique_users_count: 80,
                total_orders_users: 20,
                total_orders: 12,
                total_allphotos: 3,
            }
        );
    }
}
