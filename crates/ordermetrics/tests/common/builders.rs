//! Builder patterns for creating order and funnel tables programmatically.

#![allow(dead_code)]

use std::collections::BTreeMap;

use ordermetrics::config::{ConfirmationPolicy, EventCatalog};
use ordermetrics::ingest::{RawTable, SourceTables};
use ordermetrics::pipeline::{Pipeline, PipelineConfig};

/// Catalog used across the integration tests.
pub fn test_catalog() -> EventCatalog {
    EventCatalog::new(BTreeMap::from([
        (2, "Rimini Marathon".to_string()),
        (5, "Champions Pulcini".to_string()),
        (7, "Granfondo Via del Sale".to_string()),
    ]))
    .expect("valid catalog")
}

pub fn test_pipeline(policy: ConfirmationPolicy) -> Pipeline {
    Pipeline::from_config(PipelineConfig {
        policy,
        catalog: test_catalog(),
        ..PipelineConfig::default()
    })
}

/// Builder for an orders table with the export's column layout.
pub struct OrdersBuilder {
    extra_columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl OrdersBuilder {
    pub fn new() -> Self {
        Self {
            extra_columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Adds passthrough columns; rows get empty values unless set with `row_with`.
    pub fn extra_columns(mut self, columns: &[&str]) -> Self {
        self.extra_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn order(self, event_id: i64, amount: f64, state_id: i64) -> Self {
        self.order_on(event_id, amount, state_id, "")
    }

    pub fn order_on(self, event_id: i64, amount: f64, state_id: i64, date_payment: &str) -> Self {
        self.row_with(
            &event_id.to_string(),
            &amount.to_string(),
            &state_id.to_string(),
            date_payment,
            &[],
        )
    }

    /// Adds a row from raw cell text.
    pub fn row_with(
        mut self,
        event_id: &str,
        amount: &str,
        state_id: &str,
        date_payment: &str,
        extra: &[&str],
    ) -> Self {
        let mut row = vec![
            event_id.to_string(),
            amount.to_string(),
            state_id.to_string(),
            date_payment.to_string(),
        ];
        for i in 0..self.extra_columns.len() {
            row.push(extra.get(i).map(|v| v.to_string()).unwrap_or_default());
        }
        self.rows.push(row);
        self
    }

    pub fn build(self) -> RawTable {
        let mut headers = vec![
            "eventId".to_string(),
            "amount".to_string(),
            "stateId".to_string(),
            "datePayment".to_string(),
        ];
        headers.extend(self.extra_columns);
        RawTable::new(headers, self.rows)
    }

    pub fn to_csv(self) -> String {
        let table = self.build();
        let mut out = table.headers.join(",");
        out.push('\n');
        for row in table.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }
}

impl Default for OrdersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the `Searches` funnel table.
pub struct FunnelBuilder {
    rows: Vec<Vec<String>>,
}

impl FunnelBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Counts in stage order: selfies, unique users, cart users, purchases,
    /// complete packages.
    pub fn event(mut self, event_id: i64, counts: [u64; 5]) -> Self {
        let mut row = vec![event_id.to_string()];
        row.extend(counts.iter().map(|c| c.to_string()));
        self.rows.push(row);
        self
    }

    /// Adds a row from raw cell text, event id first.
    pub fn row_with(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn build(self) -> RawTable {
        RawTable::new(
            [
                "event_id",
                "total_users_count",
                "unique_users_count",
                "total_orders_users",
                "total_orders",
                "total_allphotos",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            self.rows,
        )
    }
}

impl Default for FunnelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tables(orders: RawTable, funnel: Option<RawTable>) -> SourceTables {
    SourceTables { orders, funnel }
}
