use std::path::Path;

use tracing::{info, info_span};

use crate::aggregate::{AggregationEngine, ResultBundle, Selection};
use crate::error::Result;
use crate::ingest::{load_tables, SourceTables};
use crate::normalizer::{DateParser, FunnelTable, Normalizer, OrdersTable};

use super::config::PipelineConfig;

pub struct Pipeline {
    normalizer: Normalizer,
    engine: AggregationEngine,
}

impl Pipeline {
    pub fn from_config(config: PipelineConfig) -> Self {
        let normalizer = Normalizer::new(
            config.catalog.clone(),
            DateParser::new(config.date_formats),
        );
        let engine = AggregationEngine::new(config.policy, config.catalog);

        Self { normalizer, engine }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Loads a data file and normalizes it. Schema errors stop here.
    pub fn open_path<P: AsRef<Path>>(&self, path: P) -> Result<Session<'_>> {
        let tables = load_tables(path)?;
        self.open(tables)
    }

    /// Normalizes both tables once. Every later filter change reuses them.
    pub fn open(&self, tables: SourceTables) -> Result<Session<'_>> {
        let _span = info_span!("normalize").entered();

        let orders = self.normalizer.normalize_orders(&tables.orders)?;
        let funnel = tables
            .funnel
            .as_ref()
            .map(|raw| self.normalizer.normalize_funnel(raw))
            .transpose()?;

        info!(
            orders = orders.len(),
            funnel_rows = funnel.as_ref().map(FunnelTable::len),
            "Opened session"
        );

        Ok(Session {
            engine: &self.engine,
            orders,
            funnel,
        })
    }
}

/// Immutable tables of one uploaded file.
pub struct Session<'p> {
    engine: &'p AggregationEngine,
    orders: OrdersTable,
    funnel: Option<FunnelTable>,
}

impl Session<'_> {
    pub fn orders(&self) -> &OrdersTable {
        &self.orders
    }

    pub fn funnel(&self) -> Option<&FunnelTable> {
        self.funnel.as_ref()
    }

    /// Event names offered as filter options.
    pub fn available_events(&self) -> Vec<String> {
        self.orders.event_names()
    }

    /// Recomputes the whole bundle for the current selection.
    pub fn compute(&self, selection: &Selection) -> ResultBundle {
        let _span = info_span!(
            "aggregate",
            selected = selection.events.len(),
            metric = %selection.metric,
        )
        .entered();

        self.engine
            .aggregate(&self.orders, self.funnel.as_ref(), selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderMetricsError;
    use crate::ingest::{read_csv_str, RawTable};

    #[test]
    fn test_schema_error_stops_session() {
        let pipeline = Pipeline::from_config(PipelineConfig::default());
        let tables = SourceTables {
            orders: read_csv_str("eventId,amount\n2,10\n").unwrap(),
            funnel: None,
        };
        let result = pipeline.open(tables);
        assert!(matches!(result, Err(OrderMetricsError::Schema(e)) if e.missing == vec!["stateId"]));
    }

    #[test]
    fn test_bad_funnel_table_stops_session() {
        let pipeline = Pipeline::from_config(PipelineConfig::default());
        let tables = SourceTables {
            orders: read_csv_str("eventId,amount,stateId\n2,10,4\n").unwrap(),
            funnel: Some(RawTable::new(vec!["eventId".into()], vec![])),
        };
        let result = pipeline.open(tables);
        assert!(matches!(result, Err(OrderMetricsError::Schema(e)) if e.table == "searches"));
    }

    #[test]
    fn test_session_recomputes_per_selection() {
        let pipeline = Pipeline::from_config(PipelineConfig::default());
        let tables = SourceTables {
            orders: read_csv_str("eventId,amount,stateId\n2,10,4\n5,30,4\n").unwrap(),
            funnel: None,
        };
        let session = pipeline.open(tables).unwrap();
        assert_eq!(session.available_events(), vec!["2", "5"]);

        let all = session.compute(&Selection::all());
        let only_five = session.compute(&Selection::events(["5"]));
        assert_eq!(all.summary.total_amount, 40.0);
        assert_eq!(only_five.summary.total_amount, 30.0);
        assert_eq!(session.orders().len(), 2);
    }
}
