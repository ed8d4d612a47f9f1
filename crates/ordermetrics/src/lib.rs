pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod normalizer;
pub mod pipeline;

pub use aggregate::{AggregationEngine, BundleState, ResultBundle, Selection, ValueMetric};
pub use config::{load_config, Config, ConfirmationPolicy, EventCatalog};
pub use error::{ConfigError, IngestError, OrderMetricsError, Result, SchemaError};
pub use ingest::{discover_data_files, load_tables, RawTable, SourceTables};
pub use normalizer::{FunnelTable, Normalizer, Order, OrdersTable};
pub use pipeline::{Pipeline, PipelineConfig, Session};
