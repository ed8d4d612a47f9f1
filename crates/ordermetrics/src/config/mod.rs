pub mod catalog;
pub mod loader;
pub mod policy;
pub mod schema;

pub use catalog::EventCatalog;
pub use loader::{load_config, load_config_from_str, resolve_catalog};
pub use policy::{ConfirmationPolicy, CART_STATE_ID, CONFIRMED_STATE_ID};
pub use schema::Config;
