mod bootstrap;
mod database;
mod state_builder;
mod store_health_monitor;

pub use bootstrap::ensure_bootstrap_admin;
pub use database::connect_and_migrate;
pub use state_builder::{AuthorizationAdapters, build_app_state};
pub use store_health_monitor::spawn_store_health_monitor;
