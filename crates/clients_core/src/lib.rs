//! Core customer store: customers, their phones, and the SQLite schema
//! that relates them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DatabaseConfig, LoggingConfig};
pub use db::{open_database, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, shutdown_logging,
    LoggingError,
};
pub use model::customer::{
    group_rows, Customer, CustomerId, CustomerRow, CustomerWithPhones, Phone, PhoneId,
    SearchOutcome,
};
pub use repo::customer_repo::{
    ConstraintKind, CustomerRepository, RepoError, RepoResult, SqliteCustomerRepository,
};
pub use service::customer_service::CustomerStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
