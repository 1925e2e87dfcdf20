pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LoggingConfig, PostgresConfig, ServerConfig, StorageBackend};
pub use observability::init_tracing;
pub use server::{AppState, PatientqlServer, ServerBuilder, build_app, create_storage};
