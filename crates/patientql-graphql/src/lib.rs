//! # patientql-graphql
//!
//! GraphQL API layer for the PatientQL server.
//!
//! The schema is static and small: a `Patient` object type, two queries
//! (`getPatient`, `getPatients`) and three mutations (`create`, `update`,
//! `delete`). It is assembled at startup with async-graphql's dynamic schema
//! API and every resolver issues a single call against the injected
//! [`PatientStorage`](patientql_storage::PatientStorage).
//!
//! ## Endpoint
//!
//! - `ANY /patient?query=...` - the document always travels in the URL,
//!   optionally with `operationName` and `variables` (JSON string).
//!
//! ## Configuration
//!
//! Add to `patientql.toml`:
//!
//! ```toml
//! [graphql]
//! path = "/patient"
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Schema building
//! - [`context`] - GraphQL execution context
//! - [`resolvers`] - Query and mutation resolvers
//! - [`handler`] - Axum HTTP handler
//! - [`error`] - Error types for GraphQL operations

pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{ContextBuilderError, GraphQLContext, GraphQLContextBuilder};
pub use error::GraphQLError;
pub use handler::{GraphQLState, graphql_handler};
pub use schema::{PatientSchemaBuilder, SchemaBuilderConfig};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
