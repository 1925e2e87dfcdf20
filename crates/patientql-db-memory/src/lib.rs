//! In-memory patient storage backend for the PatientQL server.
//!
//! This crate provides an in-memory implementation of the `PatientStorage`
//! trait from `patientql-storage`. It is used by tests and by the server when
//! `storage.backend = "memory"`.
//!
//! # Example
//!
//! ```ignore
//! use patientql_db_memory::InMemoryStorage;
//! use patientql_storage::{NewPatient, PatientStorage};
//!
//! let storage = InMemoryStorage::new();
//! let created = storage
//!     .create(NewPatient::new("Andrew", "andrew@test.com", "890123490"))
//!     .await?;
//! ```

pub mod storage;

pub use patientql_storage::{PatientStorage, StorageError};
pub use storage::InMemoryStorage;

/// Creates a new in-memory storage instance wrapped for sharing.
pub fn create_storage() -> patientql_storage::DynStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
