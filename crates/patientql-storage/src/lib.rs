//! # patientql-storage
//!
//! Storage abstraction layer for the PatientQL server.
//!
//! This crate defines the patient data model and the trait every storage
//! backend implements. It does not contain any implementations - those are
//! provided by `patientql-db-postgres` and `patientql-db-memory`.
//!
//! ## Example
//!
//! ```ignore
//! use patientql_storage::{PatientStorage, StorageError, Patient};
//!
//! async fn load(storage: &dyn PatientStorage, id: i32) -> Result<Patient, StorageError> {
//!     storage
//!         .read(id)
//!         .await?
//!         .ok_or_else(|| StorageError::not_found(id))
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::PatientStorage;
pub use types::{DeleteOutcome, NewPatient, Patient, PatientId, PatientUpdate};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn PatientStorage>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use patientql_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::PatientStorage;
    pub use crate::types::{DeleteOutcome, NewPatient, Patient, PatientId, PatientUpdate};
    pub use crate::{DynStorage, StorageResult};
}
