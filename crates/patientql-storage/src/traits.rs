//! Storage trait for the patient storage abstraction layer.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{DeleteOutcome, NewPatient, Patient, PatientId, PatientUpdate};

/// The storage trait that all patient storage backends implement.
///
/// Every method maps to exactly one statement against the backing store.
/// Implementations must be thread-safe (`Send + Sync`); a single instance is
/// shared by all requests.
///
/// # Example
///
/// ```ignore
/// use patientql_storage::{PatientStorage, StorageError, Patient};
///
/// async fn get_patient(storage: &dyn PatientStorage, id: i32) -> Result<Patient, StorageError> {
///     storage.read(id).await?.ok_or_else(|| StorageError::not_found(id))
/// }
/// ```
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Inserts a new patient and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn create(&self, patient: NewPatient) -> Result<Patient, StorageError>;

    /// Reads a patient by id.
    ///
    /// Returns `None` if no row matches.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing rows.
    async fn read(&self, id: PatientId) -> Result<Option<Patient>, StorageError>;

    /// Returns every patient, ordered by id. There is no implicit limit.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn list(&self) -> Result<Vec<Patient>, StorageError>;

    /// Replaces the fields of an existing patient.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row matches `id`; nothing is changed.
    /// Returns `StorageError::Conflict` if the new email belongs to another patient.
    async fn update(&self, id: PatientId, update: PatientUpdate) -> Result<Patient, StorageError>;

    /// Physically removes a patient.
    ///
    /// A missing row is reported as `DeleteOutcome::NotFound`, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn delete(&self, id: PatientId) -> Result<DeleteOutcome, StorageError>;

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConnectionError` if the backend cannot be reached.
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
