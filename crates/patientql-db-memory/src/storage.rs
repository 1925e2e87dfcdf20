use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use patientql_storage::{
    DeleteOutcome, NewPatient, Patient, PatientId, PatientStorage, PatientUpdate, StorageError,
};
use tokio::sync::RwLock;
use tracing::trace;

/// In-memory patient storage.
///
/// Rows live in an id-ordered map behind a `tokio::sync::RwLock`. Email
/// uniqueness is checked under the same write lock as the insert, so
/// concurrent creates cannot both claim one address. Ids come from an atomic
/// counter and are never reused.
#[derive(Debug)]
pub struct InMemoryStorage {
    rows: RwLock<BTreeMap<PatientId, Patient>>,
    next_id: AtomicI32,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Creates an empty storage. The first assigned id is 1.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Returns the number of stored patients.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns `true` if no patients are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn email_taken(rows: &BTreeMap<PatientId, Patient>, email: &str, except: Option<PatientId>) -> bool {
        rows.values()
            .any(|p| p.email == email && Some(p.id) != except)
    }
}

#[async_trait]
impl PatientStorage for InMemoryStorage {
    async fn create(&self, patient: NewPatient) -> Result<Patient, StorageError> {
        let mut rows = self.rows.write().await;

        if Self::email_taken(&rows, &patient.email, None) {
            return Err(StorageError::duplicate_email(&patient.email));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = patient.into_patient(id);
        rows.insert(id, stored.clone());

        trace!(id, "Inserted patient");
        Ok(stored)
    }

    async fn read(&self, id: PatientId) -> Result<Option<Patient>, StorageError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Patient>, StorageError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn update(&self, id: PatientId, update: PatientUpdate) -> Result<Patient, StorageError> {
        let mut rows = self.rows.write().await;

        if !rows.contains_key(&id) {
            return Err(StorageError::not_found(id));
        }
        if Self::email_taken(&rows, &update.email, Some(id)) {
            return Err(StorageError::duplicate_email(&update.email));
        }

        let patient = rows
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found(id))?;
        update.apply_to(patient);

        trace!(id, "Updated patient");
        Ok(patient.clone())
    }

    async fn delete(&self, id: PatientId) -> Result<DeleteOutcome, StorageError> {
        let removed = self.rows.write().await.remove(&id);
        Ok(if removed.is_some() {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        })
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
