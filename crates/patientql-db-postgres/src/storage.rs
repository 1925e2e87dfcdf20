//! PostgreSQL implementation of the PatientStorage trait.

use async_trait::async_trait;
use sqlx_postgres::PgPool;

use patientql_storage::{
    DeleteOutcome, NewPatient, Patient, PatientId, PatientStorage, PatientUpdate, StorageError,
};

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries::crud;

/// PostgreSQL storage backend for patients.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates a new `PostgresStorage` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Verify the database is reachable
    /// 3. Run migrations (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;
        pool::test_connection(&pool).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStorage` from an existing connection pool.
    ///
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PatientStorage for PostgresStorage {
    async fn create(&self, patient: NewPatient) -> Result<Patient, StorageError> {
        crud::create(&self.pool, patient).await
    }

    async fn read(&self, id: PatientId) -> Result<Option<Patient>, StorageError> {
        crud::read(&self.pool, id).await
    }

    async fn list(&self) -> Result<Vec<Patient>, StorageError> {
        crud::list(&self.pool).await
    }

    async fn update(&self, id: PatientId, update: PatientUpdate) -> Result<Patient, StorageError> {
        crud::update(&self.pool, id, update).await
    }

    async fn delete(&self, id: PatientId) -> Result<DeleteOutcome, StorageError> {
        crud::delete(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        pool::test_connection(&self.pool)
            .await
            .map_err(|e| StorageError::connection_error(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
