//! CRUD (Create, Read, Update, Delete) query implementations.
//!
//! Each function issues exactly one parameterized statement against the
//! `patients` table. Values are always bound, never interpolated.

use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;

use patientql_storage::{
    DeleteOutcome, NewPatient, Patient, PatientId, PatientUpdate, StorageError,
};

use crate::error::map_query_error;

/// Row shape shared by every statement that returns a full patient.
type PatientRow = (i32, String, String, String);

fn row_to_patient((id, name, email, phone): PatientRow) -> Patient {
    Patient {
        id,
        name,
        email,
        phone,
    }
}

/// Inserts a patient and returns it with the id assigned by the `SERIAL` column.
///
/// A duplicate email surfaces as `StorageError::Conflict` via the unique constraint.
pub async fn create(pool: &PgPool, patient: NewPatient) -> Result<Patient, StorageError> {
    let id: PatientId = query_scalar(
        "INSERT INTO patients (name, email, phone) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&patient.name)
    .bind(&patient.email)
    .bind(&patient.phone)
    .fetch_one(pool)
    .await
    .map_err(|e| map_query_error(e, "create patient"))?;

    Ok(patient.into_patient(id))
}

/// Reads a patient by id.
///
/// Returns `None` if the row doesn't exist.
pub async fn read(pool: &PgPool, id: PatientId) -> Result<Option<Patient>, StorageError> {
    let row: Option<PatientRow> =
        query_as("SELECT id, name, email, phone FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_query_error(e, "read patient"))?;

    Ok(row.map(row_to_patient))
}

/// Returns every patient ordered by id.
pub async fn list(pool: &PgPool) -> Result<Vec<Patient>, StorageError> {
    let rows: Vec<PatientRow> =
        query_as("SELECT id, name, email, phone FROM patients ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(|e| map_query_error(e, "list patients"))?;

    Ok(rows.into_iter().map(row_to_patient).collect())
}

/// Replaces the fields of an existing patient.
///
/// `COALESCE` keeps the stored name when the update carries none. No row
/// returned means no row matched, reported as `StorageError::NotFound`.
pub async fn update(
    pool: &PgPool,
    id: PatientId,
    update: PatientUpdate,
) -> Result<Patient, StorageError> {
    let row: Option<PatientRow> = query_as(
        r#"UPDATE patients
           SET name = COALESCE($1, name), email = $2, phone = $3
           WHERE id = $4
           RETURNING id, name, email, phone"#,
    )
    .bind(update.name)
    .bind(update.email)
    .bind(update.phone)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_query_error(e, "update patient"))?;

    row.map(row_to_patient)
        .ok_or_else(|| StorageError::not_found(id))
}

/// Deletes a patient by id.
pub async fn delete(pool: &PgPool, id: PatientId) -> Result<DeleteOutcome, StorageError> {
    let result = query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_query_error(e, "delete patient"))?;

    Ok(DeleteOutcome::from_rows_affected(result.rows_affected()))
}
