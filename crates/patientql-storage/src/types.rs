//! Data types shared by all storage backends.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the storage backend on creation.
pub type PatientId = i32;

/// A patient row as stored in the `patients` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Storage-assigned primary key. Never changes after creation.
    pub id: PatientId,
    pub name: String,
    /// Unique across all patients.
    pub email: String,
    pub phone: String,
}

/// Input for creating a patient. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewPatient {
    /// Creates a new patient input.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Builds the stored row once storage has assigned an id.
    #[must_use]
    pub fn into_patient(self, id: PatientId) -> Patient {
        Patient {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Replacement values for an existing patient.
///
/// `email` and `phone` always overwrite the stored values. `name` is optional:
/// `None` keeps the stored name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
}

impl PatientUpdate {
    /// Creates an update that keeps the stored name.
    #[must_use]
    pub fn new(email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Sets the replacement name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Applies this update to a stored row.
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(name) = self.name {
            patient.name = name;
        }
        patient.email = self.email;
        patient.phone = self.phone;
    }
}

/// Result of a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteOutcome {
    /// The row existed and has been removed.
    Deleted,
    /// No row matched the id; nothing was removed.
    NotFound,
}

impl DeleteOutcome {
    /// Maps an affected-row count to an outcome.
    #[must_use]
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            Self::NotFound
        } else {
            Self::Deleted
        }
    }

    /// Returns the GraphQL enum value name for this outcome.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "DELETED",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient_into_patient() {
        let patient = NewPatient::new("Andrew", "andrew@test.com", "890123490").into_patient(7);
        assert_eq!(patient.id, 7);
        assert_eq!(patient.name, "Andrew");
        assert_eq!(patient.email, "andrew@test.com");
        assert_eq!(patient.phone, "890123490");
    }

    #[test]
    fn test_update_without_name_keeps_stored_name() {
        let mut patient = NewPatient::new("Andrew", "andrew@test.com", "1").into_patient(1);
        PatientUpdate::new("new@test.com", "2").apply_to(&mut patient);

        assert_eq!(patient.name, "Andrew");
        assert_eq!(patient.email, "new@test.com");
        assert_eq!(patient.phone, "2");
    }

    #[test]
    fn test_update_with_name_replaces_all_fields() {
        let mut patient = NewPatient::new("Andrew", "andrew@test.com", "1").into_patient(1);
        PatientUpdate::new("drew@test.com", "3")
            .with_name("Drew")
            .apply_to(&mut patient);

        assert_eq!(patient.id, 1);
        assert_eq!(patient.name, "Drew");
        assert_eq!(patient.email, "drew@test.com");
    }

    #[test]
    fn test_delete_outcome_from_rows() {
        assert_eq!(DeleteOutcome::from_rows_affected(0), DeleteOutcome::NotFound);
        assert_eq!(DeleteOutcome::from_rows_affected(1), DeleteOutcome::Deleted);
        assert_eq!(DeleteOutcome::Deleted.as_str(), "DELETED");
    }

    #[test]
    fn test_patient_serialization() {
        let patient = NewPatient::new("Andrew", "andrew@test.com", "890123490").into_patient(3);
        let json = serde_json::to_value(&patient).expect("serialization failed");
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "Andrew",
                "email": "andrew@test.com",
                "phone": "890123490"
            })
        );
        assert_eq!(
            serde_json::to_value(DeleteOutcome::NotFound).expect("serialization failed"),
            serde_json::json!("NOT_FOUND")
        );
    }
}
