//! Single patient read resolver.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use patientql_storage::StorageError;
use tracing::{debug, warn};

use super::{get_graphql_context, required_id_arg};
use crate::error::storage_error_to_graphql;

/// Resolver for `getPatient(id: Int): Patient`.
///
/// An unknown id is reported as a `NOT_FOUND` error and the field resolves
/// to `null`.
pub struct ReadResolver;

impl ReadResolver {
    /// Creates the resolver function for the `getPatient` field.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let id = required_id_arg(&ctx, "id")?;
                let gql_ctx = get_graphql_context(&ctx)?;

                debug!(id, request_id = %gql_ctx.request_id, "Resolving getPatient");

                let patient = gql_ctx.storage.read(id).await.map_err(|e| {
                    warn!(error = %e, id, "Storage error reading patient");
                    storage_error_to_graphql(e)
                })?;

                match patient {
                    Some(patient) => Ok(Some(FieldValue::owned_any(patient))),
                    None => {
                        debug!(id, "Patient not found");
                        Err(storage_error_to_graphql(StorageError::not_found(id)))
                    }
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use patientql_storage::NewPatient;

    use super::super::test_support::{execute, first_error_code};

    #[tokio::test]
    async fn test_reads_existing_patient() {
        let storage = patientql_db_memory::create_storage();
        let created = storage
            .create(NewPatient::new("Andrew", "andrew@test.com", "890123490"))
            .await
            .unwrap();

        let query = format!("{{ getPatient(id: {}) {{ id name email phone }} }}", created.id);
        let response = execute(&storage, &query).await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["getPatient"]["name"], "Andrew");
        assert_eq!(data["getPatient"]["email"], "andrew@test.com");
        assert_eq!(data["getPatient"]["phone"], "890123490");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let storage = patientql_db_memory::create_storage();
        let response = execute(&storage, "{ getPatient(id: 42) { id } }").await;

        assert_eq!(first_error_code(&response).as_deref(), Some("NOT_FOUND"));
        let data = response.data.into_json().unwrap();
        assert!(data["getPatient"].is_null());
    }

    #[tokio::test]
    async fn test_missing_id_is_bad_user_input() {
        let storage = patientql_db_memory::create_storage();
        let response = execute(&storage, "{ getPatient { id } }").await;

        assert_eq!(
            first_error_code(&response).as_deref(),
            Some("BAD_USER_INPUT")
        );
    }
}
