//! Delete mutation resolver.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use patientql_storage::{DeleteOutcome, PatientId};
use tracing::{debug, warn};

use super::{get_graphql_context, required_id_arg};
use crate::error::storage_error_to_graphql;

/// Acknowledgement returned by the `delete` mutation.
///
/// No patient data is returned, only the id that was asked for and whether a
/// row was actually removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientDeletion {
    /// The id passed to the mutation.
    pub id: PatientId,
    /// Whether a row was removed.
    pub outcome: DeleteOutcome,
}

/// Resolver for the `delete` mutation.
///
/// ```graphql
/// mutation {
///   delete(id: 1) { id outcome }
/// }
/// ```
pub struct DeleteResolver;

impl DeleteResolver {
    /// Creates the resolver function for the `delete` field.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let id = required_id_arg(&ctx, "id")?;

                let outcome = gql_ctx.storage.delete(id).await.map_err(|e| {
                    warn!(error = %e, id, "Delete failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(
                    id,
                    outcome = outcome.as_str(),
                    request_id = %gql_ctx.request_id,
                    "Processed delete mutation"
                );

                Ok(Some(FieldValue::owned_any(PatientDeletion { id, outcome })))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use patientql_storage::NewPatient;

    use super::super::test_support::{execute, first_error_code};

    #[tokio::test]
    async fn test_delete_then_read_is_not_found() {
        let storage = patientql_db_memory::create_storage();
        let created = storage
            .create(NewPatient::new("Andrew", "andrew@test.com", "890123490"))
            .await
            .unwrap();

        let query = format!("mutation {{ delete(id: {}) {{ id outcome }} }}", created.id);
        let response = execute(&storage, &query).await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["delete"]["id"], created.id);
        assert_eq!(data["delete"]["outcome"], "DELETED");

        let query = format!("{{ getPatient(id: {}) {{ id }} }}", created.id);
        let response = execute(&storage, &query).await;
        assert_eq!(first_error_code(&response).as_deref(), Some("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_reports_not_found_outcome() {
        let storage = patientql_db_memory::create_storage();
        let response = execute(&storage, "mutation { delete(id: 7) { id outcome } }").await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["delete"]["outcome"], "NOT_FOUND");
    }
}
