//! Create mutation resolver.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use patientql_storage::NewPatient;
use tracing::{debug, warn};

use super::{get_graphql_context, required_string_arg};
use crate::error::storage_error_to_graphql;

/// Resolver for the `create` mutation.
///
/// ```graphql
/// mutation {
///   create(name: "Andrew", email: "andrew@test.com", phone: "890123490") {
///     id
///   }
/// }
/// ```
///
/// A duplicate email is reported as `CONFLICT` and nothing is inserted.
pub struct CreateResolver;

impl CreateResolver {
    /// Creates the resolver function for the `create` field.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let patient = NewPatient::new(
                    required_string_arg(&ctx, "name")?,
                    required_string_arg(&ctx, "email")?,
                    required_string_arg(&ctx, "phone")?,
                );

                debug!(request_id = %gql_ctx.request_id, "Processing create mutation");

                let created = gql_ctx.storage.create(patient).await.map_err(|e| {
                    warn!(error = %e, "Create failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(id = created.id, "Patient created");
                Ok(Some(FieldValue::owned_any(created)))
            })
        }
    }
}
