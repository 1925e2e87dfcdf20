//! Update mutation resolver.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use patientql_storage::PatientUpdate;
use tracing::{debug, warn};

use super::{get_graphql_context, required_id_arg, required_string_arg, string_arg};
use crate::error::storage_error_to_graphql;

/// Resolver for the `update` mutation.
///
/// ```graphql
/// mutation {
///   update(id: 1, email: "drew@test.com", phone: "555") { id name email phone }
/// }
/// ```
///
/// `email` and `phone` are always replaced; `name` only when given.
pub struct UpdateResolver;

impl UpdateResolver {
    /// Creates the resolver function for the `update` field.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let id = required_id_arg(&ctx, "id")?;

                let mut update = PatientUpdate::new(
                    required_string_arg(&ctx, "email")?,
                    required_string_arg(&ctx, "phone")?,
                );
                if let Some(name) = string_arg(&ctx, "name")? {
                    update = update.with_name(name);
                }

                debug!(id, request_id = %gql_ctx.request_id, "Processing update mutation");

                let updated = gql_ctx.storage.update(id, update).await.map_err(|e| {
                    warn!(error = %e, id, "Update failed");
                    storage_error_to_graphql(e)
                })?;

                Ok(Some(FieldValue::owned_any(updated)))
            })
        }
    }
}
