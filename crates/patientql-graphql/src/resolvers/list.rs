//! Patient list resolver.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::{debug, warn};

use super::get_graphql_context;
use crate::error::storage_error_to_graphql;

/// Resolver for `getPatients: [Patient!]!`.
pub struct ListResolver;

impl ListResolver {
    /// Creates the resolver function for the `getPatients` field.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let patients = gql_ctx.storage.list().await.map_err(|e| {
                    warn!(error = %e, "Storage error listing patients");
                    storage_error_to_graphql(e)
                })?;

                debug!(
                    count = patients.len(),
                    request_id = %gql_ctx.request_id,
                    "Resolved getPatients"
                );

                Ok(Some(FieldValue::list(
                    patients.into_iter().map(FieldValue::owned_any),
                )))
            })
        }
    }
}
