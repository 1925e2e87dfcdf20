//! GraphQL resolvers for patient operations.
//!
//! - `read`: `getPatient(id)`
//! - `list`: `getPatients`
//! - `create`, `update`, `delete`: the mutation root
//!
//! Every resolver makes exactly one storage call and reports failures as
//! field errors carrying `extensions.code`.

mod create;
mod delete;
mod list;
mod read;
mod update;

pub use create::CreateResolver;
pub use delete::{DeleteResolver, PatientDeletion};
pub use list::ListResolver;
pub use read::ReadResolver;
pub use update::UpdateResolver;

use async_graphql::dynamic::ResolverContext;
use patientql_storage::PatientId;

use crate::context::GraphQLContext;
use crate::error::GraphQLError;

/// Helper to extract GraphQL context from resolver context.
pub(crate) fn get_graphql_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a GraphQLContext, async_graphql::Error> {
    ctx.data::<GraphQLContext>()
        .map_err(|_| GraphQLError::Internal("GraphQL context not available".into()).into_field_error())
}

fn bad_input(message: String) -> async_graphql::Error {
    GraphQLError::BadUserInput(message).into_field_error()
}

/// Reads an optional `Int` argument as a patient id. Explicit `null` counts
/// as absent.
pub(crate) fn id_arg(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<Option<PatientId>, async_graphql::Error> {
    let Some(value) = ctx.args.get(name).filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let raw = value
        .i64()
        .map_err(|_| bad_input(format!("argument '{name}' must be an integer")))?;

    PatientId::try_from(raw)
        .map(Some)
        .map_err(|_| bad_input(format!("argument '{name}' is out of range: {raw}")))
}

/// Reads a required `Int` argument as a patient id.
pub(crate) fn required_id_arg(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<PatientId, async_graphql::Error> {
    id_arg(ctx, name)?.ok_or_else(|| bad_input(format!("missing required argument '{name}'")))
}

/// Reads an optional `String` argument.
pub(crate) fn string_arg(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<Option<String>, async_graphql::Error> {
    let Some(value) = ctx.args.get(name).filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    value
        .string()
        .map(|s| Some(s.to_owned()))
        .map_err(|_| bad_input(format!("argument '{name}' must be a string")))
}

/// Reads a required `String` argument.
pub(crate) fn required_string_arg(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<String, async_graphql::Error> {
    string_arg(ctx, name)?.ok_or_else(|| bad_input(format!("missing required argument '{name}'")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_graphql::{Request, Response};
    use patientql_storage::DynStorage;

    use crate::context::GraphQLContext;
    use crate::schema::PatientSchemaBuilder;

    /// Executes `query` against a fresh schema backed by `storage`.
    pub(crate) async fn execute(storage: &DynStorage, query: &str) -> Response {
        let schema = PatientSchemaBuilder::default()
            .build()
            .expect("schema builds");
        let context = GraphQLContext::builder()
            .with_storage(storage.clone())
            .with_request_id("test")
            .build()
            .expect("context builds");

        schema.execute(Request::new(query).data(context)).await
    }

    /// Returns `extensions.code` of the first error.
    pub(crate) fn first_error_code(response: &Response) -> Option<String> {
        let error = response.errors.first()?;
        match error.extensions.as_ref()?.get("code")? {
            async_graphql::Value::String(code) => Some(code.clone()),
            _ => None,
        }
    }
}
