//! Patient GraphQL schema builder.
//!
//! `PatientSchemaBuilder` registers the object types, the query root and the
//! mutation root using async-graphql's dynamic schema API.

use async_graphql::Value;
use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, InputValue, Object, ResolverContext, Schema, TypeRef,
};
use patientql_storage::{DeleteOutcome, Patient};
use tracing::debug;

use crate::error::GraphQLError;
use crate::resolvers::{
    CreateResolver, DeleteResolver, ListResolver, PatientDeletion, ReadResolver, UpdateResolver,
};

/// Name of the patient object type.
pub const PATIENT_TYPE: &str = "Patient";

/// Name of the object returned by the `delete` mutation.
pub const PATIENT_DELETION_TYPE: &str = "PatientDeletion";

/// Name of the enum tagging a delete result.
pub const DELETION_OUTCOME_TYPE: &str = "DeletionOutcome";

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            introspection_enabled: true,
        }
    }
}

/// Builds the patient GraphQL schema.
///
/// # Example
///
/// ```ignore
/// let schema = PatientSchemaBuilder::new(SchemaBuilderConfig::default()).build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatientSchemaBuilder {
    config: SchemaBuilderConfig,
}

impl PatientSchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(config: SchemaBuilderConfig) -> Self {
        Self { config }
    }

    /// Builds the GraphQL schema.
    ///
    /// # Errors
    ///
    /// Returns an error if schema construction fails.
    pub fn build(&self) -> Result<Schema, GraphQLError> {
        debug!(
            introspection = self.config.introspection_enabled,
            "Starting GraphQL schema build"
        );

        let mut schema_builder = Schema::build("Query", Some("Mutation"), None)
            .register(build_patient_type())
            .register(build_deletion_outcome_enum())
            .register(build_patient_deletion_type())
            .register(build_query_type())
            .register(build_mutation_type());

        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }
}

/// Resolves one scalar field of a `Patient` parent value.
fn patient_field(name: &str, type_ref: TypeRef, get: fn(&Patient) -> Value) -> Field {
    Field::new(name, type_ref, move |ctx: ResolverContext<'_>| {
        FieldFuture::new(async move {
            let patient = ctx.parent_value.try_downcast_ref::<Patient>()?;
            Ok(Some(get(patient)))
        })
    })
}

fn build_patient_type() -> Object {
    Object::new(PATIENT_TYPE)
        .description("A patient record")
        .field(patient_field("id", TypeRef::named_nn(TypeRef::INT), |p| {
            Value::from(p.id)
        }))
        .field(patient_field(
            "name",
            TypeRef::named_nn(TypeRef::STRING),
            |p| Value::from(p.name.as_str()),
        ))
        .field(patient_field(
            "email",
            TypeRef::named_nn(TypeRef::STRING),
            |p| Value::from(p.email.as_str()),
        ))
        .field(patient_field(
            "phone",
            TypeRef::named_nn(TypeRef::STRING),
            |p| Value::from(p.phone.as_str()),
        ))
}

fn build_deletion_outcome_enum() -> Enum {
    Enum::new(DELETION_OUTCOME_TYPE)
        .description("Result of a delete mutation")
        .item(EnumItem::new(DeleteOutcome::Deleted.as_str()).description("The row was removed"))
        .item(EnumItem::new(DeleteOutcome::NotFound.as_str()).description("No row had that id"))
}

fn build_patient_deletion_type() -> Object {
    Object::new(PATIENT_DELETION_TYPE)
        .description("Acknowledgement of a delete mutation")
        .field(Field::new(
            "id",
            TypeRef::named_nn(TypeRef::INT),
            |ctx| {
                FieldFuture::new(async move {
                    let deletion = ctx.parent_value.try_downcast_ref::<PatientDeletion>()?;
                    Ok(Some(Value::from(deletion.id)))
                })
            },
        ))
        .field(Field::new(
            "outcome",
            TypeRef::named_nn(DELETION_OUTCOME_TYPE),
            |ctx| {
                FieldFuture::new(async move {
                    let deletion = ctx.parent_value.try_downcast_ref::<PatientDeletion>()?;
                    Ok(Some(Value::Enum(async_graphql::Name::new(
                        deletion.outcome.as_str(),
                    ))))
                })
            },
        ))
}

fn build_query_type() -> Object {
    Object::new("Query")
        .field(
            Field::new(
                "getPatient",
                TypeRef::named(PATIENT_TYPE),
                ReadResolver::resolve(),
            )
            .description("Fetch one patient by id")
            .argument(InputValue::new("id", TypeRef::named(TypeRef::INT))),
        )
        .field(
            Field::new(
                "getPatients",
                TypeRef::named_nn_list_nn(PATIENT_TYPE),
                ListResolver::resolve(),
            )
            .description("Fetch every patient, ordered by id"),
        )
}

fn build_mutation_type() -> Object {
    Object::new("Mutation")
        .field(
            Field::new(
                "create",
                TypeRef::named(PATIENT_TYPE),
                CreateResolver::resolve(),
            )
            .description("Insert a patient and return it with its new id")
            .argument(InputValue::new("name", TypeRef::named_nn(TypeRef::STRING)))
            .argument(InputValue::new("email", TypeRef::named_nn(TypeRef::STRING)))
            .argument(InputValue::new("phone", TypeRef::named_nn(TypeRef::STRING))),
        )
        .field(
            Field::new(
                "update",
                TypeRef::named(PATIENT_TYPE),
                UpdateResolver::resolve(),
            )
            .description("Replace the fields of an existing patient")
            .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::INT)))
            .argument(InputValue::new("name", TypeRef::named(TypeRef::STRING)))
            .argument(InputValue::new("email", TypeRef::named_nn(TypeRef::STRING)))
            .argument(InputValue::new("phone", TypeRef::named_nn(TypeRef::STRING))),
        )
        .field(
            Field::new(
                "delete",
                TypeRef::named_nn(PATIENT_DELETION_TYPE),
                DeleteResolver::resolve(),
            )
            .description("Remove a patient by id")
            .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::INT))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builds() {
        let schema = PatientSchemaBuilder::default().build().unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type Patient"));
        assert!(sdl.contains("getPatient(id: Int): Patient"));
        assert!(sdl.contains("getPatients: [Patient!]!"));
        assert!(sdl.contains("delete(id: Int!): PatientDeletion!"));
        assert!(sdl.contains("enum DeletionOutcome"));
    }

    #[test]
    fn test_default_config_enables_introspection() {
        assert!(SchemaBuilderConfig::default().introspection_enabled);
    }

    #[tokio::test]
    async fn test_introspection_can_be_disabled() {
        let schema = PatientSchemaBuilder::new(SchemaBuilderConfig {
            introspection_enabled: false,
        })
        .build()
        .unwrap();

        let response = schema.execute("{ __schema { queryType { name } } }").await;
        let data = response.data.into_json().unwrap_or_default();
        assert_ne!(data["__schema"]["queryType"]["name"], "Query");
    }

    #[tokio::test]
    async fn test_introspection_enabled_lists_query_type() {
        let schema = PatientSchemaBuilder::default().build().unwrap();

        let response = schema.execute("{ __schema { queryType { name } } }").await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["__schema"]["queryType"]["name"], "Query");
    }
}
