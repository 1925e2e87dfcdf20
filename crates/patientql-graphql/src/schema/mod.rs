//! GraphQL schema building.
//!
//! The schema is fixed at compile time in shape but assembled at startup
//! with async-graphql's dynamic API:
//!
//! ```graphql
//! type Patient { id: Int!  name: String!  email: String!  phone: String! }
//!
//! enum DeletionOutcome { DELETED NOT_FOUND }
//! type PatientDeletion { id: Int!  outcome: DeletionOutcome! }
//!
//! type Query {
//!   getPatient(id: Int): Patient
//!   getPatients: [Patient!]!
//! }
//!
//! type Mutation {
//!   create(name: String!, email: String!, phone: String!): Patient
//!   update(id: Int!, name: String, email: String!, phone: String!): Patient
//!   delete(id: Int!): PatientDeletion!
//! }
//! ```

mod builder;

pub use builder::{
    DELETION_OUTCOME_TYPE, PATIENT_DELETION_TYPE, PATIENT_TYPE, PatientSchemaBuilder,
    SchemaBuilderConfig,
};
