//! GraphQL configuration.
//!
//! Configuration can be specified in `patientql.toml` under the `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! path = "/patient"
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

/// GraphQL API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Route the GraphQL endpoint is mounted on.
    /// Default: "/patient"
    #[serde(default = "default_path")]
    pub path: String,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_path() -> String {
    "/patient".into()
}

fn default_introspection() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            introspection: default_introspection(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.path.starts_with('/') {
            return Err("graphql.path must start with '/'".into());
        }
        if self.path.len() < 2 {
            return Err("graphql.path must not be the root path".into());
        }
        Ok(())
    }

    /// Converts this config to a SchemaBuilderConfig.
    #[must_use]
    pub fn to_schema_builder_config(&self) -> crate::SchemaBuilderConfig {
        crate::SchemaBuilderConfig {
            introspection_enabled: self.introspection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphQLConfig::default();
        assert_eq!(config.path, "/patient");
        assert!(config.introspection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_paths() {
        let config = GraphQLConfig {
            path: "patient".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GraphQLConfig {
            path: "/".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml_str = r#"
            path = "/graphql"
            introspection = false
        "#;

        let config: GraphQLConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.path, "/graphql");
        assert!(!config.introspection);
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: GraphQLConfig = toml::from_str("").unwrap();
        assert_eq!(config.path, "/patient");
        assert!(config.introspection);
    }

    #[test]
    fn test_to_schema_builder_config() {
        let config = GraphQLConfig {
            introspection: false,
            ..Default::default()
        };

        let builder_config = config.to_schema_builder_config();
        assert!(!builder_config.introspection_enabled);
    }
}
