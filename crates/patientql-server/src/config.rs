use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub use patientql_db_postgres::PostgresConfig;
use patientql_graphql::GraphQLConfig;
use serde::{Deserialize, Serialize};

/// Environment variable holding the database connection string. It wins over
/// every other source for `storage.postgres.url`.
pub const DB_URL_ENV: &str = "DB_URL";

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "patientql.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub graphql: GraphQLConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        self.addr()?;
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        self.graphql.validate()?;
        // Storage validation
        if self.storage.backend == StorageBackend::Postgres {
            let pg = &self.storage.postgres;
            if pg.url.is_none() && pg.host.is_empty() {
                return Err("storage.postgres requires either 'url' or 'host' to be set".into());
            }
            if pg.url.is_none() && pg.database.is_empty() {
                return Err("storage.postgres.database must not be empty".into());
            }
            if pg.pool_size == 0 {
                return Err("storage.postgres.pool_size must be > 0".into());
            }
        }
        Ok(())
    }

    /// The listen address. `server.host` must be an IP literal or
    /// `localhost`, which binds the IPv4 loopback.
    pub fn addr(&self) -> Result<SocketAddr, String> {
        let host = self.server.host.trim();
        let ip = if host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            host.parse::<IpAddr>().map_err(|_| {
                format!("server.host must be an IP address or 'localhost', got '{host}'")
            })?
        };
        Ok(SocketAddr::from((ip, self.server.port)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which `PatientStorage` implementation the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub postgres: PostgresConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::{AppConfig, DB_URL_ENV, DEFAULT_CONFIG_FILE};
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    /// Loads configuration from (lowest to highest precedence) built-in
    /// defaults, the TOML file, `PATIENTQL__*` variables and `DB_URL`.
    ///
    /// A missing file is not an error.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., PATIENTQL__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("PATIENTQL")
                .try_parsing(true)
                .separator("__"),
        );
        let db_url = std::env::var(DB_URL_ENV).ok().filter(|v| !v.is_empty());
        builder = builder
            .set_override_option("storage.postgres.url", db_url)
            .map_err(|e| format!("config override error: {e}"))?;
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn load_config_with_default_path<P: AsRef<Path>>(
        path: Option<P>,
    ) -> Result<AppConfig, String> {
        let p = path
            .as_ref()
            .map(|p| p.as_ref().to_string_lossy().to_string());
        load_config(p.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.addr().unwrap().to_string(), "0.0.0.0:8000");
        assert_eq!(cfg.storage.postgres.idle_timeout_ms, Some(300_000));
        assert_eq!(cfg.graphql.path, "/patient");
        assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn localhost_binds_loopback() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "localhost".into();

        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.addr().unwrap().to_string(), "127.0.0.1:8000");

        cfg.server.host = "::1".into();
        assert_eq!(cfg.addr().unwrap().to_string(), "[::1]:8000");
    }

    #[test]
    fn unparsable_host_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "locahost".into();

        assert!(cfg.addr().is_err());
        assert!(cfg.validate().unwrap_err().contains("server.host"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.storage.postgres.host.clear();
        assert!(cfg.validate().unwrap_err().contains("'url' or 'host'"));

        // Postgres settings are ignored by the memory backend
        cfg.storage.backend = StorageBackend::Memory;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_graphql_path_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.graphql.path = "patient".into();
        assert!(cfg.validate().is_err());
    }
}
