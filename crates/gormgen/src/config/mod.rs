//! Configuration loading and type definitions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection configuration.
    pub database: DbConfig,

    /// Generator behavior configuration.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Engine selector: "mysql", "postgres" or "postgresql".
    pub engine: String,

    /// Database host.
    pub host: String,

    /// Database port.
    pub port: u16,

    /// Username.
    pub user: String,

    /// Password.
    pub password: String,

    /// Database name.
    pub database: String,

    /// Initial schema for engines with a schema concept (default: "public").
    #[serde(default = "default_public_schema")]
    pub schema: String,

    /// SSL mode for PostgreSQL: disable, require, verify-ca, verify-full
    /// (default: "disable").
    #[serde(default = "default_ssl_disable")]
    pub ssl_mode: String,
}

/// Generator behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Package name emitted at the top of generated files (default: "models").
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Output directory for batch generation (default: "./models").
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_public_schema() -> String {
    "public".to_string()
}

fn default_ssl_disable() -> String {
    "disable".to_string()
}

fn default_package_name() -> String {
    "models".to_string()
}

fn default_output_dir() -> String {
    "./models".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
database:
  engine: mysql
  host: localhost
  port: 3306
  user: root
  password: secret
  database: app
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.engine, "mysql");
        assert_eq!(config.database.schema, "public");
        assert_eq!(config.database.ssl_mode, "disable");
        assert_eq!(config.generator.package_name, "models");
        assert_eq!(config.generator.output_dir, "./models");
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
database:
  engine: postgres
  host: db.internal
  port: 5432
  user: svc
  password: secret
  database: warehouse
  schema: reporting
  ssl_mode: require
generator:
  package_name: entities
  output_dir: ./entities
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.schema, "reporting");
        assert_eq!(config.database.ssl_mode, "require");
        assert_eq!(config.generator.package_name, "entities");
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config {
            database: DbConfig {
                engine: "postgres".to_string(),
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: "postgres".to_string(),
                database: "app".to_string(),
                schema: "public".to_string(),
                ssl_mode: "disable".to_string(),
            },
            generator: GeneratorConfig::default(),
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.database.host, config.database.host);
        assert_eq!(parsed.generator.output_dir, config.generator.output_dir);
    }
}
