//! Service configuration
//!
//! Resolution order: built-in defaults, then the optional JSON config file,
//! then command-line flags (which clap already merged with the environment).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::ServiceArgs;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;

/// Full service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpServerConfig,

    /// SQLite database file (default: "stores.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Log level or filter directive (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format (default: compact)
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("stores.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            database_path: default_database_path(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Resolve the effective configuration for a command
    pub fn resolve(args: &ServiceArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &ServiceArgs) {
        if let Some(host) = &args.host {
            self.http.host = host.clone();
        }
        if let Some(port) = args.port {
            self.http.port = port;
        }
        if let Some(database) = &args.database {
            self.database_path = database.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        let roots = &self.http.xml_roots;
        let names = [
            ("sequence", &roots.sequence),
            ("sequence_item", &roots.sequence_item),
            ("identified", &roots.identified),
            ("fallback", &roots.fallback),
        ];
        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(CliError::config_error(format!(
                    "xml_roots.{} must not be empty",
                    key
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::resolve(&ServiceArgs::default()).unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.database_path, PathBuf::from("stores.db"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_file_then_flags() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"http": {{"port": 4000}}, "database_path": "/data/file.db", "log_format": "json"}}"#
        )
        .unwrap();

        let args = ServiceArgs {
            config: Some(file.path().to_path_buf()),
            database: Some(PathBuf::from("/data/flag.db")),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(&args).unwrap();

        assert_eq!(config.http.port, 4000);
        assert_eq!(config.database_path, PathBuf::from("/data/flag.db"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let args = ServiceArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = ServiceConfig::resolve(&args).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let args = ServiceArgs {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        assert!(ServiceConfig::resolve(&args).is_err());
    }

    #[test]
    fn test_empty_xml_root_rejected() {
        let mut config = ServiceConfig::default();
        config.http.xml_roots.fallback = " ".to_string();
        assert!(config.validate().is_err());
    }
}
