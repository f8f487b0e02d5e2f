//! CLI configuration.

use anyhow::{Context, Result};
use cue_commerce::StoreConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart store configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        config.validate().with_context(|| format!("Invalid config: {}", path))?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        if self.storage.backend == StorageBackend::File && self.storage.dir.trim().is_empty() {
            anyhow::bail!("storage.dir must not be empty for the file backend");
        }
        Ok(())
    }
}

/// Storage backend kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per record under `dir`.
    #[default]
    File,
    /// Session-only; nothing survives the process.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind (default: file).
    #[serde(default)]
    pub backend: StorageBackend,

    /// Storage directory, relative to the working directory unless absolute.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".cue/storage".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            dir: default_storage_dir(),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Human,
    /// JSON format (for log aggregation).
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log line format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_commerce::Currency;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.store.store_name, "cart-storage");
        assert_eq!(config.store.currency, Currency::COP);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.dir, ".cue/storage");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Human);
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "cue.toml",
            r#"
[store]
store_name = "tienda-cart"
max_quantity_per_line = 20

[storage]
backend = "memory"

[logging]
level = "debug"
format = "json"
"#,
        );

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.store.store_name, "tienda-cart");
        assert_eq!(config.store.max_quantity_per_line, 20);
        assert_eq!(config.store.currency, Currency::COP);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.dir, ".cue/storage");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "cue.json",
            r#"{"storage": {"dir": "/var/lib/cue"}, "store": {"currency": "USD"}}"#,
        );

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.storage.dir, "/var/lib/cue");
        assert_eq!(config.store.currency, Currency::USD);
    }

    #[test]
    fn test_load_rejects_unknown_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "cue.toml", "[storage]\nbackend = \"redis\"\n");
        assert!(CliConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_zero_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "cue.toml", "[store]\nmax_quantity_per_line = 0\n");

        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("max_quantity_per_line"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(CliConfig::load("/nonexistent/cue.toml").is_err());
    }
}
