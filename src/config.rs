//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Tracing filter applied when neither `RUST_LOG` nor configuration set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Defaults for the `backupstore` CLI derived from environment variables and
/// configuration files. Command-line flags override these values.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "BACKUPSTORE",
    discovery(
        app_name = "backupstore",
        env_var = "BACKUPSTORE_CONFIG_PATH",
        config_file_name = "backupstore.toml",
        dotfile_name = ".backupstore.toml",
        project_file_name = "backupstore.toml"
    )
)]
pub struct StoreConfig {
    /// Destination locator listed when `--dest` is not given (for example
    /// `vfs:///srv/backups`).
    pub destination: Option<String>,
    /// Storage driver that listed volumes must belong to when `--driver` is
    /// not given.
    pub storage_driver: Option<String>,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    #[ortho_config(default = DEFAULT_LOG_FILTER.to_owned())]
    pub log_filter: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    flag: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

const DESTINATION_FIELD: FieldMetadata = FieldMetadata {
    description: "backup store destination",
    flag: "--dest",
    env_var: "BACKUPSTORE_DESTINATION",
    toml_key: "destination",
};

const STORAGE_DRIVER_FIELD: FieldMetadata = FieldMetadata {
    description: "storage driver",
    flag: "--driver",
    env_var: "BACKUPSTORE_STORAGE_DRIVER",
    toml_key: "storage_driver",
};

const LOG_FILTER_FIELD: FieldMetadata = FieldMetadata {
    description: "log filter",
    flag: "RUST_LOG",
    env_var: "BACKUPSTORE_LOG_FILTER",
    toml_key: "log_filter",
};

impl StoreConfig {
    fn require_field(value: Option<&str>, metadata: &FieldMetadata) -> Result<String, ConfigError> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_owned()),
            _ => Err(ConfigError::MissingField(format!(
                "missing {}: pass {}, set {}, or add {} to backupstore.toml",
                metadata.description, metadata.flag, metadata.env_var, metadata.toml_key
            ))),
        }
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("backupstore")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Picks the destination from `flag` or, failing that, configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when neither provides a
    /// non-blank value.
    pub fn resolve_destination(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        Self::require_field(flag.or(self.destination.as_deref()), &DESTINATION_FIELD)
    }

    /// Picks the expected storage driver from `flag` or configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when neither provides a
    /// non-blank value.
    pub fn resolve_storage_driver(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        Self::require_field(
            flag.or(self.storage_driver.as_deref()),
            &STORAGE_DRIVER_FIELD,
        )
    }

    /// Rejects blank values that were set explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(destination) = self.destination.as_deref() {
            Self::require_field(Some(destination), &DESTINATION_FIELD)?;
        }
        if let Some(storage_driver) = self.storage_driver.as_deref() {
            Self::require_field(Some(storage_driver), &STORAGE_DRIVER_FIELD)?;
        }
        Self::require_field(Some(&self.log_filter), &LOG_FILTER_FIELD)?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
