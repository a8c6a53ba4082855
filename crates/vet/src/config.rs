use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::naming::Convention;
use crate::{Errors, Validate, Walk};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Walk)]
pub struct PathConfig {
    /// Separator placed between path segments
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
        }
    }
}

impl Validate for PathConfig {
    fn validate(&self) -> Result<(), Errors> {
        if self.separator.is_empty() {
            return Err(crate::Error::field("separator", "must not be empty").into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Walk)]
pub struct NamingConfig {
    /// Tag conventions consulted for field names, highest priority first
    #[serde(default = "default_conventions")]
    #[vet(opaque)]
    pub conventions: Vec<Convention>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            conventions: default_conventions(),
        }
    }
}

/// Engine configuration, usually loaded from TOML with [`load_config`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, Walk)]
pub struct Config {
    #[serde(default)]
    pub path: PathConfig,
    #[serde(default)]
    pub naming: NamingConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(#[from] Errors),
}

fn default_separator() -> String {
    crate::path::SEPARATOR.to_string()
}

fn default_conventions() -> Vec<Convention> {
    Convention::DEFAULT_ORDER.to_vec()
}

/// Reads and validates a TOML configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    crate::validate(&cfg)?;
    Ok(cfg)
}

/// Returns the JSON schema describing the configuration structure.
pub fn config_schema_json() -> Result<serde_json::Value, serde_json::Error> {
    let schema = schemars::schema_for!(Config);
    serde_json::to_value(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(raw: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(raw.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let cfg = load_config(file.path()).expect("load config");
        assert_eq!(cfg.path.separator, ".");
        assert_eq!(cfg.naming.conventions, Convention::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn reads_separator_and_conventions() {
        let file = write_config(
            r#"
            [path]
            separator = "/"

            [naming]
            conventions = ["yaml", "json"]
            "#,
        );
        let cfg = load_config(file.path()).expect("load config");
        assert_eq!(cfg.path.separator, "/");
        assert_eq!(cfg.naming.conventions, vec![Convention::Yaml, Convention::Json]);
    }

    #[test]
    fn empty_separator_is_reported_with_its_path() {
        let file = write_config("[path]\nseparator = \"\"\n");
        let err = load_config(file.path()).unwrap_err();
        let ConfigError::Invalid(errs) = err else {
            panic!("expected invalid config, got {err}");
        };
        assert_eq!(errs.to_string(), "path.separator: must not be empty");
    }

    #[test]
    fn unknown_convention_fails_to_parse() {
        let file = write_config("[naming]\nconventions = [\"xml\"]\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            load_config("/nonexistent/vet.toml"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn schema_lists_sections() {
        let schema = config_schema_json().expect("schema json");
        let text = schema.to_string();
        assert!(text.contains("separator"));
        assert!(text.contains("conventions"));
    }
}
