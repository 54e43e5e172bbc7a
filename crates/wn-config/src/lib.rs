//! Configuration management for wn.
//!
//! Parses `wn.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.dir`
//! - `source.extension`
//! - `expansion.namespace`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override fragment source directory.
    pub source_dir: Option<PathBuf>,
    /// Override default namespace.
    pub namespace: Option<String>,
    /// Override include expansion flag.
    pub expand: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wn.toml";

/// Default fragment directory, relative to the config file.
const DEFAULT_SOURCE_DIR: &str = "fragments";

/// Default fragment file extension.
const DEFAULT_EXTENSION: &str = "txt";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fragment source configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// Include expansion configuration.
    pub expansion: ExpansionConfig,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw source configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    dir: Option<String>,
    extension: Option<String>,
}

/// Resolved fragment source configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// Root directory holding one subdirectory per namespace.
    pub dir: PathBuf,
    /// Fragment file extension without the leading dot.
    pub extension: String,
}

/// Include expansion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Whether include directives are expanded at all.
    pub enabled: bool,
    /// Optional upper bound on scan/substitute passes per document.
    /// Unset means resolve until no directive remains.
    pub max_passes: Option<usize>,
    /// Default namespace when none is given on the command line.
    pub namespace: Option<String>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_passes: None,
            namespace: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`expansion.namespace`").
        field: String,
        /// Error message (e.g., "${`WN_NAMESPACE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wn.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.source_resolved.dir.clone_from(source_dir);
        }
        if let Some(namespace) = &settings.namespace {
            self.expansion.namespace = Some(namespace.clone());
        }
        if let Some(expand) = settings.expand {
            self.expansion.enabled = expand;
        }
    }

    /// Get the namespace to resolve in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no namespace is configured.
    pub fn require_namespace(&self) -> Result<&str, ConfigError> {
        self.expansion.namespace.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "expansion.namespace required in config (or pass --namespace)".to_owned(),
            )
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            source: SourceConfigRaw::default(),
            expansion: ExpansionConfig::default(),
            source_resolved: SourceConfig {
                dir: base.join(DEFAULT_SOURCE_DIR),
                extension: DEFAULT_EXTENSION.to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_source()?;
        self.validate_expansion()?;
        Ok(())
    }

    /// Validate source configuration.
    fn validate_source(&self) -> Result<(), ConfigError> {
        let extension = &self.source_resolved.extension;
        require_non_empty(extension, "source.extension")?;
        if extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "source.extension must not start with '.'".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate expansion configuration.
    fn validate_expansion(&self) -> Result<(), ConfigError> {
        if self.expansion.max_passes == Some(0) {
            return Err(ConfigError::Validation(
                "expansion.max_passes must be greater than 0".to_owned(),
            ));
        }
        if let Some(namespace) = &self.expansion.namespace {
            require_non_empty(namespace, "expansion.namespace")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.source.dir {
            self.source.dir = Some(expand::expand_env(dir, "source.dir")?);
        }
        if let Some(ref extension) = self.source.extension {
            self.source.extension = Some(expand::expand_env(extension, "source.extension")?);
        }
        if let Some(ref namespace) = self.expansion.namespace {
            self.expansion.namespace =
                Some(expand::expand_env(namespace, "expansion.namespace")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.source_resolved = SourceConfig {
            dir: config_dir.join(self.source.dir.as_deref().unwrap_or(DEFAULT_SOURCE_DIR)),
            extension: self
                .source
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned()),
        };
    }
}
