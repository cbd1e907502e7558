//! Configuration system for the CrewTask server.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/crewtask/config.toml`)
//! 4. Compiled defaults

use std::path::PathBuf;

/// Compiled-in token secret. Only suitable for local development; `main`
/// logs a warning when the server starts with it.
pub const DEFAULT_TOKEN_SECRET: &str = "crewtask-dev-secret";

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerFileConfig,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
    token_secret: Option<String>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the CrewTask server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "CrewTask API server")]
pub struct CliArgs {
    /// Address to bind the server to.
    #[arg(short, long, env = "CREWTASK_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/crewtask/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Shared secret for verifying session tokens.
    #[arg(long, env = "CREWTASK_TOKEN_SECRET")]
    pub token_secret: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "CREWTASK_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:3001`).
    pub bind_addr: String,
    /// Shared secret for verifying session tokens.
    pub token_secret: String,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3001".to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and a missing
    /// file is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Returns `true` when the server runs with the compiled-in secret.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }

    /// Resolve a `ServerConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            token_secret: cli
                .token_secret
                .clone()
                .or_else(|| file.server.token_secret.clone())
                .unwrap_or(defaults.token_secret),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("crewtask").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_compiled_values() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3001");
        assert_eq!(config.token_secret, DEFAULT_TOKEN_SECRET);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn toml_parsing_full() {
        let toml_str = r#"
[server]
bind_addr = "127.0.0.1:8080"
token_secret = "from-file"
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let cli = CliArgs::default();
        let config = ServerConfig::resolve(&cli, &file);

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.token_secret, "from-file");
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn toml_parsing_partial() {
        let toml_str = r#"
[server]
token_secret = "from-file"
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let cli = CliArgs::default();
        let config = ServerConfig::resolve(&cli, &file);

        assert_eq!(config.bind_addr, "0.0.0.0:3001"); // default
        assert_eq!(config.token_secret, "from-file"); // from file
    }

    #[test]
    fn toml_parsing_empty() {
        let file: ConfigFile = toml::from_str("").unwrap();
        let cli = CliArgs::default();
        let config = ServerConfig::resolve(&cli, &file);

        assert_eq!(config.bind_addr, "0.0.0.0:3001");
        assert_eq!(config.token_secret, DEFAULT_TOKEN_SECRET);
    }

    #[test]
    fn cli_overrides_file() {
        let toml_str = r#"
[server]
bind_addr = "127.0.0.1:8080"
token_secret = "from-file"
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let cli = CliArgs {
            bind: Some("0.0.0.0:3000".to_string()),
            token_secret: None, // not set on CLI, should fall through to file
            ..Default::default()
        };
        let config = ServerConfig::resolve(&cli, &file);

        assert_eq!(config.bind_addr, "0.0.0.0:3000"); // from CLI
        assert_eq!(config.token_secret, "from-file"); // from file
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = load_config_file(None);
        assert!(result.is_ok());
    }

    #[test]
    fn explicit_missing_config_file_returns_error() {
        let result = load_config_file(Some(std::path::Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
