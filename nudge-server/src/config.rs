//! Configuration system for the `NeighborNudge` API server.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/nudge-server/config.toml`)
//! 4. Compiled defaults

use std::path::PathBuf;

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

/// Top-level TOML config file structure for the server.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct NudgeConfigFile {
    server: ServerFileConfig,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
    subreddit: Option<String>,
    feed_limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the API server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "NeighborNudge API server")]
pub struct NudgeCliArgs {
    /// Address to bind the API server to.
    #[arg(short, long, env = "NUDGE_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/nudge-server/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Community subreddit for the feed and cross-post links.
    #[arg(long, env = "NUDGE_SUBREDDIT")]
    pub subreddit: Option<String>,

    /// Maximum number of feed posts to fetch.
    #[arg(long)]
    pub feed_limit: Option<u32>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "NUDGE_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct NudgeConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Community subreddit for the feed and cross-post links.
    pub subreddit: String,
    /// Maximum number of feed posts to fetch.
    pub feed_limit: u32,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            subreddit: "NeighborNudge".to_string(),
            feed_limit: nudge_reddit::feed::DEFAULT_LIMIT,
            log_level: "info".to_string(),
        }
    }
}

impl NudgeConfig {
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
    pub fn load(cli: &NudgeCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `NudgeConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &NudgeCliArgs, file: &NudgeConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            subreddit: cli
                .subreddit
                .clone()
                .or_else(|| file.server.subreddit.clone())
                .unwrap_or(defaults.subreddit),
            feed_limit: cli
                .feed_limit
                .or(file.server.feed_limit)
                .unwrap_or(defaults.feed_limit),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the server.
fn load_config_file(
    explicit_path: Option<&std::path::Path>,
) -> Result<NudgeConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(NudgeConfigFile::default());
        };
        config_dir.join("nudge-server").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(NudgeConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
