//! Service configuration.
//!
//! Values are layered, later layers winning: built-in defaults, the TOML file
//! named by `--config` or `SHOWDOWN_CONFIG`, `SHOWDOWN_*` environment
//! variables, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogFormat;

pub const ENV_CONFIG: &str = "SHOWDOWN_CONFIG";
pub const ENV_HOST: &str = "SHOWDOWN_HOST";
pub const ENV_PORT: &str = "SHOWDOWN_PORT";
pub const ENV_CORS_ORIGIN: &str = "SHOWDOWN_CORS_ORIGIN";
pub const ENV_HISTORY_LIMIT: &str = "SHOWDOWN_HISTORY_LIMIT";
pub const ENV_JOURNAL: &str = "SHOWDOWN_JOURNAL";
pub const ENV_LOG_FORMAT: &str = "SHOWDOWN_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS
    pub cors_origin: String,
    /// Hands returned by the recent-hands listing when no limit is given
    pub history_limit: usize,
    /// JSONL file mirroring every stored hand; in-memory only when unset
    pub journal: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            cors_origin: "http://localhost:3000".into(),
            history_limit: 5,
            journal: None,
            log_format: LogFormat::Text,
        }
    }
}

impl ServiceConfig {
    /// Loopback on an ephemeral port, no journal.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Flag,
}

/// Where each resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSources {
    pub host: ValueSource,
    pub port: ValueSource,
    pub cors_origin: ValueSource,
    pub history_limit: ValueSource,
    pub journal: ValueSource,
    pub log_format: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            host: ValueSource::Default,
            port: ValueSource::Default,
            cors_origin: ValueSource::Default,
            history_limit: ValueSource::Default,
            journal: ValueSource::Default,
            log_format: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: ServiceConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Command-line flags of the server binary.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "showdown-server", version, about = "Poker hand evaluation service")]
pub struct ServerArgs {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Address to bind to
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind to
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
    /// Origin allowed to call the API from a browser
    #[arg(long)]
    pub cors_origin: Option<String>,
    /// Default number of hands in the recent-hands listing
    #[arg(long)]
    pub history_limit: Option<usize>,
    /// JSONL journal to persist hands to
    #[arg(long)]
    pub journal: Option<PathBuf>,
    /// Log output: text or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    cors_origin: Option<String>,
    #[serde(default)]
    history_limit: Option<usize>,
    #[serde(default)]
    journal: Option<PathBuf>,
    #[serde(default)]
    log_format: Option<LogFormat>,
}

/// Resolves the configuration from the process environment and `args`.
pub fn load(args: &ServerArgs) -> Result<ConfigResolved, ConfigError> {
    load_with(args, |key| std::env::var(key).ok())
}

/// Like [`load`], with environment lookups going through `env`.
pub fn load_with<F>(args: &ServerArgs, env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.is_empty());
    let mut cfg = ServiceConfig::default();
    let mut sources = ConfigSources::default();

    let file = args
        .config
        .clone()
        .or_else(|| env(ENV_CONFIG).map(PathBuf::from));
    if let Some(path) = file {
        let f = read_file(&path)?;
        if let Some(v) = f.host {
            cfg.host = v;
            sources.host = ValueSource::File;
        }
        if let Some(v) = f.port {
            cfg.port = v;
            sources.port = ValueSource::File;
        }
        if let Some(v) = f.cors_origin {
            cfg.cors_origin = v;
            sources.cors_origin = ValueSource::File;
        }
        if let Some(v) = f.history_limit {
            cfg.history_limit = v;
            sources.history_limit = ValueSource::File;
        }
        if let Some(v) = f.journal {
            cfg.journal = Some(v);
            sources.journal = ValueSource::File;
        }
        if let Some(v) = f.log_format {
            cfg.log_format = v;
            sources.log_format = ValueSource::File;
        }
    }

    if let Some(host) = env(ENV_HOST) {
        cfg.host = host;
        sources.host = ValueSource::Env;
    }
    if let Some(port) = env(ENV_PORT) {
        cfg.port = port
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid port `{port}`")))?;
        sources.port = ValueSource::Env;
    }
    if let Some(origin) = env(ENV_CORS_ORIGIN) {
        cfg.cors_origin = origin;
        sources.cors_origin = ValueSource::Env;
    }
    if let Some(limit) = env(ENV_HISTORY_LIMIT) {
        cfg.history_limit = limit
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid history limit `{limit}`")))?;
        sources.history_limit = ValueSource::Env;
    }
    if let Some(journal) = env(ENV_JOURNAL) {
        cfg.journal = Some(PathBuf::from(journal));
        sources.journal = ValueSource::Env;
    }
    if let Some(format) = env(ENV_LOG_FORMAT) {
        cfg.log_format = format.parse().map_err(ConfigError::Invalid)?;
        sources.log_format = ValueSource::Env;
    }

    if let Some(v) = &args.host {
        cfg.host = v.clone();
        sources.host = ValueSource::Flag;
    }
    if let Some(v) = args.port {
        cfg.port = v;
        sources.port = ValueSource::Flag;
    }
    if let Some(v) = &args.cors_origin {
        cfg.cors_origin = v.clone();
        sources.cors_origin = ValueSource::Flag;
    }
    if let Some(v) = args.history_limit {
        cfg.history_limit = v;
        sources.history_limit = ValueSource::Flag;
    }
    if let Some(v) = &args.journal {
        cfg.journal = Some(v.clone());
        sources.journal = ValueSource::Flag;
    }
    if let Some(v) = args.log_format {
        cfg.log_format = v;
        sources.log_format = ValueSource::Flag;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&s)?)
}

fn validate(cfg: &ServiceConfig) -> Result<(), ConfigError> {
    if cfg.host.trim().is_empty() {
        return Err(ConfigError::Invalid("host must not be empty".into()));
    }
    if cfg.history_limit == 0 {
        return Err(ConfigError::Invalid("history_limit must be >0".into()));
    }
    if cfg.cors_origin.trim().is_empty() {
        return Err(ConfigError::Invalid("cors_origin must not be empty".into()));
    }
    Ok(())
}
