//! Server configuration
//!
//! Read from the TOML file named by `BRACKET_CONFIG`, or `bracket.toml` in
//! the working directory. Every key is optional.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use bracket_core::DEFAULT_SESSION_HOURS;
use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "BRACKET_CONFIG";

/// Config file looked up when the variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "bracket.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadsConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Largest accepted request body in bytes, uploads included
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            body_limit: 8 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; defaults to `bracket.db` in the data directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Banner root; defaults to `uploads` in the data directory
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub hours: i64,
    pub cookie_name: String,
    /// Mark cookies `Secure`; enable behind HTTPS
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hours: DEFAULT_SESSION_HOURS,
            cookie_name: "bracket_session".to_string(),
            secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl Config {
    /// Load from `BRACKET_CONFIG` or `bracket.toml`.
    ///
    /// A missing default file means defaults; a missing file that was named
    /// explicitly is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind, self.server.port)
    }

    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("bracket.db")),
        }
    }

    pub fn uploads_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.uploads.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("uploads")),
        }
    }
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("dev", "bracket", "bracket").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().to_path_buf())
}
