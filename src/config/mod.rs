use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Upstream transcript source settings
    pub upstream: UpstreamConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Verbose request and lookup logging
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Caption languages to try, in order of preference
    pub languages: Vec<String>,

    /// Upper bound on a single transcript lookup
    pub lookup_timeout_secs: u64,

    /// Keep inline formatting tags in caption text
    pub preserve_formatting: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log line format
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            lookup_timeout_secs: 30,
            preserve_formatting: false,
        }
    }
}

impl UpstreamConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

impl Config {
    /// Load configuration from an explicit path, the default locations, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match Self::resolve_path(path)? {
            Some(config_path) => Self::from_file(&config_path)?,
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// The file `load` reads, if any. An explicit path must exist.
    pub fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                Ok(Some(path.to_path_buf()))
            }
            None => Ok(Self::config_path().ok().filter(|p| p.exists())),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        serde_yaml::from_str(&content)
            .context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcript-server").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.upstream.languages.is_empty() {
            anyhow::bail!("At least one upstream language must be configured");
        }

        if self.upstream.lookup_timeout_secs == 0 {
            anyhow::bail!("upstream.lookup_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Listen Address: {}:{}", self.server.host, self.server.port);
        println!("  Debug: {}", self.server.debug);
        println!("  Languages: {}", self.upstream.languages.join(", "));
        println!("  Lookup Timeout: {}s", self.upstream.lookup_timeout_secs);
        println!("  Preserve Formatting: {}", self.upstream.preserve_formatting);
        println!("  Log Format: {:?}", self.logging.format);
    }
}
