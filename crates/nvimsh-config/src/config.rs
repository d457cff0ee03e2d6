use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    error::{ConfigError, ErrorContext, Result},
    utils::{parse_duration, xdg_config_home},
};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "NVIMSH_CONFIG";

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_FEED_URL: &str = "https://storage.googleapis.com/neovimcraft.com/db.json";
pub const DEFAULT_REFRESH_INTERVAL: &str = "1h";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_MAX_FEED_SIZE: u64 = 64 * 1024 * 1024;

/// Application's configuration
///
/// Every key is optional in the file; [`Config::resolve`] fills in the
/// defaults after loading.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    /// Default: 0.0.0.0:8080
    pub listen: Option<String>,

    /// URL of the plugin database document.
    /// Default: https://storage.googleapis.com/neovimcraft.com/db.json
    pub feed_url: Option<String>,

    /// How often the catalog is refreshed, e.g. `1h` or `30m`.
    /// Default: 1h
    pub refresh_interval: Option<String>,

    /// Upper bound for a single feed request, e.g. `30s`.
    /// Default: 30s
    pub request_timeout: Option<String>,

    /// Maximum accepted size of the feed body in bytes.
    /// Default: 67108864 (64 MiB)
    pub max_feed_size: Option<u64>,

    /// User agent sent with feed requests.
    /// Default: nvimsh/<version>
    pub user_agent: Option<String>,

    /// Set to false to serve an empty catalog without ever fetching.
    /// Default: true
    pub refresh_enabled: Option<bool>,
}

pub fn default_config_path() -> PathBuf {
    xdg_config_home().join("nvimsh").join("config.toml")
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            listen: Some(DEFAULT_LISTEN.to_string()),
            feed_url: Some(DEFAULT_FEED_URL.to_string()),
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL.to_string()),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT.to_string()),
            max_feed_size: Some(DEFAULT_MAX_FEED_SIZE),
            user_agent: Some(default_user_agent()),
            refresh_enabled: Some(true),
        }
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` wins, then `$NVIMSH_CONFIG`, then the XDG default
    /// location. Only a missing file at the XDG default location falls back
    /// to the built-in defaults; an explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = default_config_path();
                match fs::read_to_string(&path) {
                    Ok(content) => toml::from_str(&content)?,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!("no config at {}, using defaults", path.display());
                        Self::default_config()
                    }
                    Err(err) => {
                        return Err(ConfigError::IoError {
                            action: format!("reading config file {}", path.display()),
                            source: err,
                        })
                    }
                }
            }
        };

        config.resolve();
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Ok(toml::from_str(&content)?)
    }

    /// Fills every unset key with its default.
    pub fn resolve(&mut self) {
        self.listen.get_or_insert_with(|| DEFAULT_LISTEN.to_string());
        self.feed_url
            .get_or_insert_with(|| DEFAULT_FEED_URL.to_string());
        self.refresh_interval
            .get_or_insert_with(|| DEFAULT_REFRESH_INTERVAL.to_string());
        self.request_timeout
            .get_or_insert_with(|| DEFAULT_REQUEST_TIMEOUT.to_string());
        self.max_feed_size.get_or_insert(DEFAULT_MAX_FEED_SIZE);
        self.user_agent.get_or_insert_with(default_user_agent);
        self.refresh_enabled.get_or_insert(true);
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.refresh_interval()?;
        self.request_timeout()?;

        let url = self.feed_url();
        let parsed = Url::parse(url).map_err(|err| ConfigError::InvalidFeedUrl(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidFeedUrl(format!(
                "unsupported scheme `{}` in {url}",
                parsed.scheme()
            )));
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let listen = self.listen.as_deref().unwrap_or(DEFAULT_LISTEN);
        listen
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(listen.to_string()))
    }

    pub fn feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or(DEFAULT_FEED_URL)
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        positive_duration(
            "refresh_interval",
            self.refresh_interval
                .as_deref()
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
        )
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        positive_duration(
            "request_timeout",
            self.request_timeout
                .as_deref()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        )
    }

    pub fn max_feed_size(&self) -> u64 {
        self.max_feed_size.unwrap_or(DEFAULT_MAX_FEED_SIZE)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }

    pub fn refresh_enabled(&self) -> bool {
        self.refresh_enabled.unwrap_or(true)
    }

    /// Renders the default configuration as TOML.
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default_config())?)
    }
}

fn default_user_agent() -> String {
    format!("nvimsh/{}", env!("CARGO_PKG_VERSION"))
}

fn positive_duration(key: &'static str, value: &str) -> Result<Duration> {
    let millis = parse_duration(value)
        .and_then(|ms| u64::try_from(ms).ok())
        .filter(|&ms| ms > 0)
        .ok_or_else(|| {
            ConfigError::InvalidDuration {
                key,
                value: value.to_string(),
            }
        })?;
    Ok(Duration::from_millis(millis))
}
