use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(nvimsh_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(nvimsh_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(nvimsh_config::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error("Invalid duration for `{key}`: {value}")]
    #[diagnostic(
        code(nvimsh_config::invalid_duration),
        help("Use a combination of days, hours, minutes and seconds, e.g. `1h` or `1d12h30m`")
    )]
    InvalidDuration { key: &'static str, value: String },

    #[error("Invalid feed URL: {0}")]
    #[diagnostic(
        code(nvimsh_config::invalid_feed_url),
        help("Ensure the URL is valid and uses http or https")
    )]
    InvalidFeedUrl(String),

    #[error("Invalid listen address: {0}")]
    #[diagnostic(
        code(nvimsh_config::invalid_listen),
        help("Use a socket address such as `0.0.0.0:8080` or `127.0.0.1:3000`")
    )]
    InvalidListenAddress(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            ConfigError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
