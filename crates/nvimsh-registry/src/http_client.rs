use std::time::Duration;

use tracing::debug;
use ureq::Agent;
use url::Url;

use crate::{
    error::{RegistryError, Result},
    feed::FeedSource,
};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    pub max_body_size: u64,
}

impl Default for ClientConfig {
    /// Creates a default ClientConfig.
    ///
    /// The default identifies as `nvimsh/<version>`, bounds every request to
    /// 30 seconds and accepts bodies up to 64 MiB.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvimsh_registry::ClientConfig;
    ///
    /// let cfg = ClientConfig::default();
    /// assert!(cfg.user_agent.as_deref().unwrap().starts_with("nvimsh/"));
    /// assert_eq!(cfg.timeout, Some(std::time::Duration::from_secs(30)));
    /// ```
    fn default() -> Self {
        Self {
            user_agent: Some(format!("nvimsh/{}", env!("CARGO_PKG_VERSION"))),
            timeout: Some(Duration::from_secs(30)),
            max_body_size: 64 * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    /// Builds an HTTP `Agent` configured from this `ClientConfig`.
    ///
    /// The timeout applies to the whole request, connect through body, so a
    /// stalled upstream cannot hold a refresh cycle open.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder().timeout_global(self.timeout);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

/// Fetches the plugin database over HTTP(S).
pub struct HttpFeed {
    url: String,
    agent: Agent,
    max_body_size: u64,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let url = url.into();
        Url::parse(&url).map_err(|err| RegistryError::InvalidUrl(format!("{url}: {err}")))?;

        Ok(Self {
            url,
            agent: config.build(),
            max_body_size: config.max_body_size,
        })
    }
}

impl FeedSource for HttpFeed {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Fetching plugin feed from {}", self.url);

        let mut resp = self
            .agent
            .get(self.url.as_str())
            .call()
            .map_err(|err| RegistryError::FetchFailed(format!("{} [{err}]", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::FetchFailed(format!(
                "{} [{status}]",
                self.url
            )));
        }

        let body = resp
            .body_mut()
            .with_config()
            .limit(self.max_body_size)
            .read_to_vec()
            .map_err(|err| RegistryError::Body(err.to_string()))?;

        debug!(bytes = body.len(), "fetched plugin feed");
        Ok(body)
    }
}
