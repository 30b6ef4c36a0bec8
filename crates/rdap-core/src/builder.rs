use crate::client::Client;
use crate::config::Config;
use crate::constants::BOOTSTRAP_KIND_PLACEHOLDER;
use crate::dns::DelegationLookup;
use crate::error::{Error, Result};
use crate::http::{CacheDetector, HeaderCacheDetector, HttpClient};
use reqwest::header::HeaderValue;
use std::time::Duration;

/// Build an RDAP client.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use rdap_core::{Builder, ReqwestClient};
/// use rdap_dns::DnsResolver;
///
/// let dns = DnsResolver::new(rdap_dns::Config::default())?;
/// let client = Builder::new(ReqwestClient::new()?, dns).build()?;
/// let response = client.domain("registro.br")?;
/// println!("{}", response.json()?);
/// # Ok(())
/// # }
/// ```
///
/// Query a known server directly, bypassing the bootstrap registries:
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use rdap_core::{Builder, NoDelegationLookup, ReqwestClient};
///
/// let client = Builder::new(ReqwestClient::new()?, NoDelegationLookup)
///     .uris(vec![String::from("https://rdap.registro.br")])
///     .build()?;
/// let response = client.entity("XXXX")?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Client`] - An RDAP client.
pub struct Builder<H, D> {
    http: H,
    dns: D,
    bootstrap_template: String,
    bootstrap_version: String,
    user_agent: String,
    timeout: Duration,
    cache_detector: Box<dyn CacheDetector + Send + Sync>,
    uris: Vec<String>,
}

impl<H: HttpClient, D: DelegationLookup> Builder<H, D> {
    /// Build a client builder from an HTTP client and a DNS delegation lookup.
    ///
    /// The DNS lookup is used only to decide whether a cached domain bootstrap registry is stale.
    #[must_use]
    pub fn new(http: H, dns: D) -> Self {
        let config = Config::default();
        Self {
            http,
            dns,
            bootstrap_template: config.bootstrap_template,
            bootstrap_version: config.bootstrap_version,
            user_agent: config.user_agent,
            timeout: config.timeout,
            cache_detector: Box::new(HeaderCacheDetector::default()),
            uris: Vec::new(),
        }
    }

    /// Set the bootstrap registry URI template.
    ///
    /// The template must contain a `{}` placeholder which is replaced by the registry kind.
    #[must_use]
    pub fn bootstrap_template(self, bootstrap_template: impl Into<String>) -> Self {
        Self {
            bootstrap_template: bootstrap_template.into(),
            ..self
        }
    }

    /// Set the bootstrap registry version which is accepted.
    #[must_use]
    pub fn bootstrap_version(self, bootstrap_version: impl Into<String>) -> Self {
        Self {
            bootstrap_version: bootstrap_version.into(),
            ..self
        }
    }

    /// Set the `User-Agent` sent to RDAP servers.
    #[must_use]
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..self
        }
    }

    /// Set the default timeout for a lookup.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Set how responses served from a cache are recognised.
    ///
    /// The default expects an `X-From-Cache: 1` header.
    #[must_use]
    pub fn cache_detector(self, cache_detector: impl CacheDetector + Send + Sync + 'static) -> Self {
        Self {
            cache_detector: Box::new(cache_detector),
            ..self
        }
    }

    /// Set the URIs to query directly.
    ///
    /// When set the bootstrap registries are not used.
    #[must_use]
    pub fn uris(self, uris: Vec<String>) -> Self {
        Self { uris, ..self }
    }

    /// Build the client.
    pub fn build(self) -> Result<Client<H, D>> {
        if !self.bootstrap_template.contains(BOOTSTRAP_KIND_PLACEHOLDER) {
            return Err(Error::BadConfig(format!(
                "bootstrap_template {} has no {BOOTSTRAP_KIND_PLACEHOLDER} placeholder",
                self.bootstrap_template
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::BadConfig(String::from("timeout must not be zero")));
        }
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|err| Error::BadConfig(format!("user_agent {}: {err}", self.user_agent)))?;
        let config = Config {
            bootstrap_template: self.bootstrap_template,
            bootstrap_version: self.bootstrap_version,
            user_agent: self.user_agent,
            timeout: self.timeout,
        };
        Ok(Client::new(
            config,
            self.http,
            self.dns,
            self.cache_detector,
            user_agent,
            self.uris,
        ))
    }
}
