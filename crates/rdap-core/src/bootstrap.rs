use crate::config::Config;
use crate::constants::{BOOTSTRAP_MEDIA_TYPE, CACHE_RELOAD_DIRECTIVE};
use crate::dns::DelegationLookup;
use crate::error::{Error, Result};
use crate::http::{CacheDetector, HttpClient, HttpRequest};
use crate::matcher::{match_asn, match_domain, match_ip_addr, match_ip_network};
use crate::prioritize::prioritize;
use crate::registry::RegistryDocument;
use crate::types::{Deadline, QueryKey};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::{StatusCode, Url};
use tracing::instrument;

/// Resolve the RDAP servers responsible for a query key from a bootstrap registry.
///
/// All state is scoped to a single call of [`BootstrapResolver::resolve`].
pub struct BootstrapResolver<'a, H, D> {
    config: &'a Config,
    http: &'a H,
    dns: &'a D,
    cache_detector: &'a dyn CacheDetector,
}

/// A decoded bootstrap registry and whether it was served from a cache.
struct Fetched {
    registry: RegistryDocument,
    cached: bool,
}

impl<'a, H: HttpClient, D: DelegationLookup> BootstrapResolver<'a, H, D> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        http: &'a H,
        dns: &'a D,
        cache_detector: &'a dyn CacheDetector,
    ) -> Self {
        Self {
            config,
            http,
            dns,
            cache_detector,
        }
    }

    /// Resolve the prioritized endpoints for `key`.
    ///
    /// A domain with no match in a cached registry is checked for delegation in the DNS and, if
    /// delegated, the registry is fetched again bypassing the cache and matched once more.  The
    /// second match is final.
    #[instrument(skip(self, key, deadline), fields(key = %key), level = "trace")]
    pub fn resolve(&self, key: &QueryKey, deadline: Deadline) -> Result<Vec<String>> {
        let kind = key.bootstrap_kind().ok_or_else(|| {
            Error::InvalidQuery(format!(
                "no bootstrap registry for {} queries",
                key.query_type()
            ))
        })?;
        let uri = self.config.bootstrap_uri(kind);
        let fetched = self.fetch(&uri, false, deadline)?;
        let mut endpoints = match_key(&fetched.registry, key)?;
        if endpoints.is_empty() && fetched.cached {
            if let QueryKey::Domain(name) = key {
                if self.is_delegated(name, deadline) {
                    tracing::debug!(%key, "cached registry has no match for a delegated domain");
                    let reloaded = self.fetch(&uri, true, deadline)?;
                    endpoints = match_key(&reloaded.registry, key)?;
                }
            }
        }
        if endpoints.is_empty() {
            return Err(Error::NoMatch(key.to_string()));
        }
        prioritize(&mut endpoints);
        tracing::debug!(%key, ?endpoints);
        Ok(endpoints)
    }

    /// Fetch and decode a bootstrap registry, optionally refusing a cached response.
    #[instrument(skip(self, deadline), level = "trace")]
    fn fetch(&self, uri: &str, reload: bool, deadline: Deadline) -> Result<Fetched> {
        let url = Url::parse(uri).map_err(|err| Error::InvalidUri(format!("{uri}: {err}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BOOTSTRAP_MEDIA_TYPE));
        if reload {
            headers.insert(
                CACHE_CONTROL,
                HeaderValue::from_static(CACHE_RELOAD_DIRECTIVE),
            );
        }
        let request = HttpRequest {
            url,
            headers,
            timeout: deadline.remaining()?,
        };
        let response = self.http.execute(&request)?;
        let cached = self.cache_detector.is_cached(&response);
        tracing::debug!(uri, status = %response.status, cached, "bootstrap registry fetched");
        if !response.status.is_success() && response.status != StatusCode::NOT_MODIFIED {
            return Err(Error::BootstrapStatus(response.status));
        }
        let registry = RegistryDocument::from_slice(&response.body, &self.config.bootstrap_version)?;
        Ok(Fetched { registry, cached })
    }

    /// Does the DNS have name servers for `name`?
    ///
    /// A failed lookup is treated as not delegated.
    fn is_delegated(&self, name: &str, deadline: Deadline) -> bool {
        let Ok(timeout) = deadline.remaining() else {
            return false;
        };
        match self.dns.lookup_delegation(name, timeout) {
            Ok(count) => {
                tracing::debug!(name, count, "delegation check");
                count > 0
            }
            Err(err) => {
                tracing::debug!(name, %err, "delegation check failed");
                false
            }
        }
    }
}

/// Run the matcher for the kind of `key`.
fn match_key(registry: &RegistryDocument, key: &QueryKey) -> Result<Vec<String>> {
    match key {
        QueryKey::Domain(name) => match_domain(registry, name),
        QueryKey::Autnum(asn) => match_asn(registry, *asn),
        QueryKey::IpAddr(addr) => match_ip_addr(registry, *addr),
        QueryKey::IpNetwork(network) => match_ip_network(registry, *network),
        QueryKey::Entity(_) | QueryKey::Ticket(_) => Ok(Vec::new()),
    }
}
