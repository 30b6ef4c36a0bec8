use crate::bootstrap::BootstrapResolver;
use crate::config::Config;
use crate::dispatch::{Dispatcher, RdapResponse};
use crate::dns::DelegationLookup;
use crate::error::Result;
use crate::http::{CacheDetector, HttpClient};
use crate::request::RdapRequest;
use crate::types::{Deadline, QueryKey};
use ipnetwork::IpNetwork;
use reqwest::header::HeaderValue;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::net::IpAddr;
use tracing::instrument;

/// An RDAP client.
///
/// Without configured URIs the servers for a query are found from the bootstrap registries.  With
/// configured URIs those servers are queried directly, in order, for every lookup.  Entity and
/// ticket lookups have no bootstrap registry and always use the configured URIs.
///
/// Build a `Client` with a [`crate::Builder`].
pub struct Client<H, D> {
    config: Config,
    http: H,
    dns: D,
    cache_detector: Box<dyn CacheDetector + Send + Sync>,
    user_agent: HeaderValue,
    uris: Vec<String>,
}

impl<H, D> Debug for Client<H, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("uris", &self.uris)
            .finish_non_exhaustive()
    }
}

impl<H: HttpClient, D: DelegationLookup> Client<H, D> {
    pub(crate) fn new(
        config: Config,
        http: H,
        dns: D,
        cache_detector: Box<dyn CacheDetector + Send + Sync>,
        user_agent: HeaderValue,
        uris: Vec<String>,
    ) -> Self {
        Self {
            config,
            http,
            dns,
            cache_detector,
            user_agent,
            uris,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The URIs queried directly, if any.
    #[must_use]
    pub fn uris(&self) -> &[String] {
        &self.uris
    }

    /// Perform a lookup.
    ///
    /// The request timeout, or the configured timeout, bounds the whole lookup.
    #[instrument(skip(self), fields(key = %request.key()), level = "trace")]
    pub fn lookup(&self, request: &RdapRequest) -> Result<RdapResponse> {
        let deadline = Deadline::after(request.timeout().unwrap_or(self.config.timeout));
        let endpoints = self.endpoints(request.key(), deadline)?;
        Dispatcher::new(&self.http, &self.user_agent).dispatch(&endpoints, request, deadline)
    }

    /// The prioritized endpoints to query for `key`.
    pub fn endpoints(&self, key: &QueryKey, deadline: Deadline) -> Result<Cow<'_, [String]>> {
        if !self.uris.is_empty() || key.bootstrap_kind().is_none() {
            return Ok(Cow::Borrowed(&self.uris));
        }
        BootstrapResolver::new(
            &self.config,
            &self.http,
            &self.dns,
            self.cache_detector.as_ref(),
        )
        .resolve(key, deadline)
        .map(Cow::Owned)
    }

    /// Look up a domain name.
    ///
    /// The name is lower cased and converted to its ASCII compatible form.
    pub fn domain(&self, name: &str) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::domain(name)?))
    }

    /// Look up an autonomous system number.
    pub fn autnum(&self, asn: u32) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::Autnum(asn)))
    }

    /// Look up the network containing an IP address.
    pub fn ip(&self, addr: IpAddr) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::IpAddr(addr)))
    }

    /// Look up an IP network.
    pub fn ip_network(&self, network: IpNetwork) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::IpNetwork(network)))
    }

    pub fn entity(&self, handle: &str) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::Entity(handle.to_string())))
    }

    /// Look up a domain request ticket.
    pub fn ticket(&self, ticket: u64) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::Ticket(ticket)))
    }

    /// Look up a free form object, see [`QueryKey::detect`].
    pub fn query(&self, object: &str) -> Result<RdapResponse> {
        self.lookup(&RdapRequest::new(QueryKey::detect(object)))
    }
}

#[cfg(test)]
mod tests {
    use crate::dns::{MockDelegationLookup, NoDelegationLookup};
    use crate::error::Error;
    use crate::http::{HttpResponse, MockHttpClient};
    use crate::{Builder, QueryKey, RdapRequest};
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use reqwest::StatusCode;
    use std::net::IpAddr;
    use std::str::FromStr;
    use std::time::Duration;

    const DNS_REGISTRY: &str =
        r#"{"version":"1.0","services":[[["br"],["http://rdap.example.br/","https://rdap.example.br/"]]]}"#;

    fn rdap_ok(body: &'static str) -> HttpResponse {
        HttpResponse::new(StatusCode::OK)
            .with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/rdap+json"),
            )
            .with_body(body)
    }

    #[test]
    fn test_lookup_via_bootstrap() -> anyhow::Result<()> {
        let mut seq = mockall::Sequence::new();
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| request.url.as_str() == "https://data.iana.org/rdap/dns.json")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(StatusCode::OK).with_body(DNS_REGISTRY)));
        http.expect_execute()
            .withf(|request| request.url.as_str() == "https://rdap.example.br/domain/xn--exmple-cua.br")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rdap_ok(r#"{"ldhName":"xn--exmple-cua.br"}"#)));
        let client = Builder::new(http, MockDelegationLookup::new()).build()?;
        let response = client.domain("EXÄMPLE.br")?;
        assert_eq!("https://rdap.example.br", response.endpoint);
        Ok(())
    }

    #[test]
    fn test_direct_uris_skip_bootstrap() -> anyhow::Result<()> {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| request.url.as_str() == "https://rdap.example.net/autnum/64512")
            .times(1)
            .returning(|_| Ok(rdap_ok("{}")));
        let client = Builder::new(http, NoDelegationLookup)
            .uris(vec![String::from("https://rdap.example.net/")])
            .build()?;
        client.autnum(64512)?;
        Ok(())
    }

    #[test]
    fn test_entity_without_uris() -> anyhow::Result<()> {
        let client = Builder::new(MockHttpClient::new(), NoDelegationLookup).build()?;
        let err = client.entity("ABC123").unwrap_err();
        assert!(matches!(err, Error::NoEndpoints));
        Ok(())
    }

    #[test]
    fn test_ticket_uses_uris() -> anyhow::Result<()> {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| request.url.as_str() == "https://rdap.example.br/ticket/1234")
            .times(1)
            .returning(|_| Ok(rdap_ok("{}")));
        let client = Builder::new(http, NoDelegationLookup)
            .uris(vec![String::from("https://rdap.example.br")])
            .build()?;
        client.ticket(1234)?;
        Ok(())
    }

    #[test]
    fn test_query_detects_ip() -> anyhow::Result<()> {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| request.url.as_str() == "https://rdap.example.net/ip/192.0.2.1")
            .times(1)
            .returning(|_| Ok(rdap_ok("{}")));
        let client = Builder::new(http, NoDelegationLookup)
            .uris(vec![String::from("https://rdap.example.net")])
            .build()?;
        client.query("192.0.2.1")?;
        Ok(())
    }

    #[test]
    fn test_endpoints_for_direct_client() -> anyhow::Result<()> {
        let client = Builder::new(MockHttpClient::new(), NoDelegationLookup)
            .uris(vec![String::from("http://a"), String::from("https://b")])
            .build()?;
        let key = QueryKey::IpAddr(IpAddr::from_str("192.0.2.1")?);
        let endpoints = client.endpoints(&key, crate::Deadline::after(Duration::from_secs(1)))?;
        assert_eq!(&[String::from("http://a"), String::from("https://b")], &*endpoints);
        Ok(())
    }

    #[test]
    fn test_request_timeout_bounds_lookup() -> anyhow::Result<()> {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| request.timeout <= Duration::from_secs(2))
            .times(1)
            .returning(|_| Ok(rdap_ok("{}")));
        let client = Builder::new(http, NoDelegationLookup)
            .uris(vec![String::from("https://rdap.example.net")])
            .build()?;
        let request = RdapRequest::new(QueryKey::Autnum(1)).with_timeout(Duration::from_secs(2));
        client.lookup(&request)?;
        Ok(())
    }
}
