use crate::types::QueryKey;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// An RDAP lookup.
///
/// Extra headers and query parameters are passed to every endpoint tried, unmodified.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RdapRequest {
    key: QueryKey,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl RdapRequest {
    #[must_use]
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            headers: HeaderMap::new(),
            query: Vec::new(),
            timeout: None,
        }
    }

    /// Add a header, such as a forwarded client address, to the request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Add a query string parameter to the request.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Bound the whole lookup, bootstrap included, by `timeout`.
    ///
    /// Without this the client default is used.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The request path below an endpoint, `{type}/{key}`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.key.query_type(), self.key)
    }

    /// The unescaped segments of [`RdapRequest::path`].
    ///
    /// A network contributes two segments, its address and its prefix length.
    #[must_use]
    pub fn path_segments(&self) -> Vec<String> {
        let mut segments = vec![self.key.query_type().to_string()];
        match &self.key {
            QueryKey::IpNetwork(network) => {
                segments.push(network.network().to_string());
                segments.push(network.prefix().to_string());
            }
            key => segments.push(key.to_string()),
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipnetwork::IpNetwork;
    use std::str::FromStr;
    use test_case::test_case;

    #[test_case(QueryKey::Domain(String::from("example.br")), "domain/example.br"; "domain")]
    #[test_case(QueryKey::Autnum(64512), "autnum/64512"; "autnum")]
    #[test_case(QueryKey::IpNetwork(IpNetwork::from_str("192.0.2.7/24").unwrap()), "ip/192.0.2.0/24"; "network")]
    #[test_case(QueryKey::Entity(String::from("ABC123")), "entity/ABC123"; "entity")]
    #[test_case(QueryKey::Ticket(42), "ticket/42"; "ticket")]
    fn test_path(key: QueryKey, expected: &str) {
        assert_eq!(expected, RdapRequest::new(key).path());
    }

    #[test_case(QueryKey::Domain(String::from("example.br")), &["domain", "example.br"]; "domain")]
    #[test_case(QueryKey::IpNetwork(IpNetwork::from_str("2001:db8:1::/48").unwrap()), &["ip", "2001:db8:1::", "48"]; "network")]
    #[test_case(QueryKey::Entity(String::from("a/b")), &["entity", "a/b"]; "entity with slash")]
    fn test_path_segments(key: QueryKey, expected: &[&str]) {
        assert_eq!(expected, RdapRequest::new(key).path_segments());
    }

    #[test]
    fn test_builder_methods() {
        let request = RdapRequest::new(QueryKey::Autnum(1))
            .with_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("192.0.2.1"),
            )
            .with_query_param("ticket", "7")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(
            Some(&HeaderValue::from_static("192.0.2.1")),
            request.headers().get("x-forwarded-for")
        );
        assert_eq!(
            &[(String::from("ticket"), String::from("7"))],
            request.query()
        );
        assert_eq!(Some(Duration::from_secs(3)), request.timeout());
    }
}
