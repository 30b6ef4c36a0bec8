use crate::error::{Error, Result};
use ipnetwork::IpNetwork;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// The RDAP query type path segment.
///
/// See [RFC 9082 section 3.1](https://www.rfc-editor.org/rfc/rfc9082#section-3.1).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum QueryType {
    /// A domain name.
    Domain,
    /// A domain request ticket, an NIC.br extension.
    Ticket,
    /// An autonomous system number.
    Autnum,
    /// An IP address or IP network.
    Ip,
    /// An entity handle.
    Entity,
}

impl QueryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Ticket => "ticket",
            Self::Autnum => "autnum",
            Self::Ip => "ip",
            Self::Entity => "entity",
        }
    }
}

impl Display for QueryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of bootstrap registry consulted for a query.
///
/// See [RFC 9224](https://www.rfc-editor.org/rfc/rfc9224).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BootstrapKind {
    Dns,
    Asn,
    Ipv4,
    Ipv6,
}

impl BootstrapKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Asn => "asn",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        }
    }
}

impl Display for BootstrapKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The object being looked up.
///
/// The `Display` impl renders the key as it appears in the request path.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum QueryKey {
    /// A domain name in its ASCII compatible form.
    Domain(String),
    /// An autonomous system number.
    Autnum(u32),
    /// A single IP address.
    IpAddr(IpAddr),
    /// An IP network.
    IpNetwork(IpNetwork),
    /// An entity handle.
    Entity(String),
    /// A domain request ticket number.
    Ticket(u64),
}

impl QueryKey {
    /// A domain key, lower cased and converted to its ASCII compatible (punycode) form.
    pub fn domain(name: &str) -> Result<Self> {
        idna::domain_to_ascii(&name.to_lowercase())
            .map(Self::Domain)
            .map_err(|err| Error::InvalidQuery(format!("{name}: {err}")))
    }

    /// Determine the key for a free form object.
    ///
    /// The object is tried as an AS number, an IP address, an IP network and a domain name, in
    /// that order, and is otherwise taken to be an entity handle.
    #[must_use]
    pub fn detect(object: &str) -> Self {
        if let Some(asn) = parse_decimal(object) {
            return Self::Autnum(asn);
        }
        if let Ok(addr) = IpAddr::from_str(object) {
            return Self::IpAddr(addr);
        }
        if object.contains('/') {
            if let Ok(network) = IpNetwork::from_str(object) {
                return Self::IpNetwork(network);
            }
        }
        match Self::domain(object) {
            Ok(Self::Domain(name)) if is_fqdn(&name) => Self::Domain(name),
            _ => Self::Entity(object.to_string()),
        }
    }

    /// The query type path segment for this key.
    #[must_use]
    pub const fn query_type(&self) -> QueryType {
        match self {
            Self::Domain(_) => QueryType::Domain,
            Self::Autnum(_) => QueryType::Autnum,
            Self::IpAddr(_) | Self::IpNetwork(_) => QueryType::Ip,
            Self::Entity(_) => QueryType::Entity,
            Self::Ticket(_) => QueryType::Ticket,
        }
    }

    /// The bootstrap registry which covers this key, if any.
    ///
    /// Entities and tickets have no bootstrap registry.
    #[must_use]
    pub const fn bootstrap_kind(&self) -> Option<BootstrapKind> {
        match self {
            Self::Domain(_) => Some(BootstrapKind::Dns),
            Self::Autnum(_) => Some(BootstrapKind::Asn),
            Self::IpAddr(IpAddr::V4(_)) | Self::IpNetwork(IpNetwork::V4(_)) => {
                Some(BootstrapKind::Ipv4)
            }
            Self::IpAddr(IpAddr::V6(_)) | Self::IpNetwork(IpNetwork::V6(_)) => {
                Some(BootstrapKind::Ipv6)
            }
            Self::Entity(_) | Self::Ticket(_) => None,
        }
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(name) => write!(f, "{name}"),
            Self::Autnum(asn) => write!(f, "{asn}"),
            Self::IpAddr(addr) => write!(f, "{addr}"),
            Self::IpNetwork(network) => write!(f, "{}/{}", network.network(), network.prefix()),
            Self::Entity(handle) => write!(f, "{handle}"),
            Self::Ticket(ticket) => write!(f, "{ticket}"),
        }
    }
}

/// Does `name` look like a fully qualified domain name?
///
/// The name has at least one dot, every label is alphanumeric with inner hyphens and the top level
/// label is alphabetic or an IDNA `xn--` label.
fn is_fqdn(name: &str) -> bool {
    fn is_label(label: &str) -> bool {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    }
    fn is_top_level(label: &str) -> bool {
        if let Some(encoded) = label.strip_prefix("xn--") {
            !encoded.is_empty()
                && encoded
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        } else {
            !label.is_empty() && label.bytes().all(|b| b.is_ascii_lowercase())
        }
    }
    if !name.contains('.') {
        return false;
    }
    let name = name.strip_suffix('.').unwrap_or(name);
    match name.rsplit_once('.') {
        Some((labels, top_level)) => is_top_level(top_level) && labels.split('.').all(is_label),
        None => is_top_level(name),
    }
}

/// Parse an unsigned decimal made of ASCII digits only, a sign is not accepted.
pub(crate) fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    u32::from_str(text).ok()
}

/// The point in time by which a lookup must complete.
///
/// The remaining time is passed as the timeout of every network call made on behalf of a lookup.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Deadline(Instant);

impl Deadline {
    /// The longest timeout honoured, longer timeouts are clamped to this.
    const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

    /// A deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout.min(Self::MAX_TIMEOUT))
    }

    /// A deadline at `instant`.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// The time remaining before the deadline.
    pub fn remaining(&self) -> Result<Duration> {
        let remaining = self.0.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            Err(Error::DeadlineExceeded)
        } else {
            Ok(remaining)
        }
    }
}
