//! Longest match of a query key against the services of a bootstrap registry.
//!
//! Each matcher scans every key of every service and keeps the endpoints of the single best
//! matching service.  A strictly better match replaces the current best and so ties are won by
//! the service seen first.  No match is an empty list of endpoints rather than an error.
use crate::error::{Error, Result};
use crate::registry::{RegistryDocument, ServiceEntry};
use crate::types::parse_decimal;
use ipnetwork::IpNetwork;
use std::cmp::Reverse;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Match a domain name against a DNS bootstrap registry.
///
/// The key with the greatest number of labels which is a label-wise suffix of the name wins.
///
/// See [RFC 9224 section 4](https://www.rfc-editor.org/rfc/rfc9224#section-4).
pub fn match_domain(registry: &RegistryDocument, name: &str) -> Result<Vec<String>> {
    let ascii = idna::domain_to_ascii(name)
        .map_err(|err| Error::InvalidQuery(format!("{name}: {err}")))?;
    let ascii = ascii.strip_suffix('.').unwrap_or(&ascii);
    let labels = ascii.split('.').collect::<Vec<_>>();
    best_match(registry, |key| {
        let key_labels = key.split('.').collect::<Vec<_>>();
        if key_labels.len() > labels.len() {
            return Ok(None);
        }
        let is_suffix = labels
            .iter()
            .rev()
            .zip(key_labels.iter().rev())
            .all(|(label, key_label)| label == key_label);
        Ok(is_suffix.then_some(key_labels.len()))
    })
}

/// Match an AS number against an ASN bootstrap registry.
///
/// Keys are inclusive ranges `begin-end` or a single AS number and the narrowest range which
/// contains `asn` wins.  A bound which is not a base-10 `u32` fails the whole match.
///
/// See [RFC 9224 section 5.3](https://www.rfc-editor.org/rfc/rfc9224#section-5.3).
pub fn match_asn(registry: &RegistryDocument, asn: u32) -> Result<Vec<String>> {
    best_match(registry, |key| {
        let (begin, end) = parse_as_range(key)?;
        if begin <= asn && asn <= end {
            Ok(Some(Reverse(u64::from(end) - u64::from(begin))))
        } else {
            Ok(None)
        }
    })
}

/// Match an IP address against an IPv4 or IPv6 bootstrap registry.
///
/// The key with the longest prefix which contains `addr` wins.  A key which is not a CIDR fails
/// the whole match.
///
/// See [RFC 9224 section 5.1](https://www.rfc-editor.org/rfc/rfc9224#section-5.1).
pub fn match_ip_addr(registry: &RegistryDocument, addr: IpAddr) -> Result<Vec<String>> {
    best_match(registry, |key| {
        let cidr = parse_cidr(key)?;
        Ok(cidr.contains(addr).then_some(cidr.prefix()))
    })
}

/// Match an IP network against an IPv4 or IPv6 bootstrap registry.
///
/// A key matches only if it contains both the first and the last address of `network`, a key
/// which merely overlaps `network` does not match.  The key with the longest prefix wins.
///
/// See [RFC 9224 section 5.1](https://www.rfc-editor.org/rfc/rfc9224#section-5.1).
pub fn match_ip_network(registry: &RegistryDocument, network: IpNetwork) -> Result<Vec<String>> {
    let (first, last) = bounds(network);
    best_match(registry, |key| {
        let cidr = parse_cidr(key)?;
        Ok((cidr.contains(first) && cidr.contains(last)).then_some(cidr.prefix()))
    })
}

/// Scan every key of every service and return the endpoints of the service with the highest
/// scoring key.
///
/// The `score` function returns `None` for a key which does not match.
fn best_match<S, F>(registry: &RegistryDocument, mut score: F) -> Result<Vec<String>>
where
    S: Ord,
    F: FnMut(&str) -> Result<Option<S>>,
{
    let mut best: Option<(S, &ServiceEntry)> = None;
    for service in registry.services() {
        for key in service.keys() {
            if let Some(candidate) = score(key)? {
                if best.as_ref().map_or(true, |(current, _)| candidate > *current) {
                    best = Some((candidate, service));
                }
            }
        }
    }
    Ok(best
        .map(|(_, service)| service.endpoints().to_vec())
        .unwrap_or_default())
}

fn parse_as_range(key: &str) -> Result<(u32, u32)> {
    let parse = |bound: &str| {
        parse_decimal(bound).ok_or_else(|| Error::InvalidAsRange(key.to_string()))
    };
    match key.split_once('-') {
        Some((begin, end)) => Ok((parse(begin)?, parse(end)?)),
        None => parse(key).map(|asn| (asn, asn)),
    }
}

fn parse_cidr(key: &str) -> Result<IpNetwork> {
    if !key.contains('/') {
        return Err(Error::InvalidCidr(key.to_string()));
    }
    IpNetwork::from_str(key).map_err(|_| Error::InvalidCidr(key.to_string()))
}

/// The first and last address of a network.
fn bounds(network: IpNetwork) -> (IpAddr, IpAddr) {
    match network {
        IpNetwork::V4(network) => {
            let mask = u32::MAX
                .checked_shl(32 - u32::from(network.prefix()))
                .unwrap_or(0);
            let first = u32::from(network.ip()) & mask;
            (
                IpAddr::V4(Ipv4Addr::from(first)),
                IpAddr::V4(Ipv4Addr::from(first | !mask)),
            )
        }
        IpNetwork::V6(network) => {
            let mask = u128::MAX
                .checked_shl(128 - u32::from(network.prefix()))
                .unwrap_or(0);
            let first = u128::from(network.ip()) & mask;
            (
                IpAddr::V6(Ipv6Addr::from(first)),
                IpAddr::V6(Ipv6Addr::from(first | !mask)),
            )
        }
    }
}
