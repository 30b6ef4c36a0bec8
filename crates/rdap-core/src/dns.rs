use rdap_dns::{DnsResolver, Resolver};
use std::time::Duration;

/// Check whether a domain name is delegated in the DNS.
#[cfg_attr(test, mockall::automock)]
pub trait DelegationLookup {
    /// The number of name servers `name` is delegated to.
    fn lookup_delegation(&self, name: &str, timeout: Duration) -> rdap_dns::Result<usize>;
}

impl DelegationLookup for DnsResolver {
    fn lookup_delegation(&self, name: &str, timeout: Duration) -> rdap_dns::Result<usize> {
        self.lookup_ns(name, Some(timeout))
            .map(|name_servers| name_servers.len())
    }
}

/// A `DelegationLookup` which treats every name as undelegated.
///
/// This disables the refresh of a cached bootstrap registry which has no match for a domain.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoDelegationLookup;

impl DelegationLookup for NoDelegationLookup {
    fn lookup_delegation(&self, _name: &str, _timeout: Duration) -> rdap_dns::Result<usize> {
        Ok(0)
    }
}
