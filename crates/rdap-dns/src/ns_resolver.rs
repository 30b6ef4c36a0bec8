use crate::config::Config;
use crate::resolver::{NameServers, Resolver, Result};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// How DNS queries will be resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResolveMethod {
    /// Resolve using the `/etc/resolv.conf` DNS configuration.
    System,
    /// Resolve using the Google `8.8.8.8` DNS service.
    Google,
    /// Resolve using the Cloudflare `1.1.1.1` DNS service.
    Cloudflare,
    /// Resolve using the Quad9 `9.9.9.9` DNS service.
    Quad9,
}

impl Display for ResolveMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Google => write!(f, "google"),
            Self::Cloudflare => write!(f, "cloudflare"),
            Self::Quad9 => write!(f, "quad9"),
        }
    }
}

/// A blocking name server resolver.
pub struct DnsResolver {
    inner: inner::DnsResolver,
}

impl DnsResolver {
    /// Create a new `DnsResolver`.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            inner: inner::DnsResolver::new(config)?,
        })
    }

    /// Get the `Config`.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.inner.config()
    }
}

impl Resolver for DnsResolver {
    fn lookup_ns(&self, name: impl AsRef<str>, timeout: Option<Duration>) -> Result<NameServers> {
        self.inner.lookup_ns(name.as_ref(), timeout)
    }
}

/// Private impl of resolver.
mod inner {
    use super::{Config, ResolveMethod};
    use crate::resolver::{Error, NameServers, Result};
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};
    use hickory_resolver::error::{ResolveError, ResolveErrorKind};
    use hickory_resolver::system_conf::read_system_conf;
    use hickory_resolver::Resolver;
    use std::time::Duration;
    use tracing::instrument;

    /// Resolver implementation.
    pub(super) struct DnsResolver {
        config: Config,
        resolver_config: ResolverConfig,
        options: ResolverOpts,
        resolver: Resolver,
    }

    impl DnsResolver {
        pub(super) fn new(config: Config) -> Result<Self> {
            let (resolver_config, mut options) = match config.resolve_method {
                ResolveMethod::System => read_system_conf()?,
                ResolveMethod::Google => (ResolverConfig::google(), ResolverOpts::default()),
                ResolveMethod::Cloudflare => {
                    (ResolverConfig::cloudflare(), ResolverOpts::default())
                }
                ResolveMethod::Quad9 => (ResolverConfig::quad9(), ResolverOpts::default()),
            };
            options.timeout = config.timeout;
            let resolver = Resolver::new(resolver_config.clone(), options.clone())?;
            Ok(Self {
                config,
                resolver_config,
                options,
                resolver,
            })
        }

        pub(super) const fn config(&self) -> &Config {
            &self.config
        }

        #[instrument(skip(self), level = "trace")]
        pub(super) fn lookup_ns(&self, name: &str, timeout: Option<Duration>) -> Result<NameServers> {
            let fqdn = to_fqdn(name);
            // the resolver timeout is fixed at creation and so a shorter caller timeout requires
            // a resolver of its own.
            let lookup = match timeout {
                Some(timeout) if timeout < self.options.timeout => {
                    let mut options = self.options.clone();
                    options.timeout = timeout;
                    Resolver::new(self.resolver_config.clone(), options)?.ns_lookup(fqdn.as_str())
                }
                _ => self.resolver.ns_lookup(fqdn.as_str()),
            };
            match lookup {
                Ok(ns) => {
                    let name_servers = ns.iter().map(ToString::to_string).collect::<Vec<_>>();
                    tracing::debug!(name, count = name_servers.len(), "ns lookup complete");
                    Ok(NameServers(name_servers))
                }
                Err(err) => resolve_error(name, err),
            }
        }
    }

    /// Map a `ResolveError` to an empty `NameServers` or an `Error`.
    fn resolve_error(name: &str, err: ResolveError) -> Result<NameServers> {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => {
                tracing::debug!(name, "no ns records found");
                Ok(NameServers::default())
            }
            ResolveErrorKind::Timeout => Err(Error::Timeout(name.to_string())),
            _ => Err(Error::LookupFailed(Box::new(err))),
        }
    }

    /// Make `name` fully qualified so that no search domains are applied.
    pub(super) fn to_fqdn(name: &str) -> String {
        format!("{}.", name.trim_end_matches('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::inner::to_fqdn;
    use super::*;
    use test_case::test_case;

    #[test_case("example.com", "example.com."; "relative name")]
    #[test_case("example.com.", "example.com."; "already fully qualified")]
    #[test_case("br", "br."; "top level domain")]
    fn test_to_fqdn(name: &str, expected: &str) {
        assert_eq!(expected, to_fqdn(name));
    }

    #[test_case(ResolveMethod::System, "system")]
    #[test_case(ResolveMethod::Google, "google")]
    #[test_case(ResolveMethod::Cloudflare, "cloudflare")]
    #[test_case(ResolveMethod::Quad9, "quad9")]
    fn test_resolve_method_display(method: ResolveMethod, expected: &str) {
        assert_eq!(expected, method.to_string());
    }
}
