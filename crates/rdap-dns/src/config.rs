use crate::ResolveMethod;
use std::time::Duration;

/// A builder for DNS `Config`.
///
/// # Example
///
/// Build a DNS `Config` which uses the Google public DNS service.
///
/// ```no_run
/// use rdap_dns::{Builder, ResolveMethod};
///
/// let config = Builder::new().resolve_method(ResolveMethod::Google).build();
/// ```
pub struct Builder {
    resolve_method: ResolveMethod,
    timeout: Duration,
}

impl Builder {
    /// Create a new `Builder`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolve_method: Config::default().resolve_method,
            timeout: Config::default().timeout,
        }
    }

    /// Set the method to use for DNS resolution.
    #[must_use]
    pub const fn resolve_method(self, resolve_method: ResolveMethod) -> Self {
        Self {
            resolve_method,
            ..self
        }
    }

    /// Set the timeout for DNS resolution.
    #[must_use]
    pub const fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Build the DNS `Config`.
    #[must_use]
    pub const fn build(self) -> Config {
        Config {
            resolve_method: self.resolve_method,
            timeout: self.timeout,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the `DnsResolver`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// The method to use for DNS resolution.
    pub resolve_method: ResolveMethod,
    /// The upper bound on the duration of a single lookup.
    ///
    /// A shorter per-lookup timeout may be supplied by the caller.
    pub timeout: Duration,
}

impl Config {
    /// Create a `Config`.
    #[must_use]
    pub const fn new(resolve_method: ResolveMethod, timeout: Duration) -> Self {
        Self {
            resolve_method,
            timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolve_method: ResolveMethod::System,
            timeout: Duration::from_millis(5000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_config_defaults() {
        assert_eq!(Config::default(), Builder::new().build());
    }

    #[test]
    fn test_builder_overrides() {
        let config = Builder::new()
            .resolve_method(ResolveMethod::Cloudflare)
            .timeout(Duration::from_secs(1))
            .build();
        assert_eq!(
            Config::new(ResolveMethod::Cloudflare, Duration::from_secs(1)),
            config
        );
    }
}
