use crate::constants::BOOTSTRAP_KIND_PLACEHOLDER;
use crate::BootstrapKind;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default bootstrap registry URI template.
    ///
    /// The `{}` placeholder is replaced by one of `dns`, `asn`, `ipv4` or `ipv6`.
    pub const DEFAULT_BOOTSTRAP_TEMPLATE: &str = "https://data.iana.org/rdap/{}.json";

    /// The only bootstrap registry version supported.
    ///
    /// See [RFC 9224 section 10.2](https://www.rfc-editor.org/rfc/rfc9224#section-10.2).
    pub const DEFAULT_BOOTSTRAP_VERSION: &str = "1.0";

    /// The default value for the `User-Agent` header.
    pub const DEFAULT_USER_AGENT: &str = concat!("rdap-core/", env!("CARGO_PKG_VERSION"));

    /// The default deadline for a lookup when the caller does not supply one.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Client configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    /// The bootstrap registry URI template.
    pub bootstrap_template: String,
    /// The bootstrap registry version which is accepted.
    pub bootstrap_version: String,
    /// The `User-Agent` sent to RDAP servers.
    pub user_agent: String,
    /// The deadline applied to a lookup when the caller does not supply one.
    pub timeout: Duration,
}

impl Config {
    /// The bootstrap registry URI for a `BootstrapKind`.
    #[must_use]
    pub fn bootstrap_uri(&self, kind: BootstrapKind) -> String {
        self.bootstrap_template
            .replace(BOOTSTRAP_KIND_PLACEHOLDER, kind.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bootstrap_template: String::from(defaults::DEFAULT_BOOTSTRAP_TEMPLATE),
            bootstrap_version: String::from(defaults::DEFAULT_BOOTSTRAP_VERSION),
            user_agent: String::from(defaults::DEFAULT_USER_AGENT),
            timeout: defaults::DEFAULT_TIMEOUT,
        }
    }
}
