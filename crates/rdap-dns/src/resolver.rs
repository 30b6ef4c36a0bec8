use std::time::Duration;
use thiserror::Error;

/// A name server resolver.
pub trait Resolver {
    /// Perform a blocking NS lookup of `name` and return the name servers it is delegated to.
    ///
    /// A name which has no NS records resolves to an empty `NameServers`.
    ///
    /// If `timeout` is given and is shorter than the configured timeout then it bounds the lookup.
    fn lookup_ns(&self, name: impl AsRef<str>, timeout: Option<Duration>) -> Result<NameServers>;
}

/// A DNS resolver error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A DNS resolver error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("DNS lookup failed: {0}")]
    LookupFailed(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("DNS lookup of {0} timed out")]
    Timeout(String),
    #[error("failed to create resolver: {0}")]
    ResolverInit(#[from] std::io::Error),
    #[error("failed to read system DNS configuration: {0}")]
    SystemConfig(#[from] hickory_resolver::error::ResolveError),
}

/// The output of a successful NS lookup.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct NameServers(pub(super) Vec<String>);

impl NameServers {
    pub fn iter(&self) -> impl Iterator<Item = &'_ str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for NameServers {
    fn from(name_servers: Vec<String>) -> Self {
        Self(name_servers)
    }
}

impl IntoIterator for NameServers {
    type Item = String;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
