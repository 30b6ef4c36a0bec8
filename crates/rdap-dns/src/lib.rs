//! This crate provides a blocking name server (NS) resolver used to check
//! whether a domain name is delegated in the public DNS.
//!
//! The check is a cheap, independent second opinion: a caller holding a
//! possibly stale copy of some registry data can ask the DNS whether a name
//! has name servers before deciding to refresh that data.
//!
//! A lookup which finds no records is reported as an empty set of name
//! servers rather than an error.
//!
//! # Example
//!
//! The following example checks whether `example.com` is delegated using the
//! Cloudflare 1.1.1.1 public DNS service.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::time::Duration;
//! use rdap_dns::{Config, DnsResolver, ResolveMethod, Resolver};
//!
//! let config = Config::new(ResolveMethod::Cloudflare, Duration::from_secs(5));
//! let resolver = DnsResolver::new(config)?;
//! let name_servers = resolver.lookup_ns("example.com", None)?;
//! if name_servers.is_empty() {
//!     println!("example.com is not delegated");
//! } else {
//!     for ns in name_servers.iter() {
//!         println!("example.com is delegated to {ns}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod config;
mod ns_resolver;
mod resolver;

pub use config::{Builder, Config};
pub use ns_resolver::{DnsResolver, ResolveMethod};
pub use resolver::{Error, NameServers, Resolver, Result};
