//! An RDAP bootstrap resolver and client.
//!
//! The Registration Data Access Protocol (RDAP) has no single server.  The
//! server responsible for a domain name, autonomous system number or IP
//! address is found from the IANA bootstrap registries, described in
//! [RFC 9224](https://www.rfc-editor.org/rfc/rfc9224), and the lookup is then
//! sent to each of those servers in turn until one answers.
//!
//! This crate provides:
//!
//! - decoding of bootstrap registry documents, see [`RegistryDocument`]
//! - longest match of a query against a registry, see [`match_domain`],
//!   [`match_asn`], [`match_ip_addr`] and [`match_ip_network`]
//! - ordering of endpoints such that secure endpoints are tried first, see
//!   [`prioritize`]
//! - recovery from a stale cached domain registry, confirmed by a DNS
//!   delegation check, see [`BootstrapResolver`]
//! - dispatch of a lookup with fail-over, see [`Dispatcher`]
//!
//! The HTTP transport and the DNS are supplied by the caller, see
//! [`HttpClient`] and [`DelegationLookup`].  An HTTP cache may be placed in
//! front of the transport, a [`CacheDetector`] tells the resolver whether a
//! response was served from it.
//!
//! # Example
//!
//! The following example looks up a domain using the IANA bootstrap
//! registries:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use rdap_core::{Builder, ReqwestClient};
//! use rdap_dns::DnsResolver;
//!
//! let dns = DnsResolver::new(rdap_dns::Config::default())?;
//! let client = Builder::new(ReqwestClient::new()?, dns).build()?;
//! let response = client.query("registro.br")?;
//! println!("{} answered {}", response.endpoint, response.json()?);
//! # Ok(())
//! # }
//! ```
//!
//! The following example resolves the servers for an IP network without
//! performing the lookup:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::str::FromStr;
//! # use std::time::Duration;
//! use rdap_core::{
//!     BootstrapResolver, Config, Deadline, NoCache, NoDelegationLookup, QueryKey, ReqwestClient,
//! };
//!
//! let config = Config::default();
//! let http = ReqwestClient::new()?;
//! let resolver = BootstrapResolver::new(&config, &http, &NoDelegationLookup, &NoCache);
//! let key = QueryKey::IpNetwork(ipnetwork::IpNetwork::from_str("200.160.0.0/20")?);
//! for endpoint in resolver.resolve(&key, Deadline::after(Duration::from_secs(10)))? {
//!     println!("{endpoint}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Client`].
//! - [`Client::lookup`] - Perform a lookup.
//! - [`Client::query`] - Perform a lookup of a free form object.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::use_self
)]
#![deny(unsafe_code)]

mod bootstrap;
mod builder;
mod client;
mod config;
mod constants;
mod dispatch;
mod dns;
mod error;
mod http;
mod matcher;
mod prioritize;
mod registry;
mod request;
mod types;

pub use bootstrap::BootstrapResolver;
pub use builder::Builder;
pub use client::Client;
pub use config::{defaults, Config};
pub use constants::{BOOTSTRAP_MEDIA_TYPE, RDAP_MEDIA_TYPE};
pub use dispatch::{Dispatcher, RdapResponse};
pub use dns::{DelegationLookup, NoDelegationLookup};
pub use error::{Error, RdapError, Result};
pub use http::{
    CacheDetector, HeaderCacheDetector, HttpClient, HttpRequest, HttpResponse, NoCache,
    ReqwestClient,
};
pub use matcher::{match_asn, match_domain, match_ip_addr, match_ip_network};
pub use prioritize::prioritize;
pub use registry::{RegistryDocument, ServiceEntry};
pub use request::RdapRequest;
pub use types::{BootstrapKind, Deadline, QueryKey, QueryType};
