#![allow(clippy::needless_pass_by_value)]

use rdap_core::{
    Builder, DelegationLookup, Error, HttpClient, HttpRequest, HttpResponse, RdapResponse,
};
use reqwest::header::{HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use test_case::test_case;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

static TRACING: OnceLock<()> = OnceLock::new();

fn init_tracing() {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::NONE)
            .with_env_filter("scenario=info,rdap_core=debug")
            .with_test_writer()
            .init();
    });
}

macro_rules! scenario {
    ($path:expr) => {{
        let data = include_str!(concat!("resources/scenario/", $path));
        serde_json::from_str(data)?
    }};
}

#[test_case(scenario!("domain_match.json"))]
#[test_case(scenario!("domain_idna.json"))]
#[test_case(scenario!("asn_narrowest_range.json"))]
#[test_case(scenario!("ip_longest_prefix.json"))]
#[test_case(scenario!("ipv6_network.json"))]
#[test_case(scenario!("unsupported_version.json"))]
#[test_case(scenario!("bootstrap_unavailable.json"))]
#[test_case(scenario!("stale_cache_reload.json"))]
#[test_case(scenario!("stale_cache_undelegated.json"))]
#[test_case(scenario!("stale_cache_dns_failure.json"))]
#[test_case(scenario!("fresh_registry_miss.json"))]
#[test_case(scenario!("secure_endpoint_first.json"))]
#[test_case(scenario!("dispatch_not_found.json"))]
#[test_case(scenario!("dispatch_forbidden.json"))]
#[test_case(scenario!("dispatch_exhausted.json"))]
#[test_case(scenario!("dispatch_server_error_fail_over.json"))]
#[test_case(scenario!("entity_direct.json"))]
#[test_case(scenario!("entity_no_uris.json"))]
fn test_scenario(scenario: Scenario) -> anyhow::Result<()> {
    init_tracing();
    info!("start scenario {}", scenario.name);
    let log = Arc::new(Mutex::new(Vec::new()));
    let http = SimHttp {
        responses: scenario.responses.clone(),
        log: log.clone(),
    };
    let dns = SimDns {
        delegations: scenario.delegations.clone(),
    };
    let client = Builder::new(http, dns)
        .uris(scenario.uris.clone())
        .timeout(Duration::from_secs(10))
        .build()?;
    let result = client.query(&scenario.query);
    check_outcome(&scenario.expected, result)?;
    let requests = log.lock().unwrap().clone();
    assert_eq!(scenario.requests, requests, "scenario {}", scenario.name);
    info!("end scenario {}", scenario.name);
    Ok(())
}

fn check_outcome(
    expected: &Outcome,
    actual: rdap_core::Result<RdapResponse>,
) -> anyhow::Result<()> {
    match (expected, actual) {
        (Outcome::Endpoint(endpoint), Ok(response)) => assert_eq!(endpoint, &response.endpoint),
        (Outcome::NotFound(expected), Err(Error::NotFound { endpoint }))
        | (Outcome::Forbidden(expected), Err(Error::Forbidden { endpoint })) => {
            assert_eq!(expected, &endpoint);
        }
        (Outcome::Exhausted(count), Err(Error::Exhausted { errors, .. })) => {
            assert_eq!(*count, errors.len());
        }
        (Outcome::BootstrapStatus(status), Err(Error::BootstrapStatus(actual))) => {
            assert_eq!(*status, actual.as_u16());
        }
        (Outcome::NoMatch, Err(Error::NoMatch(_)))
        | (Outcome::NoEndpoints, Err(Error::NoEndpoints))
        | (Outcome::UnsupportedVersion, Err(Error::UnsupportedVersion { .. })) => {}
        (expected, actual) => anyhow::bail!("expected {expected:?} but got {actual:?}"),
    }
    Ok(())
}

/// A scripted lookup.
#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    /// The free form object looked up.
    query: String,
    /// Endpoints to query directly.
    #[serde(default)]
    uris: Vec<String>,
    /// The number of name servers for each delegated domain, others fail to resolve.
    #[serde(default)]
    delegations: HashMap<String, usize>,
    responses: Vec<SimResponse>,
    expected: Outcome,
    /// The requests expected in order, a cache bypassing request is prefixed with `reload`.
    requests: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SimResponse {
    url: String,
    #[serde(default)]
    reload: bool,
    #[serde(default)]
    cached: bool,
    status: u16,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    body: Option<serde_json::Value>,
    #[serde(default)]
    raw_body: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Endpoint(String),
    NotFound(String),
    Forbidden(String),
    Exhausted(usize),
    BootstrapStatus(u16),
    NoMatch,
    NoEndpoints,
    UnsupportedVersion,
}

/// An `HttpClient` which replays scripted responses.
///
/// A request with no scripted response fails as if the connection was refused.
struct SimHttp {
    responses: Vec<SimResponse>,
    log: Arc<Mutex<Vec<String>>>,
}

impl HttpClient for SimHttp {
    fn execute(&self, request: &HttpRequest) -> rdap_core::Result<HttpResponse> {
        let url = request.url.as_str();
        let reload = request.headers.contains_key(CACHE_CONTROL);
        self.log.lock().unwrap().push(if reload {
            format!("reload {url}")
        } else {
            url.to_string()
        });
        let Some(sim) = self
            .responses
            .iter()
            .find(|sim| sim.url == url && sim.reload == reload)
        else {
            return Err(Error::Transport(format!("connection refused: {url}").into()));
        };
        let mut response = HttpResponse::new(StatusCode::from_u16(sim.status).unwrap());
        if let Some(content_type) = &sim.content_type {
            response = response.with_header(
                CONTENT_TYPE,
                HeaderValue::from_str(content_type).unwrap(),
            );
        }
        if sim.cached {
            response = response.with_header(
                HeaderName::from_static("x-from-cache"),
                HeaderValue::from_static("1"),
            );
        }
        let body = match (&sim.body, &sim.raw_body) {
            (Some(json), _) => json.to_string().into_bytes(),
            (None, Some(raw)) => raw.clone().into_bytes(),
            (None, None) => Vec::new(),
        };
        Ok(response.with_body(body))
    }
}

/// A `DelegationLookup` backed by a fixed table.
struct SimDns {
    delegations: HashMap<String, usize>,
}

impl DelegationLookup for SimDns {
    fn lookup_delegation(&self, name: &str, _timeout: Duration) -> rdap_dns::Result<usize> {
        self.delegations
            .get(name)
            .copied()
            .ok_or_else(|| rdap_dns::Error::Timeout(name.to_string()))
    }
}
