use crate::constants::{JSON_MEDIA_TYPE, RDAP_MEDIA_TYPE};
use crate::error::{Error, RdapError, Result};
use crate::http::{HttpClient, HttpRequest};
use crate::request::RdapRequest;
use crate::types::Deadline;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use std::borrow::Cow;
use tracing::instrument;

/// A successful response from an RDAP server.
///
/// The body is returned as received.
#[derive(Debug, Clone)]
pub struct RdapResponse {
    /// The endpoint which answered.
    pub endpoint: String,
    /// The full request URL.
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RdapResponse {
    /// Decode the body as a JSON value.
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).map_err(Error::ResponseBody)
    }
}

/// Issue an RDAP request against an ordered list of endpoints.
pub struct Dispatcher<'a, H> {
    http: &'a H,
    user_agent: &'a HeaderValue,
}

impl<'a, H: HttpClient> Dispatcher<'a, H> {
    #[must_use]
    pub const fn new(http: &'a H, user_agent: &'a HeaderValue) -> Self {
        Self { http, user_agent }
    }

    /// Try each endpoint in order and return the first response.
    ///
    /// A not found or forbidden response ends the dispatch, as does an expired deadline.  Any other
    /// failure moves on to the next endpoint and, if all endpoints fail, every failure is reported.
    /// A deadline which expires after an endpoint has failed is reported along with those failures.
    #[instrument(skip_all, fields(path = %request.path()), level = "trace")]
    pub fn dispatch(
        &self,
        endpoints: &[String],
        request: &RdapRequest,
        deadline: Deadline,
    ) -> Result<RdapResponse> {
        if endpoints.is_empty() {
            return Err(Error::NoEndpoints);
        }
        let mut errors = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            match self.fetch(endpoint, request, deadline) {
                Ok(response) => return Ok(response),
                Err(Error::DeadlineExceeded) if !errors.is_empty() => {
                    tracing::debug!(endpoint, "deadline exceeded");
                    errors.push((endpoint.clone(), Error::DeadlineExceeded));
                    break;
                }
                Err(err) if err.is_definitive() => {
                    tracing::debug!(endpoint, %err, "endpoint answered");
                    return Err(err);
                }
                Err(err) => {
                    tracing::debug!(endpoint, %err, "endpoint failed");
                    errors.push((endpoint.clone(), err));
                }
            }
        }
        Err(Error::Exhausted {
            key: request.key().to_string(),
            errors,
        })
    }

    #[instrument(skip(self, request, deadline), level = "trace")]
    fn fetch(
        &self,
        endpoint: &str,
        request: &RdapRequest,
        deadline: Deadline,
    ) -> Result<RdapResponse> {
        let url = endpoint_url(endpoint, request)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(RDAP_MEDIA_TYPE));
        headers.insert(USER_AGENT, self.user_agent.clone());
        for (name, value) in request.headers() {
            headers.append(name, value.clone());
        }
        let response = self.http.execute(&HttpRequest {
            url: url.clone(),
            headers,
            timeout: deadline.remaining()?,
        })?;
        tracing::debug!(%url, status = %response.status);
        match response.status {
            StatusCode::NOT_FOUND => {
                return Err(Error::NotFound {
                    endpoint: endpoint.to_string(),
                })
            }
            StatusCode::FORBIDDEN => {
                return Err(Error::Forbidden {
                    endpoint: endpoint.to_string(),
                })
            }
            _ => {}
        }
        let content_type = media_type(&response.headers);
        if !is_json(&content_type) {
            return Err(Error::UnexpectedResponse {
                status: response.status,
                content_type,
            });
        }
        if response.status != StatusCode::OK {
            let err =
                serde_json::from_slice::<RdapError>(&response.body).map_err(Error::ErrorBody)?;
            return Err(Error::Server(err));
        }
        Ok(RdapResponse {
            endpoint: endpoint.to_string(),
            url,
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

/// Build the request URL for `endpoint`.
///
/// An endpoint without a scheme is taken to be `http`, any query string it carries is dropped, as
/// are trailing slashes.  The path segments are escaped, such that a key is never read as a query
/// or a fragment.
fn endpoint_url(endpoint: &str, request: &RdapRequest) -> Result<Url> {
    let base = if endpoint.contains("://") {
        Cow::Borrowed(endpoint)
    } else {
        Cow::Owned(format!("http://{endpoint}"))
    };
    let base = base
        .split_once('?')
        .map_or(&*base, |(base, _)| base)
        .trim_end_matches('/');
    let mut url = Url::parse(base).map_err(|err| Error::InvalidUri(format!("{base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUri(format!("{base}: cannot be a base")))?
        .pop_if_empty()
        .extend(request.path_segments());
    if !request.query().is_empty() {
        url.query_pairs_mut().extend_pairs(request.query());
    }
    Ok(url)
}

/// The lower cased media type of a response, without parameters.
fn media_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

fn is_json(media_type: &str) -> bool {
    media_type == RDAP_MEDIA_TYPE || media_type == JSON_MEDIA_TYPE
}
