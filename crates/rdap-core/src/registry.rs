use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An RDAP bootstrap service registry document.
///
/// A document is decoded from a single fetch and is not modified afterwards.
///
/// See [RFC 9224 section 3](https://www.rfc-editor.org/rfc/rfc9224#section-3).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RegistryDocument {
    version: String,
    publication: Option<DateTime<Utc>>,
    description: Option<String>,
    services: Vec<ServiceEntry>,
}

/// A single service of a bootstrap registry, a set of keys and the endpoints which serve them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ServiceEntry {
    keys: Vec<String>,
    endpoints: Vec<String>,
}

/// The bootstrap document as it appears on the wire.
#[derive(Debug, Deserialize)]
struct WireRegistry {
    version: String,
    #[serde(default)]
    publication: Option<DateTime<Utc>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    services: Vec<(Vec<String>, Vec<String>)>,
}

/// Only the version of the bootstrap document, checked before the remainder is decoded.
#[derive(Debug, Deserialize)]
struct WireVersion {
    version: String,
}

impl RegistryDocument {
    #[must_use]
    pub fn new(version: impl Into<String>, services: Vec<ServiceEntry>) -> Self {
        Self {
            version: version.into(),
            publication: None,
            description: None,
            services,
        }
    }

    /// Decode a bootstrap registry document from JSON.
    ///
    /// The document `version` must equal `expected_version`.  The version is checked before the
    /// services are decoded so that a document of an unknown version is always reported as such.
    pub fn from_slice(json: &[u8], expected_version: &str) -> Result<Self> {
        let WireVersion { version } = serde_json::from_slice(json)?;
        if version != expected_version {
            return Err(Error::UnsupportedVersion {
                found: version,
                expected: expected_version.to_string(),
            });
        }
        let wire = serde_json::from_slice::<WireRegistry>(json)?;
        Ok(Self {
            version: wire.version,
            publication: wire.publication,
            description: wire.description,
            services: wire
                .services
                .into_iter()
                .map(|(keys, endpoints)| ServiceEntry::new(keys, endpoints))
                .collect(),
        })
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn publication(&self) -> Option<DateTime<Utc>> {
        self.publication
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The services in document order.
    #[must_use]
    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }
}

impl ServiceEntry {
    /// Create a `ServiceEntry`, trailing slashes are removed from each endpoint.
    #[must_use]
    pub fn new(keys: Vec<String>, endpoints: Vec<String>) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .collect();
        Self { keys, endpoints }
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IANA_DNS: &str = r#"{
      "version": "1.0",
      "publication": "2024-05-07T20:00:02Z",
      "description": "RDAP bootstrap file for Domain Name System registrations",
      "services": [
        [["br"], ["https://rdap.registro.br/"]],
        [["com", "net"], ["https://rdap.verisign.com/com/v1/", "http://rdap.verisign.com/com/v1"]]
      ]
    }"#;

    #[test]
    fn test_decode() -> anyhow::Result<()> {
        let doc = RegistryDocument::from_slice(IANA_DNS.as_bytes(), "1.0")?;
        assert_eq!("1.0", doc.version());
        assert_eq!(
            Some(DateTime::parse_from_rfc3339("2024-05-07T20:00:02Z")?.with_timezone(&Utc)),
            doc.publication()
        );
        assert_eq!(
            Some("RDAP bootstrap file for Domain Name System registrations"),
            doc.description()
        );
        assert_eq!(2, doc.services().len());
        assert_eq!(["br"], doc.services()[0].keys());
        assert_eq!(["https://rdap.registro.br"], doc.services()[0].endpoints());
        assert_eq!(["com", "net"], doc.services()[1].keys());
        assert_eq!(
            [
                "https://rdap.verisign.com/com/v1",
                "http://rdap.verisign.com/com/v1"
            ],
            doc.services()[1].endpoints()
        );
        Ok(())
    }

    #[test]
    fn test_decode_minimal() -> anyhow::Result<()> {
        let json = r#"{"version":"1.0","services":[[["br"],["https://rdap-domain.example.br"]]]}"#;
        let doc = RegistryDocument::from_slice(json.as_bytes(), "1.0")?;
        assert_eq!(None, doc.publication());
        assert_eq!(None, doc.description());
        assert_eq!(["https://rdap-domain.example.br"], doc.services()[0].endpoints());
        Ok(())
    }

    #[test]
    fn test_unsupported_version() {
        let json = r#"{"version":"2.0","services":{"unknown":"layout"}}"#;
        let err = RegistryDocument::from_slice(json.as_bytes(), "1.0").unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion { found, expected } if found == "2.0" && expected == "1.0"
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = RegistryDocument::from_slice(b"<html>", "1.0").unwrap_err();
        assert!(matches!(err, Error::RegistryDecode(_)));
    }

    #[test]
    fn test_malformed_service() {
        let json = r#"{"version":"1.0","services":[["br"]]}"#;
        let err = RegistryDocument::from_slice(json.as_bytes(), "1.0").unwrap_err();
        assert!(matches!(err, Error::RegistryDecode(_)));
    }
}
