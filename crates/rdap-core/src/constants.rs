/// The media type of RDAP responses.
///
/// See [RFC 7480 section 4.2](https://www.rfc-editor.org/rfc/rfc7480#section-4.2).
pub const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// The generic JSON media type, also served by some RDAP servers.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// The media type requested for bootstrap registry documents.
///
/// See [RFC 9224 section 3](https://www.rfc-editor.org/rfc/rfc9224#section-3).
pub const BOOTSTRAP_MEDIA_TYPE: &str = JSON_MEDIA_TYPE;

/// The `Cache-Control` directive sent when a bootstrap registry must not be served from a cache.
pub const CACHE_RELOAD_DIRECTIVE: &str = "max-age=0";

/// The placeholder in a bootstrap URI template which is replaced by the bootstrap kind.
pub const BOOTSTRAP_KIND_PLACEHOLDER: &str = "{}";
