/// Order endpoints so that those using a secure transport are tried first.
///
/// This is a stable partition, the relative order of secure endpoints and of insecure endpoints
/// is preserved.
pub fn prioritize(endpoints: &mut [String]) {
    endpoints.sort_by_key(|endpoint| !is_secure(endpoint));
}

/// Does the endpoint use the `https` scheme?
fn is_secure(endpoint: &str) -> bool {
    endpoint
        .split_once(':')
        .is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case("https"))
}
