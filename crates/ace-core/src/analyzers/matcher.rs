use crate::analyzers::normalizer::{normalize_path, normalized_key};
use crate::models::Endpoint;
use indexmap::IndexMap;
use tracing::debug;

/// Same method and same normalized path
pub fn endpoints_match(a: &Endpoint, b: &Endpoint) -> bool {
    a.method == b.method && normalize_path(&a.path) == normalize_path(&b.path)
}

/// First candidate matching `endpoint`, in iteration order
///
/// Full scan. When several candidates share the normalized key, the
/// first-declared one wins.
pub fn find_match<'a>(endpoint: &Endpoint, candidates: &'a [Endpoint]) -> Option<&'a Endpoint> {
    let found = candidates.iter().find(|c| endpoints_match(endpoint, c));
    match found {
        Some(candidate) => debug!(
            endpoint = %endpoint.endpoint_key(),
            matched = %candidate.endpoint_key(),
            "Endpoint matched"
        ),
        None => debug!(endpoint = %endpoint.endpoint_key(), "No matching endpoint"),
    }
    found
}

/// Normalized keys declared more than once, with their original endpoint keys
pub fn duplicate_keys(endpoints: &[Endpoint]) -> IndexMap<String, Vec<String>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for endpoint in endpoints {
        groups
            .entry(normalized_key(endpoint.method, &endpoint.path))
            .or_default()
            .push(endpoint.endpoint_key());
    }
    groups.retain(|_, keys| keys.len() > 1);
    groups
}
