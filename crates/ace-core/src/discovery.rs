use crate::models::ApiDefinition;
use std::path::Path;

/// Source-level route discovery for one framework
///
/// Implementations turn a service source tree into the implementation-side
/// [`ApiDefinition`]. The checker only depends on the returned definition.
pub trait RouteDiscovery {
    /// Framework name, for logs and reports
    fn framework(&self) -> &str;

    /// Discovers every endpoint and schema under `source`
    fn discover(&self, source: &Path) -> anyhow::Result<ApiDefinition>;
}
