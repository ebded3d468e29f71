pub mod analyzers;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod models;
pub mod openapi;

pub use analyzers::{CheckOptions, ComplianceChecker, SchemaMatchStrategy};
pub use discovery::RouteDiscovery;
pub use error::{ConfigError, ContractError, ParseError};
pub use logging::{init, init_default, init_from_args};
pub use models::{ApiDefinition, ComplianceReport, Endpoint, Issue, IssueType, Schema, Severity};
pub use openapi::OpenApiParser;
