pub mod comparator;
pub mod contract;
pub mod matcher;
pub mod normalizer;
pub mod rules;

pub use comparator::{compare_fields, CheckOptions, SchemaComparator, SchemaMatchStrategy, SchemaRole};
pub use contract::ComplianceChecker;
pub use matcher::{duplicate_keys, endpoints_match, find_match};
pub use normalizer::{normalize_path, normalized_key, PARAM_TOKEN};
pub use rules::{
    CheckContext, ComplianceRule, ExtraEndpointRule, MissingEndpointRule, SchemaComplianceRule,
};
