use crate::analyzers::comparator::{CheckOptions, SchemaComparator, SchemaRole};
use crate::analyzers::matcher::find_match;
use crate::error::ContractError;
use crate::models::{ApiDefinition, Issue, IssueType, Severity};

/// Both sides of one comparison
pub struct CheckContext<'a> {
    pub spec: &'a ApiDefinition,
    pub implementation: &'a ApiDefinition,
    pub options: CheckOptions,
}

/// Trait for compliance rules
pub trait ComplianceRule: Send + Sync {
    /// Checks both sides and returns found issues in generation order
    fn check(&self, context: &CheckContext<'_>) -> Result<Vec<Issue>, ContractError>;

    /// Rule name
    fn name(&self) -> &str;
}

/// Spec endpoints without an implementation counterpart
pub struct MissingEndpointRule;

impl ComplianceRule for MissingEndpointRule {
    fn check(&self, context: &CheckContext<'_>) -> Result<Vec<Issue>, ContractError> {
        let issues = context
            .spec
            .endpoints()
            .iter()
            .filter(|endpoint| find_match(endpoint, context.implementation.endpoints()).is_none())
            .map(|endpoint| {
                Issue::new(
                    IssueType::MissingEndpoint,
                    Severity::Error,
                    format!("Missing endpoint: {}", endpoint.endpoint_key()),
                )
                .at(endpoint.method, endpoint.path.clone())
                .with_expected(endpoint.to_json())
                .with_suggestion(format!(
                    "Implement {} handler for {}",
                    endpoint.method, endpoint.path
                ))
            })
            .collect();

        Ok(issues)
    }

    fn name(&self) -> &str {
        "missing_endpoint"
    }
}

/// Implementation endpoints the spec does not declare
///
/// Always warnings: extra endpoints never break compliance.
pub struct ExtraEndpointRule;

impl ComplianceRule for ExtraEndpointRule {
    fn check(&self, context: &CheckContext<'_>) -> Result<Vec<Issue>, ContractError> {
        let issues = context
            .implementation
            .endpoints()
            .iter()
            .filter(|endpoint| find_match(endpoint, context.spec.endpoints()).is_none())
            .map(|endpoint| {
                Issue::new(
                    IssueType::ExtraEndpoint,
                    Severity::Warning,
                    format!("Extra endpoint not in spec: {}", endpoint.endpoint_key()),
                )
                .at(endpoint.method, endpoint.path.clone())
                .with_actual(endpoint.to_json())
                .with_suggestion("Add endpoint to OpenAPI spec or remove from implementation")
            })
            .collect();

        Ok(issues)
    }

    fn name(&self) -> &str {
        "extra_endpoint"
    }
}

/// Schema and required-field checks for every matched spec endpoint
///
/// The response schema is checked before the request schema.
pub struct SchemaComplianceRule;

impl ComplianceRule for SchemaComplianceRule {
    fn check(&self, context: &CheckContext<'_>) -> Result<Vec<Issue>, ContractError> {
        let comparator = SchemaComparator::new(context.implementation, context.options);
        let mut issues = Vec::new();

        for endpoint in context.spec.endpoints() {
            if find_match(endpoint, context.implementation.endpoints()).is_none() {
                continue;
            }

            if let Some(expected) = context.spec.response_schema_of(endpoint)? {
                issues.extend(comparator.compare(endpoint, SchemaRole::Response, expected));
            }
            if let Some(expected) = context.spec.request_schema_of(endpoint)? {
                issues.extend(comparator.compare(endpoint, SchemaRole::Request, expected));
            }
        }

        Ok(issues)
    }

    fn name(&self) -> &str {
        "schema_compliance"
    }
}
