use crate::analyzers::comparator::CheckOptions;
use crate::analyzers::matcher::{duplicate_keys, find_match};
use crate::analyzers::rules::{
    CheckContext, ComplianceRule, ExtraEndpointRule, MissingEndpointRule, SchemaComplianceRule,
};
use crate::error::ContractError;
use crate::models::{ApiDefinition, ComplianceReport, Endpoint};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Compliance checker - compares an implementation against its API contract
///
/// Holds no state between runs; each [`check`](Self::check) builds a fresh
/// report from the two definitions.
pub struct ComplianceChecker<'a> {
    spec: &'a ApiDefinition,
    implementation: &'a ApiDefinition,
    options: CheckOptions,
    rules: Vec<Box<dyn ComplianceRule>>,
}

impl<'a> ComplianceChecker<'a> {
    /// Creates a checker with the default rules
    pub fn new(spec: &'a ApiDefinition, implementation: &'a ApiDefinition) -> Self {
        let mut checker = Self {
            spec,
            implementation,
            options: CheckOptions::default(),
            rules: Vec::new(),
        };

        // Rule order is issue order in the report
        checker.add_rule(Box::new(MissingEndpointRule));
        checker.add_rule(Box::new(ExtraEndpointRule));
        checker.add_rule(Box::new(SchemaComplianceRule));

        checker
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds a rule after the default ones
    pub fn add_rule(&mut self, rule: Box<dyn ComplianceRule>) {
        self.rules.push(rule);
    }

    /// Runs every rule and builds the report
    ///
    /// Fails only when the spec side references a schema it does not define.
    pub fn check(&self) -> Result<ComplianceReport, ContractError> {
        self.validate_spec()?;

        let duplicates = duplicate_keys(self.implementation.endpoints());
        for (key, endpoints) in &duplicates {
            warn!(
                key = %key,
                endpoints = ?endpoints,
                "Duplicate implementation routes, first declared is used"
            );
        }

        let context = CheckContext {
            spec: self.spec,
            implementation: self.implementation,
            options: self.options,
        };

        let mut issues = Vec::new();
        for rule in &self.rules {
            let found = rule.check(&context)?;
            debug!(rule = rule.name(), issues = found.len(), "Rule finished");
            issues.extend(found);
        }

        let missing: HashSet<String> = self
            .missing_endpoints()
            .into_iter()
            .map(Endpoint::endpoint_key)
            .collect();
        let total_spec_endpoints = self.spec.endpoints().len();

        let report = ComplianceReport {
            spec_title: self.spec.title.clone(),
            spec_version: self.spec.version.clone(),
            total_spec_endpoints,
            total_impl_endpoints: self.implementation.endpoints().len(),
            compliant_endpoints: total_spec_endpoints.saturating_sub(missing.len()),
            issues,
        };

        info!(
            spec = %report.spec_title,
            compliance = report.compliance_percentage(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Compliance check finished"
        );

        Ok(report)
    }

    /// Spec endpoints with no implementation counterpart
    pub fn missing_endpoints(&self) -> Vec<&'a Endpoint> {
        let implemented = self.implementation.endpoints();
        self.spec
            .endpoints()
            .iter()
            .filter(|endpoint| find_match(endpoint, implemented).is_none())
            .collect()
    }

    fn validate_spec(&self) -> Result<(), ContractError> {
        for endpoint in self.spec.endpoints() {
            self.spec.request_schema_of(endpoint)?;
            self.spec.response_schema_of(endpoint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, FieldType, HttpMethod, IssueType, Schema, Severity};

    fn definition(endpoints: Vec<Endpoint>, schemas: Vec<Schema>) -> ApiDefinition {
        let mut definition = ApiDefinition::new("User Management API", "1.0.0");
        for endpoint in endpoints {
            definition.add_endpoint(endpoint);
        }
        for schema in schemas {
            definition.add_schema(schema).unwrap();
        }
        definition
    }

    #[test]
    fn test_issue_order_is_missing_extra_schema() {
        let user = Schema::new(
            "User",
            "",
            vec![Field::new("email", FieldType::String).required(true)],
        );
        let spec = definition(
            vec![
                Endpoint::new(HttpMethod::Get, "/users/{id}").with_response_schema("User"),
                Endpoint::new(HttpMethod::Delete, "/users/{id}"),
            ],
            vec![user],
        );
        let implementation = definition(
            vec![
                Endpoint::new(HttpMethod::Get, "/health"),
                Endpoint::new(HttpMethod::Get, "/users/{user_id}"),
            ],
            vec![Schema::new("User", "", Vec::new())],
        );

        let report = ComplianceChecker::new(&spec, &implementation).check().unwrap();
        let kinds: Vec<IssueType> = report.issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(
            kinds,
            vec![
                IssueType::MissingEndpoint,
                IssueType::ExtraEndpoint,
                IssueType::MissingField
            ]
        );
        assert_eq!(report.compliant_endpoints, 1);
    }

    #[test]
    fn test_empty_implementation_reports_every_endpoint_missing() {
        let spec = definition(
            vec![
                Endpoint::new(HttpMethod::Get, "/users"),
                Endpoint::new(HttpMethod::Post, "/users"),
            ],
            Vec::new(),
        );
        let implementation = ApiDefinition::default();

        let report = ComplianceChecker::new(&spec, &implementation).check().unwrap();
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.compliant_endpoints, 0);
        assert_eq!(report.compliance_percentage(), 0.0);
    }

    #[test]
    fn test_duplicate_spec_keys_count_once() {
        let spec = definition(
            vec![
                Endpoint::new(HttpMethod::Get, "/items"),
                Endpoint::new(HttpMethod::Get, "/items"),
                Endpoint::new(HttpMethod::Get, "/other"),
            ],
            Vec::new(),
        );
        let implementation = definition(vec![Endpoint::new(HttpMethod::Get, "/other")], Vec::new());

        let report = ComplianceChecker::new(&spec, &implementation).check().unwrap();
        assert_eq!(report.missing_endpoints().len(), 2);
        assert_eq!(report.compliant_endpoints, 2);
    }

    #[test]
    fn test_unresolved_spec_schema_fails_fast() {
        let spec = definition(
            vec![Endpoint::new(HttpMethod::Post, "/users").with_request_schema("UserCreate")],
            Vec::new(),
        );
        let implementation = ApiDefinition::default();

        let err = ComplianceChecker::new(&spec, &implementation)
            .check()
            .unwrap_err();
        assert!(matches!(err, ContractError::UnresolvedSchema { .. }));
    }

    #[test]
    fn test_extra_endpoints_only_warn() {
        let spec = definition(vec![Endpoint::new(HttpMethod::Get, "/users")], Vec::new());
        let implementation = definition(
            vec![
                Endpoint::new(HttpMethod::Get, "/users"),
                Endpoint::new(HttpMethod::Get, "/metrics"),
            ],
            Vec::new(),
        );

        let report = ComplianceChecker::new(&spec, &implementation).check().unwrap();
        assert!(report.is_compliant());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Warning);
        assert_eq!(
            report.issues[0].message,
            "Extra endpoint not in spec: GET /metrics"
        );
    }
}
