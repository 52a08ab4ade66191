//! Schema validation with rich diagnostics

use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::EntityPrefix;
use crate::schema::registry::SchemaRegistry;

/// A single schema violation inside a file
#[derive(Debug, Error, Diagnostic)]
#[error("{location}: {message}")]
#[diagnostic(code(plat::schema::violation))]
pub struct SchemaViolation {
    /// JSON pointer to the offending value ("/" for the document root)
    pub location: String,
    pub message: String,
}

/// All schema violations found in one file
#[derive(Debug, Error, Diagnostic)]
#[error("{filename} failed schema validation")]
#[diagnostic(
    code(plat::schema::invalid),
    help("fix the fields listed below, or run `plat <entity> show` on a healthy file to compare")
)]
pub struct SchemaViolations {
    pub filename: String,

    #[related]
    violations: Vec<SchemaViolation>,
}

impl SchemaViolations {
    fn single(filename: &str, message: String) -> Self {
        Self {
            filename: filename.to_string(),
            violations: vec![SchemaViolation {
                location: "/".to_string(),
                message,
            }],
        }
    }

    /// Number of individual violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Validates entity files against the embedded schemas
///
/// Schemas are compiled once up front; entity types whose schema fails to
/// compile are treated as having no schema.
pub struct Validator {
    compiled: HashMap<EntityPrefix, jsonschema::Validator>,
}

impl Validator {
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for prefix in EntityPrefix::all() {
            if let Some(schema) = registry.get(*prefix) {
                if let Ok(validator) = jsonschema::validator_for(schema) {
                    compiled.insert(*prefix, validator);
                }
            }
        }

        Self { compiled }
    }

    /// Validate YAML content against the schema for this entity type
    ///
    /// Content that is not valid YAML reports as a single root violation.
    /// Entity types without a schema pass trivially.
    pub fn iter_errors(
        &self,
        content: &str,
        filename: &str,
        prefix: EntityPrefix,
    ) -> Result<(), SchemaViolations> {
        let Some(validator) = self.compiled.get(&prefix) else {
            return Ok(());
        };

        let instance: serde_json::Value = match serde_yml::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                return Err(SchemaViolations::single(
                    filename,
                    format!("not valid YAML: {}", e),
                ));
            }
        };

        let violations: Vec<SchemaViolation> = validator
            .iter_errors(&instance)
            .map(|error| {
                let pointer = error.instance_path.to_string();
                SchemaViolation {
                    location: if pointer.is_empty() {
                        "/".to_string()
                    } else {
                        pointer
                    },
                    message: error.to_string(),
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolations {
                filename: filename.to_string(),
                violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        // Keep the registry local; the compiled validators are self-contained
        Validator::new(&SchemaRegistry::new())
    }

    #[test]
    fn test_valid_deal_passes() {
        let content = r#"
id: DEAL-01KDGJC92W6EBFGZ5SJW6MFGW6
title: "Riverside Flats"
stage: prospecting
estimated_value: 1200000.0
created: "2024-01-01T00:00:00Z"
author: test
"#;
        let result = validator().iter_errors(content, "deal.plat.yaml", EntityPrefix::Deal);
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_title_is_one_violation() {
        let content = r#"
id: DEAL-01KDGJC92W6EBFGZ5SJW6MFGW6
created: "2024-01-01T00:00:00Z"
author: test
"#;
        let err = validator()
            .iter_errors(content, "deal.plat.yaml", EntityPrefix::Deal)
            .unwrap_err();
        assert_eq!(err.violation_count(), 1);
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        let content = r#"
id: DEAL-01KDGJC92W6EBFGZ5SJW6MFGW6
title: "Riverside Flats"
stage: negotiating
created: "2024-01-01T00:00:00Z"
author: test
"#;
        let err = validator()
            .iter_errors(content, "deal.plat.yaml", EntityPrefix::Deal)
            .unwrap_err();
        assert!(err.violation_count() >= 1);
        assert!(err.violations[0].location.contains("stage"));
    }

    #[test]
    fn test_broken_yaml_reports_root_violation() {
        let content = "title: [unclosed";
        let err = validator()
            .iter_errors(content, "deal.plat.yaml", EntityPrefix::Deal)
            .unwrap_err();
        assert_eq!(err.violation_count(), 1);
        assert_eq!(err.violations[0].location, "/");
    }

    #[test]
    fn test_task_status_enum_enforced() {
        let content = r#"
id: TASK-01KDGJC92W6EBFGZ5SJW6MFGW6
title: "Order phase one survey"
status: someday
created: "2024-01-01T00:00:00Z"
author: test
"#;
        let err = validator()
            .iter_errors(content, "task.plat.yaml", EntityPrefix::Task)
            .unwrap_err();
        assert!(err.violation_count() >= 1);
    }
}
