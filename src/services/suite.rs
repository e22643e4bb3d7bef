use crate::domain::models::{CheckConfig, CheckInfo, CheckOutcome, SuiteReport, Violation};
use crate::fixture::Fixture;
use crate::services::contract_checks::{
    check_auth_contract, check_contract_consistency, check_deprecated_endpoint,
    check_path_versioning,
};
use crate::services::findings::CheckContext;
use crate::services::schema_checks::{
    check_field_relocation, check_response_schema, check_schema_evolution,
};

pub struct CheckDef {
    pub id: &'static str,
    pub rule: &'static str,
    pub run: fn(&CheckContext<'_>) -> Vec<Violation>,
}

/// Every check, in reporting order. Checks are independent of each other.
pub const CHECKS: &[CheckDef] = &[
    CheckDef {
        id: "deprecated_endpoint",
        rule: "Deprecated endpoints answer with the policy's stable error and migration guidance",
        run: check_deprecated_endpoint,
    },
    CheckDef {
        id: "auth_contract",
        rule: "The current endpoint requires bearer auth and samples send a bearer token",
        run: check_auth_contract,
    },
    CheckDef {
        id: "response_schema",
        rule: "The success sample conforms to the documented response schema",
        run: check_response_schema,
    },
    CheckDef {
        id: "field_relocation",
        rule: "Relocated fields appear at their new location and not at both",
        run: check_field_relocation,
    },
    CheckDef {
        id: "path_versioning",
        rule: "OpenAPI exposes the versioned path and not the deprecated one",
        run: check_path_versioning,
    },
    CheckDef {
        id: "contract_consistency",
        rule: "Every sample maps to a documented OpenAPI operation and status",
        run: check_contract_consistency,
    },
    CheckDef {
        id: "schema_evolution",
        rule: "Fields introduced by the new schema version are required and typed",
        run: check_schema_evolution,
    },
];

#[derive(thiserror::Error, Debug)]
pub enum SuiteError {
    #[error("unknown check: {0} (see `apicompat checks`)")]
    UnknownCheck(String),
}

pub fn list_checks() -> Vec<CheckInfo> {
    CHECKS
        .iter()
        .map(|c| CheckInfo {
            id: c.id.to_string(),
            rule: c.rule.to_string(),
        })
        .collect()
}

/// Resolves `--only` ids; an empty selection means every check.
pub fn select(only: &[String]) -> Result<Vec<&'static CheckDef>, SuiteError> {
    if only.is_empty() {
        return Ok(CHECKS.iter().collect());
    }
    for id in only {
        if !CHECKS.iter().any(|c| c.id == id) {
            return Err(SuiteError::UnknownCheck(id.clone()));
        }
    }
    Ok(CHECKS
        .iter()
        .filter(|c| only.iter().any(|o| o == c.id))
        .collect())
}

pub fn run_suite(
    fixture: &Fixture,
    config: &CheckConfig,
    only: &[String],
) -> Result<SuiteReport, SuiteError> {
    let selected = select(only)?;
    let ctx = CheckContext { fixture, config };

    let checks: Vec<CheckOutcome> = selected
        .into_iter()
        .map(|def| {
            let violations = (def.run)(&ctx);
            if violations.is_empty() {
                tracing::debug!(check = def.id, "check passed");
            } else {
                tracing::warn!(check = def.id, violations = violations.len(), "check failed");
            }
            CheckOutcome {
                id: def.id.to_string(),
                rule: def.rule.to_string(),
                passed: violations.is_empty(),
                violations,
            }
        })
        .collect();

    let passed_count = checks.iter().filter(|c| c.passed).count();
    let failed_count = checks.len() - passed_count;
    Ok(SuiteReport {
        fixture: fixture.path().display().to_string(),
        digest: fixture.digest().to_string(),
        datetime_mode: config.datetime_mode,
        checks,
        passed_count,
        failed_count,
        passed: failed_count == 0,
    })
}
