use crate::domain::models::{CheckConfig, Violation};
use crate::fixture::Fixture;
use crate::services::lookup::find_sample;
use serde_json::Value;

/// Everything a check may read. Borrowed for the whole run; nothing is mutated.
pub struct CheckContext<'a> {
    pub fixture: &'a Fixture,
    pub config: &'a CheckConfig,
}

#[derive(Debug, Default)]
pub struct Findings {
    violations: Vec<Violation>,
}

impl Findings {
    pub fn push(
        &mut self,
        location: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) {
        self.violations.push(Violation {
            location: location.into(),
            expected: expected.into(),
            actual: actual.into(),
        });
    }

    pub fn extend(&mut self, more: Vec<Violation>) {
        self.violations.extend(more);
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

const MAX_RENDERED: usize = 160;

/// Compact rendering of a value for diagnostics; `absent` when there is nothing there.
pub fn render(v: Option<&Value>) -> String {
    match v {
        None => "absent".to_string(),
        Some(v) => {
            let s = v.to_string();
            if s.chars().count() > MAX_RENDERED {
                let cut: String = s.chars().take(MAX_RENDERED).collect();
                format!("{cut}…")
            } else {
                s
            }
        }
    }
}

pub fn sample_loc(idx: usize) -> String {
    format!("$.observations.samples[{idx}]")
}

pub fn rule_loc(idx: usize) -> String {
    format!("$.compat_policy.deprecated_endpoints[{idx}]")
}

pub fn path_loc(template: &str) -> String {
    format!("$.server.openapi.paths[\"{template}\"]")
}

pub fn schema_loc(name: &str) -> String {
    format!("$.server.openapi.components.schemas.{name}")
}

/// Appends a dotted field path to a base location.
pub fn join_loc(base: &str, dotted: &str) -> String {
    format!("{base}.{dotted}")
}

/// Looks up a sample by configured id, recording a violation when it is absent.
pub fn require_sample<'a>(
    samples: &'a [Value],
    id: &str,
    findings: &mut Findings,
) -> Option<(usize, &'a Value)> {
    let found = find_sample(samples, id);
    if found.is_none() {
        findings.push(
            "$.observations.samples",
            format!("a sample with id {id:?}"),
            "absent",
        );
    }
    found
}

pub fn request_method(sample: &Value) -> &str {
    sample["request"]["method"].as_str().unwrap_or("GET")
}

pub fn str_list(v: &Value) -> Option<Vec<&str>> {
    v.as_array()?.iter().map(Value::as_str).collect()
}
