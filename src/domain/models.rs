use crate::cli::DateTimeMode;
use crate::domain::constants::{
    DEFAULT_CURRENT_PATH, DEFAULT_DEPRECATED_PATH, DEFAULT_DEPRECATED_SAMPLE,
    DEFAULT_INTRODUCED_FIELDS, DEFAULT_REQUIRED_LINKS, DEFAULT_RESPONSE_SCHEMA,
    DEFAULT_SECURITY_SCHEME, DEFAULT_SUCCESS_SAMPLE, DEFAULT_TIMESTAMP_FIELDS,
};
use serde::{Deserialize, Serialize};

fn default_get() -> String {
    "GET".to_string()
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Knobs for the check suite. Every field defaults to the shape of the
/// reference fixture, so an absent config file means "check input.json as shipped".
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    #[serde(default)]
    pub datetime_mode: DateTimeMode,
    #[serde(default)]
    pub samples: SampleIds,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleIds {
    /// Sample that hits the removed endpoint.
    pub deprecated: String,
    /// Sample that calls the current endpoint successfully.
    pub success: String,
}

impl Default for SampleIds {
    fn default() -> Self {
        Self {
            deprecated: DEFAULT_DEPRECATED_SAMPLE.to_string(),
            success: DEFAULT_SUCCESS_SAMPLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    pub current: String,
    pub current_method: String,
    pub deprecated: String,
    pub deprecated_method: String,
    pub security_scheme: String,
    pub response_schema: String,
    pub required_links: Vec<String>,
    pub introduced_fields: Vec<String>,
    /// Properties that must be declared and observed as `date-time` strings.
    pub timestamp_fields: Vec<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            current: DEFAULT_CURRENT_PATH.to_string(),
            current_method: default_get(),
            deprecated: DEFAULT_DEPRECATED_PATH.to_string(),
            deprecated_method: default_get(),
            security_scheme: DEFAULT_SECURITY_SCHEME.to_string(),
            response_schema: DEFAULT_RESPONSE_SCHEMA.to_string(),
            required_links: DEFAULT_REQUIRED_LINKS.iter().map(|s| s.to_string()).collect(),
            introduced_fields: DEFAULT_INTRODUCED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timestamp_fields: DEFAULT_TIMESTAMP_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// One broken expectation, located in the fixture by a JSON path like
/// `$.observations.samples[1].response.status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub location: String,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub id: String,
    pub rule: String,
    pub passed: bool,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInfo {
    pub id: String,
    pub rule: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub fixture: String,
    pub digest: String,
    pub datetime_mode: DateTimeMode,
    pub checks: Vec<CheckOutcome>,
    pub passed_count: usize,
    pub failed_count: usize,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureSummary {
    pub fixture: String,
    pub digest: String,
    pub samples: usize,
    pub openapi_paths: usize,
    pub deprecated_endpoints: usize,
    pub client_code_lines: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
}
