use crate::domain::models::{CheckConfig, Violation};
use crate::fixture::parse_fixture;
use crate::services::findings::CheckContext;
use serde_json::Value;
use std::path::Path;

pub fn reference_doc() -> Value {
    serde_json::from_str(include_str!("../../input.json")).expect("reference fixture parses")
}

pub fn with_doc(
    doc: Value,
    config: &CheckConfig,
    check: fn(&CheckContext<'_>) -> Vec<Violation>,
) -> Vec<Violation> {
    let fixture = parse_fixture(Path::new("input.json"), doc.to_string().as_bytes())
        .expect("fixture has the required shape");
    check(&CheckContext {
        fixture: &fixture,
        config,
    })
}
