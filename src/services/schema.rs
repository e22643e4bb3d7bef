use crate::domain::models::Violation;
use jsonschema::JSONSchema;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("schema does not compile: {0}")]
    Compile(String),
}

/// Attaches the OpenAPI `components` block to a schema fragment so local
/// `#/components/...` references inside it resolve against the new root.
pub fn with_components(schema: &Value, openapi: &Value) -> Value {
    let mut out = schema.clone();
    if let (Some(obj), Some(components)) = (out.as_object_mut(), openapi.get("components")) {
        obj.entry("components")
            .or_insert_with(|| components.clone());
    }
    out
}

fn pointer_to_location(base: &str, pointer: &str) -> String {
    let mut loc = base.to_string();
    for seg in pointer.split('/').filter(|s| !s.is_empty()) {
        let seg = seg.replace("~1", "/").replace("~0", "~");
        if seg.bytes().all(|b| b.is_ascii_digit()) {
            loc.push_str(&format!("[{seg}]"));
        } else {
            loc.push('.');
            loc.push_str(&seg);
        }
    }
    loc
}

/// Validates `instance` against `schema`, reporting each error at its location
/// below `base`.
pub fn violations(schema: &Value, instance: &Value, base: &str) -> Result<Vec<Violation>, SchemaError> {
    let compiled = JSONSchema::compile(schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
    let out = match compiled.validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|e| Violation {
                location: pointer_to_location(base, &e.instance_path.to_string()),
                expected: format!("schema conformance ({})", e.schema_path),
                actual: e.to_string(),
            })
            .collect(),
    };
    Ok(out)
}
