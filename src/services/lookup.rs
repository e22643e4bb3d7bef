use serde_json::Value;

pub fn find_sample<'a>(samples: &'a [Value], id: &str) -> Option<(usize, &'a Value)> {
    samples
        .iter()
        .enumerate()
        .find(|(_, s)| s["id"].as_str() == Some(id))
}

fn is_placeholder(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Segment-wise match of an OpenAPI path template against a concrete request path.
/// `{name}` matches exactly one non-empty segment.
pub fn template_matches(template: &str, path: &str) -> bool {
    let path = path.split_once('?').map(|(p, _)| p).unwrap_or(path);
    let tpl: Vec<&str> = template.split('/').collect();
    let concrete: Vec<&str> = path.split('/').collect();
    if tpl.len() != concrete.len() {
        return false;
    }
    tpl.iter().zip(concrete.iter()).all(|(t, c)| {
        if is_placeholder(t) {
            !c.is_empty()
        } else {
            t == c
        }
    })
}

/// Two templates describe the same route when literals agree and placeholders
/// line up, whatever the placeholders are called.
pub fn templates_equivalent(a: &str, b: &str) -> bool {
    let left: Vec<&str> = a.split('/').collect();
    let right: Vec<&str> = b.split('/').collect();
    left.len() == right.len()
        && left.iter().zip(right.iter()).all(|(l, r)| {
            (is_placeholder(l) && is_placeholder(r)) || (!is_placeholder(l) && l == r)
        })
}

/// The literal segments before the first placeholder: `/api/users/{id}` gives `/api/users`.
pub fn literal_prefix(template: &str) -> String {
    template
        .split('/')
        .take_while(|s| !is_placeholder(s))
        .collect::<Vec<_>>()
        .join("/")
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].bytes().all(|b| b.is_ascii_digit())
}

/// Leading segments up to and including the first `v<N>` segment, if any.
pub fn version_namespace(template: &str) -> Option<String> {
    let segments: Vec<&str> = template.split('/').collect();
    let end = segments.iter().position(|s| is_version_segment(s))?;
    Some(segments[..=end].join("/"))
}

/// Whether `path` is `prefix` itself or lies below it on a segment boundary.
pub fn under_prefix(path: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && path
            .strip_prefix(prefix)
            .map(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(false)
}

/// Walks a dotted path (`profile.about_me`). Absent if any step is missing or
/// lands on something other than an object.
pub fn lookup_path<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |cur, part| cur.as_object()?.get(part))
}

pub fn header<'a>(headers: &'a Value, name: &str) -> Option<&'a Value> {
    headers
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

/// Finds the `paths` key whose template matches `path`.
pub fn match_operation_path<'a>(openapi: &'a Value, path: &str) -> Option<&'a str> {
    openapi["paths"]
        .as_object()?
        .keys()
        .find(|tpl| template_matches(tpl, path))
        .map(String::as_str)
}

pub fn operation<'a>(openapi: &'a Value, path: &str, method: &str) -> Option<&'a Value> {
    openapi["paths"]
        .get(path)?
        .as_object()?
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(method))
        .map(|(_, op)| op)
}

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RefError {
    #[error("unsupported $ref {0} (only #/components/schemas/<Name> is resolved)")]
    NonLocal(String),
    #[error("$ref {0} points at no schema")]
    Dangling(String),
    #[error("$ref chain starting at {0} does not terminate")]
    Cycle(String),
}

/// Follows local `#/components/schemas/<Name>` references until a concrete schema.
pub fn resolve_ref<'a>(openapi: &'a Value, schema: &'a Value) -> Result<&'a Value, RefError> {
    let schemas = &openapi["components"]["schemas"];
    let mut cur = schema;
    let mut hops = 0usize;
    while let Some(r) = cur.get("$ref").and_then(Value::as_str) {
        let name = r
            .strip_prefix(SCHEMA_REF_PREFIX)
            .ok_or_else(|| RefError::NonLocal(r.to_string()))?;
        cur = schemas
            .get(name)
            .ok_or_else(|| RefError::Dangling(r.to_string()))?;
        hops += 1;
        if hops > 32 {
            return Err(RefError::Cycle(r.to_string()));
        }
    }
    Ok(cur)
}

/// Whether a schema declares a dotted property path, following `$ref`s along the way.
pub fn schema_declares(openapi: &Value, schema: &Value, dotted: &str) -> bool {
    let mut cur = schema;
    for part in dotted.split('.') {
        let resolved = match resolve_ref(openapi, cur) {
            Ok(s) => s,
            Err(_) => return false,
        };
        match resolved["properties"].get(part) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    true
}

pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `number` accepts integers too, as in JSON Schema.
pub fn has_json_type(v: &Value, ty: &str) -> bool {
    match ty {
        "number" => v.is_number(),
        "integer" => v.is_i64() || v.is_u64(),
        other => json_type_name(v) == other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_matches_single_segment_placeholder() {
        assert!(template_matches("/api/v2/users/{id}", "/api/v2/users/123"));
        assert!(template_matches("/api/v2/users/{id}", "/api/v2/users/123?expand=1"));
        assert!(!template_matches("/api/v2/users/{id}", "/api/v2/users/123/extra"));
        assert!(!template_matches("/api/v2/users/{id}", "/api/v2/users/"));
        assert!(!template_matches("/api/v2/users/{id}", "/api/users/123"));
    }

    #[test]
    fn literal_braces_are_not_placeholders() {
        assert!(!template_matches("/api/{}", "/api/x"));
        assert!(template_matches("/api/{}", "/api/{}"));
    }

    #[test]
    fn equivalent_templates_ignore_placeholder_names() {
        assert!(templates_equivalent("/api/users/{id}", "/api/users/{userId}"));
        assert!(!templates_equivalent("/api/users/{id}", "/api/v2/users/{id}"));
        assert!(!templates_equivalent("/api/users/{id}", "/api/users/me"));
    }

    #[test]
    fn prefixes_and_namespaces() {
        assert_eq!(literal_prefix("/api/users/{id}"), "/api/users");
        assert_eq!(literal_prefix("/{id}"), "");
        assert_eq!(version_namespace("/api/v2/users/{id}").as_deref(), Some("/api/v2"));
        assert_eq!(version_namespace("/api/users/{id}"), None);
        assert!(under_prefix("/api/users", "/api/users"));
        assert!(under_prefix("/api/users/{id}/followers", "/api/users"));
        assert!(!under_prefix("/api/usersettings", "/api/users"));
        assert!(!under_prefix("/api/users", ""));
    }

    #[test]
    fn lookup_path_walks_objects_only() {
        let body = json!({"profile": {"about_me": "hi"}, "tags": ["a"]});
        assert_eq!(lookup_path(&body, "profile.about_me"), Some(&json!("hi")));
        assert_eq!(lookup_path(&body, "profile.missing"), None);
        assert_eq!(lookup_path(&body, "tags.0"), None);
        assert_eq!(lookup_path(&body, "about_me"), None);
    }

    #[test]
    fn find_sample_returns_first_match_with_index() {
        let samples = vec![json!({"id": "a"}), json!({"id": "b", "n": 1}), json!({"id": "b", "n": 2})];
        let (idx, s) = find_sample(&samples, "b").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(s["n"], 1);
        assert!(find_sample(&samples, "c").is_none());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let h = json!({"authorization": "Bearer x"});
        assert_eq!(header(&h, "Authorization"), Some(&json!("Bearer x")));
        assert!(header(&json!(null), "Authorization").is_none());
    }

    #[test]
    fn resolve_ref_follows_chains_and_reports_dangling() {
        let openapi = json!({"components": {"schemas": {
            "A": {"$ref": "#/components/schemas/B"},
            "B": {"type": "object"},
            "Loop": {"$ref": "#/components/schemas/Loop"}
        }}});
        let s = json!({"$ref": "#/components/schemas/A"});
        assert_eq!(resolve_ref(&openapi, &s).unwrap(), &json!({"type": "object"}));

        let missing = json!({"$ref": "#/components/schemas/Nope"});
        assert!(matches!(resolve_ref(&openapi, &missing), Err(RefError::Dangling(_))));

        let remote = json!({"$ref": "https://example.com/s.json"});
        assert!(matches!(resolve_ref(&openapi, &remote), Err(RefError::NonLocal(_))));

        let looped = json!({"$ref": "#/components/schemas/Loop"});
        assert!(matches!(resolve_ref(&openapi, &looped), Err(RefError::Cycle(_))));
    }

    #[test]
    fn schema_declares_follows_refs() {
        let openapi = json!({"components": {"schemas": {
            "Profile": {"type": "object", "properties": {"about_me": {"type": "string"}}}
        }}});
        let schema = json!({"properties": {"profile": {"$ref": "#/components/schemas/Profile"}}});
        assert!(schema_declares(&openapi, &schema, "profile.about_me"));
        assert!(!schema_declares(&openapi, &schema, "profile.bio"));
    }

    #[test]
    fn type_names_distinguish_integers() {
        assert!(has_json_type(&json!(3), "integer"));
        assert!(has_json_type(&json!(3), "number"));
        assert!(!has_json_type(&json!(3.5), "integer"));
        assert_eq!(json_type_name(&json!(3.5)), "number");
    }
}
