//! Checks over the relationship between the compat policy, the OpenAPI
//! document and the observed samples: deprecated-endpoint behavior, auth,
//! path versioning, and sample/OpenAPI agreement.

use crate::domain::constants::STABLE_ERROR_BEHAVIOR;
use crate::domain::models::Violation;
use crate::services::findings::{
    join_loc, path_loc, render, request_method, require_sample, rule_loc, sample_loc, str_list,
    CheckContext, Findings,
};
use crate::services::lookup::{
    header, literal_prefix, match_operation_path, operation, template_matches,
    templates_equivalent, under_prefix, version_namespace,
};
use crate::services::schema;
use serde_json::Value;

/// Whether an observed sample exercises a deprecated endpoint rule.
pub fn rule_covers(rule: &Value, sample: &Value) -> bool {
    let Some(rule_path) = rule["path"].as_str() else {
        return false;
    };
    let Some(path) = sample["request"]["path"].as_str() else {
        return false;
    };
    let rule_method = rule["method"].as_str().unwrap_or("GET");
    template_matches(rule_path, path) && rule_method.eq_ignore_ascii_case(request_method(sample))
}

/// `Bearer <token>`: case-sensitive prefix, then a non-empty token without whitespace.
pub fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}

pub fn check_deprecated_endpoint(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let samples = ctx.fixture.samples();
    let rules = ctx.fixture.deprecated_endpoints();
    if rules.is_empty() {
        f.push(
            "$.compat_policy.deprecated_endpoints",
            "at least one deprecated endpoint rule",
            render(ctx.fixture.compat_policy().get("deprecated_endpoints")),
        );
        return f.into_violations();
    }

    if let Some((idx, sample)) = require_sample(samples, &ctx.config.samples.deprecated, &mut f) {
        if !rules.iter().any(|r| rule_covers(r, sample)) {
            f.push(
                join_loc(&sample_loc(idx), "request"),
                "a request to a deprecated endpoint listed in compat_policy",
                format!(
                    "{} {}",
                    request_method(sample),
                    render(sample["request"].get("path"))
                ),
            );
        }
    }

    for (ri, rule) in rules.iter().enumerate() {
        let loc = rule_loc(ri);
        let Some(rule_path) = rule["path"].as_str() else {
            f.push(join_loc(&loc, "path"), "a path template", render(rule.get("path")));
            continue;
        };
        if rule["behavior"].as_str() != Some(STABLE_ERROR_BEHAVIOR) {
            f.push(
                join_loc(&loc, "behavior"),
                format!("{STABLE_ERROR_BEHAVIOR:?}"),
                render(rule.get("behavior")),
            );
        }
        if str_list(&rule["message_must_contain"]).is_none() {
            f.push(
                join_loc(&loc, "message_must_contain"),
                "a list of migration hints",
                render(rule.get("message_must_contain")),
            );
        }
        let Some(expected_status) = rule["expected_status"].as_u64() else {
            f.push(
                join_loc(&loc, "expected_status"),
                "an HTTP status code",
                render(rule.get("expected_status")),
            );
            continue;
        };

        let covered: Vec<(usize, &Value)> = samples
            .iter()
            .enumerate()
            .filter(|(_, s)| rule_covers(rule, s))
            .collect();
        if covered.is_empty() {
            f.push(
                loc.clone(),
                format!(
                    "an observed sample exercising {} {rule_path}",
                    rule["method"].as_str().unwrap_or("GET")
                ),
                "none",
            );
            continue;
        }
        for (si, sample) in covered {
            check_deprecated_sample(rule, &loc, expected_status, si, sample, &mut f);
        }
    }
    f.into_violations()
}

fn check_deprecated_sample(
    rule: &Value,
    rule_base: &str,
    expected_status: u64,
    idx: usize,
    sample: &Value,
    f: &mut Findings,
) {
    let base = join_loc(&sample_loc(idx), "response");
    let status = &sample["response"]["status"];
    if status.as_u64() != Some(expected_status) {
        f.push(
            join_loc(&base, "status"),
            expected_status.to_string(),
            render(sample["response"].get("status")),
        );
    }

    let body_loc = join_loc(&base, "body");
    let body = &sample["response"]["body"];
    if !body.is_object() {
        f.push(body_loc, "an error object", render(sample["response"].get("body")));
        return;
    }

    let before = f.len();
    let error_schema = &rule["expected_error_schema"];
    match str_list(&error_schema["required"]) {
        Some(required) => {
            for field in required {
                match body[field].as_str() {
                    Some(s) if !s.is_empty() => {}
                    _ => f.push(
                        join_loc(&body_loc, field),
                        "a non-empty string",
                        render(body.get(field)),
                    ),
                }
            }
        }
        None => f.push(
            join_loc(rule_base, "expected_error_schema.required"),
            "a list of field names",
            render(error_schema.get("required")),
        ),
    }

    // A malformed hint list is reported once per rule by the caller.
    let hints = str_list(&rule["message_must_contain"]).unwrap_or_default();
    if !hints.is_empty() {
        match body["message"].as_str() {
            Some(message) => {
                for hint in hints {
                    if !message.contains(hint) {
                        f.push(
                            join_loc(&body_loc, "message"),
                            format!("a message containing {hint:?}"),
                            render(body.get("message")),
                        );
                    }
                }
            }
            None => f.push(
                join_loc(&body_loc, "message"),
                format!("a message containing {}", hints.join(", ")),
                render(body.get("message")),
            ),
        }
    }

    // Full schema validation only adds detail beyond the field checks above.
    if f.len() == before && error_schema.is_object() {
        match schema::violations(error_schema, body, &body_loc) {
            Ok(v) => f.extend(v),
            Err(e) => f.push(
                join_loc(rule_base, "expected_error_schema"),
                "a compilable JSON schema",
                e.to_string(),
            ),
        }
    }
}

pub fn check_auth_contract(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let openapi = ctx.fixture.openapi();
    let endpoints = &ctx.config.endpoints;
    let scheme_name = endpoints.security_scheme.as_str();
    let op_loc = join_loc(
        &path_loc(&endpoints.current),
        &endpoints.current_method.to_ascii_lowercase(),
    );

    match operation(openapi, &endpoints.current, &endpoints.current_method) {
        None => f.push(
            op_loc,
            format!(
                "an operation {} {}",
                endpoints.current_method, endpoints.current
            ),
            "absent",
        ),
        Some(op) => {
            // An operation without its own `security` inherits the document default.
            let (security, sec_loc) = match op.get("security") {
                Some(s) => (Some(s), join_loc(&op_loc, "security")),
                None => (openapi.get("security"), "$.server.openapi.security".to_string()),
            };
            let referenced = security
                .and_then(Value::as_array)
                .map(|reqs| reqs.iter().any(|r| r.get(scheme_name).is_some()))
                .unwrap_or(false);
            if !referenced {
                f.push(
                    sec_loc,
                    format!("a security requirement referencing {scheme_name:?}"),
                    render(security),
                );
            }
        }
    }

    let scheme_loc = format!("$.server.openapi.components.securitySchemes.{scheme_name}");
    match openapi["components"]["securitySchemes"].get(scheme_name) {
        None => f.push(scheme_loc, "a defined security scheme", "absent"),
        Some(scheme) => {
            let is = |key: &str, want: &str| {
                scheme[key]
                    .as_str()
                    .map(|v| v.eq_ignore_ascii_case(want))
                    .unwrap_or(false)
            };
            if !is("type", "http") {
                f.push(join_loc(&scheme_loc, "type"), "\"http\"", render(scheme.get("type")));
            }
            if !is("scheme", "bearer") {
                f.push(
                    join_loc(&scheme_loc, "scheme"),
                    "\"bearer\"",
                    render(scheme.get("scheme")),
                );
            }
        }
    }

    let samples = ctx.fixture.samples();
    if let Some((idx, sample)) = require_sample(samples, &ctx.config.samples.success, &mut f) {
        let value = header(&sample["request"]["headers"], "Authorization");
        if value.and_then(Value::as_str).and_then(bearer_token).is_none() {
            f.push(
                join_loc(&sample_loc(idx), "request.headers.Authorization"),
                "Bearer <token>",
                render(value),
            );
        }
    }
    f.into_violations()
}

pub fn check_path_versioning(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let endpoints = &ctx.config.endpoints;
    let Some(paths) = ctx.fixture.openapi()["paths"].as_object() else {
        f.push(
            "$.server.openapi.paths",
            "an object of path templates",
            render(ctx.fixture.openapi().get("paths")),
        );
        return f.into_violations();
    };

    if !paths.contains_key(&endpoints.current) {
        f.push(path_loc(&endpoints.current), "present", "absent");
    }

    let rules = ctx.fixture.deprecated_endpoints();
    let mut deprecated: Vec<&str> = rules.iter().filter_map(|r| r["path"].as_str()).collect();
    if !deprecated.contains(&endpoints.deprecated.as_str()) {
        deprecated.push(&endpoints.deprecated);
    }
    let namespace = version_namespace(&endpoints.current);
    let prefixes: Vec<String> = deprecated
        .iter()
        .map(|d| literal_prefix(d))
        .filter(|p| !p.is_empty())
        .collect();
    for tpl in paths.keys() {
        if deprecated.iter().any(|d| templates_equivalent(d, tpl)) {
            f.push(path_loc(tpl), "absent (deprecated endpoint)", "present");
            continue;
        }
        let versioned = tpl == &endpoints.current
            || namespace
                .as_deref()
                .map(|ns| under_prefix(tpl, ns))
                .unwrap_or(false);
        if versioned {
            continue;
        }
        if let Some(prefix) = prefixes.iter().find(|p| under_prefix(tpl, p)) {
            f.push(
                path_loc(tpl),
                format!("absent (unversioned path under {prefix})"),
                "present",
            );
        }
    }

    let listed = rules.iter().any(|r| {
        r["path"]
            .as_str()
            .map(|p| templates_equivalent(p, &endpoints.deprecated))
            .unwrap_or(false)
            && r["method"]
                .as_str()
                .unwrap_or("GET")
                .eq_ignore_ascii_case(&endpoints.deprecated_method)
    });
    if !listed {
        f.push(
            "$.compat_policy.deprecated_endpoints",
            format!(
                "a rule for {} {}",
                endpoints.deprecated_method, endpoints.deprecated
            ),
            "absent",
        );
    }
    f.into_violations()
}

pub fn check_contract_consistency(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let openapi = ctx.fixture.openapi();
    let rules = ctx.fixture.deprecated_endpoints();

    for (idx, sample) in ctx.fixture.samples().iter().enumerate() {
        let loc = sample_loc(idx);
        let Some(path) = sample["request"]["path"].as_str() else {
            f.push(
                join_loc(&loc, "request.path"),
                "a request path",
                render(sample["request"].get("path")),
            );
            continue;
        };
        if rules.iter().any(|r| rule_covers(r, sample)) {
            tracing::debug!(sample = idx, path, "sample exercises a deprecated endpoint");
            continue;
        }
        let Some(template) = match_operation_path(openapi, path) else {
            f.push(
                join_loc(&loc, "request.path"),
                "a path matching an OpenAPI path template",
                path,
            );
            continue;
        };
        let method = request_method(sample);
        let Some(op) = operation(openapi, template, method) else {
            f.push(
                join_loc(&loc, "request.method"),
                format!("an operation documented under {}", path_loc(template)),
                method,
            );
            continue;
        };
        let Some(status) = sample["response"]["status"].as_u64() else {
            f.push(
                join_loc(&loc, "response.status"),
                "an HTTP status code",
                render(sample["response"].get("status")),
            );
            continue;
        };
        let documented = op["responses"]
            .as_object()
            .map(|r| r.contains_key(&status.to_string()) || r.contains_key("default"))
            .unwrap_or(false);
        if !documented {
            f.push(
                join_loc(&loc, "response.status"),
                format!(
                    "a status documented under {}",
                    join_loc(&path_loc(template), &format!("{}.responses", method.to_ascii_lowercase()))
                ),
                status.to_string(),
            );
        }
    }
    f.into_violations()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CheckConfig;
    use crate::services::test_support::{reference_doc, with_doc};
    use serde_json::json;

    fn run(doc: serde_json::Value, check: fn(&CheckContext<'_>) -> Vec<Violation>) -> Vec<Violation> {
        let config = CheckConfig::default();
        with_doc(doc, &config, check)
    }

    #[test]
    fn bearer_token_requires_prefix_and_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer a b"), None);
    }

    #[test]
    fn reference_fixture_passes_contract_checks() {
        assert!(run(reference_doc(), check_deprecated_endpoint).is_empty());
        assert!(run(reference_doc(), check_auth_contract).is_empty());
        assert!(run(reference_doc(), check_path_versioning).is_empty());
        assert!(run(reference_doc(), check_contract_consistency).is_empty());
    }

    #[test]
    fn deprecated_endpoint_requires_expected_status() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][0]["response"]["status"] = json!(410);
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.observations.samples[0].response.status");
        assert_eq!(v[0].expected, "404");
        assert_eq!(v[0].actual, "410");
    }

    #[test]
    fn deprecated_endpoint_requires_migration_hint() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][0]["response"]["body"]["message"] = json!("Gone.");
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert!(v[0].expected.contains("/api/v2/users/{id}"));
    }

    #[test]
    fn deprecated_endpoint_rejects_empty_error_fields() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][0]["response"]["body"]["error"] = json!("");
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.observations.samples[0].response.body.error");
    }

    #[test]
    fn deprecated_endpoint_rejects_unknown_behavior() {
        let mut doc = reference_doc();
        doc["compat_policy"]["deprecated_endpoints"][0]["behavior"] = json!("redirect");
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.compat_policy.deprecated_endpoints[0].behavior");
    }

    #[test]
    fn deprecated_endpoint_requires_behavior() {
        let mut doc = reference_doc();
        doc["compat_policy"]["deprecated_endpoints"][0]
            .as_object_mut()
            .unwrap()
            .remove("behavior");
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.compat_policy.deprecated_endpoints[0].behavior");
        assert_eq!(v[0].actual, "absent");
    }

    #[test]
    fn hint_list_must_be_a_list_of_strings() {
        let mut doc = reference_doc();
        doc["compat_policy"]["deprecated_endpoints"][0]["message_must_contain"] =
            json!("/api/v3/nowhere");
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert_eq!(
            v[0].location,
            "$.compat_policy.deprecated_endpoints[0].message_must_contain"
        );
        assert_eq!(v[0].actual, "\"/api/v3/nowhere\"");
    }

    #[test]
    fn hint_list_is_required() {
        let mut doc = reference_doc();
        doc["compat_policy"]["deprecated_endpoints"][0]
            .as_object_mut()
            .unwrap()
            .remove("message_must_contain");
        let v = run(doc, check_deprecated_endpoint);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].actual, "absent");
    }

    #[test]
    fn unexercised_rule_is_reported() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][0]["request"]["path"] = json!("/api/v2/users/123");
        let v = run(doc, check_deprecated_endpoint);
        assert!(v.iter().any(|x| x.location == "$.observations.samples[0].request"));
        assert!(v.iter().any(|x| x.actual == "none"));
    }

    #[test]
    fn auth_fails_without_bearer_prefix() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][1]["request"]["headers"]["Authorization"] = json!("Token abc");
        let v = run(doc, check_auth_contract);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.observations.samples[1].request.headers.Authorization");
        assert_eq!(v[0].actual, "\"Token abc\"");
    }

    #[test]
    fn auth_fails_when_header_missing() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][1]["request"]["headers"] = json!({"Accept": "application/json"});
        let v = run(doc, check_auth_contract);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].actual, "absent");
    }

    #[test]
    fn auth_requires_operation_security_and_scheme() {
        let mut doc = reference_doc();
        doc["server"]["openapi"]["paths"]["/api/v2/users/{id}"]["get"]["security"] = json!([]);
        doc["server"]["openapi"]["components"]["securitySchemes"]["bearerAuth"]["scheme"] = json!("basic");
        let v = run(doc, check_auth_contract);
        assert_eq!(v.len(), 2);
        assert!(v[0].location.ends_with(".get.security"));
        assert!(v[1].location.ends_with("bearerAuth.scheme"));
    }

    #[test]
    fn auth_accepts_document_level_security() {
        let mut doc = reference_doc();
        let op = doc["server"]["openapi"]["paths"]["/api/v2/users/{id}"]["get"]
            .as_object_mut()
            .unwrap();
        op.remove("security");
        doc["server"]["openapi"]["security"] = json!([{"bearerAuth": []}]);
        assert!(run(doc, check_auth_contract).is_empty());
    }

    #[test]
    fn exposing_deprecated_path_fails_versioning() {
        let mut doc = reference_doc();
        doc["server"]["openapi"]["paths"]["/api/users/{id}"] = json!({"get": {"responses": {"404": {}}}});
        let v = run(doc, check_path_versioning);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.server.openapi.paths[\"/api/users/{id}\"]");
    }

    #[test]
    fn renamed_placeholder_still_counts_as_deprecated_path() {
        let mut doc = reference_doc();
        doc["server"]["openapi"]["paths"]["/api/users/{userId}"] = json!({});
        assert_eq!(run(doc, check_path_versioning).len(), 1);
    }

    #[test]
    fn unversioned_paths_under_deprecated_prefix_fail_versioning() {
        let mut doc = reference_doc();
        let paths = &mut doc["server"]["openapi"]["paths"];
        paths["/api/users"] = json!({});
        paths["/api/users/{id}/followers"] = json!({});
        paths["/api/v2/users/{id}/followers"] = json!({});
        let v = run(doc, check_path_versioning);
        let locs: Vec<&str> = v.iter().map(|x| x.location.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "$.server.openapi.paths[\"/api/users\"]",
                "$.server.openapi.paths[\"/api/users/{id}/followers\"]",
            ]
        );
        assert!(v[0].expected.contains("/api/users"));
    }

    #[test]
    fn versioning_requires_current_path_and_listed_rule() {
        let mut doc = reference_doc();
        doc["server"]["openapi"]["paths"] = json!({});
        doc["compat_policy"]["deprecated_endpoints"][0]["method"] = json!("DELETE");
        let v = run(doc, check_path_versioning);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn consistency_flags_undocumented_status() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][1]["response"]["status"] = json!(500);
        let v = run(doc, check_contract_consistency);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].actual, "500");
    }

    #[test]
    fn consistency_flags_unknown_path() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][1]["request"]["path"] = json!("/api/v2/users/123/extra");
        let v = run(doc, check_contract_consistency);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "$.observations.samples[1].request.path");
    }

    #[test]
    fn consistency_accepts_default_response() {
        let mut doc = reference_doc();
        doc["observations"]["samples"][1]["response"]["status"] = json!(503);
        doc["server"]["openapi"]["paths"]["/api/v2/users/{id}"]["get"]["responses"]["default"] =
            json!({"description": "anything else"});
        assert!(run(doc, check_contract_consistency).is_empty());
    }
}
