use crate::domain::constants::{DEFAULT_RELOCATED_FIELD, FIXED_BODY_TYPES, LINKS_FIELD};
use crate::domain::models::{EndpointConfig, Violation};
use crate::services::datetime::{describe, is_timestamp};
use crate::services::findings::{
    join_loc, path_loc, render, require_sample, sample_loc, schema_loc, str_list, CheckContext,
    Findings,
};
use crate::services::lookup::{
    has_json_type, json_type_name, lookup_path, operation, resolve_ref, schema_declares,
};
use crate::services::schema;
use serde_json::Value;
use std::collections::HashSet;

const RELOCATION_LOC: &str = "$.compat_policy.schema_compat.user_payload";

/// The schema documented for the current endpoint's 200 response, or the
/// configured named schema when the operation declares no JSON content.
fn success_schema<'a>(
    openapi: &'a Value,
    endpoints: &EndpointConfig,
) -> Result<&'a Value, Violation> {
    let declared = operation(openapi, &endpoints.current, &endpoints.current_method)
        .and_then(|op| op["responses"]["200"]["content"]["application/json"].get("schema"));
    let (raw, loc) = match declared {
        Some(s) => (
            s,
            join_loc(
                &path_loc(&endpoints.current),
                &format!(
                    "{}.responses.200.content.application/json.schema",
                    endpoints.current_method.to_ascii_lowercase()
                ),
            ),
        ),
        None => {
            let loc = schema_loc(&endpoints.response_schema);
            let s = openapi["components"]["schemas"]
                .get(&endpoints.response_schema)
                .ok_or_else(|| Violation {
                    location: loc.clone(),
                    expected: "a response schema definition".to_string(),
                    actual: "absent".to_string(),
                })?;
            (s, loc)
        }
    };
    resolve_ref(openapi, raw).map_err(|e| Violation {
        location: loc,
        expected: "a resolvable schema".to_string(),
        actual: e.to_string(),
    })
}

fn relocated_field<'a>(ctx: &CheckContext<'a>) -> &'a str {
    ctx.fixture.compat_policy()["schema_compat"]["user_payload"]["new_location"]
        .as_str()
        .unwrap_or(DEFAULT_RELOCATED_FIELD)
}

pub fn check_response_schema(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let openapi = ctx.fixture.openapi();
    let mode = ctx.config.datetime_mode;
    let Some((idx, sample)) = require_sample(ctx.fixture.samples(), &ctx.config.samples.success, &mut f)
    else {
        return f.into_violations();
    };
    let loc = sample_loc(idx);

    if sample["response"]["status"].as_u64() != Some(200) {
        f.push(
            join_loc(&loc, "response.status"),
            "200",
            render(sample["response"].get("status")),
        );
    }

    let schema = match success_schema(openapi, &ctx.config.endpoints) {
        Ok(s) => s,
        Err(v) => {
            f.extend(vec![v]);
            return f.into_violations();
        }
    };

    let body_loc = join_loc(&loc, "response.body");
    let body = &sample["response"]["body"];
    let Some(obj) = body.as_object() else {
        f.push(body_loc, "a JSON object", render(sample["response"].get("body")));
        return f.into_violations();
    };
    let before = f.len();

    let required = str_list(&schema["required"]).unwrap_or_default();
    for field in &required {
        if !obj.contains_key(*field) {
            f.push(join_loc(&body_loc, field), "present (required by schema)", "absent");
        }
    }

    let mut flagged: HashSet<&str> = HashSet::new();
    let mut format_checked: HashSet<&str> = HashSet::new();
    if let Some(props) = schema["properties"].as_object() {
        for (name, prop) in props {
            let Some(value) = obj.get(name) else {
                continue;
            };
            let field_loc = join_loc(&body_loc, name);
            let prop = match resolve_ref(openapi, prop) {
                Ok(p) => p,
                Err(e) => {
                    f.push(field_loc, "a resolvable property schema", e.to_string());
                    flagged.insert(name);
                    continue;
                }
            };
            if let Some(ty) = prop["type"].as_str() {
                if !has_json_type(value, ty) {
                    f.push(
                        field_loc,
                        format!("a value of type {ty}"),
                        format!("{} {}", json_type_name(value), render(Some(value))),
                    );
                    flagged.insert(name);
                    continue;
                }
            }
            if prop["format"].as_str() == Some("date-time") {
                format_checked.insert(name);
                if let Some(s) = value.as_str() {
                    if !is_timestamp(s, mode) {
                        f.push(field_loc, describe(mode), render(Some(value)));
                        flagged.insert(name);
                    }
                }
            }
        }
    }

    for (field, ty) in FIXED_BODY_TYPES {
        if flagged.contains(field) {
            continue;
        }
        match obj.get(field) {
            None if !required.contains(&field) => {
                f.push(join_loc(&body_loc, field), format!("a value of type {ty}"), "absent");
                flagged.insert(field);
            }
            None => {}
            Some(value) if !has_json_type(value, ty) => {
                f.push(
                    join_loc(&body_loc, field),
                    format!("a value of type {ty}"),
                    format!("{} {}", json_type_name(value), render(Some(value))),
                );
                flagged.insert(field);
            }
            Some(_) => {}
        }
    }

    for field in &ctx.config.endpoints.timestamp_fields {
        if format_checked.contains(field.as_str()) || flagged.contains(field.as_str()) {
            continue;
        }
        if let Some(value) = obj.get(field) {
            let ok = value.as_str().map(|s| is_timestamp(s, mode)).unwrap_or(false);
            if !ok {
                f.push(join_loc(&body_loc, field), describe(mode), render(Some(value)));
            }
        }
    }

    let links_loc = join_loc(&body_loc, LINKS_FIELD);
    match obj.get(LINKS_FIELD) {
        None if !required.contains(&LINKS_FIELD) => {
            f.push(links_loc, "an object of navigation links", "absent");
        }
        None => {}
        Some(_) if flagged.contains(LINKS_FIELD) => {}
        Some(links) => match links.as_object() {
            None => f.push(links_loc, "an object of navigation links", render(Some(links))),
            Some(links) => {
                for name in &ctx.config.endpoints.required_links {
                    if links.get(name).and_then(Value::as_str).is_none() {
                        f.push(
                            join_loc(&links_loc, name),
                            "a string URL",
                            render(links.get(name)),
                        );
                    }
                }
            }
        },
    }

    let relocated = relocated_field(ctx);
    if schema_declares(openapi, schema, relocated) {
        let value = lookup_path(body, relocated);
        match value.and_then(Value::as_str) {
            Some(s) if !s.is_empty() => {}
            _ => f.push(
                join_loc(&body_loc, relocated),
                "a non-empty string",
                render(value),
            ),
        }
    }

    if f.len() == before {
        let bundled = schema::with_components(schema, openapi);
        match schema::violations(&bundled, body, &body_loc) {
            Ok(v) => f.extend(v),
            Err(e) => f.push(
                schema_loc(&ctx.config.endpoints.response_schema),
                "a compilable JSON schema",
                e.to_string(),
            ),
        }
    }
    f.into_violations()
}

pub fn check_field_relocation(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let rule = &ctx.fixture.compat_policy()["schema_compat"]["user_payload"];
    if !rule.is_object() {
        f.push(
            RELOCATION_LOC,
            "an object describing the relocated field",
            render(ctx.fixture.compat_policy()["schema_compat"].get("user_payload")),
        );
        return f.into_violations();
    }

    let old = rule["old_location"].as_str();
    let new = rule["new_location"].as_str();
    let allow_dual = rule["allow_dual_about_me"].as_bool();
    if old.is_none() {
        f.push(join_loc(RELOCATION_LOC, "old_location"), "a dotted path", render(rule.get("old_location")));
    }
    if new.is_none() {
        f.push(join_loc(RELOCATION_LOC, "new_location"), "a dotted path", render(rule.get("new_location")));
    }
    if allow_dual.is_none() {
        f.push(
            join_loc(RELOCATION_LOC, "allow_dual_about_me"),
            "a boolean",
            render(rule.get("allow_dual_about_me")),
        );
    }
    let (Some(old), Some(new), Some(allow_dual)) = (old, new, allow_dual) else {
        return f.into_violations();
    };
    if old == new {
        f.push(
            join_loc(RELOCATION_LOC, "new_location"),
            format!("a location other than {old:?}"),
            format!("{new:?}"),
        );
    }

    let Some((idx, sample)) = require_sample(ctx.fixture.samples(), &ctx.config.samples.success, &mut f)
    else {
        return f.into_violations();
    };
    let body_loc = join_loc(&sample_loc(idx), "response.body");
    let body = &sample["response"]["body"];

    if lookup_path(body, new).is_none() {
        f.push(join_loc(&body_loc, new), "present (new location)", "absent");
    }
    if !allow_dual {
        if let Some(v) = lookup_path(body, old) {
            f.push(
                join_loc(&body_loc, old),
                "absent (allow_dual_about_me = false)",
                render(Some(v)),
            );
        }
    }
    f.into_violations()
}

pub fn check_schema_evolution(ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut f = Findings::default();
    let openapi = ctx.fixture.openapi();
    let endpoints = &ctx.config.endpoints;
    let base = schema_loc(&endpoints.response_schema);

    let Some(raw) = openapi["components"]["schemas"].get(&endpoints.response_schema) else {
        f.push(base, "a schema definition", "absent");
        return f.into_violations();
    };
    let schema = match resolve_ref(openapi, raw) {
        Ok(s) => s,
        Err(e) => {
            f.push(base, "a resolvable schema", e.to_string());
            return f.into_violations();
        }
    };

    let required = str_list(&schema["required"]).unwrap_or_default();
    let props = schema["properties"].as_object();
    for field in &endpoints.introduced_fields {
        if !required.contains(&field.as_str()) {
            f.push(
                join_loc(&base, "required"),
                format!("a list including {field:?}"),
                render(schema.get("required")),
            );
        }
        if !props.map(|p| p.contains_key(field)).unwrap_or(false) {
            f.push(
                join_loc(&base, &format!("properties.{field}")),
                "a property definition",
                "absent",
            );
        }
    }

    for field in &endpoints.timestamp_fields {
        let prop_loc = join_loc(&base, &format!("properties.{field}"));
        let Some(prop) = props.and_then(|p| p.get(field)) else {
            if !endpoints.introduced_fields.contains(field) {
                f.push(prop_loc, "a property definition", "absent");
            }
            continue;
        };
        let prop = match resolve_ref(openapi, prop) {
            Ok(p) => p,
            Err(e) => {
                f.push(prop_loc, "a resolvable property schema", e.to_string());
                continue;
            }
        };
        if prop["type"].as_str() != Some("string") {
            f.push(join_loc(&prop_loc, "type"), "\"string\"", render(prop.get("type")));
        }
        if prop["format"].as_str() != Some("date-time") {
            f.push(join_loc(&prop_loc, "format"), "\"date-time\"", render(prop.get("format")));
        }
    }
    f.into_violations()
}
