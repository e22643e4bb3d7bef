use crate::domain::models::{ErrorReport, FixtureSummary, JsonOut, SuiteReport};
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    text: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok, data })?
        );
    } else {
        println!("{}", text(&data));
    }
    Ok(())
}

pub fn print_error(json: bool, report: ErrorReport) {
    if json {
        match serde_json::to_string_pretty(&JsonOut {
            ok: false,
            data: &report,
        }) {
            Ok(s) => println!("{s}"),
            Err(_) => eprintln!("error: {}", report.message),
        }
    } else {
        eprintln!("error: {}", report.message);
    }
}

pub fn render_report(r: &SuiteReport) -> String {
    let mut out = Vec::new();
    for c in &r.checks {
        let tag = if c.passed { "PASS" } else { "FAIL" };
        out.push(format!("{tag}\t{}\t{}", c.id, c.rule));
        for v in &c.violations {
            out.push(format!(
                "  - {}: expected {}, found {}",
                v.location, v.expected, v.actual
            ));
        }
    }
    out.push(format!(
        "{} checks: {} passed, {} failed ({})",
        r.checks.len(),
        r.passed_count,
        r.failed_count,
        r.fixture
    ));
    out.join("\n")
}

pub fn render_summary(s: &FixtureSummary) -> String {
    let mut out = vec![
        format!("fixture: {}", s.fixture),
        format!("sha256: {}", s.digest),
        format!("samples: {}", s.samples),
        format!("openapi paths: {}", s.openapi_paths),
        format!("deprecated endpoints: {}", s.deprecated_endpoints),
    ];
    if let Some(lines) = s.client_code_lines {
        out.push(format!("client code: {lines} lines"));
    }
    out.push("fixture valid".to_string());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::render_report;
    use crate::cli::DateTimeMode;
    use crate::domain::models::{CheckOutcome, SuiteReport, Violation};

    #[test]
    fn report_lists_violations_under_failed_checks() {
        let report = SuiteReport {
            fixture: "input.json".to_string(),
            digest: "00".to_string(),
            datetime_mode: DateTimeMode::Strict,
            checks: vec![
                CheckOutcome {
                    id: "auth_contract".to_string(),
                    rule: "bearer".to_string(),
                    passed: false,
                    violations: vec![Violation {
                        location: "$.x".to_string(),
                        expected: "Bearer <token>".to_string(),
                        actual: "absent".to_string(),
                    }],
                },
                CheckOutcome {
                    id: "path_versioning".to_string(),
                    rule: "paths".to_string(),
                    passed: true,
                    violations: vec![],
                },
            ],
            passed_count: 1,
            failed_count: 1,
            passed: false,
        };
        let text = render_report(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "FAIL\tauth_contract\tbearer");
        assert_eq!(lines[1], "  - $.x: expected Bearer <token>, found absent");
        assert_eq!(lines[2], "PASS\tpath_versioning\tpaths");
        assert_eq!(lines[3], "2 checks: 1 passed, 1 failed (input.json)");
    }
}
