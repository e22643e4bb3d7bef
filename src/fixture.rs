use crate::domain::constants::REQUIRED_TOP_LEVEL_KEYS;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    #[error("fixture not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read fixture {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fixture {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fixture {} must be a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },
    #[error("fixture missing top-level keys: {}", keys.join(", "))]
    MissingKeys { keys: Vec<String> },
    #[error("fixture field {location} must be {expected}")]
    WrongShape {
        location: &'static str,
        expected: &'static str,
    },
}

impl FixtureError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FixtureError::NotFound { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FixtureError::NotFound { .. } => "not_found",
            FixtureError::Read { .. } => "read_error",
            FixtureError::Parse { .. } => "parse_error",
            FixtureError::NotAnObject { .. } => "not_an_object",
            FixtureError::MissingKeys { .. } => "missing_key",
            FixtureError::WrongShape { .. } => "wrong_shape",
        }
    }
}

/// The loaded fixture. Read once per run and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    path: PathBuf,
    digest: String,
    root: Value,
}

pub fn load_fixture(path: &Path) -> Result<Fixture, FixtureError> {
    let raw = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FixtureError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FixtureError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let fixture = parse_fixture(path, &raw)?;
    tracing::info!(
        path = %path.display(),
        digest = %fixture.digest,
        samples = fixture.samples().len(),
        "fixture loaded"
    );
    Ok(fixture)
}

pub fn parse_fixture(path: &Path, raw: &[u8]) -> Result<Fixture, FixtureError> {
    let root: Value = serde_json::from_slice(raw).map_err(|e| FixtureError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let obj = root.as_object().ok_or_else(|| FixtureError::NotAnObject {
        path: path.to_path_buf(),
    })?;

    let missing: Vec<String> = REQUIRED_TOP_LEVEL_KEYS
        .iter()
        .filter(|k| !obj.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FixtureError::MissingKeys { keys: missing });
    }

    if !root["server"]["openapi"].is_object() {
        return Err(FixtureError::WrongShape {
            location: "server.openapi",
            expected: "an object",
        });
    }
    if !root["observations"]["samples"].is_array() {
        return Err(FixtureError::WrongShape {
            location: "observations.samples",
            expected: "an array",
        });
    }
    if !root["compat_policy"].is_object() {
        return Err(FixtureError::WrongShape {
            location: "compat_policy",
            expected: "an object",
        });
    }

    let mut hasher = Sha256::new();
    hasher.update(raw);
    Ok(Fixture {
        path: path.to_path_buf(),
        digest: hex::encode(hasher.finalize()),
        root,
    })
}

impl Fixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn client(&self) -> &Value {
        &self.root["client"]
    }

    pub fn openapi(&self) -> &Value {
        &self.root["server"]["openapi"]
    }

    pub fn samples(&self) -> &[Value] {
        self.root["observations"]["samples"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn compat_policy(&self) -> &Value {
        &self.root["compat_policy"]
    }

    pub fn deprecated_endpoints(&self) -> &[Value] {
        self.compat_policy()["deprecated_endpoints"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn client_code_lines(&self) -> Option<usize> {
        self.client()["code"].as_str().map(|c| c.lines().count())
    }
}
