#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub dir: PathBuf,
    pub input: PathBuf,
}

impl TestEnv {
    /// Workspace holding a copy of the reference fixture.
    pub fn new() -> Self {
        Self::with_fixture(&reference_fixture())
    }

    pub fn with_fixture(doc: &Value) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().to_path_buf();
        let input = dir.join("input.json");
        fs::write(
            &input,
            serde_json::to_string_pretty(doc).expect("serialize fixture"),
        )
        .expect("write fixture");
        Self {
            _tmp: tmp,
            dir,
            input,
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let p = self.dir.join(name);
        fs::write(&p, contents).expect("write file");
        p
    }

    /// Runs from inside the temp dir so `./input.json` and `./apicompat.toml` resolve there.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("apicompat");
        cmd.current_dir(&self.dir)
            .env_remove("APICOMPAT_INPUT")
            .env_remove("APICOMPAT_LOG");
        cmd
    }

    pub fn run_json(&self, args: &[&str], code: i32) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn reference_fixture() -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    load_json(&root.join("input.json"))
}

pub fn load_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&raw).expect("parse json")
}
