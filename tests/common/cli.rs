//! Runs the `gtest-report` binary inside a throwaway workspace.

use assert_cmd::Command;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::ExitStatus;
use tempfile::TempDir;
use tracing::debug;

const NO_ENV: [(&str, &str); 0] = [];

#[derive(Debug)]
pub struct CliRun {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

/// Scratch directory used as cwd and `HOME`, so no user config leaks in.
pub struct Workspace {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

pub fn run<I, S>(workspace: &Workspace, args: I, label: &str) -> CliRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_with_env(workspace, args, NO_ENV, label)
}

pub fn run_with_env<I, S, E, K, V>(workspace: &Workspace, args: I, env_vars: E, label: &str) -> CliRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let output = Command::new(assert_cmd::cargo::cargo_bin!("gtest-report"))
        .current_dir(&workspace.root)
        .args(args)
        .env_remove("GTEST_REPORT_CONFIG")
        .envs(env_vars)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "gtest_report=debug")
        .env("HOME", &workspace.root)
        .output()
        .expect("run gtest-report");

    let run = CliRun {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    };
    debug!(label, status = %run.status, stderr = %run.stderr, "gtest-report finished");
    run
}

/// The JSON object in `text`, skipping any log lines printed before it.
pub fn extract_json_payload(text: &str) -> String {
    let payload: Vec<&str> = text
        .lines()
        .skip_while(|line| !line.trim_start().starts_with('{'))
        .collect();
    if payload.is_empty() {
        text.trim().to_string()
    } else {
        payload.join("\n").trim().to_string()
    }
}
