//! Shared testing utilities for flowdeploy CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tempfile::TempDir;

/// Variables that would otherwise leak from the developer's shell into a run.
pub const ISOLATED_VARS: &[&str] = &[
    "ENVIRONMENT",
    "GITHUB_REF",
    "GCP_PROJECT_ID",
    "BRANCH_NAME",
    "TAG",
    "PREFECT_API_URL",
    "PREFECT_API_KEY",
    "GCP_ACCESS_TOKEN",
    "FLOWDEPLOY_CONFIG",
    "HOSTNAME",
    "RUST_LOG",
];

/// Testing harness providing an isolated working directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Path to the directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `flowdeploy` binary.
    ///
    /// Git never looks above the temp root, so runs outside a repository
    /// see no branch.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("flowdeploy").expect("Failed to locate flowdeploy binary");
        cmd.current_dir(&self.work_dir).env("GIT_CEILING_DIRECTORIES", self.root.path());
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Write `flowdeploy.toml` in the work directory.
    pub fn write_config(&self, content: &str) {
        fs::write(self.work_dir.join("flowdeploy.toml"), content).expect("Failed to write config");
    }

    /// Write `.env` in the work directory.
    pub fn write_dotenv(&self, content: &str) {
        fs::write(self.work_dir.join(".env"), content).expect("Failed to write .env");
    }

    /// Turn the work directory into a git repository with one commit on `branch`.
    pub fn init_git(&self, branch: &str) {
        self.git(&["init", "-q"]);
        self.git(&["checkout", "-q", "-b", branch]);
        self.git(&[
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            "init",
        ]);
    }

    fn git(&self, args: &[&str]) {
        let status = process::Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .env("GIT_CEILING_DIRECTORIES", self.root.path())
            .status()
            .expect("failed to run git");
        assert!(status.success(), "git {:?} failed", args);
    }
}
