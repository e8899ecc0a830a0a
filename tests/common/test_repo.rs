//! Scratch jj repositories for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use jjk::config::JjConfig;
use jjk::jj::JjExecutor;
use tempfile::TempDir;

/// A `jj git init` repository plus a private config directory, both removed on drop
pub struct TestRepo {
    dir: TempDir,
    config_dir: TempDir,
}

fn run_jj(cwd: &Path, args: &[&str]) -> Output {
    let output = Command::new("jj")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap_or_else(|err| panic!("could not spawn jj {args:?}: {err}"));
    assert!(
        output.status.success(),
        "jj {args:?} exited with {:?}:\n{}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("repository tempdir");
        let config_dir = tempfile::tempdir().expect("config tempdir");
        run_jj(dir.path(), &["git", "init"]);
        Self { dir, config_dir }
    }

    /// Canonical repository root, as `jj root` reports it
    pub fn path(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("canonical repository path")
    }

    /// Executor configured the way the binary configures it
    pub async fn executor(&self) -> JjExecutor {
        let config = JjConfig::detect("jj", self.config_dir.path())
            .await
            .expect("supported jj version");
        JjExecutor::new(Arc::new(config), self.path())
    }

    /// Run jj in the repository and return stdout; panics on failure
    pub fn jj(&self, args: &[&str]) -> String {
        let output = run_jj(&self.path(), args);
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Evaluate `template` against a single revision, trimmed
    fn template(&self, rev: &str, template: &str) -> String {
        self.jj(&["log", "--no-graph", "-r", rev, "-T", template])
            .trim()
            .to_owned()
    }

    pub fn write_file(&self, relative: &str, contents: &str) {
        let target = self.path().join(relative);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).expect("parent directories");
        }
        fs::write(target, contents).expect("file write");
    }

    /// Working-copy contents of `relative`, empty when missing
    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).unwrap_or_default()
    }

    pub fn change_id(&self, rev: &str) -> String {
        self.template(rev, "change_id")
    }

    pub fn description(&self, rev: &str) -> String {
        self.template(rev, "description")
    }

    /// Number of revisions in `revset`
    pub fn revision_count(&self, revset: &str) -> usize {
        self.jj(&["log", "--no-graph", "-r", revset, "-T", r#""x""#])
            .chars()
            .filter(|&c| c == 'x')
            .count()
    }
}
