//! jj command executor
//!
//! Handles running jj commands and capturing their output. One child process
//! per call, run in the repository root with the configured arguments
//! prepended.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::process::Command;

use super::JjError;
use super::constants::{ANNOTATE_TEMPLATE_MIN_VERSION, commands, errors, flags, special};
use super::parser::Parser;
use super::template::Templates;
use crate::config::JjConfig;
use crate::model::{
    ChangeWithDetails, FileAnnotation, GraphNode, Operation, RepositoryStatus, Show,
};
use crate::sync::SingleFlight;

/// Signal reported when a command is killed for exceeding its timeout
const SIGKILL: i32 = 9;

/// Executor for jj commands
#[derive(Debug, Clone)]
pub struct JjExecutor {
    config: Arc<JjConfig>,
    /// Working directory of every invocation
    repo_root: PathBuf,
    status_flight: Arc<SingleFlight<Result<RepositoryStatus, JjError>>>,
}

impl JjExecutor {
    /// Create a new executor for a specific repository path
    pub fn new(config: Arc<JjConfig>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            repo_root: repo_root.into(),
            status_flight: Arc::new(SingleFlight::new()),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn config(&self) -> &JjConfig {
        &self.config
    }

    /// Run a jj command and return its raw stdout
    pub async fn run_bytes(&self, args: &[&str], timeout: Duration) -> Result<Vec<u8>, JjError> {
        spawn_jj(
            &self.config.executable,
            Some(&self.repo_root),
            self.config.config_args(),
            args,
            timeout,
        )
        .await
    }

    /// Run a jj command with the default timeout, decoding stdout lossily
    pub async fn run(&self, args: &[&str]) -> Result<String, JjError> {
        let stdout = self.run_bytes(args, self.config.timeout).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Get the jj version
    pub async fn version(&self) -> Result<String, JjError> {
        let output = self.run(&[flags::VERSION]).await?;
        // Output format: "jj 0.37.0"
        let trimmed = output.trim();
        Ok(trimmed
            .strip_prefix(special::VERSION_PREFIX)
            .unwrap_or(trimmed)
            .to_string())
    }

    /// Run `jj root` from the executor's directory
    pub async fn root(&self) -> Result<PathBuf, JjError> {
        let output = self.run(&[commands::ROOT]).await?;
        Ok(PathBuf::from(output.trim_end_matches(['\r', '\n'])))
    }

    /// Run `jj status` and parse it
    ///
    /// Concurrent callers share one in-flight invocation.
    pub async fn status(&self) -> Result<RepositoryStatus, JjError> {
        let executor = self.clone();
        self.status_flight
            .run(move || async move { executor.status_uncached().await })
            .await
    }

    async fn status_uncached(&self) -> Result<RepositoryStatus, JjError> {
        // Status parsing relies on color to tell markers from descriptions
        let output = self.run(&[flags::COLOR_ALWAYS, commands::STATUS]).await?;
        Parser::parse_status(&self.repo_root, &output)
    }

    /// Details and diff summary of exactly one revision
    pub async fn show(&self, revision: &str) -> Result<Show, JjError> {
        let output = self.log_raw(revision, &Templates::show()).await?;
        Parser::parse_show(&self.repo_root, revision, &output)
    }

    /// Details and diff summary of every revision in `revset`
    pub async fn show_many(&self, revset: &str) -> Result<Vec<Show>, JjError> {
        let output = self.log_raw(revset, &Templates::show()).await?;
        Parser::parse_show_many(&self.repo_root, &output)
    }

    /// Changes in `revset`, newest first
    pub async fn log(&self, revset: &str) -> Result<Vec<ChangeWithDetails>, JjError> {
        Ok(self
            .show_many(revset)
            .await?
            .into_iter()
            .map(|show| show.change)
            .collect())
    }

    async fn log_raw(&self, revset: &str, template: &str) -> Result<String, JjError> {
        self.run(&[
            flags::NO_COLOR,
            commands::LOG,
            flags::NO_GRAPH,
            flags::REVISION,
            revset,
            flags::TEMPLATE,
            template,
        ])
        .await
    }

    /// Operation log, newest first
    pub async fn op_log(&self, limit: Option<usize>) -> Result<Vec<Operation>, JjError> {
        let template = Templates::op_log();
        let limit = limit.map(|n| n.to_string());
        let mut args = vec![
            flags::NO_COLOR,
            commands::OP,
            commands::OP_LOG,
            flags::NO_GRAPH,
            flags::TEMPLATE,
            template.as_str(),
        ];
        if let Some(ref n) = limit {
            args.push(flags::LIMIT);
            args.push(n);
        }
        let output = self.run(&args).await?;
        Parser::parse_op_log(&output)
    }

    /// Repository-relative paths of the files tracked in `revision`
    pub async fn file_list(&self, revision: &str) -> Result<Vec<String>, JjError> {
        let output = self
            .run(&[
                flags::NO_COLOR,
                commands::FILE,
                commands::FILE_LIST,
                flags::REVISION,
                revision,
            ])
            .await?;
        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Contents of `path` as of `revision`
    pub async fn file_show(&self, revision: &str, path: &str) -> Result<Vec<u8>, JjError> {
        let fileset = root_file_pattern(path);
        self.run_bytes(
            &[
                commands::FILE,
                commands::FILE_SHOW,
                flags::NO_PAGER,
                flags::REVISION_LONG,
                revision,
                fileset.as_str(),
            ],
            self.config.timeout,
        )
        .await
    }

    /// Change id that last touched each line of `path` as of `revision`
    ///
    /// `Ok(None)` when `revision` names several revisions, which happens for
    /// `@-` of a merge; callers then show no annotation.
    pub async fn file_annotate(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<Option<FileAnnotation>, JjError> {
        let templated = self
            .config
            .version
            .as_deref()
            .is_some_and(|version| is_version_supported(version, ANNOTATE_TEMPLATE_MIN_VERSION));
        let template = Templates::file_annotate();

        let mut args = vec![
            flags::NO_COLOR,
            commands::FILE,
            commands::FILE_ANNOTATE,
            flags::REVISION,
            revision,
        ];
        if templated {
            args.push(flags::TEMPLATE);
            args.push(template.as_str());
        }
        // annotate takes a plain path, not a fileset; cwd is the repository root
        args.push(path);

        let stdout = match self.run_bytes(&args, self.config.network_timeout).await {
            Ok(stdout) => stdout,
            Err(err) if err.is_ambiguous_revision() => {
                debug!("no annotation for {path} at {revision}: {err}");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let output = String::from_utf8_lossy(&stdout);
        let annotation = if templated {
            Parser::parse_file_annotate(path, &output)?
        } else {
            Parser::parse_default_annotate(path, &output)?
        };
        Ok(Some(annotation))
    }

    /// Change graph of `revset`, newest first, with parent edges
    pub async fn graph(&self, revset: &str) -> Result<Vec<GraphNode>, JjError> {
        let output = self.log_raw(revset, &Templates::graph()).await?;
        Parser::parse_graph(&output)
    }
}

/// Spawn one jj process and collect its output
///
/// Exit status zero yields stdout. Anything else becomes
/// [`JjError::CommandFailed`], or [`JjError::NotARepository`] when stderr
/// says so. The child is killed when `timeout` elapses.
pub(crate) async fn spawn_jj(
    program: &Path,
    cwd: Option<&Path>,
    config_args: &[String],
    args: &[&str],
    timeout: Duration,
) -> Result<Vec<u8>, JjError> {
    let mut cmd = Command::new(program);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    cmd.args(config_args)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let joined = args.join(" ");
    debug!("running jj {joined}");

    let child = cmd.spawn().map_err(|e| JjError::SpawnFailed {
        program: program.display().to_string(),
        source: Arc::new(e),
    })?;

    // Dropping the wait future on timeout kills the child
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            debug!("jj {joined} timed out after {timeout:?}");
            return Err(JjError::CommandFailed {
                args: joined,
                stdout: String::new(),
                stderr: format!("timed out after {timeout:?}"),
                exit_code: None,
                signal: Some(SIGKILL),
            });
        }
    };

    if output.status.success() {
        return Ok(output.stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    debug!("jj {joined} failed with {}", output.status);
    if stderr.contains(errors::NOT_A_REPO) {
        return Err(JjError::NotARepository);
    }
    Err(JjError::CommandFailed {
        args: joined,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr,
        exit_code: output.status.code(),
        signal: exit_signal(&output.status),
    })
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Fileset naming exactly one repository-relative path
///
/// Quoted so glob characters and spaces in the path are taken literally.
pub(crate) fn root_file_pattern(path: &str) -> String {
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    format!("root-file:\"{escaped}\"")
}

/// Compare version strings (simple semver comparison)
///
/// Handles prerelease suffixes like "0.37.0-rc1" by stripping the suffix.
pub fn is_version_supported(version: &str, minimum: &str) -> bool {
    let parse_version = |v: &str| -> Option<(u32, u32, u32)> {
        let parts: Vec<&str> = v.split('.').collect();
        if parts.len() >= 2 {
            let major = parts[0].parse().ok()?;
            let minor = parts[1].parse().ok()?;
            // Strip prerelease suffix (e.g., "0-rc1" -> "0")
            let patch = parts
                .get(2)
                .and_then(|p| p.split('-').next().and_then(|n| n.parse().ok()))
                .unwrap_or(0);
            Some((major, minor, patch))
        } else {
            None
        }
    };

    match (parse_version(version), parse_version(minimum)) {
        (Some(v), Some(m)) => v >= m,
        _ => false,
    }
}
