//! Invocation settings shared by every jj command
//!
//! Built once at startup (version detection, config-file placement) and
//! injected into each [`JjExecutor`](crate::jj::JjExecutor) as `Arc<JjConfig>`.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::jj::constants::{self, flags, special};
use crate::jj::{JjError, is_version_supported, spawn_jj};

/// Config handed to jj on every invocation
///
/// Pins the commit summary printed by `jj status` so its header lines keep
/// the `<change> <commit> [<bookmarks> |] [markers] <description>` shape the
/// status parser expects, whatever the user's own template says. Bookmarks,
/// markers and the placeholder are labelled (and therefore colored); the
/// description is not.
pub const CONFIG_TOML: &str = r#"[ui]
paginate = "never"

[templates]
commit_summary = '''
separate(" ",
  change_id.shortest(8),
  commit_id.shortest(8),
  if(bookmarks, label("bookmarks", bookmarks.map(|b| b.name()).join(",")) ++ " |"),
  if(conflict, label("conflict", "(conflict)")),
  if(empty, label("empty", "(empty)")),
  if(description,
    description.first_line(),
    label("description placeholder", "(no description set)"))
)
'''
"#;

/// File name of the written config inside the config directory
const CONFIG_FILE_NAME: &str = "jjk-config.toml";

/// How jj is located, bounded and configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JjConfig {
    /// jj binary (name resolved through PATH, or an explicit path)
    pub executable: PathBuf,
    /// Bound for ordinary commands
    pub timeout: Duration,
    /// Bound for `git fetch` and `file annotate`
    pub network_timeout: Duration,
    /// Detected jj version, if detection ran
    pub version: Option<String>,
    config_args: Vec<String>,
}

impl Default for JjConfig {
    fn default() -> Self {
        Self::new(constants::JJ_COMMAND)
    }
}

impl JjConfig {
    /// Config without version detection, passing the config inline
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: constants::DEFAULT_TIMEOUT,
            network_timeout: constants::NETWORK_TIMEOUT,
            version: None,
            config_args: vec![flags::CONFIG_TOML.to_string(), CONFIG_TOML.to_string()],
        }
    }

    /// Detect the jj version and choose how to pass the config
    ///
    /// jj >= 0.25.0 reads the config from a file written into `config_dir`;
    /// older versions get it inline through `--config-toml`.
    pub async fn detect(
        executable: impl Into<PathBuf>,
        config_dir: &Path,
    ) -> Result<Self, JjError> {
        let mut config = Self::new(executable);
        let output = spawn_jj(
            &config.executable,
            None,
            &[],
            &[flags::VERSION],
            config.timeout,
        )
        .await?;
        let version = parse_version_output(&String::from_utf8_lossy(&output));
        info!("detected jj {version}");

        if !is_version_supported(&version, constants::MIN_JJ_VERSION) {
            return Err(JjError::UnsupportedVersion {
                version,
                minimum: constants::MIN_JJ_VERSION.to_string(),
            });
        }

        if is_version_supported(&version, constants::CONFIG_FILE_MIN_VERSION) {
            let path = write_config_file(config_dir).await?;
            debug!("using config file {}", path.display());
            config.config_args = vec![
                flags::CONFIG_FILE.to_string(),
                path.to_string_lossy().into_owned(),
            ];
        }
        config.version = Some(version);
        Ok(config)
    }

    /// Arguments placed before every subcommand
    pub fn config_args(&self) -> &[String] {
        &self.config_args
    }

    pub fn with_timeouts(mut self, timeout: Duration, network_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.network_timeout = network_timeout;
        self
    }
}

/// Where the config file is written unless the caller picks a directory
pub fn default_config_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("jjk")
}

/// `jj 0.37.0` -> `0.37.0`
fn parse_version_output(output: &str) -> String {
    let trimmed = output.trim();
    trimmed
        .strip_prefix(special::VERSION_PREFIX)
        .unwrap_or(trimmed)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

async fn write_config_file(config_dir: &Path) -> Result<PathBuf, JjError> {
    tokio::fs::create_dir_all(config_dir).await?;
    let path = config_dir.join(CONFIG_FILE_NAME);
    tokio::fs::write(&path, CONFIG_TOML).await?;
    Ok(path)
}
