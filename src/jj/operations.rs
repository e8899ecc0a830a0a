//! Commands that change the repository
//!
//! Each returns the raw stdout of jj; callers refresh status afterwards.

use super::JjError;
use super::constants::{commands, flags, special};
use super::executor::{JjExecutor, root_file_pattern};

impl JjExecutor {
    /// Set the description of `revision`
    pub async fn describe(&self, revision: &str, message: &str) -> Result<String, JjError> {
        self.run(&[commands::DESCRIBE, revision, flags::MESSAGE, message])
            .await
    }

    /// Create a new change on top of `parents` (the working copy when empty)
    pub async fn new_change(&self, parents: &[&str], message: Option<&str>) -> Result<String, JjError> {
        let mut args = vec![commands::NEW];
        if parents.is_empty() {
            args.push(special::WORKING_COPY);
        } else {
            args.extend_from_slice(parents);
        }
        if let Some(message) = message {
            args.push(flags::MESSAGE);
            args.push(message);
        }
        self.run(&args).await
    }

    /// Make `revision` the working-copy change
    pub async fn edit(&self, revision: &str) -> Result<String, JjError> {
        self.run(&[commands::EDIT, revision]).await
    }

    /// Move changes to `paths` (everything when empty) from one revision into another
    ///
    /// The destination keeps its own description.
    pub async fn squash(&self, from: &str, into: &str, paths: &[&str]) -> Result<String, JjError> {
        let filesets = paths_to_filesets(paths);
        let mut args = vec![
            commands::SQUASH,
            flags::FROM,
            from,
            flags::INTO,
            into,
            flags::USE_DESTINATION_MESSAGE,
        ];
        args.extend(filesets.iter().map(String::as_str));
        self.run(&args).await
    }

    /// Restore `paths` (everything when empty) in `into` from the contents of `from`
    pub async fn restore(&self, from: &str, into: &str, paths: &[&str]) -> Result<String, JjError> {
        let filesets = paths_to_filesets(paths);
        let mut args = vec![commands::RESTORE, flags::FROM, from, flags::INTO, into];
        args.extend(filesets.iter().map(String::as_str));
        self.run(&args).await
    }

    /// Fetch from the default git remote
    pub async fn git_fetch(&self) -> Result<String, JjError> {
        let stdout = self
            .run_bytes(&[commands::GIT, commands::GIT_FETCH], self.config().network_timeout)
            .await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Undo operation `operation_id`
    pub async fn op_undo(&self, operation_id: &str) -> Result<String, JjError> {
        self.run(&[commands::OP, commands::OP_UNDO, operation_id]).await
    }

    /// Restore the repository to the state after `operation_id`
    pub async fn op_restore(&self, operation_id: &str) -> Result<String, JjError> {
        self.run(&[commands::OP, commands::OP_RESTORE, operation_id])
            .await
    }
}

fn paths_to_filesets(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|path| root_file_pattern(path)).collect()
}
