//! Repositories across a set of workspace folders

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use super::{JjBackend, RefreshOutcome, RepositorySourceControl};
use crate::config::JjConfig;
use crate::jj::{JjError, JjExecutor};

/// Resolve the jj repository root of each folder
///
/// Folders outside any repository are skipped, and so is any folder where
/// `jj root` fails for another reason. Roots shared by several folders are
/// returned once, in first-seen order.
pub async fn find_repositories(config: &Arc<JjConfig>, folders: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for folder in folders {
        match JjExecutor::new(config.clone(), folder).root().await {
            Ok(root) => {
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
            Err(err) if err.is_not_a_repository() => {
                debug!("{} is not in a jj repository", folder.display());
            }
            Err(err) => {
                warn!("skipping {}: {err}", folder.display());
            }
        }
    }
    roots
}

/// Every repository found in the workspace
pub struct WorkspaceSourceControl<B: JjBackend> {
    repositories: Vec<RepositorySourceControl<B>>,
}

impl WorkspaceSourceControl<JjExecutor> {
    pub async fn discover(config: Arc<JjConfig>, folders: &[PathBuf]) -> Self {
        let roots = find_repositories(&config, folders).await;
        info!("found {} jj repositories", roots.len());
        Self::from_repositories(
            roots
                .into_iter()
                .map(|root| RepositorySourceControl::new(JjExecutor::new(config.clone(), root)))
                .collect(),
        )
    }
}

impl<B: JjBackend> WorkspaceSourceControl<B> {
    pub fn from_repositories(repositories: Vec<RepositorySourceControl<B>>) -> Self {
        Self { repositories }
    }

    pub fn repositories(&self) -> &[RepositorySourceControl<B>] {
        &self.repositories
    }

    /// The repository containing `path`; nested repositories win
    pub fn repository_for(&self, path: &Path) -> Option<&RepositorySourceControl<B>> {
        self.repositories
            .iter()
            .filter(|repo| path.starts_with(repo.repository_root()))
            .max_by_key(|repo| repo.repository_root().components().count())
    }

    /// Poll every repository concurrently
    pub async fn refresh_all(&self) -> Vec<Result<RefreshOutcome, JjError>> {
        join_all(self.repositories.iter().map(|repo| repo.poll())).await
    }
}
