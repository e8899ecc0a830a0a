//! Repository state reconciler
//!
//! Turns `jj status` snapshots into resource groups, change nodes and file
//! decorations, and tells subscribers when any of them actually changed.
//! Refreshes of one repository are serialized through a [`Throttle`].

mod decoration;
mod graph;
mod group;
mod operation_log;
mod workspace;

pub use decoration::{Decoration, DecorationKey, FileDecorations};
pub use graph::{ChangeGraph, DEFAULT_GRAPH_REVSET, GraphPayload};
pub use group::{ChangeNode, ResourceGroup, WORKING_COPY_GROUP, change_nodes};
pub use operation_log::{OperationItem, OperationLogView};
pub use workspace::{WorkspaceSourceControl, find_repositories};

use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::broadcast;

use crate::jj::constants::special;
use crate::jj::{JjError, JjExecutor};
use crate::model::{RepositoryStatus, Show};
use crate::sync::{Aborted, Debounce, Throttle, ThrottlePhase, lock};

/// Buffered events per subscriber before the slowest starts lagging
const EVENT_CAPACITY: usize = 64;

/// The jj queries the reconciler depends on
pub trait JjBackend: Send + Sync + 'static {
    fn repository_root(&self) -> &Path;

    fn status(&self) -> impl Future<Output = Result<RepositoryStatus, JjError>> + Send;

    fn show(&self, revision: &str) -> impl Future<Output = Result<Show, JjError>> + Send;

    fn file_list(&self, revision: &str) -> impl Future<Output = Result<Vec<String>, JjError>> + Send;
}

impl JjBackend for JjExecutor {
    fn repository_root(&self) -> &Path {
        self.repo_root()
    }

    fn status(&self) -> impl Future<Output = Result<RepositoryStatus, JjError>> + Send {
        JjExecutor::status(self)
    }

    fn show(&self, revision: &str) -> impl Future<Output = Result<Show, JjError>> + Send {
        JjExecutor::show(self, revision)
    }

    fn file_list(&self, revision: &str) -> impl Future<Output = Result<Vec<String>, JjError>> + Send {
        JjExecutor::file_list(self, revision)
    }
}

/// Notifications for UI listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmEvent {
    /// The working copy or the change-node list changed
    ChangesUpdated {
        working_copy_id: String,
        nodes: Vec<ChangeNode>,
    },
    /// These decorations appeared, disappeared or changed badge
    DecorationsChanged(Vec<DecorationKey>),
}

/// What one refresh run did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefreshOutcome {
    /// A [`ScmEvent::ChangesUpdated`] was emitted
    pub notified: bool,
    /// Ids of resource groups whose parent is gone
    pub disposed_groups: Vec<String>,
}

#[derive(Default)]
struct ReconcilerState {
    status: Option<Arc<RepositoryStatus>>,
    working_copy_id: Option<String>,
    groups: Vec<ResourceGroup>,
    nodes: Vec<ChangeNode>,
    tracked: HashSet<String>,
    decorations: FileDecorations,
}

struct Reconciler<B> {
    backend: B,
    state: Mutex<ReconcilerState>,
    events: broadcast::Sender<ScmEvent>,
}

type RefreshResult = Result<RefreshOutcome, JjError>;

/// Source-control state of one repository
pub struct RepositorySourceControl<B: JjBackend> {
    reconciler: Arc<Reconciler<B>>,
    refresher: Arc<Throttle<Arc<RepositoryStatus>, RefreshResult>>,
}

impl<B: JjBackend> Clone for RepositorySourceControl<B> {
    fn clone(&self) -> Self {
        Self {
            reconciler: self.reconciler.clone(),
            refresher: self.refresher.clone(),
        }
    }
}

impl<B: JjBackend> RepositorySourceControl<B> {
    pub fn new(backend: B) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let reconciler = Arc::new(Reconciler {
            backend,
            state: Mutex::new(ReconcilerState::default()),
            events,
        });

        let runner = reconciler.clone();
        let refresher = Throttle::new(move |status: Arc<RepositoryStatus>| {
            let reconciler = runner.clone();
            async move { reconciler.run_refresh(status).await }
        });

        Self {
            reconciler,
            refresher: Arc::new(refresher),
        }
    }

    pub fn repository_root(&self) -> &Path {
        self.reconciler.backend.repository_root()
    }

    /// Rebuild groups, nodes and decorations from `status`
    ///
    /// While a refresh is running, further calls share one queued run that
    /// uses the arguments of the latest call. The request is registered
    /// before the returned future is polled.
    pub fn refresh(
        &self,
        status: RepositoryStatus,
    ) -> impl Future<Output = RefreshResult> + Send + 'static {
        let call = self.refresher.call(Arc::new(status));
        async move { call.await.unwrap_or_else(|Aborted| Err(JjError::RefreshAborted)) }
    }

    /// Fetch `jj status` and refresh from it
    ///
    /// On failure the previous snapshot stays current.
    pub async fn poll(&self) -> RefreshResult {
        let status = match self.reconciler.backend.status().await {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    "status of {} failed: {err}",
                    self.repository_root().display()
                );
                return Err(err);
            }
        };
        self.refresh(status).await
    }

    /// Debounced trigger that polls once its quiet period ends
    ///
    /// Feed it file-system change notifications.
    pub fn poll_trigger(&self, delay: Duration) -> Debounce<()> {
        let scm = self.clone();
        Debounce::new(delay, move |()| {
            let scm = scm.clone();
            tokio::spawn(async move {
                // Failures are logged by poll; the cached state stays
                let _ = scm.poll().await;
            });
        })
    }

    pub fn refresh_phase(&self) -> ThrottlePhase {
        self.refresher.phase()
    }

    /// Latest successfully reconciled snapshot
    pub fn current_status(&self) -> Option<Arc<RepositoryStatus>> {
        lock(&self.reconciler.state).status.clone()
    }

    /// Working-copy group first, then one group per parent
    pub fn groups(&self) -> Vec<ResourceGroup> {
        lock(&self.reconciler.state).groups.clone()
    }

    pub fn change_nodes(&self) -> Vec<ChangeNode> {
        lock(&self.reconciler.state).nodes.clone()
    }

    pub fn decoration(&self, path: &Path, revision: &str) -> Option<Decoration> {
        lock(&self.reconciler.state)
            .decorations
            .decoration(path, revision)
            .cloned()
    }

    /// Is `file` (repository-relative) tracked in the working copy?
    pub fn is_tracked(&self, file: &str) -> bool {
        lock(&self.reconciler.state).tracked.contains(file)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScmEvent> {
        self.reconciler.events.subscribe()
    }
}

impl<B: JjBackend> Reconciler<B> {
    async fn run_refresh(&self, status: Arc<RepositoryStatus>) -> RefreshResult {
        let result = self.reconcile(status).await;
        if let Err(err) = &result {
            warn!(
                "refresh of {} failed: {err}",
                self.backend.repository_root().display()
            );
        }
        result
    }

    async fn reconcile(&self, status: Arc<RepositoryStatus>) -> RefreshResult {
        let tracked = self.backend.file_list(special::WORKING_COPY).await?;
        let mut parent_shows = Vec::with_capacity(status.parent_changes.len());
        for parent in &status.parent_changes {
            parent_shows.push(self.backend.show(&parent.change_id).await?);
        }

        let groups: Vec<ResourceGroup> = std::iter::once(ResourceGroup::working_copy(&status))
            .chain(
                status
                    .parent_changes
                    .iter()
                    .zip(parent_shows)
                    .map(|(parent, show)| ResourceGroup::parent(parent, show.file_statuses)),
            )
            .collect();
        let nodes = change_nodes(&status);
        let working_copy_id = status.working_copy.change_id.clone();

        let (outcome, changed_decorations) = {
            let mut state = lock(&self.state);

            let disposed_groups: Vec<String> = state
                .groups
                .iter()
                .filter(|old| !old.is_working_copy() && !groups.iter().any(|new| new.id == old.id))
                .map(|old| old.id.clone())
                .collect();

            let notified = state.working_copy_id.as_deref() != Some(working_copy_id.as_str())
                || state.nodes != nodes;

            let changed_decorations = state.decorations.on_refresh(
                groups
                    .iter()
                    .map(|group| (group.id.as_str(), group.resources.as_slice())),
            );

            state.status = Some(status);
            state.working_copy_id = Some(working_copy_id.clone());
            state.groups = groups;
            state.nodes = nodes.clone();
            state.tracked = tracked.into_iter().collect();
            debug!(
                "{} resource groups, {} decorations",
                state.groups.len(),
                state.decorations.len()
            );

            (
                RefreshOutcome {
                    notified,
                    disposed_groups,
                },
                changed_decorations,
            )
        };

        for id in &outcome.disposed_groups {
            debug!("disposing resource group {id}");
        }
        // Sending only fails when nobody is subscribed
        if outcome.notified {
            let _ = self.events.send(ScmEvent::ChangesUpdated {
                working_copy_id,
                nodes,
            });
        }
        if !changed_decorations.is_empty() {
            let _ = self
                .events
                .send(ScmEvent::DecorationsChanged(changed_decorations));
        }
        Ok(outcome)
    }
}
