//! Change-graph view model
//!
//! Holds the last graph sent to a consumer and decides whether a new one is
//! worth sending.

use serde::Serialize;

use crate::jj::constants::special;
use crate::jj::{JjError, JjExecutor};
use crate::model::GraphNode;

/// Revset the graph shows unless told otherwise
pub const DEFAULT_GRAPH_REVSET: &str = "::";

/// What a graph consumer receives on every update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPayload {
    pub working_copy_id: String,
    pub nodes: Vec<GraphNode>,
}

#[derive(Debug)]
pub struct ChangeGraph {
    revset: String,
    current: Option<GraphPayload>,
}

impl ChangeGraph {
    pub fn new(revset: impl Into<String>) -> Self {
        Self {
            revset: revset.into(),
            current: None,
        }
    }

    pub fn payload(&self) -> Option<&GraphPayload> {
        self.current.as_ref()
    }

    /// Replace the graph; true when the working copy or any node changed
    ///
    /// Nodes compare field by field and in order, parent edges included.
    pub fn update(&mut self, working_copy_id: &str, nodes: Vec<GraphNode>) -> bool {
        let changed = self.current.as_ref().is_none_or(|current| {
            current.working_copy_id != working_copy_id || current.nodes != nodes
        });
        self.current = Some(GraphPayload {
            working_copy_id: working_copy_id.to_string(),
            nodes,
        });
        changed
    }

    /// Query the graph, then [`update`](Self::update)
    ///
    /// The working copy is looked up separately when the revset leaves it out.
    pub async fn refresh(&mut self, executor: &JjExecutor) -> Result<bool, JjError> {
        let nodes = executor.graph(&self.revset).await?;
        let working_copy_id = match nodes.iter().find(|node| node.is_working_copy) {
            Some(node) => node.change_id.clone(),
            None => executor
                .graph(special::WORKING_COPY)
                .await?
                .into_iter()
                .next()
                .map(|node| node.change_id)
                .unwrap_or_default(),
        };
        Ok(self.update(&working_copy_id, nodes))
    }
}
