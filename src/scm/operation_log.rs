//! Operation-log view model

use crate::jj::{JjError, JjExecutor};
use crate::model::Operation;

/// One operation as shown in a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationItem {
    pub id: String,
    /// Command line when jj recorded one, otherwise the raw tags
    pub label: String,
    pub description: String,
    pub tooltip: String,
}

impl From<&Operation> for OperationItem {
    fn from(operation: &Operation) -> Self {
        Self {
            id: operation.id.clone(),
            label: operation
                .command_args()
                .unwrap_or(&operation.tags)
                .to_string(),
            description: operation.description.clone(),
            tooltip: format!(
                "{}\n{}\n{}",
                operation.start, operation.tags, operation.description
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct OperationLogView {
    items: Vec<OperationItem>,
}

impl OperationLogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[OperationItem] {
        &self.items
    }

    /// Replace the items; true when the ordered id list changed
    pub fn update(&mut self, operations: &[Operation]) -> bool {
        let changed = self.items.len() != operations.len()
            || self
                .items
                .iter()
                .zip(operations)
                .any(|(item, operation)| item.id != operation.id);
        self.items = operations.iter().map(OperationItem::from).collect();
        changed
    }

    pub async fn refresh(
        &mut self,
        executor: &JjExecutor,
        limit: Option<usize>,
    ) -> Result<bool, JjError> {
        let operations = executor.op_log(limit).await?;
        Ok(self.update(&operations))
    }
}
