//! Operation model for jj operation history

use serde::Serialize;

/// Represents a jj operation from `jj operation log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Operation ID (e.g., "75ea3c2331bf")
    pub id: String,
    /// Operation description (e.g., "snapshot working copy")
    pub description: String,
    /// Operation tags (e.g., "args: jj describe -m foo")
    pub tags: String,
    /// Start time (e.g., "2026-02-02 11:25:54")
    pub start: String,
    /// User who performed the operation
    pub user: String,
    /// Was this operation an automatic working-copy snapshot?
    pub snapshot: bool,
}

impl Operation {
    /// Get short ID for display (first 12 chars)
    pub fn short_id(&self) -> &str {
        &self.id[..12.min(self.id.len())]
    }

    /// The command line that created this operation, if jj recorded one
    pub fn command_args(&self) -> Option<&str> {
        self.tags.strip_prefix("args: ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(id: &str, tags: &str) -> Operation {
        Operation {
            id: id.to_string(),
            description: "snapshot working copy".to_string(),
            tags: tags.to_string(),
            start: "2026-02-02 11:25:54".to_string(),
            user: "user@host".to_string(),
            snapshot: true,
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(op("75ea3c2331bf1234567890", "").short_id(), "75ea3c2331bf");
    }

    #[test]
    fn test_short_id_short_input() {
        assert_eq!(op("abc", "").short_id(), "abc");
    }

    #[test]
    fn test_command_args() {
        assert_eq!(
            op("abc", "args: jj describe -m hi").command_args(),
            Some("jj describe -m hi")
        );
        assert_eq!(op("abc", "").command_args(), None);
    }
}
