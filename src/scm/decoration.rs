//! File decorations keyed by path and revision

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::{FileStatus, FileStatusType};

/// Lookup key: absolute path plus the revision it is shown under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationKey {
    pub path: PathBuf,
    pub revision: String,
}

impl DecorationKey {
    pub fn new(path: impl Into<PathBuf>, revision: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            revision: revision.into(),
        }
    }
}

/// Badge and tooltip for one decorated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub badge: FileStatusType,
    /// Repository-relative path
    pub tooltip: String,
}

#[derive(Debug, Default)]
pub struct FileDecorations {
    decorations: HashMap<DecorationKey, Decoration>,
}

impl FileDecorations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every decoration with those derived from `by_change`
    ///
    /// Returns the keys whose badge changed, appeared or disappeared, sorted.
    /// A changed tooltip alone does not count.
    pub fn on_refresh<'a, I>(&mut self, by_change: I) -> Vec<DecorationKey>
    where
        I: IntoIterator<Item = (&'a str, &'a [FileStatus])>,
    {
        let mut next = HashMap::new();
        for (revision, statuses) in by_change {
            for status in statuses {
                next.insert(
                    DecorationKey::new(&status.path, revision),
                    Decoration {
                        badge: status.kind,
                        tooltip: status.file.clone(),
                    },
                );
            }
        }

        let mut changed: Vec<DecorationKey> = next
            .iter()
            .filter(|(key, decoration)| {
                self.decorations
                    .get(*key)
                    .is_none_or(|previous| previous.badge != decoration.badge)
            })
            .map(|(key, _)| key.clone())
            .chain(
                self.decorations
                    .keys()
                    .filter(|key| !next.contains_key(*key))
                    .cloned(),
            )
            .collect();
        changed.sort();

        self.decorations = next;
        changed
    }

    pub fn decoration(&self, path: &Path, revision: &str) -> Option<&Decoration> {
        self.decorations.get(&DecorationKey::new(path, revision))
    }

    /// Number of decorated (path, revision) pairs
    pub(crate) fn len(&self) -> usize {
        self.decorations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(kind: FileStatusType, file: &str) -> FileStatus {
        FileStatus {
            kind,
            file: file.to_string(),
            path: PathBuf::from("/repo").join(file),
            renamed_from: None,
        }
    }

    #[test]
    fn test_first_refresh_reports_every_key() {
        let mut decorations = FileDecorations::new();
        let wc = vec![
            status(FileStatusType::Modified, "b.txt"),
            status(FileStatusType::Added, "a.txt"),
        ];
        let changed = decorations.on_refresh([("@", wc.as_slice())]);
        assert_eq!(
            changed,
            vec![
                DecorationKey::new("/repo/a.txt", "@"),
                DecorationKey::new("/repo/b.txt", "@"),
            ]
        );
        assert_eq!(
            decorations
                .decoration(Path::new("/repo/a.txt"), "@")
                .map(|d| d.badge),
            Some(FileStatusType::Added)
        );
    }

    #[test]
    fn test_unchanged_refresh_reports_nothing() {
        let mut decorations = FileDecorations::new();
        let wc = vec![status(FileStatusType::Modified, "a.txt")];
        decorations.on_refresh([("@", wc.as_slice())]);
        assert!(decorations.on_refresh([("@", wc.as_slice())]).is_empty());
    }

    #[test]
    fn test_badge_change_and_removal_are_reported() {
        let mut decorations = FileDecorations::new();
        let before = vec![
            status(FileStatusType::Added, "a.txt"),
            status(FileStatusType::Modified, "b.txt"),
        ];
        decorations.on_refresh([("@", before.as_slice())]);

        let after = vec![status(FileStatusType::Modified, "a.txt")];
        let changed = decorations.on_refresh([("@", after.as_slice())]);
        assert_eq!(
            changed,
            vec![
                DecorationKey::new("/repo/a.txt", "@"),
                DecorationKey::new("/repo/b.txt", "@"),
            ]
        );
        assert_eq!(decorations.len(), 1);
        assert!(decorations.decoration(Path::new("/repo/b.txt"), "@").is_none());
    }

    #[test]
    fn test_same_path_under_different_revisions() {
        let mut decorations = FileDecorations::new();
        let wc = vec![status(FileStatusType::Modified, "a.txt")];
        let parent = vec![status(FileStatusType::Added, "a.txt")];
        decorations.on_refresh([("@", wc.as_slice()), ("qpvuntsm", parent.as_slice())]);
        assert_eq!(decorations.len(), 2);
        assert_eq!(
            decorations
                .decoration(Path::new("/repo/a.txt"), "qpvuntsm")
                .map(|d| d.badge),
            Some(FileStatusType::Added)
        );
    }
}
