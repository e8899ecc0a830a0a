//! Data models for jjk
//!
//! UI-independent value types for the records parsed out of jj output.
//! Every refresh rebuilds them from scratch; nothing here is mutated in place.

mod annotation;
mod change;
mod file_status;
mod graph;
mod operation;
mod show;

pub use annotation::FileAnnotation;
pub use change::{Author, Change, ChangeWithDetails, NO_DESCRIPTION_PLACEHOLDER};
pub use file_status::{FileStatus, FileStatusType, RepositoryStatus};
pub use graph::GraphNode;
pub use operation::Operation;
pub use show::Show;
