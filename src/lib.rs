//! jjk - Jujutsu status parsing and repository-state reconciliation
//!
//! This library provides:
//! - [`config`]: How jj is invoked (executable, timeouts, pinned templates)
//! - [`jj`]: Jujutsu command execution and output parsing
//! - [`model`]: Domain models
//! - [`scm`]: Repository state reconciler and its UI-facing projections
//! - [`sync`]: Throttle, debounce and single-flight helpers

pub mod config;
pub mod jj;
pub mod logging;
pub mod model;
pub mod scm;
pub mod sync;
