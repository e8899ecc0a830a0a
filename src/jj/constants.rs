//! Names jjk passes to the jj binary
//!
//! Subcommands, flags, revisions and the stderr patterns used to classify failures.

use std::time::Duration;

/// jj command binary name
pub const JJ_COMMAND: &str = "jj";

/// Minimum supported jj version
pub const MIN_JJ_VERSION: &str = "0.22.0";

/// First jj version that accepts `--config-file`
pub const CONFIG_FILE_MIN_VERSION: &str = "0.25.0";

/// First jj version whose `file annotate` accepts an `AnnotationLine` template
pub const ANNOTATE_TEMPLATE_MIN_VERSION: &str = "0.38.0";

/// Timeout for ordinary local commands
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for commands that may touch the network or walk history
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(60);

/// jj subcommands
pub mod commands {
    pub const LOG: &str = "log";
    pub const STATUS: &str = "status";
    pub const ROOT: &str = "root";
    pub const FILE: &str = "file";
    pub const FILE_LIST: &str = "list";
    pub const FILE_SHOW: &str = "show";
    pub const FILE_ANNOTATE: &str = "annotate";
    pub const DESCRIBE: &str = "describe";
    pub const NEW: &str = "new";
    pub const EDIT: &str = "edit";
    pub const SQUASH: &str = "squash";
    pub const RESTORE: &str = "restore";
    pub const GIT: &str = "git";
    pub const GIT_FETCH: &str = "fetch";
    pub const OP: &str = "operation";
    pub const OP_LOG: &str = "log";
    pub const OP_UNDO: &str = "undo";
    pub const OP_RESTORE: &str = "restore";
}

/// jj command flags
pub mod flags {
    /// Force ANSI color (status parsing relies on color regions)
    pub const COLOR_ALWAYS: &str = "--color=always";
    /// Disable color output for template parsing
    pub const NO_COLOR: &str = "--color=never";
    /// Plain record output; `jj log` only
    pub const NO_GRAPH: &str = "--no-graph";
    /// Specify template
    pub const TEMPLATE: &str = "-T";
    /// Specify revision/revset
    pub const REVISION: &str = "-r";
    /// Long revision flag (file subcommands)
    pub const REVISION_LONG: &str = "--revision";
    /// Description message
    pub const MESSAGE: &str = "-m";
    /// Source revision
    pub const FROM: &str = "--from";
    /// Destination revision
    pub const INTO: &str = "--into";
    /// Keep the destination description when squashing
    pub const USE_DESTINATION_MESSAGE: &str = "--use-destination-message";
    /// Limit number of entries
    pub const LIMIT: &str = "--limit";
    /// Never page output
    pub const NO_PAGER: &str = "--no-pager";
    /// Show version
    pub const VERSION: &str = "--version";
    /// Config file path (jj >= 0.25.0)
    pub const CONFIG_FILE: &str = "--config-file";
    /// Inline config TOML (older jj)
    pub const CONFIG_TOML: &str = "--config-toml";
}

/// Special jj values
pub mod special {
    /// The working-copy revision
    pub const WORKING_COPY: &str = "@";

    /// Leading text of `jj --version` output
    pub const VERSION_PREFIX: &str = "jj ";
}

/// Error detection patterns in jj output
pub mod errors {
    /// stderr marker for a directory outside any repository
    pub const NOT_A_REPO: &str = "There is no jj repo in";
    /// Revset that was expected to name one revision named several
    pub const AMBIGUOUS_REVISION: &str = "resolved to more than one revision";
    /// Revset that names nothing
    pub const REVISION_NOT_FOUND: &str = "doesn't exist";
}
