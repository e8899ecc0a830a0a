//! jjk - command-line front-end
//!
//! Prints parsed jj status, show and operation-log records, or watches a
//! repository and prints whenever its reconciled state changes.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use jjk::config::{JjConfig, default_config_dir};
use jjk::jj::JjExecutor;
use jjk::logging;
use jjk::model::{Change, FileStatus, FileStatusType, RepositoryStatus, Show};
use jjk::scm::{ChangeGraph, DEFAULT_GRAPH_REVSET, GraphPayload, RepositorySourceControl, ScmEvent};

/// Quiet period before a burst of watch ticks turns into one poll
const WATCH_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Debug, clap::Parser)]
#[command(name = "jjk", version, about = "Parsed views of a Jujutsu repository")]
struct Args {
    #[arg(short, long, help = "Repository directory (defaults to the current directory)")]
    repo: Option<PathBuf>,

    #[arg(long, default_value = "jj", help = "jj executable to run")]
    jj: PathBuf,

    #[arg(short, long, help = "Enable debug logging")]
    debug: bool,

    #[arg(long, help = "Print records as JSON")]
    json: bool,

    #[arg(long, help = "Timeout in seconds for local jj commands")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Working-copy status
    Status,
    /// One revision with its changed files
    Show { revision: String },
    /// Operation log, newest first
    OpLog {
        #[arg(long, help = "Maximum number of operations")]
        limit: Option<usize>,
    },
    /// Files tracked in a revision
    Files {
        #[arg(default_value = "@")]
        revision: String,
    },
    /// File contents as of a revision
    Cat { revision: String, path: String },
    /// Change that last touched each line of a file
    Annotate {
        path: String,
        #[arg(short, long, default_value = "@", help = "Revision to annotate")]
        revision: String,
    },
    /// Revisions with their parent edges
    Graph {
        #[arg(long, default_value = DEFAULT_GRAPH_REVSET)]
        revset: String,
    },
    /// Print the status whenever it changes
    Watch {
        #[arg(long, default_value_t = 1000, help = "Polling interval in milliseconds")]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.debug)?;
    color_eyre::install()?;

    let mut config = JjConfig::detect(&args.jj, &default_config_dir()).await?;
    if let Some(secs) = args.timeout_secs {
        let network_timeout = config.network_timeout.max(Duration::from_secs(secs));
        config = config.with_timeouts(Duration::from_secs(secs), network_timeout);
    }
    let config = Arc::new(config);
    let cwd = match &args.repo {
        Some(repo) => repo.clone(),
        None => std::env::current_dir()?,
    };
    let root = JjExecutor::new(config.clone(), cwd).root().await?;
    log::debug!("repository root: {}", root.display());
    let executor = JjExecutor::new(config, root);

    match args.command {
        Command::Status => {
            let status = executor.status().await?;
            emit(args.json, &status, print_status)?;
        }
        Command::Show { revision } => {
            let show = executor.show(&revision).await?;
            emit(args.json, &show, print_show)?;
        }
        Command::OpLog { limit } => {
            let operations = executor.op_log(limit).await?;
            emit(args.json, &operations, |operations| {
                for op in operations {
                    println!("{} {} {}", op.short_id(), op.start, op.description);
                    if let Some(command) = op.command_args() {
                        println!("    {command}");
                    }
                }
            })?;
        }
        Command::Files { revision } => {
            let files = executor.file_list(&revision).await?;
            emit(args.json, &files, |files| {
                for file in files {
                    println!("{file}");
                }
            })?;
        }
        Command::Cat { revision, path } => {
            let contents = executor.file_show(&revision, &path).await?;
            std::io::stdout().write_all(&contents)?;
        }
        Command::Annotate { revision, path } => match executor.file_annotate(&revision, &path).await? {
            Some(annotation) => emit(args.json, &annotation, |annotation| {
                for (index, change_id) in annotation.change_ids_by_line.iter().enumerate() {
                    println!("{:>5} {change_id}", index + 1);
                }
            })?,
            None => log::warn!("{revision} names more than one revision; nothing to annotate"),
        },
        Command::Graph { revset } => {
            let mut graph = ChangeGraph::new(revset);
            graph.refresh(&executor).await?;
            if let Some(payload) = graph.payload() {
                emit(args.json, payload, print_graph)?;
            }
        }
        Command::Watch { interval_ms } => {
            watch(executor, Duration::from_millis(interval_ms), args.json).await?;
        }
    }

    Ok(())
}

async fn watch(executor: JjExecutor, interval: Duration, json: bool) -> Result<()> {
    let scm = RepositorySourceControl::new(executor);
    let mut events = scm.subscribe();
    let trigger = scm.poll_trigger(WATCH_DEBOUNCE);
    let mut ticks = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticks.tick() => trigger.call(()),
            event = events.recv() => match event {
                Ok(ScmEvent::ChangesUpdated { working_copy_id, .. }) => {
                    log::debug!("working copy is now {working_copy_id}");
                    if let Some(status) = scm.current_status() {
                        emit(json, status.as_ref(), print_status)?;
                    }
                }
                Ok(ScmEvent::DecorationsChanged(keys)) => {
                    log::debug!("{} decorations changed", keys.len());
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("skipped {skipped} repository events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

fn print_status(status: &RepositoryStatus) {
    print_change("Working copy ", &status.working_copy);
    for parent in &status.parent_changes {
        print_change("Parent commit", parent);
    }
    if status.is_clean() {
        println!("The working copy has no changes.");
    } else {
        let counts: Vec<String> = [
            (FileStatusType::Added, "added"),
            (FileStatusType::Modified, "modified"),
            (FileStatusType::Deleted, "deleted"),
            (FileStatusType::Renamed, "renamed"),
        ]
        .into_iter()
        .map(|(kind, name)| (status.count_by_type(kind), name))
        .filter(|(count, _)| *count > 0)
        .map(|(count, name)| format!("{count} {name}"))
        .collect();
        println!("Working copy changes ({}):", counts.join(", "));
    }
    print_files(&status.file_statuses);
    if status.has_conflicts() {
        println!("There are unresolved conflicts.");
    }
}

fn print_graph(payload: &GraphPayload) {
    for node in &payload.nodes {
        let marker = if node.is_merge() { " (merge)" } else { "" };
        println!("{} {}{marker}", node.glyph(), node.label());
        println!("    {}", node.tooltip());
        if !node.parent_change_ids.is_empty() {
            println!("    parents: {}", node.parent_change_ids.join(" "));
        }
    }
}

fn print_show(show: &Show) {
    print_change("Change", &show.change);
    println!(
        "Author: {} <{}> ({})",
        show.change.author.name, show.change.author.email, show.change.authored_date
    );
    print_files(&show.file_statuses);
}

fn print_change(heading: &str, change: &Change) {
    let mut line = format!("{heading}: {} {}", change.change_id, change.commit_id);
    if let Some(branch) = &change.branch {
        line.push_str(&format!(" {branch} |"));
    }
    if change.is_conflict {
        line.push_str(" (conflict)");
    }
    if change.is_empty {
        line.push_str(" (empty)");
    }
    println!("{line} {}", change.display_description());
}

fn print_files(files: &[FileStatus]) {
    for file in files {
        match &file.renamed_from {
            Some(from) => println!("{} {from} => {}", file.indicator(), file.file),
            None => println!("{} {}", file.indicator(), file.file),
        }
    }
}
