//! Status, show and operation-log parsing against a real jj binary.

#[macro_use]
#[path = "common/mod.rs"]
mod common;

use common::TestRepo;
use jjk::jj::JjError;
use jjk::model::FileStatusType;

/// Parent "first" adds a.txt and b.txt; the working copy modifies a.txt,
/// deletes b.txt and adds c.txt
fn two_change_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.write_file("a.txt", "one\n");
    repo.write_file("b.txt", "two\n");
    repo.jj(&["describe", "-m", "first"]);
    repo.jj(&["new"]);
    repo.write_file("a.txt", "one changed\n");
    std::fs::remove_file(repo.path().join("b.txt")).expect("Failed to remove b.txt");
    repo.write_file("c.txt", "three\n");
    repo
}

#[tokio::test]
async fn test_status_lists_working_copy_files() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let status = executor.status().await.expect("status should succeed");

    let files: Vec<(FileStatusType, &str)> = status
        .file_statuses
        .iter()
        .map(|f| (f.kind, f.file.as_str()))
        .collect();
    assert_eq!(
        files,
        vec![
            (FileStatusType::Modified, "a.txt"),
            (FileStatusType::Deleted, "b.txt"),
            (FileStatusType::Added, "c.txt"),
        ]
    );
    assert_eq!(status.file_statuses[0].path, repo.path().join("a.txt"));
}

#[tokio::test]
async fn test_status_headers() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let status = executor.status().await.expect("status should succeed");

    assert!(repo.change_id("@").starts_with(&status.working_copy.change_id));
    assert_eq!(status.working_copy.description, "");
    assert!(!status.working_copy.is_empty);

    assert_eq!(status.parent_changes.len(), 1);
    let parent = &status.parent_changes[0];
    assert!(repo.change_id("@-").starts_with(&parent.change_id));
    assert_eq!(parent.description, "first");
    assert!(!parent.is_empty);
    assert!(!parent.is_conflict);
}

#[tokio::test]
async fn test_status_of_empty_working_copy() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    let executor = repo.executor().await;

    let status = executor.status().await.expect("status should succeed");

    assert!(status.is_clean());
    assert!(status.working_copy.is_empty);
    assert_eq!(status.working_copy.description, "");
    assert_eq!(status.working_copy.display_description(), "(no description set)");
}

#[tokio::test]
async fn test_concurrent_status_calls_agree() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let (a, b) = tokio::join!(executor.status(), executor.status());
    assert_eq!(a.expect("first status"), b.expect("second status"));
}

#[tokio::test]
async fn test_show_parent_revision() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let show = executor.show("@-").await.expect("show should succeed");

    assert_eq!(show.change.change_id, repo.change_id("@-"));
    assert_eq!(show.change.description, "first");
    assert_eq!(show.change.authored_date.len(), "2026-01-01 00:00:00".len());
    let files: Vec<(FileStatusType, &str)> = show
        .file_statuses
        .iter()
        .map(|f| (f.kind, f.file.as_str()))
        .collect();
    assert_eq!(
        files,
        vec![
            (FileStatusType::Added, "a.txt"),
            (FileStatusType::Added, "b.txt"),
        ]
    );
}

#[tokio::test]
async fn test_show_rejects_multiple_revisions() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let err = executor.show("all()").await.unwrap_err();
    assert!(matches!(err, JjError::MultipleRevisionsResolved { count: 3, .. }));
    assert!(err.is_recoverable());

    let shows = executor.show_many("all()").await.expect("show_many should succeed");
    assert_eq!(shows.len(), 3);
}

#[tokio::test]
async fn test_show_empty_revset() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    let executor = repo.executor().await;

    let err = executor.show("none()").await.unwrap_err();
    assert!(matches!(err, JjError::NoRevisionOutput { .. }));
}

#[tokio::test]
async fn test_unknown_revision_is_command_failure() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    let executor = repo.executor().await;

    let err = executor.show("no_such_bookmark").await.unwrap_err();
    match err {
        JjError::CommandFailed { exit_code, stderr, .. } => {
            assert_ne!(exit_code, Some(0));
            assert!(!stderr.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_op_log_newest_first() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let ops = executor.op_log(Some(2)).await.expect("op log should succeed");
    assert_eq!(ops.len(), 2);
    assert_ne!(ops[0].id, ops[1].id);
    assert!(ops.iter().all(|op| !op.id.is_empty()));

    let all = executor.op_log(None).await.expect("op log should succeed");
    assert!(all.len() > 2);
    assert_eq!(all[0].id, ops[0].id);
}

#[tokio::test]
async fn test_file_list_and_show() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let files = executor.file_list("@").await.expect("file list should succeed");
    assert_eq!(files, vec!["a.txt".to_string(), "c.txt".to_string()]);

    let contents = executor
        .file_show("@-", "b.txt")
        .await
        .expect("file show should succeed");
    assert_eq!(contents, b"two\n");
}

#[tokio::test]
async fn test_root_from_subdirectory() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    repo.write_file("nested/dir/file.txt", "x");
    let executor = repo.executor().await;

    let nested = jjk::jj::JjExecutor::new(
        std::sync::Arc::new(executor.config().clone()),
        repo.path().join("nested/dir"),
    );
    assert_eq!(nested.root().await.expect("root should succeed"), repo.path());
}

#[tokio::test]
async fn test_not_a_repository() {
    skip_if_no_jj!();
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let repo = TestRepo::new();
    let executor = repo.executor().await;

    let outside = jjk::jj::JjExecutor::new(
        std::sync::Arc::new(executor.config().clone()),
        dir.path(),
    );
    let err = outside.status().await.unwrap_err();
    assert!(err.is_not_a_repository());
}

#[tokio::test]
async fn test_annotate_attributes_lines_to_changes() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    repo.write_file("a.txt", "one\ntwo\n");
    repo.jj(&["describe", "-m", "first"]);
    repo.jj(&["new"]);
    repo.write_file("a.txt", "one\ntwo\nthree\n");
    let executor = repo.executor().await;

    let annotation = executor
        .file_annotate("@", "a.txt")
        .await
        .expect("annotate should succeed")
        .expect("@ names one revision");

    assert_eq!(annotation.path, "a.txt");
    let [first, second, third] = annotation.change_ids_by_line.as_slice() else {
        panic!("expected 3 lines, got {:?}", annotation.change_ids_by_line);
    };
    let parent = repo.change_id("@-");
    assert!(parent.starts_with(first.as_str()));
    assert!(parent.starts_with(second.as_str()));
    assert!(repo.change_id("@").starts_with(third.as_str()));
}

#[tokio::test]
async fn test_annotate_of_ambiguous_revision_is_none() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    repo.write_file("a.txt", "base\n");
    repo.jj(&["describe", "-m", "base"]);
    repo.jj(&["new", "-m", "left"]);
    repo.write_file("left.txt", "l\n");
    let left = repo.change_id("@");
    repo.jj(&["new", "@-", "-m", "right"]);
    repo.write_file("right.txt", "r\n");
    let right = repo.change_id("@");
    repo.jj(&["new", &left, &right, "-m", "merge"]);
    let executor = repo.executor().await;

    let annotation = executor
        .file_annotate("@-", "a.txt")
        .await
        .expect("ambiguous revision is not an error");
    assert_eq!(annotation, None);
}

#[tokio::test]
async fn test_graph_links_parents() {
    skip_if_no_jj!();
    let repo = two_change_repo();
    let executor = repo.executor().await;

    let nodes = executor.graph("::@").await.expect("graph should succeed");

    // Working copy, "first", root
    assert_eq!(nodes.len(), 3);
    assert!(nodes[0].is_working_copy);
    assert!(nodes[1..].iter().all(|n| !n.is_working_copy));
    assert_eq!(nodes[0].parent_change_ids, vec![nodes[1].change_id.clone()]);
    assert_eq!(nodes[1].description, "first");
    assert_eq!(nodes[1].parent_change_ids, vec![nodes[2].change_id.clone()]);
    assert!(nodes[2].parent_change_ids.is_empty());
    assert!(repo.change_id("@").starts_with(&nodes[0].change_id));
}

#[tokio::test]
async fn test_pipe_in_description_is_not_a_bookmark() {
    skip_if_no_jj!();
    let repo = TestRepo::new();
    repo.write_file("a.txt", "one\n");
    repo.jj(&["describe", "-m", "fix | parser"]);
    repo.jj(&["bookmark", "create", "main", "-r", "@"]);
    repo.jj(&["new", "-m", "feat | x"]);
    let executor = repo.executor().await;

    let status = executor.status().await.expect("status should succeed");

    assert_eq!(status.working_copy.branch, None);
    assert_eq!(status.working_copy.description, "feat | x");
    let parent = &status.parent_changes[0];
    assert_eq!(parent.branch.as_deref(), Some("main"));
    assert_eq!(parent.description, "fix | parser");
}
