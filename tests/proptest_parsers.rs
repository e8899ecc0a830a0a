//! Property-based tests for jj output parsers
//!
//! Uses proptest to verify parsers handle arbitrary input without panicking
//! and uphold their documented laws.
//! Reference: https://lib.rs/crates/proptest

use std::path::Path;

use proptest::prelude::*;
use jjk::jj::ansi::{extract_colored_regions, strip_ansi_codes};
use jjk::jj::parser::{Parser, parse_rename_paths};
use jjk::jj::template::{FIELD_SEPARATOR, RECORD_SEPARATOR, Templates, decode_records};
use jjk::model::FileStatusType;

// =============================================================================
// Strategy generators for realistic-ish jj output
// =============================================================================

/// Generate a file path (no spaces, braces or arrows)
fn file_path_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_/.-]{1,50}".prop_map(|s| s.to_string())
}

/// A path fragment before the braces: empty or ending in `/`
fn rename_prefix_strategy() -> impl Strategy<Value = String> {
    "([a-z0-9_]{1,8}/){0,3}".prop_map(|s| s.to_string())
}

/// A path fragment after the braces: empty or starting with `/`
fn rename_suffix_strategy() -> impl Strategy<Value = String> {
    "(/[a-z0-9_.]{1,8}){0,3}".prop_map(|s| s.to_string())
}

/// One side inside the braces, without surrounding whitespace
fn rename_side_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_.]{1,10}".prop_map(|s| s.to_string())
}

/// SGR and other escape sequences jj (or a terminal) may emit
fn escape_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "\x1b[0m",
        "\x1b[m",
        "\x1b[1m",
        "\x1b[31m",
        "\x1b[39m",
        "\x1b[38;5;5m",
        "\x1b[38;2;1;2;3m",
        "\x1b[48;5;2m",
        "\x1b[49m",
        "\x1b[94m",
        "\x1b[2K",
        "\x1b]8;;http://x\x07",
        "\x1b",
    ])
    .prop_map(|s| s.to_string())
}

/// Text interleaved with escape sequences
fn ansi_line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![escape_strategy(), "[a-zA-Z0-9 ():|.-]{0,8}"],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

// =============================================================================
// Robustness tests: parsers should never panic on arbitrary input
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Status parser should not panic on arbitrary input
    #[test]
    fn status_parser_does_not_panic(input in ".*") {
        let _ = Parser::parse_status(Path::new("/repo"), &input);
    }

    /// Show parser should not panic on arbitrary input
    #[test]
    fn show_parser_does_not_panic(input in ".*") {
        let _ = Parser::parse_show(Path::new("/repo"), "@", &input);
        let _ = Parser::parse_show_many(Path::new("/repo"), &input);
    }

    /// Operation log parser should not panic on arbitrary input
    #[test]
    fn op_log_parser_does_not_panic(input in ".*") {
        let _ = Parser::parse_op_log(&input);
    }

    /// Graph and annotate parsers should not panic on arbitrary input
    #[test]
    fn graph_and_annotate_parsers_do_not_panic(input in ".*") {
        let _ = Parser::parse_graph(&input);
        let _ = Parser::parse_file_annotate("a.txt", &input);
        let _ = Parser::parse_default_annotate("a.txt", &input);
    }

    /// Rename parser should not panic on arbitrary input
    #[test]
    fn rename_parser_does_not_panic(input in ".*") {
        let _ = parse_rename_paths(&input);
    }

    /// Status parser should not panic on escape-laden lines
    #[test]
    fn status_parser_handles_escapes(lines in prop::collection::vec(ansi_line_strategy(), 0..6)) {
        let _ = Parser::parse_status(Path::new("/repo"), &lines.join("\n"));
    }
}

// =============================================================================
// Laws
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// `prefix{from => to}suffix` expands to prefix+side+suffix
    #[test]
    fn rename_expands_both_sides(
        prefix in rename_prefix_strategy(),
        from in rename_side_strategy(),
        to in rename_side_strategy(),
        suffix in rename_suffix_strategy(),
        pad in " {0,2}",
    ) {
        let input = format!("{prefix}{{{pad}{from}{pad} => {pad}{to}{pad}}}{suffix}");
        let paths = parse_rename_paths(&input).expect("brace rename should parse");
        prop_assert_eq!(paths.from_path, format!("{prefix}{from}{suffix}"));
        prop_assert_eq!(paths.to_path, format!("{prefix}{to}{suffix}"));
    }

    /// An empty side never leaves a doubled or dangling separator
    #[test]
    fn rename_empty_side_has_clean_separators(
        prefix in rename_prefix_strategy(),
        from in rename_side_strategy(),
        suffix in rename_suffix_strategy(),
    ) {
        let input = format!("{prefix}{{{from} => }}{suffix}");
        let paths = parse_rename_paths(&input).expect("brace rename should parse");
        prop_assert_eq!(paths.from_path, format!("{prefix}{from}{suffix}"));
        prop_assert!(!paths.to_path.contains("//"));
        prop_assert!(!paths.to_path.starts_with('/'));
        prop_assert!(!paths.to_path.ends_with('/'));
    }

    /// Without braces there is nothing to expand
    #[test]
    fn rename_without_braces_is_none(from in file_path_strategy(), to in file_path_strategy()) {
        let input = format!("{from} => {to}");
        prop_assert!(parse_rename_paths(&input).is_none());
    }

    /// Stripping is idempotent and leaves no ESC behind
    #[test]
    fn strip_ansi_is_idempotent(line in ansi_line_strategy()) {
        let once = strip_ansi_codes(&line);
        prop_assert!(!once.contains('\x1b'));
        prop_assert_eq!(strip_ansi_codes(&once), once);
    }

    /// Arbitrary input is stripped idempotently too
    #[test]
    fn strip_ansi_is_idempotent_on_any_input(line in ".*") {
        let once = strip_ansi_codes(&line);
        prop_assert_eq!(strip_ansi_codes(&once), once);
    }

    /// Regions concatenate to the stripped line and alternate in state
    #[test]
    fn colored_regions_cover_stripped_text(line in ansi_line_strategy()) {
        let regions = extract_colored_regions(&line);
        let joined: String = regions.iter().map(|r| r.text.as_str()).collect();
        prop_assert_eq!(joined, strip_ansi_codes(&line));
        prop_assert!(regions.iter().all(|r| !r.text.is_empty()));
        prop_assert!(regions.windows(2).all(|pair| pair[0].colored != pair[1].colored));
    }

    /// A region ends only where an escape sequence sat, or at the end
    #[test]
    fn colored_regions_split_only_at_escapes(line in ansi_line_strategy()) {
        let stripped = strip_ansi_codes(&line);
        // Offset in the stripped text of every ESC in the raw line
        let mut boundaries: Vec<usize> = line
            .match_indices('\x1b')
            .map(|(i, _)| strip_ansi_codes(&line[..i]).len())
            .collect();
        boundaries.push(stripped.len());

        let mut offset = 0;
        for region in extract_colored_regions(&line) {
            offset += region.text.len();
            prop_assert!(
                boundaries.contains(&offset),
                "region ends at {} but escapes sit at {:?}",
                offset,
                boundaries
            );
        }
    }

    /// Exact field counts decode; one more or one fewer fails
    #[test]
    fn decode_requires_exact_field_count(
        fields in prop::collection::vec("[a-z0-9 ]{0,6}", 1..10),
        records in 1usize..4,
    ) {
        let record = format!("{}{RECORD_SEPARATOR}", fields.join(FIELD_SEPARATOR));
        let output = record.repeat(records);

        let decoded = decode_records(&output, fields.len()).expect("exact count decodes");
        prop_assert_eq!(decoded.len(), records);
        prop_assert!(decode_records(&output, fields.len() + 1).is_err());
        if fields.len() > 1 {
            prop_assert!(decode_records(&output, fields.len() - 1).is_err());
        }
    }

    /// Diff lines under a working-copy header become file statuses
    #[test]
    fn status_parser_handles_diff_lines(
        status_char in prop::sample::select(vec!['A', 'M', 'D']),
        path in file_path_strategy(),
    ) {
        let input = format!(
            "Working copy changes:\n{status_char} {path}\n\
             Working copy : kkmpptxz 3a8f2c1d first\n\
             Parent commit: qpvuntsm 61b5e0a9 (empty) (no description set)\n"
        );

        let status = Parser::parse_status(Path::new("/repo"), &input)
            .expect("well-formed status parses");
        prop_assert_eq!(status.file_statuses.len(), 1);
        prop_assert_eq!(
            status.file_statuses[0].kind,
            FileStatusType::from_indicator(status_char).expect("known indicator")
        );
        prop_assert_eq!(&status.file_statuses[0].file, &path);
        prop_assert_eq!(status.working_copy.change_id.as_str(), "kkmpptxz");
        prop_assert_eq!(status.parent_changes.len(), 1);
    }
}

#[test]
fn show_template_field_count_matches_constant() {
    let template = Templates::show();
    let separators = template.matches(FIELD_SEPARATOR).count();
    assert_eq!(separators + 1, Templates::SHOW_FIELD_COUNT);
}
