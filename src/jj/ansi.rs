//! ANSI escape handling for colored jj output
//!
//! `jj status --color=always` colors decorative parts of a commit summary
//! (ids, `(empty)`, the `(no description set)` placeholder) but never the
//! description text itself, so the color state is used to tell them apart.

use regex::Regex;
use std::sync::LazyLock;

/// Matches one escape sequence: CSI (`ESC [ params final`), OSC
/// (`ESC ] ... BEL|ST`), a two-byte escape, or a stray ESC.
///
/// Groups (CSI only):
/// 1. parameter bytes
/// 2. final byte
static ESCAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[([0-?]*)[ -/]*([@-~])|\][^\x07\x1b]*(?:\x07|\x1b\\)?|[@-Z\\-_])?")
        .expect("Invalid ANSI escape regex")
});

/// A contiguous run of text sharing one color state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredRegion {
    pub text: String,
    pub colored: bool,
}

/// Remove every ANSI escape sequence from a line
///
/// Stray ESC bytes are removed as well, so the output never contains ESC and
/// stripping twice is the same as stripping once.
pub fn strip_ansi_codes(line: &str) -> String {
    ESCAPE_REGEX.replace_all(line, "").into_owned()
}

/// Split a line into alternating uncolored/colored runs
///
/// A new run starts only where an escape sequence flips the color state;
/// escapes that leave the state unchanged (bold, same color twice) are
/// dropped without splitting. Empty runs are never emitted.
pub fn extract_colored_regions(line: &str) -> Vec<ColoredRegion> {
    let mut regions = Vec::new();
    let mut current = String::new();
    let mut colored = false;
    let mut last = 0;

    for caps in ESCAPE_REGEX.captures_iter(line) {
        let Some(escape) = caps.get(0) else {
            continue;
        };
        current.push_str(&line[last..escape.start()]);
        last = escape.end();

        let next = match (caps.get(1), caps.get(2)) {
            (Some(params), Some(final_byte)) if final_byte.as_str() == "m" => {
                apply_sgr(colored, params.as_str())
            }
            _ => colored,
        };

        if next != colored {
            push_region(&mut regions, &mut current, colored);
            colored = next;
        }
    }

    current.push_str(&line[last..]);
    push_region(&mut regions, &mut current, colored);
    regions
}

fn push_region(regions: &mut Vec<ColoredRegion>, current: &mut String, colored: bool) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    match regions.last_mut() {
        Some(prev) if prev.colored == colored => prev.text.push_str(&text),
        _ => regions.push(ColoredRegion { text, colored }),
    }
}

/// Apply one SGR parameter list to the color state
fn apply_sgr(mut colored: bool, params: &str) -> bool {
    if params.is_empty() {
        return false;
    }

    let codes: Vec<&str> = params.split([';', ':']).collect();
    let mut i = 0;
    while i < codes.len() {
        let code = if codes[i].is_empty() {
            0
        } else if let Ok(code) = codes[i].parse::<u16>() {
            code
        } else {
            i += 1;
            continue;
        };

        match code {
            0 | 39 | 49 => colored = false,
            30..=37 | 40..=47 | 90..=97 | 100..=107 => colored = true,
            38 | 48 => {
                colored = true;
                // 256-color (`38;5;n`) and truecolor (`38;2;r;g;b`) operands
                i += match codes.get(i + 1) {
                    Some(&"5") => 2,
                    Some(&"2") => 4,
                    _ => 0,
                };
            }
            _ => {}
        }
        i += 1;
    }
    colored
}
