//! Line diff built on a longest-common-subsequence table.
//! Generates an edit script plus git-style unified output.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Above this many table cells a debug event notes the quadratic cost.
const LARGE_TABLE_CELLS: usize = 1 << 20;

static BLANK_RUN: OnceLock<Regex> = OnceLock::new();

fn blank_run() -> &'static Regex {
    BLANK_RUN.get_or_init(|| Regex::new(r"[\t ]+").expect("valid regex"))
}

/// Configuration for diff generation
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffOptions {
    /// Compare lower-cased text
    pub ignore_case: bool,
    /// Collapse runs of spaces and tabs, then trim the whole text
    pub ignore_whitespace: bool,
    /// Number of context lines around changes in unified output (default: 3)
    pub context_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            ignore_whitespace: false,
            context_lines: 3,
        }
    }
}

/// Kind of edit script operation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Equal,
    Delete,
    Insert,
}

/// One line of the edit script
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffOp {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffOp {
    fn new(tag: DiffTag, text: &str) -> Self {
        Self {
            tag,
            text: text.to_string(),
        }
    }
}

/// Represents a single line in the diff output
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// Line number in the original text (1-indexed), None for additions
    pub old_line: Option<usize>,
    /// Line number in the new text (1-indexed), None for deletions
    pub new_line: Option<usize>,
    /// The content of the line (without the +/- prefix)
    pub content: String,
    /// Type of change
    pub change_type: DiffChangeType,
}

/// Type of change in a diff line
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffChangeType {
    /// Line present in both texts (context)
    Context,
    /// Line added in new text
    Addition,
    /// Line removed from old text
    Deletion,
}

impl DiffChangeType {
    fn marker(self) -> char {
        match self {
            Self::Context => ' ',
            Self::Addition => '+',
            Self::Deletion => '-',
        }
    }
}

/// Statistics about the diff
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Number of lines added
    pub additions: usize,
    /// Number of lines deleted
    pub deletions: usize,
    /// Number of context lines
    pub context: usize,
}

/// Result of a text diff operation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Edit script
    pub ops: Vec<DiffOp>,
    /// Individual diff lines with their line numbers
    pub lines: Vec<DiffLine>,
    /// Summary statistics
    pub stats: DiffStats,
}

/// Applies the case and whitespace options. Original casing and spacing
/// cannot be recovered from the result.
pub fn normalize(text: &str, options: &DiffOptions) -> String {
    let mut out = if options.ignore_case {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    if options.ignore_whitespace {
        out = blank_run().replace_all(&out, " ").trim().to_string();
    }
    out
}

/// Splits on `\n`, dropping a `\r` before it. Empty text is one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// `table[i][j]` is the LCS length of `a[i..]` and `b[j..]`.
struct LcsTable {
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    fn build(a: &[&str], b: &[&str]) -> Self {
        let (n, m) = (a.len(), b.len());
        let cols = m + 1;
        let cells_len = (n + 1) * cols;
        if cells_len > LARGE_TABLE_CELLS {
            tracing::debug!(old = n, new = m, cells = cells_len, "large LCS table");
        }
        let mut table = Self {
            cols,
            cells: vec![0; cells_len],
        };
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                let value = if a[i] == b[j] {
                    table.get(i + 1, j + 1) + 1
                } else {
                    table.get(i + 1, j).max(table.get(i, j + 1))
                };
                table.cells[i * cols + j] = value;
            }
        }
        table
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    /// Backtrack transition from cursor `(i, j)`. Ties advance the left
    /// side, and leftovers drain as deletes then inserts.
    fn step(&self, a: &[&str], b: &[&str], i: usize, j: usize) -> Option<DiffTag> {
        match (i < a.len(), j < b.len()) {
            (true, true) if a[i] == b[j] => Some(DiffTag::Equal),
            (true, true) if self.get(i + 1, j) >= self.get(i, j + 1) => Some(DiffTag::Delete),
            (true, true) => Some(DiffTag::Insert),
            (true, false) => Some(DiffTag::Delete),
            (false, true) => Some(DiffTag::Insert),
            (false, false) => None,
        }
    }
}

/// Edit script turning `a` into `b`. `Equal` plus `Delete` lines rebuild
/// `a` in order; `Equal` plus `Insert` lines rebuild `b`.
pub fn lcs_diff(a: &[&str], b: &[&str]) -> Vec<DiffOp> {
    let table = LcsTable::build(a, b);
    let mut ops = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);
    while let Some(tag) = table.step(a, b, i, j) {
        match tag {
            DiffTag::Equal => {
                ops.push(DiffOp::new(tag, a[i]));
                i += 1;
                j += 1;
            }
            DiffTag::Delete => {
                ops.push(DiffOp::new(tag, a[i]));
                i += 1;
            }
            DiffTag::Insert => {
                ops.push(DiffOp::new(tag, b[j]));
                j += 1;
            }
        }
    }
    ops
}

/// Generate a diff between two texts after applying `options`
pub fn diff_lines(old_text: &str, new_text: &str, options: &DiffOptions) -> DiffResult {
    let old_text = normalize(old_text, options);
    let new_text = normalize(new_text, options);
    let ops = lcs_diff(&split_lines(&old_text), &split_lines(&new_text));

    let mut lines = Vec::with_capacity(ops.len());
    let mut stats = DiffStats::default();
    let (mut old_line, mut new_line) = (1, 1);
    for op in &ops {
        let (old, new, change_type) = match op.tag {
            DiffTag::Equal => {
                stats.context += 1;
                old_line += 1;
                new_line += 1;
                (Some(old_line - 1), Some(new_line - 1), DiffChangeType::Context)
            }
            DiffTag::Delete => {
                stats.deletions += 1;
                old_line += 1;
                (Some(old_line - 1), None, DiffChangeType::Deletion)
            }
            DiffTag::Insert => {
                stats.additions += 1;
                new_line += 1;
                (None, Some(new_line - 1), DiffChangeType::Addition)
            }
        };
        lines.push(DiffLine {
            old_line: old,
            new_line: new,
            content: op.text.clone(),
            change_type,
        });
    }

    DiffResult { ops, lines, stats }
}

/// Groups changed lines into `[start, end)` windows of `lines`, merging
/// windows whose context overlaps.
fn hunk_ranges(lines: &[DiffLine], context: usize) -> Vec<(usize, usize)> {
    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if line.change_type == DiffChangeType::Context {
            continue;
        }
        let start = idx.saturating_sub(context);
        let end = (idx + 1 + context).min(lines.len());
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => hunks.push((start, end)),
        }
    }
    hunks
}

/// `start,count` for one side of a hunk header. An empty side points at
/// the line before the hunk, as git does.
fn hunk_span(before: usize, count: usize) -> String {
    if count == 0 {
        format!("{before},0")
    } else {
        format!("{},{count}", before + 1)
    }
}

/// Generate unified diff format string (similar to git diff)
///
/// Returns an empty string when the texts compare equal.
pub fn unified_diff(
    old_text: &str,
    new_text: &str,
    old_name: &str,
    new_name: &str,
    options: &DiffOptions,
) -> String {
    let result = diff_lines(old_text, new_text, options);
    let hunks = hunk_ranges(&result.lines, options.context_lines);
    if hunks.is_empty() {
        return String::new();
    }

    let mut output = format!("--- {old_name}\n+++ {new_name}\n");
    for (start, end) in hunks {
        let before = &result.lines[..start];
        let hunk = &result.lines[start..end];
        let old_before = before.iter().filter(|l| l.old_line.is_some()).count();
        let new_before = before.iter().filter(|l| l.new_line.is_some()).count();
        let old_count = hunk.iter().filter(|l| l.old_line.is_some()).count();
        let new_count = hunk.iter().filter(|l| l.new_line.is_some()).count();

        output.push_str(&format!(
            "@@ -{} +{} @@\n",
            hunk_span(old_before, old_count),
            hunk_span(new_before, new_count)
        ));
        for line in hunk {
            output.push(line.change_type.marker());
            output.push_str(&line.content);
            output.push('\n');
        }
    }
    output
}
