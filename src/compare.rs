//! Line-level comparison of a reference file and a candidate file.
//!
//! Both files are split into lines the way `sort` reads them, optionally
//! sorted byte-wise, and diffed. Differences are grouped into hunks and
//! rendered in the classic `diff` normal format (`3c3`, `< old`, `---`,
//! `> new`).

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use difference::{Changeset, Difference};
use serde::Serialize;
use termcolor::{Color, ColorSpec, NoColor, WriteColor};

use crate::errors::{CheckError, CheckResult};

// ============================================================================
// LINES
// ============================================================================

/// Splits `text` on `\n`. A trailing newline does not start a new line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_terminator('\n').map(str::to_owned).collect()
}

/// Reads `path` as lines. Invalid UTF-8 is replaced rather than rejected.
pub fn read_lines(path: &Path) -> CheckResult<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| CheckError::CompareRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

// ============================================================================
// HUNKS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HunkKind {
    Add,
    Delete,
    Change,
}

/// A maximal run of differing lines.
///
/// `reference_before`/`candidate_before` count the lines of each stream that
/// precede the hunk; line numbers in headers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub kind: HunkKind,
    pub reference_before: usize,
    pub candidate_before: usize,
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl Hunk {
    fn new(
        reference_before: usize,
        candidate_before: usize,
        removed: Vec<String>,
        added: Vec<String>,
    ) -> Self {
        let kind = match (removed.is_empty(), added.is_empty()) {
            (false, true) => HunkKind::Delete,
            (true, false) => HunkKind::Add,
            _ => HunkKind::Change,
        };
        Self {
            kind,
            reference_before,
            candidate_before,
            removed,
            added,
        }
    }

    /// The `diff` normal-format header, e.g. `2,3c2` or `0a1`.
    pub fn header(&self) -> String {
        let reference = match self.kind {
            HunkKind::Add => self.reference_before.to_string(),
            _ => range(self.reference_before, self.removed.len()),
        };
        let candidate = match self.kind {
            HunkKind::Delete => self.candidate_before.to_string(),
            _ => range(self.candidate_before, self.added.len()),
        };
        let op = match self.kind {
            HunkKind::Add => 'a',
            HunkKind::Delete => 'd',
            HunkKind::Change => 'c',
        };
        format!("{}{}{}", reference, op, candidate)
    }
}

fn range(before: usize, len: usize) -> String {
    if len == 1 {
        (before + 1).to_string()
    } else {
        format!("{},{}", before + 1, before + len)
    }
}

enum Op {
    Same(usize),
    Rem(String),
    Add(String),
}

#[derive(Default)]
struct HunkBuilder {
    hunks: Vec<Hunk>,
    reference_pos: usize,
    candidate_pos: usize,
    removed: Vec<String>,
    added: Vec<String>,
}

impl HunkBuilder {
    fn push(&mut self, op: Op) {
        match op {
            Op::Same(count) => {
                self.flush();
                self.reference_pos += count;
                self.candidate_pos += count;
            }
            Op::Rem(line) => self.removed.push(line),
            Op::Add(line) => self.added.push(line),
        }
    }

    fn flush(&mut self) {
        if self.removed.is_empty() && self.added.is_empty() {
            return;
        }
        let removed = std::mem::take(&mut self.removed);
        let added = std::mem::take(&mut self.added);
        let (r, a) = (removed.len(), added.len());
        self.hunks
            .push(Hunk::new(self.reference_pos, self.candidate_pos, removed, added));
        self.reference_pos += r;
        self.candidate_pos += a;
    }

    fn finish(mut self) -> Vec<Hunk> {
        self.flush();
        self.hunks
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Outcome of diffing two line streams. Empty when they are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub hunks: Vec<Hunk>,
}

impl Comparison {
    /// Compares the two line lists as multisets: both are sorted byte-wise
    /// first, like `sort` under `LC_ALL=C`.
    pub fn sorted(mut reference: Vec<String>, mut candidate: Vec<String>) -> Self {
        reference.sort_unstable();
        candidate.sort_unstable();

        // A merge walk over two sorted sequences yields a longest common
        // subsequence in linear time.
        let mut builder = HunkBuilder::default();
        let (mut i, mut j) = (0, 0);
        loop {
            let op = match (reference.get(i), candidate.get(j)) {
                (None, None) => break,
                (Some(r), Some(c)) if r == c => {
                    i += 1;
                    j += 1;
                    Op::Same(1)
                }
                (Some(r), Some(c)) if r > c => {
                    j += 1;
                    Op::Add(c.clone())
                }
                (Some(r), _) => {
                    i += 1;
                    Op::Rem(r.clone())
                }
                (None, Some(c)) => {
                    j += 1;
                    Op::Add(c.clone())
                }
            };
            builder.push(op);
        }
        Self {
            hunks: builder.finish(),
        }
    }

    /// Compares the two line lists in file order.
    ///
    /// Uses a full LCS table, so memory grows with the product of the two
    /// line counts.
    pub fn ordered(reference: &[String], candidate: &[String]) -> Self {
        let mut builder = HunkBuilder::default();
        if reference.is_empty() || candidate.is_empty() {
            // Changeset would see one empty line on the empty side.
            reference.iter().cloned().map(Op::Rem).for_each(|op| builder.push(op));
            candidate.iter().cloned().map(Op::Add).for_each(|op| builder.push(op));
            return Self {
                hunks: builder.finish(),
            };
        }

        let changeset = Changeset::new(&reference.join("\n"), &candidate.join("\n"), "\n");
        for diff in changeset.diffs {
            match diff {
                Difference::Same(chunk) => builder.push(Op::Same(chunk.split('\n').count())),
                Difference::Rem(chunk) => chunk
                    .split('\n')
                    .for_each(|line| builder.push(Op::Rem(line.to_owned()))),
                Difference::Add(chunk) => chunk
                    .split('\n')
                    .for_each(|line| builder.push(Op::Add(line.to_owned()))),
            }
        }
        Self {
            hunks: builder.finish(),
        }
    }

    /// Reads both files and compares them.
    pub fn files(reference: &Path, candidate: &Path, sort: bool) -> CheckResult<Self> {
        let reference = read_lines(reference)?;
        let candidate = read_lines(candidate)?;
        Ok(if sort {
            Self::sorted(reference, candidate)
        } else {
            Self::ordered(&reference, &candidate)
        })
    }

    pub fn is_match(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Writes the hunks in `diff` normal format, colored when `out` supports it.
    pub fn write_to<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        for hunk in &self.hunks {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, "{}", hunk.header())?;
            out.reset()?;
            writeln!(out)?;

            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            for line in &hunk.removed {
                writeln!(out, "< {}", line)?;
            }
            out.reset()?;
            if hunk.kind == HunkKind::Change {
                writeln!(out, "---")?;
            }
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            for line in &hunk.added {
                writeln!(out, "> {}", line)?;
            }
            out.reset()?;
        }
        Ok(())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = NoColor::new(Vec::new());
        self.write_to(&mut out).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&out.into_inner()))
    }
}
