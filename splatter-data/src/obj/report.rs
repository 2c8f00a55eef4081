//! Parse outcome bookkeeping.

use super::RecordKind;
use crate::error::LineError;

/// A line that was recognised but could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the source.
    pub line: usize,
    pub kind: RecordKind,
    pub reason: LineError,
}

/// Summary of a single OBJ parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Non-blank lines seen.
    pub lines_read: usize,
    /// Lines whose keyword is not handled (`#`, `o`, `usemtl`, ...).
    pub ignored_lines: usize,
    pub skipped: Vec<SkippedLine>,
}

impl ParseReport {
    pub fn skip(&mut self, line: usize, kind: RecordKind, reason: LineError) {
        self.skipped.push(SkippedLine { line, kind, reason });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of skipped lines of one record kind.
    pub fn skipped_of(&self, kind: RecordKind) -> usize {
        self.skipped.iter().filter(|s| s.kind == kind).count()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
