//! Copy/paste report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{EnumPasteCellErrorKind, EnumPasteSource, SpecPasteCellError};

/// Outcome of a successful copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCopy {
    /// Copied rows.
    pub n_rows: usize,
    /// Copied columns.
    pub n_cols: usize,
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "copied {} rows x {} columns", self.n_rows, self.n_cols)
    }
}

/// Aggregate counters and diagnostics for one paste run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaste {
    /// Source of the pasted matrix.
    pub source: EnumPasteSource,
    /// Cells passed to the update callback.
    pub cnt_updated: u64,
    /// Cells rejected by conversion or validation.
    pub cnt_failed: u64,
    /// Cells outside the grid or in non-editable columns.
    pub cnt_skipped: u64,
    /// Per-cell failures.
    pub errors: Vec<SpecPasteCellError>,
}

impl ReportPaste {
    /// Number of collected per-cell errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_updated".to_string(), self.cnt_updated);
        dict_counts.insert("cnt_failed".to_string(), self.cnt_failed);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} source={} updated={} failed={} skipped={}",
            self.source, self.cnt_updated, self.cnt_failed, self.cnt_skipped
        )
    }
}

impl fmt::Display for ReportPaste {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PASTE]"))
    }
}

/// Mutable accumulator for paste statistics.
#[derive(Debug, Clone)]
pub struct ReportPasteBuilder {
    source: EnumPasteSource,
    cnt_updated: u64,
    cnt_skipped: u64,
    errors: Vec<SpecPasteCellError>,
}

impl ReportPasteBuilder {
    pub fn new(source: EnumPasteSource) -> Self {
        Self {
            source,
            cnt_updated: 0,
            cnt_skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Increment updated count by one.
    pub fn add_updated(&mut self) {
        self.cnt_updated += 1;
    }

    /// Increment skipped count by one.
    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add one cell-scoped error.
    pub fn add_error(
        &mut self,
        row: usize,
        col: usize,
        field: &str,
        kind: EnumPasteCellErrorKind,
        exception: String,
    ) {
        self.errors.push(SpecPasteCellError {
            row,
            col,
            field: field.to_string(),
            kind,
            exception,
        });
    }

    pub fn cnt_updated(&self) -> u64 {
        self.cnt_updated
    }

    pub fn cnt_failed(&self) -> u64 {
        self.errors.len() as u64
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportPaste {
        ReportPaste {
            source: self.source,
            cnt_updated: self.cnt_updated,
            cnt_failed: self.errors.len() as u64,
            cnt_skipped: self.cnt_skipped,
            errors: self.errors,
        }
    }
}
