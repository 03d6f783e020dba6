//! Clipboard engine models and top-level error types.

use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Selection lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSelectionPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// Drag started; extent follows the pointer until the drag ends.
    Selecting,
}

/// Where the pasted matrix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPasteSource {
    /// Text read from the clipboard backend.
    Clipboard,
    /// In-process snapshot of the last copy.
    Snapshot,
}

impl fmt::Display for EnumPasteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clipboard => f.write_str("clipboard"),
            Self::Snapshot => f.write_str("snapshot"),
        }
    }
}

/// Kind of per-cell paste failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPasteCellErrorKind {
    /// Text could not be converted to the column type.
    Conversion,
    /// Column validator rejected the converted value.
    Validation,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SpecCellCoord {
    pub row: usize,
    pub col: usize,
}

impl SpecCellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Last copied rectangle, kept as paste fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecClipboardSnapshot {
    /// Number of copied rows.
    pub n_rows: usize,
    /// Number of copied columns.
    pub n_cols: usize,
    /// Display strings, row-major.
    pub data: Vec<Vec<String>>,
}

impl SpecClipboardSnapshot {
    pub fn from_matrix(data: Vec<Vec<String>>) -> Self {
        Self {
            n_rows: data.len(),
            n_cols: data.first().map_or(0, Vec::len),
            data,
        }
    }
}

/// Platform-neutral key event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecKeyEvent {
    /// Key value as reported by the host (`"c"`, `"V"`, ...).
    pub key: String,
    /// Control modifier held.
    pub if_ctrl: bool,
    /// Meta/command modifier held.
    pub if_meta: bool,
    /// Set by the engine when it intercepts the combination.
    pub if_default_prevented: bool,
}

impl SpecKeyEvent {
    pub fn new(key: impl Into<String>, if_ctrl: bool, if_meta: bool) -> Self {
        Self {
            key: key.into(),
            if_ctrl,
            if_meta,
            if_default_prevented: false,
        }
    }

    /// Suppress the host's default handling.
    pub fn prevent_default(&mut self) {
        self.if_default_prevented = true;
    }
}

/// One failed cell in a paste run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPasteCellError {
    /// Target row index.
    pub row: usize,
    /// Target column index.
    pub col: usize,
    /// Target column key.
    pub field: String,
    /// Failure kind.
    pub kind: EnumPasteCellErrorKind,
    /// User-facing error text.
    pub exception: String,
}

/// Clipboard backend failure (permission denied, API unavailable, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("clipboard access failed: {0}")]
pub struct ClipboardAccessError(pub String);

/// Copy/paste operation failures surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// Copy requested without selected rows or columns.
    #[error("select the cells to copy first")]
    EmptySelection,
    /// Clipboard write failed; the in-process snapshot is still valid.
    #[error("copy failed, check clipboard permissions: {0}")]
    ClipboardWrite(String),
    /// Neither clipboard text nor a snapshot is available.
    #[error("no data to paste")]
    NoPasteData,
    /// The paste source parsed to an empty matrix.
    #[error("paste data is empty")]
    EmptyPasteData,
    /// Data existed but no cell was applied.
    #[error("paste failed, check data format and target cells ({cnt_failed} cells failed)")]
    PasteFailed {
        /// Number of cells rejected by conversion/validation.
        cnt_failed: u64,
    },
    /// Paste shortcut without a selected anchor cell.
    #[error("select the paste start position first")]
    NoPasteTarget,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
