//! `tablekit_clipboard` v1:
//! Selection and clipboard copy/paste kernel for an editable grid.
//!
//! - `spec`      : coordinates, snapshot, key event, errors
//! - `selection` : rectangle selection and drag lifecycle
//! - `codec`     : tab/newline clipboard text format
//! - `backend`   : clipboard boundary trait and adapters
//! - `report`    : copy/paste reports
//! - `engine`    : copy and paste
//! - `keyboard`  : shortcut dispatch
pub mod backend;
pub mod codec;
pub mod engine;
pub mod keyboard;
pub mod report;
pub mod selection;
pub mod spec;

#[cfg(feature = "system-clipboard")]
pub use backend::SystemClipboard;
pub use backend::{ClipboardBackend, MemoryClipboard};
pub use codec::{format_clipboard_text, parse_clipboard_text};
pub use engine::ClipboardEngine;
pub use keyboard::{EnumShortcutCommand, EnumShortcutOutcome};
pub use report::{ReportCopy, ReportPaste, ReportPasteBuilder};
pub use selection::SelectionState;
pub use spec::{
    ClipboardAccessError, ClipboardError, EnumPasteCellErrorKind, EnumPasteSource,
    EnumSelectionPhase, SpecCellCoord, SpecClipboardSnapshot, SpecKeyEvent, SpecPasteCellError,
};
