//! Ctrl/Cmd+C and Ctrl/Cmd+V dispatch.

use tablekit_grid::{CellValue, SpecColumn, SpecRow};

use crate::backend::ClipboardBackend;
use crate::engine::ClipboardEngine;
use crate::report::{ReportCopy, ReportPaste};
use crate::spec::{ClipboardError, SpecKeyEvent};

/// Shortcut recognized on a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumShortcutCommand {
    Copy,
    Paste,
}

impl EnumShortcutCommand {
    /// `None` unless ctrl or meta is held with `c`/`C` or `v`/`V`.
    pub fn from_event(event: &SpecKeyEvent) -> Option<Self> {
        if !(event.if_ctrl || event.if_meta) {
            return None;
        }
        match event.key.as_str() {
            "c" | "C" => Some(Self::Copy),
            "v" | "V" => Some(Self::Paste),
            _ => None,
        }
    }
}

/// Result of an intercepted shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumShortcutOutcome {
    Copied(ReportCopy),
    Pasted(ReportPaste),
}

impl<B: ClipboardBackend> ClipboardEngine<B> {
    /// Route a key event to copy or paste.
    ///
    /// Returns `Ok(None)` when the event is not a copy/paste shortcut; the
    /// event's default action is left alone in that case.
    pub fn handle_keyboard_shortcut<F>(
        &mut self,
        event: &mut SpecKeyEvent,
        rows: &[SpecRow],
        columns: &[SpecColumn],
        row_indices: &[usize],
        col_indices: &[usize],
        on_update: F,
    ) -> Result<Option<EnumShortcutOutcome>, ClipboardError>
    where
        F: FnMut(&SpecRow, &SpecColumn, CellValue),
    {
        let Some(command) = EnumShortcutCommand::from_event(event) else {
            return Ok(None);
        };
        event.prevent_default();

        match command {
            EnumShortcutCommand::Copy => self
                .copy_selected_cells(rows, columns, row_indices, col_indices)
                .map(|r| Some(EnumShortcutOutcome::Copied(r))),
            EnumShortcutCommand::Paste => {
                let (Some(&idx_row), Some(&idx_col)) = (row_indices.first(), col_indices.first())
                else {
                    return Err(ClipboardError::NoPasteTarget);
                };
                self.paste_to_selected_cells(rows, columns, idx_row, idx_col, on_update)
                    .map(|r| Some(EnumShortcutOutcome::Pasted(r)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryClipboard;
    use tablekit_grid::EnumColumnType;

    fn derive_grid() -> (Vec<SpecRow>, Vec<SpecColumn>) {
        let l_columns = vec![
            SpecColumn::new("a", "A", EnumColumnType::Text).with_editable(true),
            SpecColumn::new("b", "B", EnumColumnType::Text).with_editable(true),
        ];
        let l_rows = vec![
            SpecRow::new(1).with_value("a", "a1").with_value("b", "b1"),
            SpecRow::new(2).with_value("a", "a2").with_value("b", "b2"),
        ];
        (l_rows, l_columns)
    }

    #[test]
    fn test_from_event() {
        assert_eq!(
            EnumShortcutCommand::from_event(&SpecKeyEvent::new("C", true, false)),
            Some(EnumShortcutCommand::Copy)
        );
        assert_eq!(
            EnumShortcutCommand::from_event(&SpecKeyEvent::new("v", false, true)),
            Some(EnumShortcutCommand::Paste)
        );
        assert_eq!(
            EnumShortcutCommand::from_event(&SpecKeyEvent::new("c", false, false)),
            None
        );
        assert_eq!(
            EnumShortcutCommand::from_event(&SpecKeyEvent::new("x", true, false)),
            None
        );
    }

    #[test]
    fn test_unrelated_key_is_not_intercepted() {
        let (l_rows, l_columns) = derive_grid();
        let mut engine = ClipboardEngine::new(MemoryClipboard::new());
        let mut event = SpecKeyEvent::new("z", true, false);
        let outcome = engine
            .handle_keyboard_shortcut(&mut event, &l_rows, &l_columns, &[0], &[0], |_, _, _| {})
            .expect("dispatch");
        assert_eq!(outcome, None);
        assert!(!event.if_default_prevented);
    }

    #[test]
    fn test_copy_then_paste_shortcuts() {
        let (l_rows, l_columns) = derive_grid();
        let mut engine = ClipboardEngine::new(MemoryClipboard::new());

        let mut ev_copy = SpecKeyEvent::new("c", true, false);
        let outcome = engine
            .handle_keyboard_shortcut(&mut ev_copy, &l_rows, &l_columns, &[0], &[0, 1], |_, _, _| {})
            .expect("copy");
        assert!(ev_copy.if_default_prevented);
        assert_eq!(
            outcome,
            Some(EnumShortcutOutcome::Copied(ReportCopy { n_rows: 1, n_cols: 2 }))
        );

        let mut l_updates = Vec::new();
        let mut ev_paste = SpecKeyEvent::new("V", false, true);
        let outcome = engine
            .handle_keyboard_shortcut(&mut ev_paste, &l_rows, &l_columns, &[1], &[0], |row, col, v| {
                l_updates.push((row.id.to_string(), col.key.clone(), v));
            })
            .expect("paste");
        assert!(ev_paste.if_default_prevented);
        assert!(matches!(outcome, Some(EnumShortcutOutcome::Pasted(ref r)) if r.cnt_updated == 2));
        assert_eq!(
            l_updates,
            vec![
                ("2".to_string(), "a".to_string(), CellValue::from("a1")),
                ("2".to_string(), "b".to_string(), CellValue::from("b1")),
            ]
        );
    }

    #[test]
    fn test_paste_shortcut_without_target() {
        let (l_rows, l_columns) = derive_grid();
        let mut engine = ClipboardEngine::new(MemoryClipboard::with_text("x"));
        let mut event = SpecKeyEvent::new("v", true, false);
        let err = engine
            .handle_keyboard_shortcut(&mut event, &l_rows, &l_columns, &[], &[0], |_, _, _| {})
            .unwrap_err();
        assert_eq!(err, ClipboardError::NoPasteTarget);
        assert!(event.if_default_prevented);
    }
}
