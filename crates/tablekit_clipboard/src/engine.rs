//! Copy/paste engine: one instance per grid.

use tablekit_grid::{
    CellConvertError, CellValue, SpecColumn, SpecGridLocale, SpecRow, convert_and_validate_text,
    format_cell_display,
};

use crate::backend::ClipboardBackend;
use crate::codec::{format_clipboard_text, parse_clipboard_text};
use crate::report::{ReportCopy, ReportPaste, ReportPasteBuilder};
use crate::selection::SelectionState;
use crate::spec::{ClipboardError, EnumPasteCellErrorKind, EnumPasteSource, SpecClipboardSnapshot};

/// Owns the selection, the last-copy snapshot, and the clipboard backend.
///
/// The grid itself is never held: every call borrows the current rows and
/// columns, and paste mutates only through the caller's callback.
#[derive(Debug)]
pub struct ClipboardEngine<B: ClipboardBackend> {
    backend: B,
    locale: SpecGridLocale,
    selection: SelectionState,
    snapshot: Option<SpecClipboardSnapshot>,
}

impl<B: ClipboardBackend> ClipboardEngine<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            locale: SpecGridLocale::default(),
            selection: SelectionState::new(),
            snapshot: None,
        }
    }

    pub fn with_locale(mut self, locale: SpecGridLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> &SpecGridLocale {
        &self.locale
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Last copied rectangle, if any copy ran.
    pub fn snapshot(&self) -> Option<&SpecClipboardSnapshot> {
        self.snapshot.as_ref()
    }

    ////////////////////////////////////////////////////////////////////////////
    // #region Copy

    /// Copy the `row_indices x col_indices` cross product as display text.
    ///
    /// Indices outside the grid produce empty cells. The snapshot is stored
    /// before the clipboard write, so it survives a write failure.
    pub fn copy_selected_cells(
        &mut self,
        rows: &[SpecRow],
        columns: &[SpecColumn],
        row_indices: &[usize],
        col_indices: &[usize],
    ) -> Result<ReportCopy, ClipboardError> {
        if row_indices.is_empty() || col_indices.is_empty() {
            return Err(ClipboardError::EmptySelection);
        }

        let l_data: Vec<Vec<String>> = row_indices
            .iter()
            .map(|&idx_row| {
                let row = rows.get(idx_row);
                col_indices
                    .iter()
                    .map(|&idx_col| match columns.get(idx_col) {
                        Some(column) => format_cell_display(
                            row.and_then(|r| r.get(&column.key)),
                            column,
                            &self.locale,
                        ),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();

        let c_text = format_clipboard_text(&l_data);
        let report = ReportCopy {
            n_rows: row_indices.len(),
            n_cols: col_indices.len(),
        };
        self.snapshot = Some(SpecClipboardSnapshot {
            n_rows: report.n_rows,
            n_cols: report.n_cols,
            data: l_data,
        });

        if let Err(e) = self.backend.write_text(&c_text) {
            tracing::error!("clipboard write failed: {e}");
            return Err(ClipboardError::ClipboardWrite(e.0));
        }
        tracing::info!("{report}");
        Ok(report)
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region Paste

    fn derive_paste_matrix(&mut self) -> Result<(Vec<Vec<String>>, EnumPasteSource), ClipboardError> {
        let c_text = match self.backend.read_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("clipboard read failed, using snapshot: {e}");
                String::new()
            }
        };

        let (l_data, source) = if !c_text.is_empty() {
            (parse_clipboard_text(&c_text), EnumPasteSource::Clipboard)
        } else if let Some(snapshot) = &self.snapshot {
            (snapshot.data.clone(), EnumPasteSource::Snapshot)
        } else {
            return Err(ClipboardError::NoPasteData);
        };

        if l_data.is_empty() {
            return Err(ClipboardError::EmptyPasteData);
        }
        Ok((l_data, source))
    }

    /// Paste the clipboard (or snapshot) matrix anchored at `(start_row, start_col)`.
    ///
    /// Out-of-grid and non-editable targets are skipped. Cells that fail
    /// conversion or validation are reported and do not abort the run.
    pub fn paste_to_selected_cells<F>(
        &mut self,
        rows: &[SpecRow],
        columns: &[SpecColumn],
        start_row: usize,
        start_col: usize,
        mut on_update: F,
    ) -> Result<ReportPaste, ClipboardError>
    where
        F: FnMut(&SpecRow, &SpecColumn, CellValue),
    {
        let (l_data, source) = self.derive_paste_matrix()?;
        let mut builder = ReportPasteBuilder::new(source);

        for (off_row, l_cells) in l_data.iter().enumerate() {
            for (off_col, c_cell) in l_cells.iter().enumerate() {
                // An anchor near usize::MAX overflows; that target is off-grid too.
                let (Some(idx_row), Some(idx_col)) =
                    (start_row.checked_add(off_row), start_col.checked_add(off_col))
                else {
                    builder.add_skipped();
                    continue;
                };
                let (Some(row), Some(column)) = (rows.get(idx_row), columns.get(idx_col)) else {
                    builder.add_skipped();
                    continue;
                };
                if !column.editable {
                    builder.add_skipped();
                    continue;
                }

                match convert_and_validate_text(c_cell, column, &self.locale) {
                    Ok(value) => {
                        on_update(row, column, value);
                        builder.add_updated();
                    }
                    Err(e) => {
                        tracing::warn!(
                            row = idx_row,
                            col = idx_col,
                            field = %column.key,
                            "paste cell rejected: {e}"
                        );
                        builder.add_error(
                            idx_row,
                            idx_col,
                            &column.key,
                            derive_paste_error_kind(&e),
                            e.to_string(),
                        );
                    }
                }
            }
        }

        if builder.cnt_updated() == 0 {
            let cnt_failed = builder.cnt_failed();
            tracing::error!(cnt_failed, "paste applied no cells");
            return Err(ClipboardError::PasteFailed { cnt_failed });
        }
        let report = builder.build();
        tracing::info!("{report}");
        Ok(report)
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
}

fn derive_paste_error_kind(err: &CellConvertError) -> EnumPasteCellErrorKind {
    if err.is_validation() {
        EnumPasteCellErrorKind::Validation
    } else {
        EnumPasteCellErrorKind::Conversion
    }
}
