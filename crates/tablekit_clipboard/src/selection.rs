//! Rectangular cell selection and pointer-drag lifecycle.

use std::collections::BTreeSet;

use crate::spec::{EnumSelectionPhase, SpecCellCoord};

/// Current selection plus drag anchor/extent.
///
/// Cells are stored row-major in the order `select_range` enumerated them.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    cells: Vec<SpecCellCoord>,
    set_cells: BTreeSet<SpecCellCoord>,
    anchor: Option<SpecCellCoord>,
    extent: Option<SpecCellCoord>,
    phase: EnumSelectionPhase,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with the normalized rectangle spanned by two corners.
    pub fn select_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> &[SpecCellCoord] {
        let (n_row_min, n_row_max) = (start_row.min(end_row), start_row.max(end_row));
        let (n_col_min, n_col_max) = (start_col.min(end_col), start_col.max(end_col));

        let n_rows = (n_row_max - n_row_min).checked_add(1);
        let n_cols = (n_col_max - n_col_min).checked_add(1);
        let Some((n_rows, n_cols, n_cells)) = n_rows
            .zip(n_cols)
            .and_then(|(r, c)| r.checked_mul(c).map(|n| (r, c, n)))
        else {
            tracing::warn!(
                "select range [{n_row_min},{n_col_min}]..[{n_row_max},{n_col_max}] is not addressable"
            );
            self.cells.clear();
            self.set_cells.clear();
            return &self.cells;
        };

        let mut l_cells = Vec::with_capacity(n_cells);
        for row in n_row_min..=n_row_max {
            for col in n_col_min..=n_col_max {
                l_cells.push(SpecCellCoord::new(row, col));
            }
        }

        tracing::debug!(
            rows = n_rows,
            cols = n_cols,
            "select range [{n_row_min},{n_col_min}]..[{n_row_max},{n_col_max}]"
        );
        self.set_cells = l_cells.iter().copied().collect();
        self.cells = l_cells;
        &self.cells
    }

    /// Drop the selection and any drag state.
    pub fn clear_selection(&mut self) {
        self.cells.clear();
        self.set_cells.clear();
        self.anchor = None;
        self.extent = None;
        self.phase = EnumSelectionPhase::Idle;
    }

    pub fn is_cell_selected(&self, row: usize, col: usize) -> bool {
        self.set_cells.contains(&SpecCellCoord::new(row, col))
    }

    pub fn cells(&self) -> &[SpecCellCoord] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn phase(&self) -> EnumSelectionPhase {
        self.phase
    }

    pub fn anchor(&self) -> Option<SpecCellCoord> {
        self.anchor
    }

    pub fn extent(&self) -> Option<SpecCellCoord> {
        self.extent
    }

    /// Start a drag at `(row, col)`; the selection collapses to that cell.
    pub fn begin_drag(&mut self, row: usize, col: usize) {
        let coord = SpecCellCoord::new(row, col);
        self.anchor = Some(coord);
        self.extent = Some(coord);
        self.phase = EnumSelectionPhase::Selecting;
        self.select_range(row, col, row, col);
    }

    /// Move the drag extent. Ignored unless a drag is in progress.
    pub fn update_drag(&mut self, row: usize, col: usize) {
        if self.phase != EnumSelectionPhase::Selecting {
            tracing::trace!(row, col, "drag update ignored while idle");
            return;
        }
        self.extent = Some(SpecCellCoord::new(row, col));
    }

    /// Finish the drag and materialize the anchor..extent rectangle.
    pub fn end_drag(&mut self) {
        if self.phase != EnumSelectionPhase::Selecting {
            return;
        }
        if let (Some(anchor), Some(extent)) = (self.anchor, self.extent) {
            self.select_range(anchor.row, anchor.col, extent.row, extent.col);
        }
        self.phase = EnumSelectionPhase::Idle;
    }

    /// Distinct selected row indices, ascending.
    pub fn selected_row_indices(&self) -> Vec<usize> {
        let set_rows: BTreeSet<usize> = self.cells.iter().map(|c| c.row).collect();
        set_rows.into_iter().collect()
    }

    /// Distinct selected column indices, ascending.
    pub fn selected_col_indices(&self) -> Vec<usize> {
        let set_cols: BTreeSet<usize> = self.cells.iter().map(|c| c.col).collect();
        set_cols.into_iter().collect()
    }
}
