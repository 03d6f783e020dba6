//! Stateless helpers used by the export/import kernels.

use rust_xlsxwriter::XlsxError;
use tablekit_grid::{CellValue, EnumColumnType, SpecColumn, SpecGridLocale, format_cell_display};

use crate::conf::{C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::ExportError;

////////////////////////////////////////////////////////////////////////////////
// #region ExportCellConversion

/// Typed worksheet cell produced from a stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumExportCell {
    Blank,
    Text(String),
    Number(f64),
    Bool(bool),
}

/// Map a stored value to a worksheet cell.
///
/// Boolean and matched select values become their display text; other
/// numbers and booleans keep their native cell type.
pub fn derive_export_cell(
    value: Option<&CellValue>,
    column: &SpecColumn,
    locale: &SpecGridLocale,
) -> EnumExportCell {
    let value = match value {
        None | Some(CellValue::Null) => return EnumExportCell::Blank,
        Some(v) => v,
    };
    match column.column_type {
        EnumColumnType::Boolean => {
            EnumExportCell::Text(locale.bool_literal(value.is_truthy()).to_string())
        }
        EnumColumnType::Select if column.find_option_by_value(value).is_some() => {
            EnumExportCell::Text(format_cell_display(Some(value), column, locale))
        }
        _ => match value {
            CellValue::Number(n) if n.is_finite() => EnumExportCell::Number(*n),
            CellValue::Bool(b) => EnumExportCell::Bool(*b),
            other => EnumExportCell::Text(other.to_string()),
        },
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorksheetLayout

/// Replace illegal characters, trim, and cap at the Excel length limit.
pub fn sanitize_sheet_name(name: &str) -> String {
    let c_name: String = name
        .chars()
        .map(|chr| if TUP_EXCEL_ILLEGAL.contains(&chr) { '_' } else { chr })
        .collect();
    let c_name = c_name.trim();
    if c_name.is_empty() {
        return C_SHEET_NAME_DEFAULT.to_string();
    }
    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Approximate display width: non-ASCII characters count as 1.6.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Column width for a header label, never below `width_min`.
pub fn calculate_column_width(label: &str, width_min: f64) -> f64 {
    (estimate_unicode_string_width(label) as f64).max(width_min)
}

pub(crate) fn cast_row_num(value: usize) -> Result<u32, ExportError> {
    u32::try_from(value).map_err(|_| ExportError::Xlsx(format!("row index overflow: {value}")))
}

pub(crate) fn cast_col_num(value: usize) -> Result<u16, ExportError> {
    u16::try_from(value).map_err(|_| ExportError::Xlsx(format!("column index overflow: {value}")))
}

pub(crate) fn derive_xlsx_error(err: XlsxError) -> ExportError {
    ExportError::Xlsx(err.to_string())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
