//! Export/import constants and default preset factories.

use tablekit_grid::derive_default_locale;

use crate::spec::{EnumSelectMismatchRule, SpecExportOptions, SpecImportOptions};

/// Default download name for CSV export.
pub const C_FILE_NAME_CSV: &str = "table-data.csv";
/// Default download name for Excel export.
pub const C_FILE_NAME_XLSX: &str = "table-data.xlsx";
/// Default download name for JSON export.
pub const C_FILE_NAME_JSON: &str = "table-data.json";

pub const C_MIME_CSV: &str = "text/csv;charset=utf-8;";
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const C_MIME_JSON: &str = "application/json;charset=utf-8;";

/// Prepended to CSV output so spreadsheet apps detect UTF-8.
pub const C_UTF8_BOM: &str = "\u{feff}";

/// Worksheet name used by Excel export.
pub const C_SHEET_NAME_DEFAULT: &str = "Data";
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];
/// Lower bound for exported column widths, in characters.
pub const N_WIDTH_COLUMN_MIN: f64 = 15.0;

/// Build default export options.
pub fn derive_default_export_options() -> SpecExportOptions {
    SpecExportOptions {
        file_name: None,
        locale: derive_default_locale(),
        sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
        width_column_min: N_WIDTH_COLUMN_MIN,
        if_bold_header: true,
    }
}

/// Build default import options.
pub fn derive_default_import_options() -> SpecImportOptions {
    SpecImportOptions {
        locale: derive_default_locale(),
        rule_select_mismatch: EnumSelectMismatchRule::KeepRaw,
    }
}
