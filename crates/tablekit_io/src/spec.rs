//! Export/import options, reports, and top-level error types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tablekit_grid::SpecGridLocale;

use crate::conf::{
    C_FILE_NAME_CSV, C_FILE_NAME_JSON, C_FILE_NAME_XLSX, C_MIME_CSV, C_MIME_JSON, C_MIME_XLSX,
    derive_default_export_options, derive_default_import_options,
};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl EnumExportFormat {
    /// Download name used when the caller gives none.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Csv => C_FILE_NAME_CSV,
            Self::Xlsx => C_FILE_NAME_XLSX,
            Self::Json => C_FILE_NAME_JSON,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => C_MIME_CSV,
            Self::Xlsx => C_MIME_XLSX,
            Self::Json => C_MIME_JSON,
        }
    }
}

impl fmt::Display for EnumExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Xlsx => f.write_str("xlsx"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Import policy for `select` cells matching no option label or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSelectMismatchRule {
    /// Store the spreadsheet value unchanged.
    #[default]
    KeepRaw,
    /// Fail the whole import.
    Reject,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options shared by all export formats.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportOptions {
    /// Download name; format default when `None`.
    pub file_name: Option<String>,
    /// Literals used to render boolean cells.
    pub locale: SpecGridLocale,
    /// Worksheet name (Excel only).
    pub sheet_name: String,
    /// Minimum column width in characters (Excel only).
    pub width_column_min: f64,
    /// Bold header row (Excel only).
    pub if_bold_header: bool,
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        derive_default_export_options()
    }
}

impl SpecExportOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_locale(mut self, locale: SpecGridLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Resolved download name for `format`.
    pub fn derive_file_name(&self, format: EnumExportFormat) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format.default_file_name().to_string())
    }
}

/// Excel import options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecImportOptions {
    /// Literals accepted as boolean `true`.
    pub locale: SpecGridLocale,
    /// Handling of unmatched `select` values.
    pub rule_select_mismatch: EnumSelectMismatchRule,
}

impl Default for SpecImportOptions {
    fn default() -> Self {
        derive_default_import_options()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Report

/// Outcome of one export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub format: EnumExportFormat,
    /// Name handed to the download sink.
    pub file_name: String,
    pub mime_type: String,
    /// Exported data rows (header excluded).
    pub n_rows: usize,
    /// Exported columns.
    pub n_cols: usize,
    /// Payload size in bytes.
    pub n_bytes: usize,
}

impl ReportExport {
    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, usize> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("n_rows".to_string(), self.n_rows);
        dict_counts.insert("n_cols".to_string(), self.n_cols);
        dict_counts.insert("n_bytes".to_string(), self.n_bytes);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} {} -> {} rows={} cols={} bytes={}",
            self.format, self.file_name, self.n_rows, self.n_cols, self.n_bytes
        )
    }
}

impl fmt::Display for ReportExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[EXPORT]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Export failure; no partial file is delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(String),
    #[error("json export failed: {0}")]
    Json(String),
    #[error("excel export failed: {0}")]
    Xlsx(String),
    /// Download sink could not store the payload.
    #[error("failed to save {file_name:?}: {message}")]
    Sink { file_name: String, message: String },
}

/// Whole-file import failure; no rows are returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path:?}: {message}")]
    FileRead { path: PathBuf, message: String },
    /// Bytes are not a readable workbook.
    #[error("failed to open workbook: {0}")]
    Workbook(String),
    #[error("workbook has no worksheet")]
    NoWorksheet,
    /// `row` is the 1-based spreadsheet row.
    #[error("row {row}, column {column:?}: invalid number {text:?}")]
    InvalidNumber { row: usize, column: String, text: String },
    /// Only raised under [`EnumSelectMismatchRule::Reject`].
    #[error("row {row}, column {column:?}: invalid option {text:?}")]
    InvalidOption { row: usize, column: String, text: String },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
