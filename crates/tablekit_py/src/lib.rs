use std::collections::BTreeMap;
use std::path::PathBuf;

use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use tablekit_clipboard::{
    ClipboardEngine, ClipboardError, EnumPasteCellErrorKind, MemoryClipboard, ReportPaste,
    SpecPasteCellError,
};
use tablekit_grid::{CellValue, SpecColumn, SpecGridLocale, SpecRow};
use tablekit_io::{
    DirectorySink, EnumExportFormat, EnumSelectMismatchRule, ExportError, ImportError,
    ReportExport, SpecExportOptions, SpecImportOptions,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "tablekit.grid.v1";
const C_BRIDGE_TRANSPORT: &str = "json";

////////////////////////////////////////////////////////////////////////////////
// #region ReportClasses

#[pyclass(name = "SpecPasteCellError")]
#[derive(Debug, Clone)]
struct PySpecPasteCellError {
    #[pyo3(get)]
    row: usize,
    #[pyo3(get)]
    col: usize,
    #[pyo3(get)]
    field: String,
    #[pyo3(get)]
    kind: String,
    #[pyo3(get)]
    exception: String,
}

impl From<SpecPasteCellError> for PySpecPasteCellError {
    fn from(spec_error: SpecPasteCellError) -> Self {
        let kind = match spec_error.kind {
            EnumPasteCellErrorKind::Conversion => "conversion",
            EnumPasteCellErrorKind::Validation => "validation",
        };
        Self {
            row: spec_error.row,
            col: spec_error.col,
            field: spec_error.field,
            kind: kind.to_string(),
            exception: spec_error.exception,
        }
    }
}

#[pyclass(name = "ReportPaste")]
#[derive(Debug, Clone)]
struct PyReportPaste {
    #[pyo3(get)]
    source: String,
    #[pyo3(get)]
    cnt_updated: u64,
    #[pyo3(get)]
    cnt_failed: u64,
    #[pyo3(get)]
    cnt_skipped: u64,
    #[pyo3(get)]
    errors: Vec<PySpecPasteCellError>,
    /// Rows after applying the paste, as JSON.
    #[pyo3(get)]
    rows_json: String,
}

impl PyReportPaste {
    fn new(report: ReportPaste, rows_json: String) -> Self {
        Self {
            source: report.source.to_string(),
            cnt_updated: report.cnt_updated,
            cnt_failed: report.cnt_failed,
            cnt_skipped: report.cnt_skipped,
            errors: report
                .errors
                .into_iter()
                .map(PySpecPasteCellError::from)
                .collect(),
            rows_json,
        }
    }
}

#[pymethods]
impl PyReportPaste {
    #[getter]
    fn error_count(&self) -> usize {
        self.errors.len()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_updated".to_string(), self.cnt_updated);
        dict_counts.insert("cnt_failed".to_string(), self.cnt_failed);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts
    }

    #[pyo3(signature = (prefix = "[PASTE]"))]
    fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} source={} updated={} failed={} skipped={}",
            self.source, self.cnt_updated, self.cnt_failed, self.cnt_skipped
        )
    }

    fn __str__(&self) -> String {
        self.format("[PASTE]")
    }
}

#[pyclass(name = "ReportExport")]
#[derive(Debug, Clone)]
struct PyReportExport {
    #[pyo3(get)]
    format: String,
    #[pyo3(get)]
    file_name: String,
    #[pyo3(get)]
    mime_type: String,
    #[pyo3(get)]
    n_rows: usize,
    #[pyo3(get)]
    n_cols: usize,
    #[pyo3(get)]
    n_bytes: usize,
}

impl From<ReportExport> for PyReportExport {
    fn from(report: ReportExport) -> Self {
        Self {
            format: report.format.to_string(),
            file_name: report.file_name,
            mime_type: report.mime_type,
            n_rows: report.n_rows,
            n_cols: report.n_cols,
            n_bytes: report.n_bytes,
        }
    }
}

#[pymethods]
impl PyReportExport {
    fn to_dict(&self) -> BTreeMap<String, usize> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("n_rows".to_string(), self.n_rows);
        dict_counts.insert("n_cols".to_string(), self.n_cols);
        dict_counts.insert("n_bytes".to_string(), self.n_bytes);
        dict_counts
    }

    fn __str__(&self) -> String {
        format!(
            "[EXPORT] {} -> {} rows={} cols={} bytes={}",
            self.format, self.file_name, self.n_rows, self.n_cols, self.n_bytes
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ArgumentParsing

fn parse_rows(rows_json: &str) -> PyResult<Vec<SpecRow>> {
    serde_json::from_str(rows_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid rows JSON: {e}")))
}

fn parse_columns(columns_json: &str) -> PyResult<Vec<SpecColumn>> {
    serde_json::from_str(columns_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid columns JSON: {e}")))
}

fn dump_rows(rows: &[SpecRow]) -> PyResult<String> {
    serde_json::to_string(rows).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn parse_locale(value: &str) -> PyResult<SpecGridLocale> {
    match value {
        "default" => Ok(SpecGridLocale::default()),
        "english" => Ok(SpecGridLocale::english()),
        _ => Err(PyValueError::new_err(format!(
            "Invalid locale: `{value}`. Expected one of: ['default', 'english']"
        ))),
    }
}

fn parse_export_format(value: &str) -> PyResult<EnumExportFormat> {
    match value {
        "csv" => Ok(EnumExportFormat::Csv),
        "xlsx" => Ok(EnumExportFormat::Xlsx),
        "json" => Ok(EnumExportFormat::Json),
        _ => Err(PyValueError::new_err(format!(
            "Invalid export format: `{value}`. Expected one of: ['csv', 'xlsx', 'json']"
        ))),
    }
}

fn parse_rule_select_mismatch(value: &str) -> PyResult<EnumSelectMismatchRule> {
    match value {
        "keep_raw" => Ok(EnumSelectMismatchRule::KeepRaw),
        "reject" => Ok(EnumSelectMismatchRule::Reject),
        _ => Err(PyValueError::new_err(format!(
            "Invalid select mismatch rule: `{value}`. Expected one of: ['keep_raw', 'reject']"
        ))),
    }
}

fn map_clipboard_error(exception: ClipboardError) -> PyErr {
    PyValueError::new_err(exception.to_string())
}

fn map_export_error(exception: ExportError) -> PyErr {
    match exception {
        ExportError::Sink { .. } => PyOSError::new_err(exception.to_string()),
        _ => PyValueError::new_err(exception.to_string()),
    }
}

fn map_import_error(exception: ImportError) -> PyErr {
    match exception {
        ImportError::FileRead { .. } => PyOSError::new_err(exception.to_string()),
        _ => PyValueError::new_err(exception.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Functions

#[pyfunction(name = "parse_clipboard_text")]
fn parse_clipboard_text_py(text: &str) -> Vec<Vec<String>> {
    tablekit_clipboard::parse_clipboard_text(text)
}

#[pyfunction(name = "format_clipboard_text")]
fn format_clipboard_text_py(data: Vec<Vec<String>>) -> String {
    tablekit_clipboard::format_clipboard_text(&data)
}

/// Paste `text` into the rows at `(start_row, start_col)` and return the
/// report with the updated rows attached.
#[pyfunction(name = "paste_text")]
#[pyo3(signature = (rows_json, columns_json, text, start_row, start_col, locale = "default"))]
fn paste_text_py(
    rows_json: &str,
    columns_json: &str,
    text: &str,
    start_row: usize,
    start_col: usize,
    locale: &str,
) -> PyResult<PyReportPaste> {
    let mut l_rows = parse_rows(rows_json)?;
    let l_columns = parse_columns(columns_json)?;
    let mut engine =
        ClipboardEngine::new(MemoryClipboard::with_text(text)).with_locale(parse_locale(locale)?);

    // Keyed by position: row ids are caller data and may repeat.
    let mut l_updates: Vec<(usize, String, CellValue)> = Vec::new();
    let l_view: &[SpecRow] = &l_rows;
    let report = engine
        .paste_to_selected_cells(l_view, &l_columns, start_row, start_col, |row, col, value| {
            if let Some(idx_row) = l_view.iter().position(|r| std::ptr::eq(r, row)) {
                l_updates.push((idx_row, col.key.clone(), value));
            }
        })
        .map_err(map_clipboard_error)?;

    for (idx_row, key, value) in l_updates {
        if let Some(row) = l_rows.get_mut(idx_row) {
            row.set(key, value);
        }
    }
    Ok(PyReportPaste::new(report, dump_rows(&l_rows)?))
}

/// Copy the `row_indices x col_indices` cells as clipboard text.
#[pyfunction(name = "copy_text")]
#[pyo3(signature = (rows_json, columns_json, row_indices, col_indices, locale = "default"))]
fn copy_text_py(
    rows_json: &str,
    columns_json: &str,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    locale: &str,
) -> PyResult<String> {
    let l_rows = parse_rows(rows_json)?;
    let l_columns = parse_columns(columns_json)?;
    let mut engine =
        ClipboardEngine::new(MemoryClipboard::new()).with_locale(parse_locale(locale)?);
    engine
        .copy_selected_cells(&l_rows, &l_columns, &row_indices, &col_indices)
        .map_err(map_clipboard_error)?;
    Ok(engine.backend().text().unwrap_or_default().to_string())
}

#[pyfunction(name = "render_csv")]
#[pyo3(signature = (rows_json, columns_json, locale = "default"))]
fn render_csv_py(rows_json: &str, columns_json: &str, locale: &str) -> PyResult<String> {
    let l_rows = parse_rows(rows_json)?;
    let l_columns = parse_columns(columns_json)?;
    tablekit_io::render_csv_text(&l_rows, &l_columns, &parse_locale(locale)?)
        .map_err(map_export_error)
}

#[pyfunction(name = "render_json")]
fn render_json_py(rows_json: &str, columns_json: &str) -> PyResult<String> {
    let l_rows = parse_rows(rows_json)?;
    let l_columns = parse_columns(columns_json)?;
    tablekit_io::render_json_text(&l_rows, &l_columns).map_err(map_export_error)
}

#[pyfunction(name = "render_xlsx")]
#[pyo3(signature = (rows_json, columns_json, sheet_name = "Data", locale = "default"))]
fn render_xlsx_py<'py>(
    py: Python<'py>,
    rows_json: &str,
    columns_json: &str,
    sheet_name: &str,
    locale: &str,
) -> PyResult<Bound<'py, PyBytes>> {
    let l_rows = parse_rows(rows_json)?;
    let l_columns = parse_columns(columns_json)?;
    let options = SpecExportOptions {
        sheet_name: sheet_name.to_string(),
        ..SpecExportOptions::default().with_locale(parse_locale(locale)?)
    };
    let v_bytes = py
        .allow_threads(|| tablekit_io::render_xlsx_bytes(&l_rows, &l_columns, &options))
        .map_err(map_export_error)?;
    Ok(PyBytes::new(py, &v_bytes))
}

#[pyfunction(name = "export_table")]
#[pyo3(signature = (format, rows_json, columns_json, dir_out, file_name = None, locale = "default"))]
fn export_table_py(
    py: Python<'_>,
    format: &str,
    rows_json: &str,
    columns_json: &str,
    dir_out: String,
    file_name: Option<String>,
    locale: &str,
) -> PyResult<PyReportExport> {
    let format = parse_export_format(format)?;
    let l_rows = parse_rows(rows_json)?;
    let l_columns = parse_columns(columns_json)?;
    let options = SpecExportOptions {
        file_name,
        ..SpecExportOptions::default().with_locale(parse_locale(locale)?)
    };
    let mut sink = DirectorySink::new(PathBuf::from(dir_out));

    let report = py
        .allow_threads(|| {
            tablekit_io::export_table(format, &l_rows, &l_columns, &mut sink, &options)
        })
        .map_err(map_export_error)?;
    Ok(PyReportExport::from(report))
}

/// Import xlsx bytes (or a file path) and return the new rows as JSON.
#[pyfunction(name = "import_xlsx")]
#[pyo3(signature = (source, columns_json, rule_select_mismatch = "keep_raw", locale = "default"))]
fn import_xlsx_py(
    py: Python<'_>,
    source: &Bound<'_, PyAny>,
    columns_json: &str,
    rule_select_mismatch: &str,
    locale: &str,
) -> PyResult<String> {
    let l_columns = parse_columns(columns_json)?;
    let options = SpecImportOptions {
        locale: parse_locale(locale)?,
        rule_select_mismatch: parse_rule_select_mismatch(rule_select_mismatch)?,
    };

    let l_rows = if let Ok(v_bytes) = source.extract::<Vec<u8>>() {
        py.allow_threads(|| tablekit_io::import_from_excel(&v_bytes, &l_columns, &options))
    } else {
        let path_file: PathBuf = source.extract()?;
        py.allow_threads(|| tablekit_io::import_from_excel_file(&path_file, &l_columns, &options))
    }
    .map_err(map_import_error)?;
    dump_rows(&l_rows)
}

/// Install the stderr log subscriber; `False` if one already exists.
#[pyfunction(name = "init_logging")]
#[pyo3(signature = (directive = "warn"))]
fn init_logging_py(directive: &str) -> bool {
    tablekit_log::init_logging(directive).is_ok()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[pymodule]
fn _tablekit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PySpecPasteCellError>()?;
    module.add_class::<PyReportPaste>()?;
    module.add_class::<PyReportExport>()?;
    module.add_function(wrap_pyfunction!(parse_clipboard_text_py, module)?)?;
    module.add_function(wrap_pyfunction!(format_clipboard_text_py, module)?)?;
    module.add_function(wrap_pyfunction!(paste_text_py, module)?)?;
    module.add_function(wrap_pyfunction!(copy_text_py, module)?)?;
    module.add_function(wrap_pyfunction!(render_csv_py, module)?)?;
    module.add_function(wrap_pyfunction!(render_json_py, module)?)?;
    module.add_function(wrap_pyfunction!(render_xlsx_py, module)?)?;
    module.add_function(wrap_pyfunction!(export_table_py, module)?)?;
    module.add_function(wrap_pyfunction!(import_xlsx_py, module)?)?;
    module.add_function(wrap_pyfunction!(init_logging_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
