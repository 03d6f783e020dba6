//! CSV, Excel and JSON export kernels.
//!
//! `render_*` functions build the payload in memory; `export_*` functions
//! render, hand the payload to a [`DownloadSink`], and report.

use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};
use tablekit_grid::{SpecColumn, SpecGridLocale, SpecRow, format_cell_display};

use crate::conf::C_UTF8_BOM;
use crate::sink::DownloadSink;
use crate::spec::{EnumExportFormat, ExportError, ReportExport, SpecExportOptions};
use crate::util::{
    EnumExportCell, calculate_column_width, cast_col_num, cast_row_num, derive_export_cell,
    derive_xlsx_error, sanitize_sheet_name,
};

////////////////////////////////////////////////////////////////////////////////
// #region Render

/// CSV text with a UTF-8 BOM: label header, then display values.
///
/// Fields holding a comma, quote, or newline are quoted with inner quotes
/// doubled. Every record, the last included, ends with `\n`.
pub fn render_csv_text(
    rows: &[SpecRow],
    columns: &[SpecColumn],
    locale: &SpecGridLocale,
) -> Result<String, ExportError> {
    let derive_err = |e: csv::Error| ExportError::Csv(e.to_string());
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|col| col.label.as_str()))
        .map_err(derive_err)?;
    for row in rows {
        writer
            .write_record(
                columns
                    .iter()
                    .map(|col| format_cell_display(row.get(&col.key), col, locale)),
            )
            .map_err(derive_err)?;
    }

    let v_bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.error().to_string()))?;
    let c_body = String::from_utf8(v_bytes).map_err(|e| ExportError::Csv(e.to_string()))?;
    Ok(format!("{C_UTF8_BOM}{c_body}"))
}

/// Pretty JSON array of `{key: raw value}` objects in column order.
///
/// Keys absent from a row are omitted; stored nulls are kept.
pub fn render_json_text(rows: &[SpecRow], columns: &[SpecColumn]) -> Result<String, ExportError> {
    let l_records = rows
        .iter()
        .map(|row| {
            let mut dict_record = Map::new();
            for col in columns {
                if let Some(value) = row.get(&col.key) {
                    let json_value = serde_json::to_value(value)
                        .map_err(|e| ExportError::Json(e.to_string()))?;
                    dict_record.insert(col.key.clone(), json_value);
                }
            }
            Ok(Value::Object(dict_record))
        })
        .collect::<Result<Vec<_>, ExportError>>()?;
    serde_json::to_string_pretty(&l_records).map_err(|e| ExportError::Json(e.to_string()))
}

/// Single-sheet workbook: bold label header, then one row per grid row.
pub fn render_xlsx_bytes(
    rows: &[SpecRow],
    columns: &[SpecColumn],
    options: &SpecExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let fmt_header = if options.if_bold_header {
        Format::new().set_bold()
    } else {
        Format::new()
    };

    {
        let worksheet = workbook
            .add_worksheet()
            .set_name(sanitize_sheet_name(&options.sheet_name))
            .map_err(derive_xlsx_error)?;

        for (idx_col, col) in columns.iter().enumerate() {
            let n_col = cast_col_num(idx_col)?;
            worksheet
                .write_string_with_format(0, n_col, col.label.as_str(), &fmt_header)
                .map_err(derive_xlsx_error)?;
            worksheet
                .set_column_width(
                    n_col,
                    calculate_column_width(&col.label, options.width_column_min),
                )
                .map_err(derive_xlsx_error)?;
        }

        for (idx_row, row) in rows.iter().enumerate() {
            let n_row = cast_row_num(idx_row + 1)?;
            for (idx_col, col) in columns.iter().enumerate() {
                let n_col = cast_col_num(idx_col)?;
                match derive_export_cell(row.get(&col.key), col, &options.locale) {
                    EnumExportCell::Blank => {}
                    EnumExportCell::Text(text) => {
                        worksheet
                            .write_string(n_row, n_col, text)
                            .map_err(derive_xlsx_error)?;
                    }
                    EnumExportCell::Number(n) => {
                        worksheet
                            .write_number(n_row, n_col, n)
                            .map_err(derive_xlsx_error)?;
                    }
                    EnumExportCell::Bool(b) => {
                        worksheet
                            .write_boolean(n_row, n_col, b)
                            .map_err(derive_xlsx_error)?;
                    }
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(derive_xlsx_error)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Export

fn deliver_payload<S: DownloadSink + ?Sized>(
    format: EnumExportFormat,
    payload: Result<Vec<u8>, ExportError>,
    n_rows: usize,
    n_cols: usize,
    sink: &mut S,
    options: &SpecExportOptions,
) -> Result<ReportExport, ExportError> {
    let file_name = options.derive_file_name(format);
    let result = payload.and_then(|v_bytes| {
        sink.save(&v_bytes, &file_name, format.mime_type())?;
        Ok(v_bytes.len())
    });

    match result {
        Ok(n_bytes) => {
            let report = ReportExport {
                format,
                file_name,
                mime_type: format.mime_type().to_string(),
                n_rows,
                n_cols,
                n_bytes,
            };
            tracing::info!("{report}");
            Ok(report)
        }
        Err(e) => {
            tracing::error!(%format, file_name = %file_name, "export failed: {e}");
            Err(e)
        }
    }
}

/// Export to CSV (default name `table-data.csv`).
pub fn export_to_csv<S: DownloadSink + ?Sized>(
    rows: &[SpecRow],
    columns: &[SpecColumn],
    sink: &mut S,
    options: &SpecExportOptions,
) -> Result<ReportExport, ExportError> {
    let payload = render_csv_text(rows, columns, &options.locale).map(String::into_bytes);
    deliver_payload(EnumExportFormat::Csv, payload, rows.len(), columns.len(), sink, options)
}

/// Export to Excel (default name `table-data.xlsx`).
pub fn export_to_excel<S: DownloadSink + ?Sized>(
    rows: &[SpecRow],
    columns: &[SpecColumn],
    sink: &mut S,
    options: &SpecExportOptions,
) -> Result<ReportExport, ExportError> {
    let payload = render_xlsx_bytes(rows, columns, options);
    deliver_payload(EnumExportFormat::Xlsx, payload, rows.len(), columns.len(), sink, options)
}

/// Export to JSON (default name `table-data.json`).
pub fn export_to_json<S: DownloadSink + ?Sized>(
    rows: &[SpecRow],
    columns: &[SpecColumn],
    sink: &mut S,
    options: &SpecExportOptions,
) -> Result<ReportExport, ExportError> {
    let payload = render_json_text(rows, columns).map(String::into_bytes);
    deliver_payload(EnumExportFormat::Json, payload, rows.len(), columns.len(), sink, options)
}

/// Dispatch on `format`.
pub fn export_table<S: DownloadSink + ?Sized>(
    format: EnumExportFormat,
    rows: &[SpecRow],
    columns: &[SpecColumn],
    sink: &mut S,
    options: &SpecExportOptions,
) -> Result<ReportExport, ExportError> {
    match format {
        EnumExportFormat::Csv => export_to_csv(rows, columns, sink, options),
        EnumExportFormat::Xlsx => export_to_excel(rows, columns, sink, options),
        EnumExportFormat::Json => export_to_json(rows, columns, sink, options),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use tablekit_grid::{CellValue, EnumColumnType, SpecSelectOption};

    fn derive_columns() -> Vec<SpecColumn> {
        vec![
            SpecColumn::new("name", "Name", EnumColumnType::Text),
            SpecColumn::new("age", "Age", EnumColumnType::Number),
            SpecColumn::new("ok", "Active", EnumColumnType::Boolean),
            SpecColumn::new("status", "Status", EnumColumnType::Select).with_options(vec![
                SpecSelectOption::new("Open", "open"),
                SpecSelectOption::new("Closed", "closed"),
            ]),
        ]
    }

    fn derive_rows() -> Vec<SpecRow> {
        vec![
            SpecRow::new(1)
                .with_value("name", "Smith, \"J\"")
                .with_value("age", 31_i64)
                .with_value("ok", true)
                .with_value("status", "open"),
            SpecRow::new(2)
                .with_value("name", "Line\nBreak")
                .with_value("age", CellValue::Null)
                .with_value("ok", false)
                .with_value("status", "archived"),
        ]
    }

    #[test]
    fn test_render_csv_text() {
        let c_csv =
            render_csv_text(&derive_rows(), &derive_columns(), &SpecGridLocale::default())
                .expect("csv");
        assert_eq!(
            c_csv,
            "\u{feff}Name,Age,Active,Status\n\
             \"Smith, \"\"J\"\"\",31,是,Open\n\
             \"Line\nBreak\",,否,archived\n"
        );
    }

    #[test]
    fn test_render_json_text_keeps_raw_values_in_schema_order() {
        let mut l_rows = derive_rows();
        l_rows[0].if_editing = true;
        l_rows[1].values.remove("status");
        l_rows[1].set("extra", "ignored");

        let c_json = render_json_text(&l_rows, &derive_columns()).expect("json");
        let c_expected = r#"[
  {
    "name": "Smith, \"J\"",
    "age": 31,
    "ok": true,
    "status": "open"
  },
  {
    "name": "Line\nBreak",
    "age": null,
    "ok": false
  }
]"#;
        assert_eq!(c_json, c_expected);
    }

    #[test]
    fn test_export_to_csv_uses_default_name_and_mime() {
        let mut sink = MemorySink::new();
        let report = export_to_csv(
            &derive_rows(),
            &derive_columns(),
            &mut sink,
            &SpecExportOptions::default(),
        )
        .expect("export");

        assert_eq!(report.file_name, "table-data.csv");
        assert_eq!(report.n_rows, 2);
        assert_eq!(report.n_cols, 4);
        let saved = sink.last().expect("saved");
        assert_eq!(saved.mime_type, "text/csv;charset=utf-8;");
        assert_eq!(saved.bytes.len(), report.n_bytes);
        assert!(saved.bytes.starts_with("\u{feff}".as_bytes()));
    }

    #[test]
    fn test_export_to_json_custom_name() {
        let mut sink = MemorySink::new();
        let options = SpecExportOptions::default().with_file_name("rows.json");
        let report = export_table(
            EnumExportFormat::Json,
            &derive_rows(),
            &derive_columns(),
            &mut sink,
            &options,
        )
        .expect("export");
        assert_eq!(report.file_name, "rows.json");
        assert_eq!(sink.last().map(|f| f.file_name.as_str()), Some("rows.json"));
    }

    #[test]
    fn test_render_xlsx_bytes_is_zip() {
        let v_bytes =
            render_xlsx_bytes(&derive_rows(), &derive_columns(), &SpecExportOptions::default())
                .expect("xlsx");
        assert_eq!(&v_bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
    }
}
