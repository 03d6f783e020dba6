//! Excel import kernel: first worksheet, header row, label-keyed records.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use tablekit_grid::{CellValue, EnumColumnType, RowId, SpecColumn, SpecRow, parse_number_text};
use uuid::Uuid;

use crate::spec::{EnumSelectMismatchRule, ImportError, SpecImportOptions};

/// One data row of the first worksheet, keyed by header text.
///
/// `n_row` is the 1-based spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetRecord {
    pub n_row: usize,
    pub values: BTreeMap<String, CellValue>,
}

////////////////////////////////////////////////////////////////////////////////
// #region SheetReading

fn convert_data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(n) => CellValue::Number(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.time() == chrono::NaiveTime::MIN => {
                CellValue::Text(ts.date().format("%Y-%m-%d").to_string())
            }
            Some(ts) => CellValue::Text(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Header names; repeats get the first free `_1`, `_2`, ... suffix and blanks
/// stay unnamed.
fn derive_header_names(cells: &[Data]) -> Vec<Option<String>> {
    let l_names: Vec<String> = cells
        .iter()
        .map(|cell| convert_data_to_cell_value(cell).to_string())
        .collect();
    // Generated suffixes skip every name a header uses literally.
    let mut set_used: BTreeSet<String> = BTreeSet::new();
    let mut dict_next: BTreeMap<&str, usize> = BTreeMap::new();
    l_names
        .iter()
        .map(|c_name| {
            if c_name.is_empty() {
                return None;
            }
            if set_used.insert(c_name.clone()) {
                return Some(c_name.clone());
            }
            let n_next = dict_next.entry(c_name.as_str()).or_insert(1);
            loop {
                let c_unique = format!("{c_name}_{n_next}");
                *n_next += 1;
                if !l_names.contains(&c_unique) && set_used.insert(c_unique.clone()) {
                    return Some(c_unique);
                }
            }
        })
        .collect()
}

/// Read the first worksheet of an xlsx payload as header-keyed records.
///
/// Rows whose cells are all blank are dropped; blank cells are omitted from
/// the record.
pub fn read_first_sheet_records(bytes: &[u8]) -> Result<Vec<SpecSheetRecord>, ImportError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::XlsxError| ImportError::Workbook(e.to_string()))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(ImportError::NoWorksheet);
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    // Range coordinates are relative to its first used cell.
    let n_row_offset = range.start().map_or(0, |(row, _)| row as usize);
    let mut iter_rows = range.rows();
    let Some(l_header_cells) = iter_rows.next() else {
        return Ok(Vec::new());
    };
    let l_headers = derive_header_names(l_header_cells);

    let mut l_records = Vec::new();
    for (idx, l_cells) in iter_rows.enumerate() {
        let mut dict_values = BTreeMap::new();
        for (c_header, cell) in l_headers.iter().zip(l_cells) {
            let Some(c_header) = c_header else {
                continue;
            };
            let value = convert_data_to_cell_value(cell);
            if !value.is_blank() {
                dict_values.insert(c_header.clone(), value);
            }
        }
        if dict_values.is_empty() {
            continue;
        }
        l_records.push(SpecSheetRecord {
            n_row: n_row_offset + idx + 2,
            values: dict_values,
        });
    }
    tracing::debug!(sheet = %sheet_name, n_records = l_records.len(), "read worksheet");
    Ok(l_records)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordConversion

fn convert_import_number(
    value: &CellValue,
    n_row: usize,
    column: &SpecColumn,
) -> Result<CellValue, ImportError> {
    match value {
        CellValue::Number(_) => Ok(value.clone()),
        CellValue::Bool(b) => Ok(CellValue::Number(if *b { 1.0 } else { 0.0 })),
        CellValue::Text(s) if s.trim().is_empty() => Ok(CellValue::Text(String::new())),
        CellValue::Text(s) => parse_number_text(s).map(CellValue::Number).ok_or_else(|| {
            ImportError::InvalidNumber {
                row: n_row,
                column: column.label.clone(),
                text: s.clone(),
            }
        }),
        CellValue::Null => Ok(CellValue::Text(String::new())),
    }
}

fn convert_import_select(
    value: &CellValue,
    n_row: usize,
    column: &SpecColumn,
    options: &SpecImportOptions,
) -> Result<CellValue, ImportError> {
    let c_text = value.to_string();
    let option = column
        .options()
        .iter()
        .find(|opt| opt.label == c_text || opt.value == *value)
        .or_else(|| column.find_option_by_text(&c_text));
    if let Some(opt) = option {
        return Ok(opt.value.clone());
    }
    match options.rule_select_mismatch {
        EnumSelectMismatchRule::KeepRaw => Ok(value.clone()),
        EnumSelectMismatchRule::Reject => Err(ImportError::InvalidOption {
            row: n_row,
            column: column.label.clone(),
            text: c_text,
        }),
    }
}

/// Map one sheet record onto the schema, producing a new row.
///
/// Each column reads the record entry named by its label. Missing values
/// become `false` for boolean columns and empty text otherwise.
pub fn convert_record_to_row(
    record: &SpecSheetRecord,
    columns: &[SpecColumn],
    options: &SpecImportOptions,
) -> Result<SpecRow, ImportError> {
    let mut row = SpecRow::new(RowId::Text(Uuid::new_v4().to_string()));
    row.if_is_new = true;

    for column in columns {
        let value = match record.values.get(&column.label) {
            Some(raw) if !raw.is_blank() => match column.column_type {
                EnumColumnType::Number => convert_import_number(raw, record.n_row, column)?,
                EnumColumnType::Boolean => CellValue::Bool(match raw {
                    CellValue::Bool(b) => *b,
                    other => options.locale.is_true_token(&other.to_string()),
                }),
                EnumColumnType::Select => {
                    convert_import_select(raw, record.n_row, column, options)?
                }
                EnumColumnType::Text | EnumColumnType::Date => raw.clone(),
            },
            _ => match column.column_type {
                EnumColumnType::Boolean => CellValue::Bool(false),
                _ => CellValue::Text(String::new()),
            },
        };
        row.set(column.key.clone(), value);
    }
    Ok(row)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Import

/// Import xlsx bytes as new rows. Any failing cell fails the whole import.
pub fn import_from_excel(
    bytes: &[u8],
    columns: &[SpecColumn],
    options: &SpecImportOptions,
) -> Result<Vec<SpecRow>, ImportError> {
    let result = read_first_sheet_records(bytes).and_then(|l_records| {
        l_records
            .iter()
            .map(|record| convert_record_to_row(record, columns, options))
            .collect::<Result<Vec<_>, _>>()
    });
    match &result {
        Ok(l_rows) => tracing::info!(n_rows = l_rows.len(), "imported rows from excel"),
        Err(e) => tracing::error!("excel import failed: {e}"),
    }
    result
}

/// Read `path` and import it with [`import_from_excel`].
pub fn import_from_excel_file(
    path: &Path,
    columns: &[SpecColumn],
    options: &SpecImportOptions,
) -> Result<Vec<SpecRow>, ImportError> {
    let v_bytes = fs::read(path).map_err(|e| {
        let err = ImportError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        tracing::error!("{err}");
        err
    })?;
    import_from_excel(&v_bytes, columns, options)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
