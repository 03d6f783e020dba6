//! `tablekit_io` v1:
//! Grid export (CSV / Excel / JSON) and Excel import kernel.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : options, reports, errors
//! - `util`   : pure helper functions
//! - `sink`   : download sink boundary and adapters
//! - `writer` : export kernels
//! - `reader` : Excel import kernel
pub mod conf;
pub mod reader;
pub mod sink;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_FILE_NAME_CSV, C_FILE_NAME_JSON, C_FILE_NAME_XLSX, C_SHEET_NAME_DEFAULT, N_WIDTH_COLUMN_MIN,
};
pub use reader::{
    SpecSheetRecord, convert_record_to_row, import_from_excel, import_from_excel_file,
    read_first_sheet_records,
};
pub use sink::{DirectorySink, DownloadSink, MemorySink, SpecSavedFile};
pub use spec::{
    EnumExportFormat, EnumSelectMismatchRule, ExportError, ImportError, ReportExport,
    SpecExportOptions, SpecImportOptions,
};
pub use util::{EnumExportCell, calculate_column_width, derive_export_cell, sanitize_sheet_name};
pub use writer::{
    export_table, export_to_csv, export_to_excel, export_to_json, render_csv_text,
    render_json_text, render_xlsx_bytes,
};
