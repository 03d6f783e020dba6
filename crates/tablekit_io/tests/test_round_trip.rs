use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tablekit_grid::{CellValue, EnumColumnType, SpecColumn, SpecGridLocale, SpecRow, SpecSelectOption};
use tablekit_io::{
    DirectorySink, EnumSelectMismatchRule, ImportError, MemorySink, SpecExportOptions,
    SpecImportOptions, export_to_excel, import_from_excel, import_from_excel_file,
    read_first_sheet_records,
};

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new() -> Self {
        let n = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("tablekit_io_test_{n}"));
        std::fs::create_dir_all(&path).expect("create test dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn derive_columns() -> Vec<SpecColumn> {
    vec![
        SpecColumn::new("name", "Name", EnumColumnType::Text),
        SpecColumn::new("age", "Age", EnumColumnType::Number),
        SpecColumn::new("ok", "Active", EnumColumnType::Boolean),
        SpecColumn::new("status", "Status", EnumColumnType::Select).with_options(vec![
            SpecSelectOption::new("Open", "open"),
            SpecSelectOption::new("Closed", "closed"),
        ]),
        SpecColumn::new("due", "Due", EnumColumnType::Date),
    ]
}

fn derive_rows() -> Vec<SpecRow> {
    vec![
        SpecRow::new(1)
            .with_value("name", "Ann")
            .with_value("age", 31_i64)
            .with_value("ok", true)
            .with_value("status", "open")
            .with_value("due", "2024-05-01"),
        SpecRow::new(2)
            .with_value("name", "Bob")
            .with_value("ok", false)
            .with_value("status", "legacy"),
    ]
}

fn export_xlsx_bytes(options: &SpecExportOptions) -> Vec<u8> {
    let mut sink = MemorySink::new();
    export_to_excel(&derive_rows(), &derive_columns(), &mut sink, options).expect("export");
    sink.last().expect("saved").bytes.clone()
}

#[test]
fn excel_export_writes_display_values() {
    let v_bytes = export_xlsx_bytes(&SpecExportOptions::default());
    let l_records = read_first_sheet_records(&v_bytes).expect("read back");

    assert_eq!(l_records.len(), 2);
    assert_eq!(l_records[0].n_row, 2);
    assert_eq!(l_records[0].values["Active"], CellValue::from("是"));
    assert_eq!(l_records[0].values["Status"], CellValue::from("Open"));
    assert_eq!(l_records[0].values["Age"], CellValue::Number(31.0));
    assert_eq!(l_records[1].values["Active"], CellValue::from("否"));
    assert_eq!(l_records[1].values["Status"], CellValue::from("legacy"));
    assert!(!l_records[1].values.contains_key("Age"));
}

#[test]
fn excel_round_trip_restores_typed_values() {
    let v_bytes = export_xlsx_bytes(&SpecExportOptions::default());
    let l_rows =
        import_from_excel(&v_bytes, &derive_columns(), &SpecImportOptions::default()).expect("import");

    assert_eq!(l_rows.len(), 2);
    assert!(l_rows.iter().all(|r| r.if_is_new));
    assert_ne!(l_rows[0].id, l_rows[1].id);

    assert_eq!(l_rows[0].get("name"), Some(&CellValue::from("Ann")));
    assert_eq!(l_rows[0].get("age"), Some(&CellValue::Number(31.0)));
    assert_eq!(l_rows[0].get("ok"), Some(&CellValue::Bool(true)));
    assert_eq!(l_rows[0].get("status"), Some(&CellValue::from("open")));
    assert_eq!(l_rows[0].get("due"), Some(&CellValue::from("2024-05-01")));

    assert_eq!(l_rows[1].get("age"), Some(&CellValue::from("")));
    assert_eq!(l_rows[1].get("ok"), Some(&CellValue::Bool(false)));
    assert_eq!(l_rows[1].get("status"), Some(&CellValue::from("legacy")));
}

#[test]
fn excel_round_trip_rejects_unknown_option_when_strict() {
    let v_bytes = export_xlsx_bytes(&SpecExportOptions::default());
    let options = SpecImportOptions {
        rule_select_mismatch: EnumSelectMismatchRule::Reject,
        ..SpecImportOptions::default()
    };
    let err = import_from_excel(&v_bytes, &derive_columns(), &options).unwrap_err();
    assert_eq!(
        err,
        ImportError::InvalidOption {
            row: 3,
            column: "Status".to_string(),
            text: "legacy".to_string(),
        }
    );
}

#[test]
fn excel_round_trip_with_english_locale() {
    let export_options = SpecExportOptions::default().with_locale(SpecGridLocale::english());
    let v_bytes = export_xlsx_bytes(&export_options);
    let import_options = SpecImportOptions {
        locale: SpecGridLocale::english(),
        ..SpecImportOptions::default()
    };
    let l_rows = import_from_excel(&v_bytes, &derive_columns(), &import_options).expect("import");
    assert_eq!(l_rows[0].get("ok"), Some(&CellValue::Bool(true)));
    assert_eq!(l_rows[1].get("ok"), Some(&CellValue::Bool(false)));
}

#[test]
fn excel_file_export_and_import() {
    let dir = TestDir::new();
    let mut sink = DirectorySink::new(dir.path());
    let report = export_to_excel(
        &derive_rows(),
        &derive_columns(),
        &mut sink,
        &SpecExportOptions::default(),
    )
    .expect("export");
    assert_eq!(report.file_name, "table-data.xlsx");

    let l_rows = import_from_excel_file(
        &dir.path().join(&report.file_name),
        &derive_columns(),
        &SpecImportOptions::default(),
    )
    .expect("import");
    assert_eq!(l_rows.len(), 2);
}

#[test]
fn excel_import_of_empty_grid_has_no_rows() {
    let mut sink = MemorySink::new();
    export_to_excel(&[], &derive_columns(), &mut sink, &SpecExportOptions::default())
        .expect("export");
    let v_bytes = &sink.last().expect("saved").bytes;
    let l_rows =
        import_from_excel(v_bytes, &derive_columns(), &SpecImportOptions::default()).expect("import");
    assert!(l_rows.is_empty());
}
