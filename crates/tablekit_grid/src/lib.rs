//! `tablekit_grid` v1:
//! Shared typed grid model for the clipboard and export/import kernels.
//!
//! - `conf` : constants and default presets
//! - `spec` : schema/row/value models and conversion errors
//! - `util` : pure display/conversion helpers
pub mod conf;
pub mod spec;
pub mod util;

pub use conf::{C_BOOL_LITERAL_NO, C_BOOL_LITERAL_YES, derive_default_locale};
pub use spec::{
    CellConvertError, CellValue, EnumColumnType, RowId, SpecColumn, SpecGridLocale, SpecRow,
    SpecSelectOption, TypeValidator, find_column,
};
pub use util::{
    convert_and_validate_text, convert_text_to_cell_value, format_cell_display,
    is_valid_date_text, parse_number_text, validate_cell_value,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_schema_from_json() {
        let c_json = r#"[
            {"key": "name", "label": "Name", "type": "text", "editable": true},
            {"key": "status", "label": "Status", "type": "select", "editable": true,
             "options": [{"label": "Active", "value": "active"}, {"label": "Off", "value": 0}]},
            {"key": "score", "label": "Score", "type": "number", "width": 120}
        ]"#;
        let l_columns: Vec<SpecColumn> = serde_json::from_str(c_json).expect("parse columns");

        assert_eq!(l_columns.len(), 3);
        assert_eq!(l_columns[0].column_type, EnumColumnType::Text);
        assert!(l_columns[0].editable);
        assert_eq!(l_columns[1].options().len(), 2);
        assert_eq!(l_columns[1].options()[1].value, CellValue::Number(0.0));
        assert!(!l_columns[2].editable);
        assert_eq!(l_columns[2].width, Some(120.0));
        assert!(l_columns[2].validator.is_none());
        assert!(find_column(&l_columns, "score").is_some());
        assert!(find_column(&l_columns, "missing").is_none());
    }

    #[test]
    fn test_row_json_keeps_ui_flags_out_of_values() {
        let c_json = r#"{"id": 7, "name": "Ann", "age": 31, "ok": true, "note": null,
                         "_editing": true, "_errors": {"age": "bad"}}"#;
        let row: SpecRow = serde_json::from_str(c_json).expect("parse row");

        assert_eq!(row.id, RowId::Int(7));
        assert!(row.if_editing);
        assert!(!row.if_is_new);
        assert_eq!(row.errors.get("age").map(String::as_str), Some("bad"));
        assert_eq!(row.values.len(), 4);
        assert_eq!(row.get("name"), Some(&CellValue::from("Ann")));
        assert_eq!(row.get("age"), Some(&CellValue::Number(31.0)));
        assert_eq!(row.get("ok"), Some(&CellValue::Bool(true)));
        assert_eq!(row.get("note"), Some(&CellValue::Null));
        assert!(row.get("_editing").is_none());
    }

    #[test]
    fn test_cell_value_json_numbers() {
        let l_values = vec![
            CellValue::Number(31.0),
            CellValue::Number(2.5),
            CellValue::Null,
            CellValue::from("x"),
            CellValue::Bool(false),
        ];
        assert_eq!(
            serde_json::to_string(&l_values).expect("serialize"),
            r#"[31,2.5,null,"x",false]"#
        );
    }

    #[test]
    fn test_locale_literals() {
        let locale = SpecGridLocale::english();
        assert_eq!(locale.bool_literal(true), "Yes");
        assert_eq!(locale.bool_literal(false), "No");
        assert!(locale.is_true_token("Yes"));
        assert!(locale.is_true_token("1"));
        assert!(!locale.is_true_token("是"));
        assert_eq!(SpecGridLocale::default().bool_literal_yes, C_BOOL_LITERAL_YES);
    }
}
