//! Stateless helpers shared by copy/paste and export/import.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::conf::C_MSG_VALIDATION_FAILED;
use crate::spec::{CellConvertError, CellValue, EnumColumnType, SpecColumn, SpecGridLocale};

////////////////////////////////////////////////////////////////////////////////
// #region DisplayFormatting

/// Render a stored value the way the grid displays it.
///
/// - absent / `Null` -> `""`
/// - boolean column -> yes/no literal by truthiness
/// - select column -> matching option label, else the raw value
/// - anything else -> plain string conversion
pub fn format_cell_display(
    value: Option<&CellValue>,
    column: &SpecColumn,
    locale: &SpecGridLocale,
) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if matches!(value, CellValue::Null) {
        return String::new();
    }

    match column.column_type {
        EnumColumnType::Boolean => locale.bool_literal(value.is_truthy()).to_string(),
        EnumColumnType::Select => match column.find_option_by_value(value) {
            Some(opt) => opt.label.clone(),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TextConversion

/// Parse numeric text; surrounding whitespace is allowed, non-finite is not.
pub fn parse_number_text(text: &str) -> Option<f64> {
    let n_value = text.trim().parse::<f64>().ok()?;
    if n_value.is_finite() {
        Some(n_value)
    } else {
        None
    }
}

/// `true` if `text` parses with any locale format or as RFC 3339.
pub fn is_valid_date_text(text: &str, locale: &SpecGridLocale) -> bool {
    let c_text = text.trim();
    if c_text.is_empty() {
        return false;
    }
    if locale
        .date_formats
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(c_text, fmt).is_ok())
    {
        return true;
    }
    if locale
        .datetime_formats
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(c_text, fmt).is_ok())
    {
        return true;
    }
    DateTime::parse_from_rfc3339(c_text).is_ok()
}

/// Convert pasted text into a typed value for `column`.
///
/// The validator is not run here; see [`validate_cell_value`].
pub fn convert_text_to_cell_value(
    text: &str,
    column: &SpecColumn,
    locale: &SpecGridLocale,
) -> Result<CellValue, CellConvertError> {
    match column.column_type {
        EnumColumnType::Number => {
            if text.is_empty() {
                return Ok(CellValue::Null);
            }
            parse_number_text(text)
                .map(CellValue::Number)
                .ok_or_else(|| CellConvertError::InvalidNumber(text.to_string()))
        }
        EnumColumnType::Boolean => Ok(CellValue::Bool(locale.is_true_token(text))),
        EnumColumnType::Select => {
            if let Some(opt) = column.find_option_by_text(text) {
                return Ok(opt.value.clone());
            }
            if text.is_empty() {
                return Ok(CellValue::Text(String::new()));
            }
            Err(CellConvertError::InvalidOption(text.to_string()))
        }
        EnumColumnType::Date => {
            if text.is_empty() || is_valid_date_text(text, locale) {
                Ok(CellValue::Text(text.to_string()))
            } else {
                Err(CellConvertError::InvalidDate(text.to_string()))
            }
        }
        EnumColumnType::Text => Ok(CellValue::Text(text.to_string())),
    }
}

/// Run the column validator, if any.
pub fn validate_cell_value(value: &CellValue, column: &SpecColumn) -> Result<(), CellConvertError> {
    let Some(validator) = &column.validator else {
        return Ok(());
    };
    validator(value).map_err(|msg| {
        CellConvertError::Validation(msg.unwrap_or_else(|| C_MSG_VALIDATION_FAILED.to_string()))
    })
}

/// [`convert_text_to_cell_value`] followed by [`validate_cell_value`].
pub fn convert_and_validate_text(
    text: &str,
    column: &SpecColumn,
    locale: &SpecGridLocale,
) -> Result<CellValue, CellConvertError> {
    let value = convert_text_to_cell_value(text, column, locale)?;
    validate_cell_value(&value, column)?;
    Ok(value)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecSelectOption;

    fn col_status() -> SpecColumn {
        SpecColumn::new("status", "Status", EnumColumnType::Select).with_options(vec![
            SpecSelectOption::new("Active", "active"),
            SpecSelectOption::new("Archived", "archived"),
        ])
    }

    #[test]
    fn test_format_cell_display_by_type() {
        let locale = SpecGridLocale::default();
        let col_bool = SpecColumn::new("ok", "OK", EnumColumnType::Boolean);
        let col_num = SpecColumn::new("n", "N", EnumColumnType::Number);

        assert_eq!(
            format_cell_display(Some(&CellValue::Bool(true)), &col_bool, &locale),
            "是"
        );
        assert_eq!(
            format_cell_display(Some(&CellValue::Bool(false)), &col_bool, &locale),
            "否"
        );
        assert_eq!(
            format_cell_display(Some(&CellValue::from("active")), &col_status(), &locale),
            "Active"
        );
        assert_eq!(
            format_cell_display(Some(&CellValue::from("gone")), &col_status(), &locale),
            "gone"
        );
        assert_eq!(
            format_cell_display(Some(&CellValue::Number(42.0)), &col_num, &locale),
            "42"
        );
        assert_eq!(
            format_cell_display(Some(&CellValue::Number(2.5)), &col_num, &locale),
            "2.5"
        );
        assert_eq!(format_cell_display(None, &col_num, &locale), "");
        assert_eq!(
            format_cell_display(Some(&CellValue::Null), &col_bool, &locale),
            ""
        );
    }

    #[test]
    fn test_convert_number_text() {
        let locale = SpecGridLocale::default();
        let col = SpecColumn::new("n", "N", EnumColumnType::Number);

        assert_eq!(
            convert_text_to_cell_value("", &col, &locale),
            Ok(CellValue::Null)
        );
        assert_eq!(
            convert_text_to_cell_value(" 12.5 ", &col, &locale),
            Ok(CellValue::Number(12.5))
        );
        assert_eq!(
            convert_text_to_cell_value("1e3", &col, &locale),
            Ok(CellValue::Number(1000.0))
        );
        assert_eq!(
            convert_text_to_cell_value("abc", &col, &locale),
            Err(CellConvertError::InvalidNumber("abc".to_string()))
        );
        assert!(convert_text_to_cell_value("NaN", &col, &locale).is_err());
        assert!(convert_text_to_cell_value("inf", &col, &locale).is_err());
    }

    #[test]
    fn test_convert_boolean_text() {
        let locale = SpecGridLocale::default();
        let col = SpecColumn::new("b", "B", EnumColumnType::Boolean);

        for c_token in ["是", "true", "1"] {
            assert_eq!(
                convert_text_to_cell_value(c_token, &col, &locale),
                Ok(CellValue::Bool(true))
            );
        }
        for c_token in ["否", "false", "0", "", "TRUE", "yes"] {
            assert_eq!(
                convert_text_to_cell_value(c_token, &col, &locale),
                Ok(CellValue::Bool(false))
            );
        }
    }

    #[test]
    fn test_convert_select_text_label_then_value() {
        let locale = SpecGridLocale::default();
        let col = col_status();

        assert_eq!(
            convert_text_to_cell_value("Archived", &col, &locale),
            Ok(CellValue::from("archived"))
        );
        assert_eq!(
            convert_text_to_cell_value("active", &col, &locale),
            Ok(CellValue::from("active"))
        );
        assert_eq!(
            convert_text_to_cell_value("", &col, &locale),
            Ok(CellValue::from(""))
        );
        assert_eq!(
            convert_text_to_cell_value("Deleted", &col, &locale),
            Err(CellConvertError::InvalidOption("Deleted".to_string()))
        );
    }

    #[test]
    fn test_convert_select_label_wins_over_value() {
        let locale = SpecGridLocale::default();
        let col = SpecColumn::new("p", "P", EnumColumnType::Select).with_options(vec![
            SpecSelectOption::new("high", 1_i64),
            SpecSelectOption::new("1", 2_i64),
        ]);

        assert_eq!(
            convert_text_to_cell_value("1", &col, &locale),
            Ok(CellValue::Number(2.0))
        );
        assert_eq!(
            convert_text_to_cell_value("2", &col, &locale),
            Ok(CellValue::Number(2.0))
        );
    }

    #[test]
    fn test_convert_date_keeps_source_text() {
        let locale = SpecGridLocale::default();
        let col = SpecColumn::new("d", "D", EnumColumnType::Date);

        for c_date in [
            "2024-02-29",
            "2024/03/01",
            "03/01/2024",
            "2024-03-01 08:30:00",
            "2024-03-01T08:30:00Z",
        ] {
            assert_eq!(
                convert_text_to_cell_value(c_date, &col, &locale),
                Ok(CellValue::from(c_date))
            );
        }
        assert_eq!(
            convert_text_to_cell_value("", &col, &locale),
            Ok(CellValue::from(""))
        );
        assert!(convert_text_to_cell_value("2023-02-29", &col, &locale).is_err());
        assert!(convert_text_to_cell_value("tomorrow", &col, &locale).is_err());
    }

    #[test]
    fn test_validator_message_and_generic_fallback() {
        let locale = SpecGridLocale::default();
        let col_msg = SpecColumn::new("age", "Age", EnumColumnType::Number).with_validator(|v| {
            match v.as_f64() {
                Some(n) if n >= 0.0 => Ok(()),
                _ => Err(Some("age must be >= 0".to_string())),
            }
        });
        let col_generic =
            SpecColumn::new("code", "Code", EnumColumnType::Text).with_validator(|_| Err(None));

        assert_eq!(
            convert_and_validate_text("5", &col_msg, &locale),
            Ok(CellValue::Number(5.0))
        );
        assert_eq!(
            convert_and_validate_text("-1", &col_msg, &locale),
            Err(CellConvertError::Validation("age must be >= 0".to_string()))
        );
        assert_eq!(
            convert_and_validate_text("x", &col_generic, &locale),
            Err(CellConvertError::Validation("validation failed".to_string()))
        );
    }
}
