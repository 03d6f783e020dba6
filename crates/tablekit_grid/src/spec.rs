//! Grid schema models, cell values, and conversion errors.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::conf::{TUP_BOOL_TOKENS_TRUE, derive_default_locale};

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// One stored cell value.
///
/// Maps directly to JSON `null | bool | number | string`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing/blank value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value (also used for dates, which keep their source text).
    Text(String),
}

impl CellValue {
    /// `Null` or empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Truthiness used when rendering boolean columns.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Borrow the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Largest magnitude below which every integer is exactly representable in f64.
const N_F64_SAFE_INTEGER_MAX: f64 = 9_007_199_254_740_992.0;

impl Serialize for CellValue {
    // Whole numbers are written as JSON integers (`31`, not `31.0`).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < N_F64_SAFE_INTEGER_MAX => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnSchema

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumColumnType {
    /// Free text (default).
    #[default]
    Text,
    /// Numeric values.
    Number,
    /// One of the column's declared options.
    Select,
    /// Calendar date kept as its source text.
    Date,
    /// Boolean values rendered as localized yes/no literals.
    Boolean,
}

/// One `select` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecSelectOption {
    /// Display label.
    pub label: String,
    /// Stored value.
    pub value: CellValue,
}

impl SpecSelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Column validator: `Ok(())` accepts, `Err(Some(msg))` rejects with a message,
/// `Err(None)` rejects with the generic message.
pub type TypeValidator = Arc<dyn Fn(&CellValue) -> Result<(), Option<String>> + Send + Sync>;

/// Static per-field definition.
#[derive(Clone, Serialize, Deserialize)]
pub struct SpecColumn {
    /// Unique field identifier.
    pub key: String,
    /// Display name (also the header text in exports).
    pub label: String,
    /// Data type.
    #[serde(rename = "type", default)]
    pub column_type: EnumColumnType,
    /// Preferred display width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    /// Only editable columns accept pasted values.
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub required: bool,
    /// Ordered options for `select` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SpecSelectOption>>,
    /// Optional value validator; attached in code, never serialized.
    #[serde(skip)]
    pub validator: Option<TypeValidator>,
}

impl fmt::Debug for SpecColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecColumn")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("editable", &self.editable)
            .field("required", &self.required)
            .field("options", &self.options)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl SpecColumn {
    /// Create a non-editable column without options or validator.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        column_type: EnumColumnType,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            column_type,
            width: None,
            sortable: false,
            filterable: false,
            editable: false,
            required: false,
            options: None,
            validator: None,
        }
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_options(mut self, options: Vec<SpecSelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&CellValue) -> Result<(), Option<String>> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Declared options, empty when none.
    pub fn options(&self) -> &[SpecSelectOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// First option whose stored value equals `value`.
    pub fn find_option_by_value(&self, value: &CellValue) -> Option<&SpecSelectOption> {
        self.options().iter().find(|opt| opt.value == *value)
    }

    /// Match `text` against option labels first, then against option values
    /// compared by their string form.
    pub fn find_option_by_text(&self, text: &str) -> Option<&SpecSelectOption> {
        let l_options = self.options();
        l_options
            .iter()
            .find(|opt| opt.label == text)
            .or_else(|| {
                l_options
                    .iter()
                    .find(|opt| !opt.value.is_blank() && opt.value.to_string() == text)
            })
    }
}

/// Find a column by key.
pub fn find_column<'a>(columns: &'a [SpecColumn], key: &str) -> Option<&'a SpecColumn> {
    columns.iter().find(|col| col.key == key)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Rows

/// Row identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One grid row: identity, field values, and transient UI flags.
///
/// The UI flags never take part in copy/paste or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecRow {
    /// Row identity.
    pub id: RowId,
    /// Row is in inline-edit mode.
    #[serde(rename = "_editing", default, skip_serializing_if = "is_false")]
    pub if_editing: bool,
    /// Row was created locally (e.g. by import) and not yet persisted.
    #[serde(rename = "_isNew", default, skip_serializing_if = "is_false")]
    pub if_is_new: bool,
    /// Field-level error messages.
    #[serde(
        rename = "_errors",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub errors: BTreeMap<String, String>,
    /// Field values keyed by column key.
    #[serde(flatten)]
    pub values: BTreeMap<String, CellValue>,
}

impl SpecRow {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            if_editing: false,
            if_is_new: false,
            errors: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style [`Self::set`].
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(key.into(), value.into());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Locale

/// Localized literals and accepted date formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecGridLocale {
    /// Rendered for boolean `true`; accepted as `true` on paste/import.
    pub bool_literal_yes: String,
    /// Rendered for boolean `false`.
    pub bool_literal_no: String,
    /// `chrono` date-only formats, tried in order.
    pub date_formats: Vec<String>,
    /// `chrono` date-time formats, tried after `date_formats`.
    pub datetime_formats: Vec<String>,
}

impl Default for SpecGridLocale {
    fn default() -> Self {
        derive_default_locale()
    }
}

impl SpecGridLocale {
    /// English `Yes` / `No` literals with the default date formats.
    pub fn english() -> Self {
        Self {
            bool_literal_yes: "Yes".to_string(),
            bool_literal_no: "No".to_string(),
            ..derive_default_locale()
        }
    }

    /// Literal for `value`.
    pub fn bool_literal(&self, value: bool) -> &str {
        if value {
            &self.bool_literal_yes
        } else {
            &self.bool_literal_no
        }
    }

    /// `true` iff `text` is the yes literal or a locale-independent true token.
    pub fn is_true_token(&self, text: &str) -> bool {
        text == self.bool_literal_yes || TUP_BOOL_TOKENS_TRUE.contains(&text)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Per-cell conversion/validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellConvertError {
    /// Non-empty text that is not a finite number.
    #[error("invalid number format: {0:?}")]
    InvalidNumber(String),
    /// Non-empty text matching no option label or value.
    #[error("invalid option value: {0:?}")]
    InvalidOption(String),
    /// Non-empty text that is not a calendar date.
    #[error("invalid date format: {0:?}")]
    InvalidDate(String),
    /// Column validator rejected the converted value.
    #[error("{0}")]
    Validation(String),
}

impl CellConvertError {
    /// Validator rejection rather than a type conversion failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
