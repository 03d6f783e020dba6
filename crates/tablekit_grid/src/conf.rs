//! Grid constants and default preset factories.

use crate::spec::SpecGridLocale;

/// Default localized literal rendered for boolean `true`.
pub const C_BOOL_LITERAL_YES: &str = "是";
/// Default localized literal rendered for boolean `false`.
pub const C_BOOL_LITERAL_NO: &str = "否";
/// Locale-independent tokens accepted as boolean `true` on paste/import.
pub const TUP_BOOL_TOKENS_TRUE: [&str; 2] = ["true", "1"];

/// Message used when a validator rejects a value without saying why.
pub const C_MSG_VALIDATION_FAILED: &str = "validation failed";

/// Date-only formats accepted for `date` columns, tried in order.
pub const TUP_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%Y年%m月%d日",
    "%b %d %Y",
];

/// Date-time formats accepted for `date` columns, tried after date-only formats.
pub const TUP_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Build the default locale (literals of the original product).
pub fn derive_default_locale() -> SpecGridLocale {
    SpecGridLocale {
        bool_literal_yes: C_BOOL_LITERAL_YES.to_string(),
        bool_literal_no: C_BOOL_LITERAL_NO.to_string(),
        date_formats: TUP_DATE_FORMATS.iter().map(ToString::to_string).collect(),
        datetime_formats: TUP_DATETIME_FORMATS
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}
