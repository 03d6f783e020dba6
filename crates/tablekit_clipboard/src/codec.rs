//! Clipboard text encoding: `\n` between rows, `\t` between cells.
//!
//! Parsing also accepts comma-separated lines with a deliberately naive
//! split: quoted fields with embedded delimiters are not honored.

use std::sync::LazyLock;

use regex::Regex;

const C_ROW_SEP: char = '\n';
const C_CELL_SEP: char = '\t';
const C_CELL_SEP_FALLBACK: char = ',';

static RE_EDGE_QUOTE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"^"|"$"#));

/// Serialize a cell matrix to clipboard text.
pub fn format_clipboard_text(data: &[Vec<String>]) -> String {
    data.iter()
        .map(|row| row.join(&C_CELL_SEP.to_string()))
        .collect::<Vec<_>>()
        .join(&C_ROW_SEP.to_string())
}

/// Parse clipboard text into a cell matrix.
///
/// Blank lines are dropped. Each line is split on tabs if it has one, else on
/// commas (cells trimmed, one edge quote stripped per side), else kept whole.
pub fn parse_clipboard_text(text: &str) -> Vec<Vec<String>> {
    text.split(C_ROW_SEP)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(parse_clipboard_line)
        .collect()
}

fn parse_clipboard_line(line: &str) -> Vec<String> {
    if line.contains(C_CELL_SEP) {
        return line.split(C_CELL_SEP).map(ToString::to_string).collect();
    }
    if line.contains(C_CELL_SEP_FALLBACK) {
        return line
            .split(C_CELL_SEP_FALLBACK)
            .map(|cell| strip_edge_quotes(cell.trim()))
            .collect();
    }
    vec![line.to_string()]
}

/// Drop one leading and one trailing `"`.
fn strip_edge_quotes(cell: &str) -> String {
    match RE_EDGE_QUOTE.as_ref() {
        Ok(re) => re.replace_all(cell, "").into_owned(),
        Err(_) => {
            let cell = cell.strip_prefix('"').unwrap_or(cell);
            cell.strip_suffix('"').unwrap_or(cell).to_string()
        }
    }
}
