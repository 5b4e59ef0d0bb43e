//! Mapping between typed records and positional row arrays.
//!
//! Decoding is deliberately forgiving: a sheet edited by hand will contain
//! blank cells, stringified numbers and stray whitespace, and none of that
//! should take the application down. Missing or malformed cells fall back to
//! type-appropriate defaults instead of erroring.

use crate::sheets::transport::Row;
use serde_json::Value;

/// Bidirectional mapping for one entity. Column order is fixed by `HEADER`.
pub trait RowCodec: Sized {
    /// Header row, which doubles as the schema definition for the sheet.
    const HEADER: &'static [&'static str];

    fn to_row(&self) -> Row;

    /// Decode a positional row. Never fails; see the module docs.
    fn from_row(row: &[Value]) -> Self;
}

/// A row counts as data only when its first cell is non-empty after
/// trimming. Spreadsheet padding produces trailing blank rows that must not
/// become phantom records.
pub fn is_data_row(row: &[Value]) -> bool {
    !cell_str(row, 0).trim().is_empty()
}

/// Decode the data region of a raw sheet read: skip the header row, drop
/// blank rows, map the rest.
pub fn decode_rows<T: RowCodec>(rows: &[Row]) -> Vec<T> {
    rows.iter()
        .skip(1)
        .filter(|row| is_data_row(row))
        .map(|row| T::from_row(row))
        .collect()
}

pub fn header_row<T: RowCodec>() -> Row {
    T::HEADER.iter().map(|h| Value::String(h.to_string())).collect()
}

/// Cell as a string; blank when missing.
pub fn cell_str(row: &[Value], index: usize) -> String {
    match row.get(index) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Cell as a non-negative integer, falling back to `default` when the cell
/// is missing, blank or not numeric.
pub fn cell_u32(row: &[Value], index: usize, default: u32) -> u32 {
    match row.get(index) {
        Some(Value::Number(n)) => n.as_u64().map(|v| v as u32).unwrap_or(default),
        Some(Value::String(s)) if !s.trim().is_empty() => {
            s.trim().parse().unwrap_or(default)
        }
        _ => default,
    }
}

/// Cell as a boolean. Accepts real booleans and the literal strings the
/// encoder writes ("true"/"false"); anything else is `false`.
pub fn cell_bool(row: &[Value], index: usize) -> bool {
    match row.get(index) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Cell as an RFC 3339 timestamp string, defaulting to "now" when absent so
/// half-filled rows still carry a plausible creation time.
pub fn cell_timestamp(row: &[Value], index: usize) -> String {
    let raw = cell_str(row, index);
    if raw.trim().is_empty() {
        chrono::Utc::now().to_rfc3339()
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_and_malformed_cells_fall_back() {
        let row = vec![json!(""), json!("  "), json!("abc"), json!(42)];
        assert_eq!(cell_u32(&row, 0, 7), 7);
        assert_eq!(cell_u32(&row, 1, 7), 7);
        assert_eq!(cell_u32(&row, 2, 7), 7);
        assert_eq!(cell_u32(&row, 3, 7), 42);
        assert_eq!(cell_u32(&row, 9, 7), 7);
    }

    #[test]
    fn booleans_accept_both_shapes() {
        let row = vec![json!(true), json!("TRUE"), json!("false"), json!("yes")];
        assert!(cell_bool(&row, 0));
        assert!(cell_bool(&row, 1));
        assert!(!cell_bool(&row, 2));
        assert!(!cell_bool(&row, 3));
        assert!(!cell_bool(&row, 4));
    }

    #[test]
    fn numbers_render_as_strings_when_asked() {
        let row = vec![json!(2025)];
        assert_eq!(cell_str(&row, 0), "2025");
    }

    #[test]
    fn data_row_requires_non_blank_first_cell() {
        assert!(is_data_row(&[json!("EMP001")]));
        assert!(!is_data_row(&[json!("   ")]));
        assert!(!is_data_row(&[]));
    }
}
