//! A1-notation helpers for addressing sheet rectangles.

/// Column letter(s) for a zero-based column index: 0 -> "A", 25 -> "Z",
/// 26 -> "AA".
pub fn col_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters")
}

/// Range covering one full data row, e.g. `row_range(2, 13)` -> "A2:M2".
/// `row_number` is 1-based as in A1 notation.
pub fn row_range(row_number: usize, width: usize) -> String {
    format!(
        "A{row_number}:{}{row_number}",
        col_letter(width.saturating_sub(1))
    )
}

/// Range covering a block of `height` rows starting at row 1, used for
/// header + data rewrites, e.g. `block_range(3, 13)` -> "A1:M3".
pub fn block_range(height: usize, width: usize) -> String {
    format!("A1:{}{height}", col_letter(width.saturating_sub(1)))
}

/// Row number addressed by a data index below the header: index 0 lives in
/// sheet row 2 (row 1 is the header, A1 notation is 1-based).
pub fn data_row_number(index: usize) -> usize {
    index + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(col_letter(0), "A");
        assert_eq!(col_letter(10), "K");
        assert_eq!(col_letter(12), "M");
        assert_eq!(col_letter(25), "Z");
        assert_eq!(col_letter(26), "AA");
    }

    #[test]
    fn row_ranges() {
        assert_eq!(row_range(2, 13), "A2:M2");
        assert_eq!(row_range(5, 11), "A5:K5");
        assert_eq!(block_range(4, 2), "A1:B4");
    }

    #[test]
    fn data_rows_start_below_header() {
        assert_eq!(data_row_number(0), 2);
        assert_eq!(data_row_number(7), 9);
    }
}
