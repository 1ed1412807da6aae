//! Number formatting for counter display

/// Group digits in threes from the right with single spaces
///
/// `150000` becomes `"150 000"`.
pub fn format_with_spaces(n: u64) -> String {
    format_with_separator(n, ' ')
}

/// Group digits in threes from the right with `sep`
pub fn format_with_separator(n: u64, sep: char) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Number of decimal digits in `n`
pub fn digit_count(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Fixed column width reserved for a counter so the layout does not jump
/// while digits appear
///
/// Never narrower than the grouped rendering of `target`.
pub fn display_width(target: u64) -> usize {
    let digits = digit_count(target);
    let grouped = digits + (digits - 1) / 3;
    (digits + 2).max(grouped).max(3)
}
