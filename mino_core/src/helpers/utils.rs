use std::sync::LazyLock;

use regex::Regex;

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d[\d,]*(?:\.\d+)?|-?\.\d+").unwrap());

const ZERO_WIDTH: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Trim, drop zero-width characters and collapse runs of whitespace
/// (including non-breaking spaces) into a single space.
pub fn normalize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key: normalized and lowercased.
pub fn fold_key(input: &str) -> String {
    normalize_text(input).to_lowercase()
}

pub fn eq_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

pub fn contains_retired_marker(value: &str) -> bool {
    fold_key(value).contains("retired")
}

/// Parses a currency-formatted cell such as `$1,234.50` or `980 sTLOS`.
/// Commas are thousands separators. Returns `None` for blank or
/// non-numeric cells.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = normalize_text(raw);
    let found = AMOUNT_RE.find(&cleaned)?;
    found.as_str().replace(',', "").parse::<f64>().ok()
}

/// Formats an amount with thousands separators and at most two decimals.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc() as u64;
    let cents = ((abs - abs.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{:02}", sign, grouped, cents)
    }
}

/// Cuts `value` so that it is at most `max_bytes` long without splitting a char.
pub fn truncate_bytes(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
