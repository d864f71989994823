//! Display formatting for enriched values. Absent or non-finite input always
//! formats to [`NOT_AVAILABLE`].

pub const NOT_AVAILABLE: &str = "N/A";

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `"$1,234.56"`.
pub fn format_price(value: Option<f64>) -> String {
    match finite(value) {
        Some(price) => {
            let sign = if price < 0.0 { "-" } else { "" };
            format!("{sign}${}", group_thousands(&format!("{:.2}", price.abs())))
        }
        None => String::from(NOT_AVAILABLE),
    }
}

/// `"+1.23%"` / `"-0.50%"`; zero is signed `+`.
pub fn format_change_percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(change) => {
            let sign = if change >= 0.0 { "+" } else { "" };
            format!("{sign}{change:.2}%")
        }
        None => String::from(NOT_AVAILABLE),
    }
}

/// Scales to `T`/`B`/`M` at 1e12/1e9/1e6, e.g. `2.5e12` gives `"$2.5T"`.
/// Non-positive values are treated as absent.
pub fn format_market_cap(value: Option<f64>) -> String {
    let Some(cap) = finite(value).filter(|v| *v > 0.0) else {
        return String::from(NOT_AVAILABLE);
    };

    let (scaled, suffix) = if cap >= 1e12 {
        (cap / 1e12, "T")
    } else if cap >= 1e9 {
        (cap / 1e9, "B")
    } else if cap >= 1e6 {
        (cap / 1e6, "M")
    } else {
        return format!("${}", group_thousands(&format!("{cap:.2}")));
    };

    format!("${}{suffix}", trim_decimals(&format!("{scaled:.2}")))
}

/// Two decimals, e.g. `"29.87"`.
pub fn format_pe_ratio(value: Option<f64>) -> String {
    finite(value).map_or_else(|| String::from(NOT_AVAILABLE), |pe| format!("{pe:.2}"))
}

// "2.50" -> "2.5", "3.00" -> "3.0", "1.23" unchanged.
fn trim_decimals(fixed: &str) -> String {
    match fixed.strip_suffix('0') {
        Some(trimmed) if trimmed.contains('.') && !trimmed.ends_with('.') => trimmed.to_owned(),
        _ => fixed.to_owned(),
    }
}

fn group_thousands(fixed: &str) -> String {
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed, ""));
    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(fixed.len() + digits.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Truncates `text` to at most `max_chars` characters, appending `...` only
/// when something was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_owned(),
    }
}
