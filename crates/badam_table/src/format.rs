//! Display formatting for prices, volumes and percentages.

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Fixed-point formatting with `,` between each group of three integer digits.
pub fn with_separators(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int, frac) = match fixed.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (fixed.as_str(), None),
    };
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match frac {
        Some(frac) => format!("{sign}{}.{frac}", group_thousands(int)),
        None => format!("{sign}{}", group_thousands(int)),
    }
}

/// Formats a number with a precision that suits its magnitude. With
/// `abbreviate`, values of a thousand and up become `K`/`M`/`B`.
pub fn format_number(value: f64, abbreviate: bool) -> String {
    if abbreviate {
        if value >= 1e9 {
            return format!("{:.2}B", value / 1e9);
        } else if value >= 1e6 {
            return format!("{:.2}M", value / 1e6);
        } else if value >= 1e3 {
            return format!("{:.2}K", value / 1e3);
        }
    }

    let precision = if value < 0.01 {
        6
    } else if value < 1.0 {
        4
    } else if value >= 10_000.0 {
        0
    } else {
        2
    };
    with_separators(value, precision)
}

pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// `decimals` forces a fixed precision; otherwise [`format_number`] picks one.
pub fn format_currency(value: f64, decimals: Option<usize>, show_symbol: bool) -> String {
    let formatted = match decimals {
        Some(decimals) => format!("{value:.decimals$}"),
        None => format_number(value, false),
    };
    if show_symbol {
        format!("${formatted}")
    } else {
        formatted
    }
}
