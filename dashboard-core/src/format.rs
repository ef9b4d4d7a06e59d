//! Display formatting for currency, percentages, sizes and day counts
//!
//! Storage and computation always use raw numbers; these helpers are the
//! only place values are turned into text.

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format whole currency units the way en-US USD renders them: `$12,500`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }

    let rounded = amount.round();
    let digits = group_thousands(rounded.abs() as u64);

    if rounded < 0.0 {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);

    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Format a percentage with one decimal place, dropping a trailing `.0`
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{}%", trim_decimals(format!("{:.1}", value)))
}

/// Human-readable byte size with up to two decimals: `1.5 KB`, `2 MB`
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(format!("{:.2}", value)), BYTE_UNITS[unit])
}

/// Relative due-date label from a signed day count
pub fn format_days_remaining(days: i64) -> String {
    match days {
        0 => "Due today".to_string(),
        1 => "1 day left".to_string(),
        -1 => "1 day overdue".to_string(),
        d if d > 1 => format!("{} days left", d),
        d => format!("{} days overdue", -d),
    }
}

fn trim_decimals(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
