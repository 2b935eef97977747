//! Text formatting helpers shared by the tool renderers

use chrono::{DateTime, Utc};

/// `-0.0` from upstream deltas prints as zero, never `-0.00`
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// `$1,234.56`, `-$2.50`
pub fn money(value: f64) -> String {
    let value = positive_zero(value);
    if value < 0.0 {
        format!("-${}", with_commas(-value, 2))
    } else {
        format!("${}", with_commas(value, 2))
    }
}

/// `+$2.50`, `-$2.50`
pub fn signed_money(value: f64) -> String {
    if value < 0.0 {
        money(value)
    } else {
        format!("+{}", money(value))
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", positive_zero(value))
}

/// `+1.69%`, `-0.40%`
pub fn signed_percent(value: f64) -> String {
    if value < 0.0 {
        percent(value)
    } else {
        format!("+{}", percent(value))
    }
}

/// `2.95T`, `1.20B`, `350.00M`; smaller values get thousands separators
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e12 {
        format!("{}{:.2}T", sign, abs / 1e12)
    } else if abs >= 1e9 {
        format!("{}{:.2}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}{:.2}M", sign, abs / 1e6)
    } else {
        format!("{}{}", sign, with_commas(abs, 2))
    }
}

/// `$2.95T`
pub fn large_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", compact(-value))
    } else {
        format!("${}", compact(value))
    }
}

/// Whole number with separators: `52,345,678`
pub fn count(value: f64) -> String {
    with_commas(value.round(), 0)
}

/// Unix seconds to `YYYY-MM-DD` (UTC)
pub fn unix_date(timestamp: i64) -> String {
    format_unix(timestamp, "%Y-%m-%d")
}

/// Unix seconds to `YYYY-MM-DD HH:MM` (UTC)
pub fn unix_datetime(timestamp: i64) -> String {
    format_unix(timestamp, "%Y-%m-%d %H:%M")
}

fn format_unix(timestamp: i64, pattern: &str) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Cut to `max_chars` characters, marking the cut with `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

fn with_commas(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let digits = int_part.len();
    let mut out = String::with_capacity(formatted.len() + digits / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
