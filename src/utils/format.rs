//! Display formatting for numbers coming back from the backend.
//!
//! Every formatter takes `Option` input and renders [`PLACEHOLDER`] for absent values, so a
//! partially filled payload never fails to render.

use chrono::{DateTime, TimeZone, Utc};

pub const PLACEHOLDER: &str = "-";

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Rounds to `decimals` places with ties going away from zero. `{:.N}` alone would send
/// ties to the even digit, so `0.125` would print as `0.12`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Magnitude-suffixed number: `1.23B`, `4.50M`, `12.00K`, otherwise digits grouped by
/// thousands with at most three fraction digits.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(n) if n.is_nan() => PLACEHOLDER.to_string(),
        Some(n) if n >= BILLION => format!("{:.2}B", round_to(n / BILLION, 2)),
        Some(n) if n >= MILLION => format!("{:.2}M", round_to(n / MILLION, 2)),
        Some(n) if n >= THOUSAND => format!("{:.2}K", round_to(n / THOUSAND, 2)),
        Some(n) => group_thousands(n),
        None => PLACEHOLDER.to_string(),
    }
}

/// en-US style grouping: `-1,234.568`.
pub fn group_thousands(n: f64) -> String {
    if !n.is_finite() {
        return if n.is_nan() { "NaN".to_string() } else if n > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }
    let fixed = format!("{:.3}", round_to(n.abs(), 3));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    if n < 0.0 && grouped.chars().any(|c| c != '0' && c != '.' && c != ',') {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Signed percentage with two decimals: `-1.25%`, `0.50%`. Non-negative values carry no sign.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => PLACEHOLDER.to_string(),
        Some(v) => {
            let sign = if v >= 0.0 { "" } else { "-" };
            format!("{}{:.2}%", sign, round_to(v.abs(), 2))
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// Raw value with a percent sign, as the backend reported it: `12.5%`.
pub fn format_change(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}%", v))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Raw value without scaling.
pub fn format_plain(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Fraction in 0-1 shown as a whole percentage: `0.837` -> `84%`.
pub fn format_ratio_percent(ratio: f64) -> String {
    format!("{}%", round_display(ratio * 100.0))
}

/// Dollar amount with a fixed number of decimals: `$12.3400`.
pub fn format_usd(amount: f64, decimals: usize) -> String {
    format!("${:.*}", decimals, round_to(amount, decimals))
}

pub fn format_risk_reward(ratio: f64) -> String {
    format!("{}R", ratio)
}

/// Rounds halves toward positive infinity, the way scores are displayed.
pub fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_epoch_seconds(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| format_datetime(&dt))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
