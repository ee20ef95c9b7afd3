//! Formatting and display logic
//!
//! Pure functions for formatting data for human-readable display.

use chrono::Datelike;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::logic::dates::parse_local_date;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Format an amount of money as Indonesian Rupiah
///
/// Amounts are rounded to whole rupiah and grouped with dots.
///
/// # Examples
/// ```
/// use wargatui::logic::formatting::format_rupiah;
///
/// assert_eq!(format_rupiah(0.0), "Rp 0");
/// assert_eq!(format_rupiah(750.0), "Rp 750");
/// assert_eq!(format_rupiah(1500000.0), "Rp 1.500.000");
/// assert_eq!(format_rupiah(-25000.0), "-Rp 25.000");
/// assert_eq!(format_rupiah(999.6), "Rp 1.000");
/// ```
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Format an API date as "1 Jan 2024", or return it unchanged if unparseable
///
/// # Examples
/// ```
/// use wargatui::logic::formatting::format_date;
///
/// assert_eq!(format_date("2024-08-17"), "17 Agu 2024");
/// assert_eq!(format_date("2024-05-01T10:00:00Z"), "1 Mei 2024");
/// assert_eq!(format_date("besok"), "besok");
/// ```
pub fn format_date(raw: &str) -> String {
    match parse_local_date(raw) {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}

/// `format_date` for optional fields, with a dash for missing values
pub fn format_optional_date(raw: Option<&str>) -> String {
    raw.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// Truncate text to a display width, ending with an ellipsis when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width - 1 {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}
