//! Text formatting shared by the page views.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::OffsetDateTime;

/// Group digits in threes with commas: `1247` → `"1,247"`.
#[must_use]
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Size in megabytes with two decimals, or `"-"` when unknown.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn file_size_mb(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) if bytes > 0 => format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0),
        _ => "-".to_owned(),
    }
}

#[must_use]
pub fn duration_label(secs: u32) -> String {
    format!("{secs}s")
}

/// The text itself, or `"-"` when missing or empty.
#[must_use]
pub fn or_dash(text: Option<&str>) -> &str {
    match text {
        Some(text) if !text.is_empty() => text,
        _ => "-",
    }
}

/// `YYYY-MM-DD` in the timestamp's own offset.
#[must_use]
pub fn short_date(ts: OffsetDateTime) -> String {
    format!("{:04}-{:02}-{:02}", ts.year(), u8::from(ts.month()), ts.day())
}
