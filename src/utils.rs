use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Logs a page step and how long it took.
#[macro_export]
macro_rules! step {
  ($name:expr, $($tail:tt)*) => {
    {
      log::info!("* {}", $name);
      let now = std::time::Instant::now();
      let value = $($tail)*;
      log::info!("Done  `{}` ({} ms)", $name, now.elapsed().as_millis());
      value
    }
  };
}

/// `January 5, 2024`. Accepts RFC 3339, naive date-times and plain dates;
/// anything else is returned unchanged.
pub fn long_date(raw: &str) -> String {
    const FORMAT: &str = "%B %-d, %Y";
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, pattern) {
            return date.format(FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }
    raw.to_string()
}

/// Cuts `text` to `limit` characters, marking the cut with `...`.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
