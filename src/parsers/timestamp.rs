use std::sync::OnceLock;

use regex::Regex;

/// Timestamp notations in priority order; each is matched against the prefix only
fn timestamp_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // H:MM:SS,mmm or H:MM:SS.mmm
            Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").expect("valid regex"),
            // H:MM:SS
            Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})").expect("valid regex"),
            // M:SS,mmm or M:SS.mmm
            Regex::new(r"^(\d{1,2}):(\d{2})[,.](\d{3})").expect("valid regex"),
            // M:SS
            Regex::new(r"^(\d{1,2}):(\d{2})").expect("valid regex"),
        ]
    })
}

/// Convert a timestamp in any supported notation to seconds
///
/// Unparseable input yields `0.0` so a single malformed line never aborts ingestion.
pub fn parse_timestamp(text: &str) -> f64 {
    let ts = text.trim();
    let [hms_ms, hms, ms_ms, ms] = timestamp_patterns();

    if let Some(caps) = hms_ms.captures(ts) {
        let fields = numeric_fields(&caps);
        return fields[0] * 3600.0 + fields[1] * 60.0 + fields[2] + fields[3] / 1000.0;
    }
    if let Some(caps) = hms.captures(ts) {
        let fields = numeric_fields(&caps);
        return fields[0] * 3600.0 + fields[1] * 60.0 + fields[2];
    }
    if let Some(caps) = ms_ms.captures(ts) {
        let fields = numeric_fields(&caps);
        return fields[0] * 60.0 + fields[1] + fields[2] / 1000.0;
    }
    if let Some(caps) = ms.captures(ts) {
        let fields = numeric_fields(&caps);
        return fields[0] * 60.0 + fields[1];
    }

    match ts.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds,
        _ => 0.0,
    }
}

/// Capture groups are all `\d+`, so parsing cannot fail
fn numeric_fields(caps: &regex::Captures<'_>) -> Vec<f64> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().parse::<f64>().unwrap_or(0.0))
        .collect()
}

/// Format seconds as HH:MM:SS, truncating each field
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
