use chrono::{DateTime, Utc};

/// Format epoch seconds as an RFC 1123 style UTC string, e.g.
/// `Wed, 24 Aug 2011 18:38:47 GMT`.
pub fn format_utc(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map_or_else(
            || "Invalid Date".to_string(),
            |dt| dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        )
}
