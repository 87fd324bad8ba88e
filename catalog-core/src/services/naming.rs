use std::sync::OnceLock;

use regex::Regex;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("file name pattern is valid"))
}

/// Every character outside `[A-Za-z0-9_.-]` becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    unsafe_chars().replace_all(name, "_").into_owned()
}

/// `<millis>_<sanitized name>`, the name a new image is stored under.
pub fn stored_name(timestamp_ms: i64, suggested: &str) -> String {
    format!("{timestamp_ms}_{}", sanitize_file_name(suggested))
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
