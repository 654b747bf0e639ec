//! Filename resolution for each row.
//!
//! A custom filename from the spreadsheet wins; otherwise the URL path
//! basename is used; otherwise a name is synthesized from the clock.

mod path;
mod sanitize;

pub use path::basename_from_url;
pub use sanitize::sanitize_strict;

use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of names synthesized when neither the row nor the URL yields one.
pub const FALLBACK_PREFIX: &str = "downloaded_file_";

/// Name used when nothing else is usable, e.g. `downloaded_file_1700000000`.
pub fn fallback_filename(now_unix: u64) -> String {
    format!("{FALLBACK_PREFIX}{now_unix}")
}

/// Seconds since the Unix epoch (0 if the clock is before it).
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Resolves the filename for a row.
///
/// With `strict`, characters outside the whitelist are removed from the final
/// name. A result that ends up empty, `.` or `..` is replaced by the fallback
/// name, so the returned name is always a plain file name.
///
/// # Examples
///
/// - `resolve_filename("https://x/a.pdf", None, true, 0)` → `"a.pdf"`
/// - `resolve_filename("https://x/a.pdf", Some("b.pdf"), true, 0)` → `"b.pdf"`
/// - `resolve_filename("https://x/", None, true, 7)` → `"downloaded_file_7"`
pub fn resolve_filename(url: &str, custom: Option<&str>, strict: bool, now_unix: u64) -> String {
    let candidate = custom
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| basename_from_url(url));

    let candidate = if strict {
        sanitize_strict(&candidate)
    } else {
        candidate
    };

    if is_unusable(&candidate) {
        fallback_filename(now_unix)
    } else {
        candidate
    }
}

fn is_unusable(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed == "." || trimmed == ".." || name.contains(['/', '\\', '\0'])
}
