//! Turning a job's leaf name into a short workspace name fragment.

use crate::config::ShorteningConfig;

/// Widest abbreviated name, marker included.
pub const MAX_NAME_WIDTH: usize = 16;

/// Appended to a name that was cut short.
pub const ELLIPSIS_MARKER: &str = "...";

/// Stands in for [`ELLIPSIS_MARKER`] when no replacement is configured.
///
/// msbuild before 4.6.2 normalises paths itself and rejects `...` segments.
pub const DEFAULT_ELLIPSIS_REPLACEMENT: &str = "---";

/// Keep the first characters of `name` so the result, marker included, is at
/// most `max_width` characters wide.
///
/// Counts characters, not bytes, so multi-byte names are never split inside a
/// code point.
pub fn abbreviate(name: &str, max_width: usize) -> String {
    let marker_width = ELLIPSIS_MARKER.chars().count();
    if name.chars().count() <= max_width || max_width < marker_width + 1 {
        return name.chars().take(max_width).collect();
    }
    let mut out: String = name.chars().take(max_width - marker_width).collect();
    out.push_str(ELLIPSIS_MARKER);
    out
}

/// Shorten a job leaf name according to `config`.
///
/// Steps, always in this order: strip text (every occurrence), remove blanks,
/// abbreviate to [`MAX_NAME_WIDTH`], prepend the initial prefix, then swap any
/// `...` for the ellipsis replacement.
pub fn transform_name(name: &str, config: &ShorteningConfig) -> String {
    let mut name = name.to_string();

    if let Some(strip) = config.strip_text.as_deref().filter(|s| !s.is_empty()) {
        name = name.replace(strip, "");
    }

    if config.remove_blanks {
        name.retain(|c| c != ' ');
    }

    let mut short = abbreviate(&name, MAX_NAME_WIDTH);
    if let Some(prefix) = config.initial_prefix.as_deref() {
        short.insert_str(0, prefix);
    }

    let replacement = config
        .ellipsis_replacement
        .as_deref()
        .unwrap_or(DEFAULT_ELLIPSIS_REPLACEMENT);
    short.replace(ELLIPSIS_MARKER, replacement)
}
