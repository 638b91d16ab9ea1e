//! Lock path normalization.

/// Normalize a repository-relative file path.
///
/// - Backslashes are treated as separators
/// - Empty and `.` segments are dropped
/// - `..` pops the previous segment and never climbs above the repository root
/// - Leading and trailing separators are removed
///
/// Returns `None` when nothing is left, e.g. for `""`, `"/"` or `".."`.
pub fn normalize_path(raw: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
