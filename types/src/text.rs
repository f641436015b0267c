//! Small pure text helpers.

/// Truncate to at most `max` characters, ending in `...` when cut.
///
/// Trims surrounding whitespace first and counts `char`s, not bytes. `max`
/// is raised to 3 so the ellipsis always fits.
#[must_use]
pub fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    let max = max.max(3);
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(max - 3).collect();
    format!("{head}...")
}
