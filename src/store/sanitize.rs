//! Client filename sanitizing.

/// Returns true if the character may appear in a stored filename.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ' ' | '(' | ')' | '-')
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Only the final path segment is kept (`/` and `\` both count as separators),
/// then every character outside `[A-Za-z0-9._ ()-]` is dropped. The bare
/// directory references `.` and `..` become empty.
///
/// The result may be empty; callers decide whether that is acceptable.
pub fn sanitize(raw: &str) -> String {
    let last = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = last.chars().filter(|&c| is_allowed(c)).collect();

    if cleaned == "." || cleaned == ".." {
        String::new()
    } else {
        cleaned
    }
}
