//! Collision resolution for stored filenames.

use std::collections::HashSet;

/// Split a filename into `(stem, extension)`.
///
/// The split happens at the last `.` unless that dot is the first character,
/// so `.hidden` has no extension. The extension keeps its leading dot.
pub fn split_name_ext(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(i) if i > 0 => filename.split_at(i),
        _ => (filename, ""),
    }
}

/// Pick a name that does not collide with any of `existing`.
///
/// Returns `sanitized` itself when it is free, otherwise the first free
/// `"{stem} ({n}){ext}"` for `n = 1, 2, ...`.
pub fn resolve(sanitized: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(sanitized) {
        return sanitized.to_string();
    }

    let (stem, ext) = split_name_ext(sanitized);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{stem} ({counter}){ext}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
