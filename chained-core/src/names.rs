//! Naming helpers for qualified Java type names.

use std::path::PathBuf;

/// Simple (unqualified) part of a qualified name (e.g., "java.util.List" -> "List")
pub fn simple_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(i) => &qualified[i + 1..],
        None => qualified,
    }
}

/// Package part of a qualified name (e.g., "java.util.List" -> "java.util")
///
/// Returns an empty string for names without a package.
pub fn package_of(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(i) => &qualified[..i],
        None => "",
    }
}

/// Uppercase the first character (e.g., "yearOfBirth" -> "YearOfBirth")
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Relative source path of a top-level class (e.g., "me.builder.ThingBuilder"
/// -> "me/builder/ThingBuilder.java")
pub fn source_path(qualified: &str) -> PathBuf {
    let mut path: PathBuf = package_of(qualified).split('.').filter(|s| !s.is_empty()).collect();
    path.push(format!("{}.java", simple_name(qualified)));
    path
}
