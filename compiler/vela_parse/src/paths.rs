//! Filesystem adapter for module discovery.
//!
//! Thin, string-based wrappers over `std::fs`/`std::path`. Paths stay as
//! strings because they flow into diagnostics and the canonical imports
//! list; failures come back as empty strings or empty lists rather than
//! errors, and the loader reports what it could not find.

use std::path::{Path, PathBuf};

/// Canonical absolute form of a path, or `""` when it does not resolve.
pub fn canonical(path: &str) -> String {
    std::fs::canonicalize(path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn is_directory(path: &str) -> bool {
    Path::new(path).is_dir()
}

/// Base names of the entries in a directory, sorted for deterministic
/// module file order.
pub fn files(path: &str) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Extension of a file name, without the dot.
pub fn extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn join(a: &str, b: &str) -> String {
    if a.is_empty() {
        return b.to_string();
    }
    let mut joined = PathBuf::from(a);
    joined.push(b);
    joined.to_string_lossy().into_owned()
}

/// The directory a path belongs to: for a path naming a Vela source file,
/// its parent; anything else is already a directory path and is returned
/// unchanged.
pub fn to_directory(path: &str) -> String {
    if extension(path) == crate::loader::EXT {
        Path::new(path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string())
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("cell.vela"), "vela");
        assert_eq!(extension("dir/cell.vela"), "vela");
        assert_eq!(extension("noext"), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("a", "b"), format!("a{}b", std::path::MAIN_SEPARATOR));
        assert_eq!(join("", "b"), "b");
    }

    #[test]
    fn test_to_directory() {
        assert_eq!(
            to_directory(&format!("pkg{}cell.vela", std::path::MAIN_SEPARATOR)),
            "pkg"
        );
        assert_eq!(to_directory("cell.vela"), ".");
        assert_eq!(to_directory("../other/mod"), "../other/mod");
    }

    #[test]
    fn test_canonical_missing() {
        assert_eq!(canonical("definitely/not/a/real/path"), "");
    }
}
