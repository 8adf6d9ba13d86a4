//! UDIM tile index collapsing.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::UDIM_MARKER;

/// A run of exactly four ASCII digits.
static UDIM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:[^0-9]|$)").unwrap());

/// Replace the first run of exactly four digits in a file name with
/// [`UDIM_MARKER`].
///
/// This is a heuristic: a name with another four-digit run before the tile
/// index (a year, a resolution) collapses the wrong run.
pub fn collapse_udim(file_name: &str) -> String {
    match UDIM_RE.captures(file_name).and_then(|caps| caps.get(1)) {
        Some(m) => format!("{}{}{}", &file_name[..m.start()], UDIM_MARKER, &file_name[m.end()..]),
        None => file_name.to_string(),
    }
}

/// Collapse the tile index in the file name of a path, keeping its directory.
pub fn collapse_udim_path(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => path.with_file_name(collapse_udim(name)),
        None => path.to_path_buf(),
    }
}

/// Whether a path carries the UDIM marker.
pub fn is_udim_path(path: &Path) -> bool {
    path.to_string_lossy().contains(UDIM_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_udim() {
        assert_eq!(collapse_udim("chair_wood.1001.png"), "chair_wood.<UDIM>.png");
        assert_eq!(collapse_udim("1001.png"), "<UDIM>.png");
        assert_eq!(collapse_udim("tex_1001"), "tex_<UDIM>");
    }

    #[test]
    fn test_collapse_first_run_only() {
        assert_eq!(collapse_udim("2024_wood.1001.png"), "<UDIM>_wood.1001.png");
    }

    #[test]
    fn test_collapse_exactly_four_digits() {
        assert_eq!(collapse_udim("tex_12345.png"), "tex_12345.png");
        assert_eq!(collapse_udim("tex_123.png"), "tex_123.png");
        assert_eq!(collapse_udim("tex_12345_1002.png"), "tex_12345_<UDIM>.png");
    }

    #[test]
    fn test_collapse_udim_path() {
        let path = Path::new("/textures/chair/chair_wood.1001.png");
        let collapsed = collapse_udim_path(path);
        assert_eq!(collapsed, Path::new("/textures/chair/chair_wood.<UDIM>.png"));
        assert!(is_udim_path(&collapsed));
        assert!(!is_udim_path(path));
    }
}
