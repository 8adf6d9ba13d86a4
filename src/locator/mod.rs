//! Filesystem globbing beneath a root directory.
//!
//! Patterns are relative to the root and may span sub-directories
//! (`maps/*_diff.png`). Each `/`-separated component is matched
//! independently, so `*` never crosses a directory boundary.
//!
//! With `include_subfolders` the pattern is matched against the trailing
//! components of every file beneath the root, which is the same as globbing
//! `root/**/pattern`.
//!
//! The directory tree is listed once, on the first [`FileLocator::glob`],
//! and every later pattern is matched against that listing. Call
//! [`FileLocator::rescan`] to pick up files created since.

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use regex::Regex;
use walkdir::WalkDir;

use crate::pattern::{compile_component, has_magic};
use crate::util::{Error, Result};

/// A file found beneath the root.
#[derive(Clone, Debug)]
struct Listed {
    path: PathBuf,
    /// Root-relative path components.
    parts: Vec<String>,
}

/// One compiled pattern component.
enum Component<'p> {
    Literal(&'p str),
    Glob(&'p str, Regex),
}

impl Component<'_> {
    fn matches(&self, part: &str) -> bool {
        match self {
            Component::Literal(text) => part == *text,
            Component::Glob(glob, re) => {
                // Wildcard-leading components skip hidden files
                if part.starts_with('.') && !glob.starts_with('.') {
                    return false;
                }
                re.is_match(part)
            }
        }
    }
}

/// Resolves glob patterns to files beneath a root directory.
#[derive(Clone, Debug)]
pub struct FileLocator {
    root: PathBuf,
    include_subfolders: bool,
    listing: OnceCell<Vec<Listed>>,
}

impl FileLocator {
    /// Create a locator for `root`.
    ///
    /// A relative root is made absolute against the current directory so the
    /// returned paths are always absolute.
    pub fn new(root: impl AsRef<Path>, include_subfolders: bool) -> Self {
        let root = root.as_ref();
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root,
            include_subfolders,
            listing: OnceCell::new(),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether files below sub-directories are searched.
    pub fn include_subfolders(&self) -> bool {
        self.include_subfolders
    }

    /// Forget the cached listing; the next glob lists the tree again.
    pub fn rescan(&mut self) {
        self.listing = OnceCell::new();
    }

    /// Find all files matching `pattern`, sorted by file name within each
    /// directory.
    ///
    /// An empty pattern matches nothing. A root that is missing or cannot be
    /// read is reported as [`Error::NotFound`]; unreadable sub-directories are
    /// skipped.
    pub fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let globs: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
        if globs.is_empty() {
            return Ok(Vec::new());
        }

        let mut components = Vec::with_capacity(globs.len());
        for &glob in &globs {
            if !has_magic(glob) {
                components.push(Component::Literal(glob));
                continue;
            }
            match compile_component(glob) {
                Some(re) => components.push(Component::Glob(glob, re)),
                None => return Ok(Vec::new()),
            }
        }

        let files: Vec<PathBuf> = self
            .listing()?
            .iter()
            .filter(|file| self.tail_matches(&components, &file.parts))
            .map(|file| file.path.clone())
            .collect();

        tracing::trace!("glob {:?} -> {} files", pattern, files.len());
        Ok(files)
    }

    /// Path of `file` relative to the root, with `/` separators.
    pub fn relative(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.root).unwrap_or(file);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn tail_matches(&self, components: &[Component<'_>], parts: &[String]) -> bool {
        if parts.len() < components.len()
            || (!self.include_subfolders && parts.len() != components.len())
        {
            return false;
        }
        let tail = &parts[parts.len() - components.len()..];
        components
            .iter()
            .zip(tail)
            .all(|(component, part)| component.matches(part))
    }

    fn listing(&self) -> Result<&[Listed]> {
        self.listing
            .get_or_try_init(|| self.list_files())
            .map(Vec::as_slice)
    }

    /// Walk the whole tree beneath the root once.
    fn list_files(&self) -> Result<Vec<Listed>> {
        if !self.root.is_dir() {
            return Err(Error::not_found(format!(
                "cannot read texture directory {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        return Err(Error::not_found(format!(
                            "cannot read texture directory {}: {}",
                            self.root.display(),
                            e
                        )));
                    }
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            // Symlinks need a stat to see what they point at
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let parts = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(Listed {
                path: entry.into_path(),
                parts,
            });
        }

        tracing::debug!("Listed {} files under {}", files.len(), self.root.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_glob_flat() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b_diff.png");
        touch(dir.path(), "a_diff.png");
        touch(dir.path(), "a_rough.png");
        touch(dir.path(), "sub/c_diff.png");

        let locator = FileLocator::new(dir.path(), false);
        let files = locator.glob("*_diff.png").unwrap();
        assert_eq!(names(&files), vec!["a_diff.png", "b_diff.png"]);
        assert!(files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_glob_recursive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a_diff.png");
        touch(dir.path(), "sub/c_diff.png");
        touch(dir.path(), "sub/deeper/d_diff.png");

        let locator = FileLocator::new(dir.path(), true);
        let files = locator.glob("*_diff.png").unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|f| f.ends_with("sub/deeper/d_diff.png")));
    }

    #[test]
    fn test_glob_with_directory_component() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "maps/a_diff.png");
        touch(dir.path(), "other/b_diff.png");

        let locator = FileLocator::new(dir.path(), false);
        let files = locator.glob("maps/*_diff.png").unwrap();
        assert_eq!(names(&files), vec!["a_diff.png"]);
        assert_eq!(locator.relative(&files[0]), "maps/a_diff.png");
    }

    #[test]
    fn test_glob_skips_hidden_and_dirs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".hidden_diff.png");
        fs::create_dir_all(dir.path().join("folder_diff.png")).unwrap();

        let locator = FileLocator::new(dir.path(), false);
        assert!(locator.glob("*_diff.png").unwrap().is_empty());
        assert_eq!(locator.glob(".hidden_diff.png").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.png");
        let locator = FileLocator::new(dir.path(), false);
        assert!(locator.glob("").unwrap().is_empty());
    }

    #[test]
    fn test_listing_is_taken_once() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a_diff.png");

        let mut locator = FileLocator::new(dir.path(), false);
        assert_eq!(locator.glob("*_diff.png").unwrap().len(), 1);

        // Later globs match the cached listing, not the live directory
        touch(dir.path(), "b_diff.png");
        assert_eq!(names(&locator.glob("*_diff.png").unwrap()), vec!["a_diff.png"]);
        assert!(locator.glob("b_diff.png").unwrap().is_empty());

        locator.rescan();
        assert_eq!(locator.glob("*_diff.png").unwrap().len(), 2);
    }

    #[test]
    fn test_literal_components() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "maps/wood (1).png");
        touch(dir.path(), "maps/wood_1.png");

        let locator = FileLocator::new(dir.path(), false);
        assert_eq!(names(&locator.glob("maps/wood (1).png").unwrap()), vec!["wood (1).png"]);
        assert!(locator.glob("MAPS/wood_1.png").unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let locator = FileLocator::new(dir.path().join("missing"), false);
        let err = locator.glob("*.png").unwrap_err();
        assert!(err.is_not_found());
    }
}
